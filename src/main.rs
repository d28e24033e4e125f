use {
    anyhow::Result,
    clap::Parser,
    squeeze_scanner::{
        BatchScanner, Cli, Instrument, RetryingProvider, ScanFilter, ScanResult,
        analysis::BreakoutStats,
        config::{ConfigFile, DEFAULT_CONFIG_PATH, PriceLike},
        data::{into_universe, load_bar_file},
        models::{BreakoutDirection, SqueezeEvent},
        utils::{format_date, format_sessions},
    },
    std::{panic, path::Path},
    tabled::{Table, Tabled, builder::Builder, settings::Style},
};

#[derive(Tabled)]
struct ScanRow {
    #[tabled(rename = "Symbol")]
    symbol: String,
    #[tabled(rename = "Price")]
    price: String,
    #[tabled(rename = "Change")]
    change: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Duration")]
    duration: String,
    #[tabled(rename = "Momentum")]
    momentum: String,
    #[tabled(rename = "BB Width %")]
    bb_width: String,
    #[tabled(rename = "Trend")]
    trend: String,
    #[tabled(rename = "Valid")]
    valid: String,
    #[tabled(rename = "Breakout")]
    breakout: String,
}

fn opt(v: Option<f64>, decimals: usize) -> String {
    v.map_or_else(|| "-".to_string(), |v| format!("{:.*}", decimals, v))
}

impl From<&ScanResult> for ScanRow {
    fn from(r: &ScanResult) -> Self {
        Self {
            symbol: r.symbol.clone(),
            price: r.current_price.to_string(),
            change: r.price_change_pct.to_string(),
            status: r.status.to_string(),
            duration: format_sessions(r.squeeze_duration),
            momentum: format!("{} ({})", opt(r.momentum, 4), r.momentum_direction),
            bb_width: opt(r.bb_width, 2),
            trend: match (r.trend_position, r.trend_distance_pct) {
                (Some(pos), Some(d)) => format!("{} {:.2}%", pos, d),
                _ => "n/a".to_string(),
            },
            valid: if r.signal_valid { "yes" } else { "no" }.to_string(),
            breakout: r
                .breakout
                .map_or_else(|| "-".to_string(), |b| b.signal_type().to_string()),
        }
    }
}

fn print_scan(results: &[ScanResult]) {
    let rows: Vec<ScanRow> = results.iter().map(ScanRow::from).collect();
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{}", table);
}

fn print_history(symbol: &str, events: &[SqueezeEvent], horizons: &[usize]) {
    if events.is_empty() {
        println!("{}: no squeeze episodes in the requested period", symbol);
        return;
    }

    let mut builder = Builder::default();
    let mut header: Vec<String> = [
        "Start",
        "End",
        "Bars",
        "Direction",
        "Width before",
        "Min width",
        "Price",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();
    header.extend(horizons.iter().map(|h| format!("+{}", h)));
    builder.push_record(header);

    for e in events {
        let mut record = vec![
            format_date(e.start_date),
            e.end.to_string(),
            e.duration.to_string(),
            e.direction.to_string(),
            opt(e.bb_width_before_breakout, 2),
            format!("{:.2}", e.min_bb_width_during_squeeze),
            e.price_at_breakout
                .map_or_else(|| "-".to_string(), |p| p.format_price()),
        ];
        record.extend(
            horizons
                .iter()
                .map(|&h| e.move_at(h).map_or_else(|| "-".to_string(), |m| m.to_string())),
        );
        builder.push_record(record);
    }

    let mut table = builder.build();
    table.with(Style::rounded());
    println!("{}", table);

    for direction in [BreakoutDirection::Bullish, BreakoutDirection::Bearish] {
        let stats = BreakoutStats::from_events(events, direction, horizons);
        if stats.count == 0 {
            continue;
        }
        let parts: Vec<String> = stats
            .horizons
            .iter()
            .map(|h| {
                format!(
                    "+{}: avg {} / win {}",
                    h.horizon,
                    opt(h.average_pct, 2),
                    opt(h.win_rate_pct, 0)
                )
            })
            .collect();
        println!("{} ({}): {}", direction, stats.count, parts.join(", "));
    }
}

async fn run(args: Cli, config: ConfigFile) -> Result<()> {
    let horizons = config.squeeze.forward_horizons.clone();
    let (instruments, provider) = into_universe(load_bar_file(&args.bars)?);
    let scanner = BatchScanner::new(RetryingProvider::new(provider), config.squeeze, config.scan);

    if let Some(symbol) = &args.history {
        let instrument = instruments
            .iter()
            .find(|i| &i.symbol == symbol)
            .cloned()
            .unwrap_or_else(|| Instrument::bare(symbol.as_str()));
        match scanner.symbol_history(&instrument).await {
            Ok(events) => print_history(&instrument.symbol, &events, &horizons),
            Err(e) => println!("{}: no data ({:#})", instrument.symbol, e),
        }
        return Ok(());
    }

    let outcome = scanner.run(&instruments).await;
    let filter = ScanFilter {
        valid_signals_only: args.only_valid,
        ..ScanFilter::default()
    };
    let rows = filter.apply(&outcome.results);

    if rows.is_empty() {
        println!("No results.");
    } else {
        print_scan(&rows);
    }

    let summary = outcome.summary();
    println!(
        "Scanned {}/{} | active squeezes {} | fired {} | bullish {} | bearish {}",
        outcome.succeeded(),
        outcome.attempted,
        summary.active_squeezes,
        summary.fired_today,
        summary.bullish_momentum,
        summary.bearish_momentum
    );
    for failure in &outcome.failures {
        println!("  skipped {}: {}", failure.symbol, failure.reason);
    }

    Ok(())
}

fn main() -> Result<()> {
    panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::force_capture();
        log::error!("CRITICAL PANIC:\n{}\nStack Trace:\n{}", info, backtrace);
    }));

    let (global_level, my_code_level) = if cfg!(debug_assertions) {
        (log::LevelFilter::Warn, log::LevelFilter::Info)
    } else {
        (log::LevelFilter::Error, log::LevelFilter::Error)
    };

    let mut builder = env_logger::Builder::new();

    builder
        .filter(None, global_level)
        .filter(Some("squeeze_scanner"), my_code_level)
        .parse_default_env()
        .init();

    let args = Cli::parse();

    let mut config = match &args.config {
        Some(path) => ConfigFile::load(path)?,
        None => ConfigFile::load_or_default(Path::new(DEFAULT_CONFIG_PATH))?,
    };
    args.apply_overrides(&mut config);
    config.validate()?;

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(run(args, config))
}
