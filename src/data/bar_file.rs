//! JSON bar files: `{ "SYMBOL": [ { "date": "2024-01-02", "open": .., .. }, .. ], .. }`

use {
    super::InMemoryProvider,
    crate::domain::{Instrument, PriceBar},
    anyhow::{Context, Result},
    std::{
        collections::BTreeMap,
        fs::File,
        io::BufReader,
        path::Path,
    },
};

/// Symbol -> bars, in symbol order.
pub type BarMap = BTreeMap<String, Vec<PriceBar>>;

pub fn load_bar_file(path: impl AsRef<Path>) -> Result<BarMap> {
    let path = path.as_ref();
    let file = File::open(path).with_context(|| format!("opening bar file {}", path.display()))?;
    let reader = BufReader::new(file);
    let bars: BarMap = serde_json::from_reader(reader)
        .with_context(|| format!("parsing bar file {}", path.display()))?;
    log::info!("Loaded {} symbols from {}", bars.len(), path.display());
    Ok(bars)
}

/// Instruments plus a provider serving their bars.
pub fn into_universe(bars: BarMap) -> (Vec<Instrument>, InMemoryProvider) {
    let instruments = bars.keys().map(Instrument::bare).collect();
    let provider = bars
        .into_iter()
        .fold(InMemoryProvider::new(), |p, (symbol, bars)| p.with_bars(symbol, bars));
    (instruments, provider)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PriceLike;

    #[test]
    fn parses_symbol_map() {
        let path = std::env::temp_dir().join(format!("bars_{}.json", std::process::id()));
        std::fs::write(
            &path,
            r#"{"AAA":[{"date":"2024-01-02","open":1.0,"high":2.0,"low":0.5,"close":1.5,"volume":100.0}],"BBB":[]}"#,
        )
        .expect("write temp file");

        let bars = load_bar_file(&path).expect("valid file");
        let _ = std::fs::remove_file(&path);

        assert_eq!(bars.len(), 2);
        assert_eq!(bars["AAA"][0].close.value(), 1.5);

        let (instruments, _) = into_universe(bars);
        assert_eq!(instruments[0].symbol, "AAA");
    }

    #[test]
    fn missing_file_names_the_path() {
        let err = load_bar_file("/definitely/not/here.json").expect_err("missing");
        assert!(format!("{:#}", err).contains("/definitely/not/here.json"));
    }
}
