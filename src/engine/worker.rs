//! The single-instrument pipeline: bars -> indicators -> squeeze states -> signals.

use {
    crate::{
        analysis::{compute_indicators, detect_entry_signals, detect_squeeze, extract_history},
        config::{MovePct, SqueezeConfig},
        domain::{Instrument, PriceBar},
        models::{
            Confidence, EntrySignal, IndicatorFrame, PriceSeries, ScanResult, SqueezeEvent,
            SqueezeStates, TrendPosition,
        },
        trace_time,
    },
    anyhow::{Result, bail},
};

/// Immutable per-instrument analysis, reusable for the snapshot row and the episode ledger.
#[derive(Debug, Clone)]
pub struct InstrumentAnalysis {
    pub frame: IndicatorFrame,
    pub states: SqueezeStates,
    pub entries: Vec<EntrySignal>,
}

impl InstrumentAnalysis {
    pub fn run(series: PriceSeries, cfg: &SqueezeConfig) -> Result<Self> {
        let frame = compute_indicators(series, cfg);
        let states = detect_squeeze(&frame);
        let entries = detect_entry_signals(&frame, &states)?;
        Ok(Self {
            frame,
            states,
            entries,
        })
    }

    pub fn history(&self, horizons: &[usize]) -> Result<Vec<SqueezeEvent>> {
        extract_history(&self.frame, &self.states, horizons)
    }

    /// Latest-bar row for the scan table. `None` on an empty series.
    pub fn snapshot(&self, instrument: &Instrument) -> Option<ScanResult> {
        let frame = &self.frame;
        let last = frame.bars().checked_sub(1)?;
        let prev = last.saturating_sub(1);
        let state = *self.states.get(last)?;

        let close = frame.series.close_prices[last];
        let momentum = frame.momentum_value[last];
        let above = frame.above_trend[last];

        let signal_valid = match above {
            Some(above) if momentum.unwrap_or(0.0) > 0.0 => above,
            Some(above) => !above,
            None => true,
        };

        Some(ScanResult {
            symbol: instrument.symbol.clone(),
            display_name: instrument.display_name.clone(),
            date: frame.series.dates[last],
            current_price: close,
            price_change_pct: MovePct::between(&frame.series.close_prices[prev], &close),
            volume: frame.series.volumes[last],
            squeeze_on: state.squeeze_on,
            squeeze_fire: state.squeeze_fire,
            squeeze_duration: state.squeeze_duration,
            status: state.status(),
            momentum,
            momentum_direction: frame.momentum_direction[last],
            bb_width: frame.bb_width[last],
            trend_avg: frame.trend_avg[last],
            trend_position: above.map(TrendPosition::from_above),
            trend_distance_pct: frame.trend_distance_pct[last],
            signal_valid,
            signal_confidence: if above.is_some() {
                Confidence::TrendValidated
            } else {
                Confidence::TrendUnavailable
            },
            breakout: self.entries.get(last).and_then(|e| e.0),
        })
    }
}

fn ingest(instrument: &Instrument, bars: &[PriceBar], min_bars: usize) -> Result<PriceSeries> {
    if bars.len() < min_bars {
        bail!(
            "{}: only {} bars, need at least {}",
            instrument.symbol,
            bars.len(),
            min_bars
        );
    }
    PriceSeries::from_bars(instrument.symbol.clone(), bars)
}

/// Scan row for one instrument. Thin histories are rejected.
pub fn analyze_instrument(
    instrument: &Instrument,
    bars: &[PriceBar],
    cfg: &SqueezeConfig,
    min_bars: usize,
) -> Result<ScanResult> {
    trace_time!(&format!("analyze [{}]", instrument.symbol), 5_000, {
        let series = ingest(instrument, bars, min_bars)?;
        let analysis = InstrumentAnalysis::run(series, cfg)?;
        match analysis.snapshot(instrument) {
            Some(row) => Ok(row),
            None => bail!("{}: no bars to snapshot", instrument.symbol),
        }
    })
}

/// Episode ledger for one instrument. Any non-empty history is accepted.
pub fn instrument_history(
    instrument: &Instrument,
    bars: &[PriceBar],
    cfg: &SqueezeConfig,
) -> Result<Vec<SqueezeEvent>> {
    let series = ingest(instrument, bars, 1)?;
    InstrumentAnalysis::run(series, cfg)?.history(&cfg.forward_horizons)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Days, NaiveDate};

    fn bars(closes: &[f64]) -> Vec<PriceBar> {
        let start = NaiveDate::from_ymd_opt(2022, 6, 1).expect("valid date");
        closes
            .iter()
            .enumerate()
            .map(|(i, &c)| PriceBar::new(start + Days::new(i as u64), c, c + 0.5, c - 0.5, c, 10.0))
            .collect()
    }

    #[test]
    fn thin_history_is_rejected() {
        let cfg = SqueezeConfig::default();
        let err = analyze_instrument(&Instrument::bare("THIN"), &bars(&[1.0; 10]), &cfg, 50)
            .expect_err("too short");
        assert!(err.to_string().contains("only 10 bars"));
    }

    #[test]
    fn snapshot_reports_change_against_previous_close() {
        let mut closes = vec![100.0; 59];
        closes.push(102.0);
        let cfg = SqueezeConfig::default();
        let row = analyze_instrument(&Instrument::new("ABC", "Abc Corp"), &bars(&closes), &cfg, 50)
            .expect("analysed");
        assert_eq!(row.display_name, "Abc Corp");
        assert!((row.price_change_pct.value() - 2.0).abs() < 1e-9);
        assert_eq!(row.trend_avg, None);
        assert_eq!(row.trend_position, None);
        assert!(row.signal_valid);
        assert_eq!(row.signal_confidence, Confidence::TrendUnavailable);
    }

    #[test]
    fn single_bar_history_has_zero_change() {
        let cfg = SqueezeConfig::default();
        let row = analyze_instrument(&Instrument::bare("ONE"), &bars(&[5.0]), &cfg, 1)
            .expect("analysed");
        assert_eq!(row.price_change_pct, MovePct::ZERO);
        assert_eq!(row.bb_width, None);
        assert!(!row.squeeze_on);
    }
}
