//! Deterministic bar fixtures shared by the integration tests.
#![allow(dead_code)]

use {
    chrono::{Days, NaiveDate},
    squeeze_scanner::PriceBar,
};

/// Quiet bars before the ramp in [`breakout_bars`].
pub const QUIET_BARS: usize = 60;

/// First bar where the Bollinger Bands and the Keltner Channel are both defined.
pub const FIRST_ON_INDEX: usize = 19;

/// Bar at which the quiet-then-ramp fixture leaves the squeeze.
pub const FIRE_INDEX: usize = 62;

pub fn day(i: usize) -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 1, 2).unwrap() + Days::new(i as u64)
}

/// Constant close with a wide intraday range: bands collapse inside the channel.
pub fn quiet_bars(n: usize) -> Vec<PriceBar> {
    (0..n)
        .map(|i| PriceBar::new(day(i), 100.0, 102.0, 98.0, 100.0, 1_000.0))
        .collect()
}

/// `QUIET_BARS` quiet bars followed by a steady climb of +5 per bar with a narrow range.
pub fn breakout_bars(ramp: usize) -> Vec<PriceBar> {
    let mut bars = quiet_bars(QUIET_BARS);
    bars.extend((0..ramp).map(|k| {
        let close = 100.0 + 5.0 * (k as f64 + 1.0);
        PriceBar::new(
            day(QUIET_BARS + k),
            close,
            close + 0.5,
            close - 0.5,
            close,
            2_000.0,
        )
    }));
    bars
}

/// Same shape as [`breakout_bars`] but falling, so momentum turns negative.
pub fn breakdown_bars(ramp: usize) -> Vec<PriceBar> {
    let mut bars = quiet_bars(QUIET_BARS);
    bars.extend((0..ramp).map(|k| {
        let close = 100.0 - 5.0 * (k as f64 + 1.0);
        PriceBar::new(
            day(QUIET_BARS + k),
            close,
            close + 0.5,
            close - 0.5,
            close,
            2_000.0,
        )
    }));
    bars
}

/// Bars of slow drift ahead of the quiet stretch, so the 200-bar trend average is defined.
pub const TREND_LEAD_BARS: usize = 200;

/// Fire bar of [`trended_bars`]: same offset into the quiet stretch as [`FIRE_INDEX`].
pub const TRENDED_FIRE_INDEX: usize = TREND_LEAD_BARS + FIRE_INDEX;

/// `TREND_LEAD_BARS` drifting toward 100 by 0.25 per bar, then `QUIET_BARS` quiet bars, then
/// `ramp` bars moving 5 per bar. `sign` +1 drifts up from 50 and climbs; -1 drifts down from
/// 150 and falls, so the move always finishes on the far side of the trend average.
pub fn trended_bars(sign: f64, ramp: usize) -> Vec<PriceBar> {
    let mut bars: Vec<PriceBar> = (0..TREND_LEAD_BARS)
        .map(|i| {
            let close = 100.0 - sign * 0.25 * (TREND_LEAD_BARS - i) as f64;
            PriceBar::new(day(i), close, close + 1.0, close - 1.0, close, 800.0)
        })
        .collect();
    let offset = bars.len();
    bars.extend((0..QUIET_BARS).map(|i| {
        PriceBar::new(day(offset + i), 100.0, 102.0, 98.0, 100.0, 1_000.0)
    }));
    let offset = bars.len();
    bars.extend((0..ramp).map(|k| {
        let close = 100.0 + sign * 5.0 * (k as f64 + 1.0);
        PriceBar::new(
            day(offset + k),
            close,
            close + 0.5,
            close - 0.5,
            close,
            2_000.0,
        )
    }));
    bars
}

/// Bars from a list of closes, each with a +/-1 range around the close.
pub fn bars_from_closes(closes: &[f64]) -> Vec<PriceBar> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &c)| PriceBar::new(day(i), c, c + 1.0, c - 1.0, c, 500.0))
        .collect()
}

/// Smooth oscillation around 100.
pub fn sine_bars(n: usize, amplitude: f64, period: f64) -> Vec<PriceBar> {
    let closes: Vec<f64> = (0..n)
        .map(|i| 100.0 + amplitude * (i as f64 * std::f64::consts::TAU / period).sin())
        .collect();
    bars_from_closes(&closes)
}

pub fn close_at(bars: &[PriceBar], idx: usize) -> f64 {
    use squeeze_scanner::config::PriceLike;
    bars[idx].close.value()
}
