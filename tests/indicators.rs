mod common;

use {
    common::{bars_from_closes, quiet_bars, sine_bars},
    quickcheck_macros::quickcheck,
    squeeze_scanner::{
        Instrument, PriceSeries, SqueezeConfig, analyze_instrument, compute_indicators,
        models::TrendPosition,
    },
};

fn frame_for(bars: &[squeeze_scanner::PriceBar]) -> squeeze_scanner::models::IndicatorFrame {
    let series = PriceSeries::from_bars("TEST", bars).unwrap();
    compute_indicators(series, &SqueezeConfig::default())
}

#[quickcheck]
fn bands_are_ordered(raw: Vec<u16>) -> bool {
    let closes: Vec<f64> = raw.iter().map(|&v| 10.0 + f64::from(v) / 100.0).collect();
    let frame = frame_for(&bars_from_closes(&closes));

    let bb_ok = (0..frame.bars()).all(|i| {
        match (frame.bb_lower[i], frame.bb_middle[i], frame.bb_upper[i]) {
            (Some(l), Some(m), Some(u)) => l <= m + 1e-9 && m <= u + 1e-9,
            (None, None, None) => true,
            _ => false,
        }
    });
    let kc_ok = (0..frame.bars()).all(|i| match (frame.kc_lower[i], frame.kc_upper[i]) {
        (Some(l), Some(u)) => l <= u + 1e-9,
        (None, None) => true,
        _ => false,
    });
    let width_ok = frame.bb_width.iter().flatten().all(|w| *w >= 0.0);

    bb_ok && kc_ok && width_ok
}

#[quickcheck]
fn columns_stay_aligned(raw: Vec<u8>) -> bool {
    let closes: Vec<f64> = raw.iter().map(|&v| 50.0 + f64::from(v)).collect();
    let frame = frame_for(&bars_from_closes(&closes));
    let n = closes.len();
    frame.bars() == n
        && frame.bb_width.len() == n
        && frame.atr.len() == n
        && frame.momentum_value.len() == n
        && frame.momentum_direction.len() == n
        && frame.trend_avg.len() == n
}

#[test]
fn warmup_slots_are_undefined() {
    let frame = frame_for(&sine_bars(40, 5.0, 17.0));

    assert!(frame.bb_middle[..19].iter().all(Option::is_none));
    assert!(frame.bb_middle[19].is_some());

    assert!(frame.true_range[0].is_none());
    assert!(frame.atr[..10].iter().all(Option::is_none));
    assert!(frame.atr[10].is_some());

    // KC defined from bar 10, so the 20-bar regression window first fills at bar 29.
    assert!(frame.momentum_value[..29].iter().all(Option::is_none));
    assert!(frame.momentum_value[29].is_some());

    assert!(frame.trend_avg.iter().all(Option::is_none));
    assert!(frame.above_trend.iter().all(Option::is_none));
}

#[test]
fn constant_close_collapses_the_bands() {
    let frame = frame_for(&quiet_bars(40));
    for i in 19..40 {
        assert_eq!(frame.bb_width[i], Some(0.0));
        assert_eq!(frame.bb_upper[i], Some(100.0));
        assert!((frame.kc_upper[i].unwrap() - 106.0).abs() < 1e-9);
        assert!((frame.kc_lower[i].unwrap() - 94.0).abs() < 1e-9);
    }
    assert!(frame.momentum_value[39].unwrap().abs() < 1e-9);
}

#[test]
fn short_history_has_no_trend() {
    let bars = sine_bars(60, 3.0, 20.0);
    let row = analyze_instrument(&Instrument::bare("SINE"), &bars, &SqueezeConfig::default(), 50)
        .unwrap();

    assert_eq!(row.trend_avg, None);
    assert_eq!(row.trend_position, None);
    assert_eq!(row.trend_distance_pct, None);
    assert!(row.signal_valid);
}

#[test]
fn long_rising_history_sits_above_trend() {
    let closes: Vec<f64> = (0..220).map(|i| 50.0 + i as f64 * 0.25).collect();
    let bars = bars_from_closes(&closes);
    let row = analyze_instrument(&Instrument::bare("UP"), &bars, &SqueezeConfig::default(), 50)
        .unwrap();

    // SMA(200) over closes 55.0 ..= 104.75 is 79.875.
    let avg = row.trend_avg.unwrap();
    assert!((avg - 79.875).abs() < 1e-9);
    assert_eq!(row.trend_position, Some(TrendPosition::Above));
    let expected = (104.75 - 79.875) / 79.875 * 100.0;
    assert!((row.trend_distance_pct.unwrap() - expected).abs() < 1e-9);
}

#[test]
fn constant_price_never_fires() {
    let bars: Vec<_> = (0..250)
        .map(|i| squeeze_scanner::PriceBar::flat(common::day(i), 100.0, 1_000.0))
        .collect();
    let frame = frame_for(&bars);

    assert!(frame.bb_width[19..].iter().all(|w| *w == Some(0.0)));
    let states = squeeze_scanner::detect_squeeze(&frame);
    assert_eq!(states.fire_indices().count(), 0);
}
