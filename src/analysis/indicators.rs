//! Volatility bands, squeeze momentum and the trend filter.
//!
//! Every function here is a pure column transform. Short histories produce `None`, never an error.

use crate::{
    config::{BollingerSettings, KeltnerSettings, PriceLike, SqueezeConfig},
    models::{IndicatorFrame, MomentumDirection, PriceSeries},
    trace_time,
    utils::{ema, finite, linreg_last_value, pct_of, rolling_apply, rolling_mean, rolling_std_dev},
};

pub struct BollingerBands {
    pub middle: Vec<Option<f64>>,
    pub upper: Vec<Option<f64>>,
    pub lower: Vec<Option<f64>>,
    pub width: Vec<Option<f64>>,
}

pub struct KeltnerChannels {
    pub middle: Vec<Option<f64>>,
    pub upper: Vec<Option<f64>>,
    pub lower: Vec<Option<f64>>,
    pub true_range: Vec<Option<f64>>,
    pub atr: Vec<Option<f64>>,
}

pub struct TrendFilter {
    pub average: Vec<Option<f64>>,
    pub above: Vec<Option<bool>>,
    pub distance_pct: Vec<Option<f64>>,
}

/// SMA middle, `k` sample standard deviations either side, width as % of the middle.
pub fn bollinger_bands(closes: &[Option<f64>], settings: &BollingerSettings) -> BollingerBands {
    let middle = rolling_mean(closes, settings.period);
    let std = rolling_std_dev(closes, settings.period);

    let (upper, lower): (Vec<_>, Vec<_>) = middle
        .iter()
        .zip(&std)
        .map(|(m, s)| match (m, s) {
            (Some(m), Some(s)) => (Some(m + settings.std_dev * s), Some(m - settings.std_dev * s)),
            _ => (None, None),
        })
        .unzip();

    let width = middle
        .iter()
        .zip(upper.iter().zip(&lower))
        .map(|(m, (u, l))| match (m, u, l) {
            (Some(m), Some(u), Some(l)) => pct_of(u - l, *m),
            _ => None,
        })
        .collect();

    BollingerBands {
        middle,
        upper,
        lower,
        width,
    }
}

/// `max(high - low, |high - prev_close|, |low - prev_close|)`. Undefined on the first bar.
pub fn true_range(series: &PriceSeries) -> Vec<Option<f64>> {
    (0..series.bars())
        .map(|i| {
            if i == 0 {
                return None;
            }
            let high = series.high_prices[i].value();
            let low = series.low_prices[i].value();
            let prev_close = series.close_prices[i - 1].value();
            finite(
                (high - low)
                    .max((high - prev_close).abs())
                    .max((low - prev_close).abs()),
            )
        })
        .collect()
}

/// EMA middle with an ATR envelope.
pub fn keltner_channels(series: &PriceSeries, settings: &KeltnerSettings) -> KeltnerChannels {
    let closes = series.close_values();
    let middle = ema(&closes, settings.ema_period);
    let true_range = true_range(series);
    let atr = rolling_mean(&true_range, settings.atr_period);

    let (upper, lower): (Vec<_>, Vec<_>) = middle
        .iter()
        .zip(&atr)
        .map(|(m, a)| match (m, a) {
            (Some(m), Some(a)) => (
                Some(m + settings.atr_multiplier * a),
                Some(m - settings.atr_multiplier * a),
            ),
            _ => (None, None),
        })
        .unzip();

    KeltnerChannels {
        middle,
        upper,
        lower,
        true_range,
        atr,
    }
}

/// Rolling linear-regression value of `close - midpoint(kc_upper, kc_lower)`.
pub fn squeeze_momentum(
    closes: &[Option<f64>],
    kc_upper: &[Option<f64>],
    kc_lower: &[Option<f64>],
    length: usize,
) -> Vec<Option<f64>> {
    let source: Vec<Option<f64>> = closes
        .iter()
        .zip(kc_upper.iter().zip(kc_lower))
        .map(|(c, (u, l))| match (c, u, l) {
            (Some(c), Some(u), Some(l)) => finite(c - (u + l) / 2.0),
            _ => None,
        })
        .collect();

    rolling_apply(&source, length, linreg_last_value)
}

pub fn momentum_directions(momentum: &[Option<f64>]) -> Vec<MomentumDirection> {
    momentum
        .iter()
        .enumerate()
        .map(|(i, cur)| {
            let prev = if i == 0 { None } else { momentum[i - 1] };
            MomentumDirection::classify(*cur, prev)
        })
        .collect()
}

/// Long SMA, the side of it the close sits on, and the unsigned distance in %.
pub fn trend_filter(closes: &[Option<f64>], period: usize) -> TrendFilter {
    let average = rolling_mean(closes, period);

    let (above, distance_pct) = closes
        .iter()
        .zip(&average)
        .map(|(c, avg)| match (c, avg) {
            (Some(c), Some(avg)) => (Some(c > avg), pct_of((c - avg).abs(), *avg)),
            _ => (None, None),
        })
        .unzip();

    TrendFilter {
        average,
        above,
        distance_pct,
    }
}

/// Runs the whole indicator layer over one instrument.
pub fn compute_indicators(series: PriceSeries, cfg: &SqueezeConfig) -> IndicatorFrame {
    trace_time!("compute_indicators", 2_000, {
        let closes = series.close_values();

        let bb = bollinger_bands(&closes, &cfg.bollinger);
        let kc = keltner_channels(&series, &cfg.keltner);
        let momentum_value = squeeze_momentum(&closes, &kc.upper, &kc.lower, cfg.momentum_length);
        let momentum_direction = momentum_directions(&momentum_value);
        let trend = trend_filter(&closes, cfg.trend_period);

        IndicatorFrame {
            series,
            bb_middle: bb.middle,
            bb_upper: bb.upper,
            bb_lower: bb.lower,
            bb_width: bb.width,
            kc_middle: kc.middle,
            kc_upper: kc.upper,
            kc_lower: kc.lower,
            true_range: kc.true_range,
            atr: kc.atr,
            momentum_value,
            momentum_direction,
            trend_avg: trend.average,
            above_trend: trend.above,
            trend_distance_pct: trend.distance_pct,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PriceBar;
    use chrono::{Days, NaiveDate};

    fn series_from_closes(closes: &[f64]) -> PriceSeries {
        let start = NaiveDate::from_ymd_opt(2023, 1, 2).expect("valid date");
        let bars: Vec<_> = closes
            .iter()
            .enumerate()
            .map(|(i, &c)| {
                let date = start + Days::new(i as u64);
                PriceBar::new(date, c, c + 1.0, c - 1.0, c, 1_000.0)
            })
            .collect();
        PriceSeries::from_bars("TEST", &bars).expect("valid series")
    }

    #[test]
    fn true_range_uses_previous_close() {
        let series = series_from_closes(&[10.0, 14.0]);
        let tr = true_range(&series);
        assert_eq!(tr[0], None);
        // high 15, low 13, prev close 10
        assert_eq!(tr[1], Some(5.0));
    }

    #[test]
    fn keltner_starts_after_atr_warmup() {
        let closes: Vec<f64> = (0..30).map(|i| 100.0 + i as f64).collect();
        let series = series_from_closes(&closes);
        let settings = SqueezeConfig::default().keltner;
        let kc = keltner_channels(&series, &settings);
        assert!(kc.upper[settings.atr_period - 1].is_none());
        assert!(kc.upper[settings.atr_period].is_some());
        assert!(kc.middle[0].is_some());
    }

    #[test]
    fn constant_closes_have_zero_width() {
        let series = series_from_closes(&[50.0; 40]);
        let bb = bollinger_bands(&series.close_values(), &SqueezeConfig::default().bollinger);
        assert_eq!(bb.width[18], None);
        for w in bb.width.iter().skip(19) {
            assert_eq!(*w, Some(0.0));
        }
    }

    #[test]
    fn trend_distance_is_a_magnitude() {
        let closes = [Some(10.0), Some(10.0), Some(7.0)];
        let trend = trend_filter(&closes, 3);
        assert_eq!(trend.above[2], Some(false));
        assert!((trend.distance_pct[2].expect("defined") - 200.0 / 9.0).abs() < 1e-9);
        assert_eq!(trend.average[1], None);
    }

    #[test]
    fn frame_columns_align_with_bars() {
        let closes: Vec<f64> = (0..60).map(|i| 100.0 + (i as f64 * 0.3).sin()).collect();
        let frame = compute_indicators(series_from_closes(&closes), &SqueezeConfig::default());
        assert!(frame.is_aligned());
        assert!(frame.trend_avg.iter().all(Option::is_none));
        assert!(frame.momentum_value[29].is_some());
        assert!(frame.momentum_value[28].is_none());
    }
}
