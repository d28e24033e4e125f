//! Segments a squeeze state column into episodes and samples what happened after each fire.

use {
    crate::{
        config::{DF, MovePct, PriceLike},
        models::{
            BreakoutDirection, Confidence, EventDirection, EventEnd, ForwardMove, IndicatorFrame,
            SqueezeEvent, SqueezeStates,
        },
    },
    anyhow::{Result, bail, ensure},
};

/// Direction of a closed episode.
///
/// Momentum has to agree with the close's side of the trend average. With no trend average,
/// the sign of momentum decides on its own (lower confidence). Anything else is `Invalid`.
pub fn episode_direction(
    momentum: Option<f64>,
    close: f64,
    trend_avg: Option<f64>,
) -> (EventDirection, Option<Confidence>) {
    let side = match momentum {
        Some(m) if m > 0.0 => Some(BreakoutDirection::Bullish),
        Some(m) if m < 0.0 => Some(BreakoutDirection::Bearish),
        _ => None,
    };

    match (side, trend_avg) {
        (Some(BreakoutDirection::Bullish), Some(avg)) if close > avg => (
            EventDirection::Bullish,
            Some(Confidence::TrendValidated),
        ),
        (Some(BreakoutDirection::Bearish), Some(avg)) if close < avg => (
            EventDirection::Bearish,
            Some(Confidence::TrendValidated),
        ),
        (Some(d), None) => (d.into(), Some(Confidence::TrendUnavailable)),
        _ => (EventDirection::Invalid, None),
    }
}

/// Running state of the episode currently being walked.
struct OpenEpisode {
    start: usize,
    min_width: Option<f64>,
}

impl OpenEpisode {
    fn new(start: usize, width: Option<f64>) -> Self {
        Self {
            start,
            min_width: width,
        }
    }

    /// Strict `<` so ties keep the earliest reading.
    fn observe(&mut self, width: Option<f64>) {
        if let Some(w) = width {
            match self.min_width {
                Some(min) if w >= min => {}
                _ => self.min_width = Some(w),
            }
        }
    }
}

/// Walks the whole series once and returns every squeeze episode, oldest first.
///
/// Fails when the state column does not line up with the frame, or when a fire flag is not
/// preceded by an ON bar.
pub fn extract_history(
    frame: &IndicatorFrame,
    states: &SqueezeStates,
    horizons: &[usize],
) -> Result<Vec<SqueezeEvent>> {
    ensure!(
        frame.is_aligned(),
        "{}: indicator columns are not aligned with the bars",
        frame.symbol()
    );
    ensure!(
        states.len() == frame.bars(),
        "{}: {} squeeze states for {} bars",
        frame.symbol(),
        states.len(),
        frame.bars()
    );

    let mut events = Vec::new();
    let mut open: Option<OpenEpisode> = None;

    for (i, state) in states.iter().enumerate() {
        let width = frame.bb_width[i];

        match (state.squeeze_on, open.as_mut()) {
            (true, None) => open = Some(OpenEpisode::new(i, width)),
            (true, Some(episode)) => episode.observe(width),
            (false, Some(_)) => {
                if !state.squeeze_fire {
                    bail!(
                        "{}: squeeze ended at bar {} ({}) without a fire flag",
                        frame.symbol(),
                        i,
                        frame.series.dates[i]
                    );
                }
                if let Some(episode) = open.take() {
                    events.push(close_episode(frame, episode, i, horizons));
                }
            }
            (false, None) => {
                if state.squeeze_fire {
                    bail!(
                        "{}: fire flag at bar {} ({}) without a preceding squeeze",
                        frame.symbol(),
                        i,
                        frame.series.dates[i]
                    );
                }
            }
        }
    }

    if let Some(episode) = open {
        events.push(pending_episode(frame, episode, horizons));
    }

    if DF.log_history {
        log::info!("{}: {} squeeze episodes", frame.symbol(), events.len());
    }

    Ok(events)
}

fn close_episode(
    frame: &IndicatorFrame,
    episode: OpenEpisode,
    fire: usize,
    horizons: &[usize],
) -> SqueezeEvent {
    let series = &frame.series;
    let price_at_breakout = series.close_prices[fire];
    let momentum = frame.momentum_value[fire];
    let trend_avg = frame.trend_avg[fire];

    let (direction, confidence) = episode_direction(momentum, price_at_breakout.value(), trend_avg);

    // One-bar lag: the last ON bar, not the fire bar.
    let bb_width_before_breakout = fire.checked_sub(1).and_then(|prev| frame.bb_width[prev]);

    let min_bb_width_during_squeeze = episode
        .min_width
        .or(frame.bb_width[fire])
        .unwrap_or(0.0);

    let forward_moves = horizons
        .iter()
        .map(|&horizon| {
            let sampled = series.close_clamped(fire, horizon);
            ForwardMove {
                horizon,
                price: Some(sampled),
                pct: MovePct::between(&price_at_breakout, &sampled),
            }
        })
        .collect();

    let event = SqueezeEvent {
        start_index: episode.start,
        start_date: series.dates[episode.start],
        end: EventEnd::Closed {
            index: fire,
            date: series.dates[fire],
        },
        duration: fire - episode.start,
        direction,
        confidence,
        bb_width_before_breakout,
        min_bb_width_during_squeeze,
        price_at_breakout: Some(price_at_breakout),
        momentum_at_breakout: momentum,
        trend_avg_at_breakout: trend_avg,
        forward_moves,
    };

    if DF.log_history {
        log::debug!(
            "{}: squeeze {} -> {} ({} bars) {}",
            frame.symbol(),
            event.start_date,
            event.end,
            event.duration,
            event.direction
        );
    }

    event
}

fn pending_episode(
    frame: &IndicatorFrame,
    episode: OpenEpisode,
    horizons: &[usize],
) -> SqueezeEvent {
    let series = &frame.series;
    let last = series.bars() - 1;

    SqueezeEvent {
        start_index: episode.start,
        start_date: series.dates[episode.start],
        end: EventEnd::Ongoing,
        duration: series.bars() - episode.start,
        direction: EventDirection::Pending,
        confidence: None,
        bb_width_before_breakout: frame.bb_width[last],
        min_bb_width_during_squeeze: episode.min_width.unwrap_or(0.0),
        price_at_breakout: None,
        momentum_at_breakout: frame.momentum_value[last],
        trend_avg_at_breakout: frame.trend_avg[last],
        forward_moves: horizons
            .iter()
            .map(|&horizon| ForwardMove {
                horizon,
                price: None,
                pct: MovePct::ZERO,
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        analysis::compute_indicators, config::SqueezeConfig, domain::PriceBar,
        models::PriceSeries,
    };
    use chrono::{Days, NaiveDate};

    fn zigzag_frame(len: usize) -> IndicatorFrame {
        let start = NaiveDate::from_ymd_opt(2024, 1, 2).expect("valid date");
        let bars: Vec<_> = (0..len)
            .map(|i| {
                let c = if i % 2 == 0 { 100.0 } else { 103.0 };
                PriceBar::new(start + Days::new(i as u64), c, c + 1.0, c - 1.0, c, 10.0)
            })
            .collect();
        let series = PriceSeries::from_bars("ZZ", &bars).expect("valid series");
        compute_indicators(series, &SqueezeConfig::default())
    }

    #[test]
    fn unset_minimum_falls_back_to_the_fire_bar_width() {
        let frame = zigzag_frame(30);
        let fire = 25;
        let fire_width = frame.bb_width[fire].expect("width defined after warm-up");
        assert!(fire_width > 0.0);

        let event = close_episode(&frame, OpenEpisode::new(22, None), fire, &[5]);
        assert_eq!(event.min_bb_width_during_squeeze, fire_width);
        assert_eq!(event.duration, 3);
    }

    #[test]
    fn unset_minimum_without_a_fire_width_is_zero() {
        let frame = zigzag_frame(30);
        assert!(frame.bb_width[4].is_none());

        let event = close_episode(&frame, OpenEpisode::new(2, None), 4, &[5]);
        assert_eq!(event.min_bb_width_during_squeeze, 0.0);
        assert_eq!(event.bb_width_before_breakout, None);
    }

    #[test]
    fn direction_needs_trend_agreement() {
        let (d, c) = episode_direction(Some(1.0), 105.0, Some(100.0));
        assert_eq!((d, c), (EventDirection::Bullish, Some(Confidence::TrendValidated)));

        let (d, _) = episode_direction(Some(1.0), 95.0, Some(100.0));
        assert_eq!(d, EventDirection::Invalid);

        let (d, _) = episode_direction(Some(-1.0), 95.0, Some(100.0));
        assert_eq!(d, EventDirection::Bearish);

        let (d, _) = episode_direction(Some(-1.0), 105.0, Some(100.0));
        assert_eq!(d, EventDirection::Invalid);
    }

    #[test]
    fn missing_trend_falls_back_to_momentum_sign() {
        assert_eq!(
            episode_direction(Some(-2.0), 50.0, None),
            (EventDirection::Bearish, Some(Confidence::TrendUnavailable))
        );
        assert_eq!(
            episode_direction(Some(0.0), 50.0, None),
            (EventDirection::Invalid, None)
        );
        assert_eq!(
            episode_direction(None, 50.0, None),
            (EventDirection::Invalid, None)
        );
    }

    #[test]
    fn running_minimum_keeps_the_earliest_tie() {
        let mut ep = OpenEpisode::new(0, None);
        ep.observe(Some(3.0));
        ep.observe(None);
        ep.observe(Some(2.0));
        ep.observe(Some(2.0));
        ep.observe(Some(4.0));
        assert_eq!(ep.min_width, Some(2.0));
    }
}
