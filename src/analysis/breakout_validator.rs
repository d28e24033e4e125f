//! Breakout direction and trend validation on squeeze-fire bars.

use {
    crate::{
        config::PriceLike,
        models::{
            BreakoutDirection, BreakoutSignal, Confidence, EntrySignal, IndicatorFrame,
            InvalidReason, SqueezeStates, Validity,
        },
    },
    anyhow::{Result, ensure},
};

/// Judges a single fire bar.
///
/// Returns `None` when momentum and close do not agree on a side. Undefined momentum counts as 0.
/// Without a trend average the breakout is kept but tagged [`Confidence::TrendUnavailable`].
pub fn evaluate_fire_bar(frame: &IndicatorFrame, idx: usize) -> Option<BreakoutSignal> {
    let momentum = frame.momentum_value[idx].unwrap_or(0.0);
    let close = frame.series.close_prices[idx].value();
    let trend_avg = frame.trend_avg[idx];

    let direction = match (frame.bb_upper[idx], frame.bb_lower[idx]) {
        (Some(upper), _) if momentum > 0.0 && close > upper => BreakoutDirection::Bullish,
        (_, Some(lower)) if momentum < 0.0 && close < lower => BreakoutDirection::Bearish,
        _ => return None,
    };

    let validity = match (direction, trend_avg) {
        (_, None) => Validity::Valid(Confidence::TrendUnavailable),
        (BreakoutDirection::Bullish, Some(avg)) if close > avg => {
            Validity::Valid(Confidence::TrendValidated)
        }
        (BreakoutDirection::Bullish, Some(_)) => {
            Validity::Invalid(InvalidReason::BelowTrendForBullish)
        }
        (BreakoutDirection::Bearish, Some(avg)) if close < avg => {
            Validity::Valid(Confidence::TrendValidated)
        }
        (BreakoutDirection::Bearish, Some(_)) => {
            Validity::Invalid(InvalidReason::AboveTrendForBearish)
        }
    };

    Some(BreakoutSignal {
        index: idx,
        date: frame.series.dates[idx],
        direction,
        validity,
        close,
        momentum,
        trend_avg,
    })
}

/// Per-bar entry signal column. Only fire bars can carry a breakout.
pub fn detect_entry_signals(
    frame: &IndicatorFrame,
    states: &SqueezeStates,
) -> Result<Vec<EntrySignal>> {
    ensure!(
        states.len() == frame.bars(),
        "{}: {} squeeze states for {} bars",
        frame.symbol(),
        states.len(),
        frame.bars()
    );

    Ok(states
        .iter()
        .enumerate()
        .map(|(i, s)| {
            if s.squeeze_fire {
                EntrySignal(evaluate_fire_bar(frame, i))
            } else {
                EntrySignal::default()
            }
        })
        .collect())
}

/// Just the breakouts, oldest first.
pub fn breakouts(frame: &IndicatorFrame, states: &SqueezeStates) -> Result<Vec<BreakoutSignal>> {
    Ok(detect_entry_signals(frame, states)?
        .into_iter()
        .filter_map(|e| e.0)
        .collect())
}
