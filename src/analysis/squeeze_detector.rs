//! Two-state (ON/OFF) squeeze machine over an indicator frame.

use crate::models::{IndicatorFrame, SqueezeState, SqueezeStates};

/// Bollinger Bands strictly inside the Keltner Channel. Undefined bands count as OFF.
pub fn is_squeeze_on(frame: &IndicatorFrame, idx: usize) -> bool {
    match (
        frame.bb_lower[idx],
        frame.bb_upper[idx],
        frame.kc_lower[idx],
        frame.kc_upper[idx],
    ) {
        (Some(bb_lower), Some(bb_upper), Some(kc_lower), Some(kc_upper)) => {
            bb_lower > kc_lower && bb_upper < kc_upper
        }
        _ => false,
    }
}

/// Steps the machine by one bar. The state before the first bar is OFF.
pub fn next_state(prev: Option<&SqueezeState>, squeeze_on: bool) -> SqueezeState {
    let was_on = prev.is_some_and(|p| p.squeeze_on);
    let prev_duration = prev.map_or(0, |p| p.squeeze_duration);

    SqueezeState {
        squeeze_on,
        squeeze_fire: was_on && !squeeze_on,
        squeeze_duration: if squeeze_on { prev_duration + 1 } else { 0 },
    }
}

/// Folds the ON flags of a frame into the per-bar state column.
pub fn detect_squeeze(frame: &IndicatorFrame) -> SqueezeStates {
    states_from_flags((0..frame.bars()).map(|i| is_squeeze_on(frame, i)))
}

/// Same fold over a raw ON/OFF sequence.
pub fn states_from_flags<I>(flags: I) -> SqueezeStates
where
    I: IntoIterator<Item = bool>,
{
    let iter = flags.into_iter();
    let mut out: Vec<SqueezeState> = Vec::with_capacity(iter.size_hint().0);
    for on in iter {
        let state = next_state(out.last(), on);
        out.push(state);
    }
    SqueezeStates(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_counts_and_resets() {
        let states = states_from_flags([true, true, false, true, false, false]);
        let durations: Vec<_> = states.iter().map(|s| s.squeeze_duration).collect();
        assert_eq!(durations, vec![1, 2, 0, 1, 0, 0]);
    }

    #[test]
    fn fire_only_on_on_to_off() {
        let states = states_from_flags([false, true, true, false, false, true]);
        let fires: Vec<_> = states.fire_indices().collect();
        assert_eq!(fires, vec![3]);
    }

    #[test]
    fn first_bar_never_fires() {
        let states = states_from_flags([false]);
        assert!(!states.0[0].squeeze_fire);
        assert!(states_from_flags(std::iter::empty()).is_empty());
    }
}
