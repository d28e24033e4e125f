use {
    crate::models::PriceSeries,
    serde::{Deserialize, Serialize},
    strum_macros::{Display, EnumIter, EnumString},
};

/// Sign of the momentum oscillator combined with its bar-over-bar slope.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter, EnumString,
    Default,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MomentumDirection {
    BullishUp,
    BullishDown,
    BearishUp,
    BearishDown,
    #[default]
    Neutral,
}

impl MomentumDirection {
    /// `current` against the previous bar's reading. Ties and undefined values are neutral.
    pub fn classify(current: Option<f64>, previous: Option<f64>) -> Self {
        let (Some(cur), Some(prev)) = (current, previous) else {
            return Self::Neutral;
        };
        if cur > 0.0 {
            if cur > prev { Self::BullishUp } else { Self::BullishDown }
        } else if cur < 0.0 {
            if cur < prev { Self::BearishDown } else { Self::BearishUp }
        } else {
            Self::Neutral
        }
    }

    pub fn is_bullish(&self) -> bool {
        matches!(self, Self::BullishUp | Self::BullishDown)
    }

    pub fn is_bearish(&self) -> bool {
        matches!(self, Self::BearishUp | Self::BearishDown)
    }
}

/// Bars plus every derived column, aligned index-for-index with `series`.
/// `None` means "not enough history yet" (or a guarded division), never zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorFrame {
    pub series: PriceSeries,

    pub bb_middle: Vec<Option<f64>>,
    pub bb_upper: Vec<Option<f64>>,
    pub bb_lower: Vec<Option<f64>>,
    /// `(upper - lower) / middle * 100`
    pub bb_width: Vec<Option<f64>>,

    pub kc_middle: Vec<Option<f64>>,
    pub kc_upper: Vec<Option<f64>>,
    pub kc_lower: Vec<Option<f64>>,
    pub true_range: Vec<Option<f64>>,
    pub atr: Vec<Option<f64>>,

    pub momentum_value: Vec<Option<f64>>,
    pub momentum_direction: Vec<MomentumDirection>,

    pub trend_avg: Vec<Option<f64>>,
    pub above_trend: Vec<Option<bool>>,
    /// Unsigned distance from the trend average; read `above_trend` for the side.
    pub trend_distance_pct: Vec<Option<f64>>,
}

impl IndicatorFrame {
    pub fn bars(&self) -> usize {
        self.series.bars()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    pub fn symbol(&self) -> &str {
        &self.series.symbol
    }

    /// Checks that every column is aligned with the bars.
    pub(crate) fn is_aligned(&self) -> bool {
        let n = self.bars();
        [
            self.bb_middle.len(),
            self.bb_upper.len(),
            self.bb_lower.len(),
            self.bb_width.len(),
            self.kc_middle.len(),
            self.kc_upper.len(),
            self.kc_lower.len(),
            self.true_range.len(),
            self.atr.len(),
            self.momentum_value.len(),
            self.momentum_direction.len(),
            self.trend_avg.len(),
            self.above_trend.len(),
            self.trend_distance_pct.len(),
        ]
        .iter()
        .all(|&len| len == n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn direction_table() {
        use MomentumDirection::*;
        assert_eq!(MomentumDirection::classify(Some(2.0), Some(1.0)), BullishUp);
        assert_eq!(MomentumDirection::classify(Some(1.0), Some(1.0)), BullishDown);
        assert_eq!(MomentumDirection::classify(Some(-2.0), Some(-1.0)), BearishDown);
        assert_eq!(MomentumDirection::classify(Some(-1.0), Some(-1.0)), BearishUp);
        assert_eq!(MomentumDirection::classify(Some(0.0), Some(-1.0)), Neutral);
        assert_eq!(MomentumDirection::classify(Some(1.0), None), Neutral);
        assert_eq!(MomentumDirection::classify(None, Some(1.0)), Neutral);
    }

    #[test]
    fn labels_round_trip_through_strum() {
        assert_eq!(MomentumDirection::BullishUp.to_string(), "BULLISH_UP");
        assert_eq!(
            MomentumDirection::from_str("BEARISH_DOWN").ok(),
            Some(MomentumDirection::BearishDown)
        );
    }
}
