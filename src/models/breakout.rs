use {
    chrono::NaiveDate,
    serde::{Deserialize, Serialize},
    strum_macros::{Display, EnumIter},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BreakoutDirection {
    Bullish,
    Bearish,
}

impl BreakoutDirection {
    /// Sign used to judge whether a forward move worked out.
    pub fn sign(&self) -> f64 {
        match self {
            Self::Bullish => 1.0,
            Self::Bearish => -1.0,
        }
    }
}

/// How much the trend filter backs a breakout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum Confidence {
    /// Price sits on the trend side the direction calls for.
    #[strum(serialize = "Trend validated")]
    TrendValidated,
    /// No trend average yet; momentum and band alone decided.
    #[strum(serialize = "Trend unavailable")]
    TrendUnavailable,
}

/// Why an aligned breakout was marked untradeable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum InvalidReason {
    #[strum(serialize = "Below trend average (bullish invalid)")]
    BelowTrendForBullish,
    #[strum(serialize = "Above trend average (bearish invalid)")]
    AboveTrendForBearish,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Validity {
    Valid(Confidence),
    Invalid(InvalidReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Default)]
pub enum SignalType {
    #[default]
    #[strum(serialize = "None")]
    NoSignal,
    #[strum(serialize = "Bullish Breakout (Valid)")]
    BullishValid,
    #[strum(serialize = "Bearish Breakout (Valid)")]
    BearishValid,
    #[strum(serialize = "Invalid Breakout")]
    Invalid,
}

/// A fire bar whose momentum and close agreed on a side.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BreakoutSignal {
    pub index: usize,
    pub date: NaiveDate,
    pub direction: BreakoutDirection,
    pub validity: Validity,
    pub close: f64,
    pub momentum: f64,
    pub trend_avg: Option<f64>,
}

impl BreakoutSignal {
    pub fn is_valid(&self) -> bool {
        matches!(self.validity, Validity::Valid(_))
    }

    pub fn confidence(&self) -> Option<Confidence> {
        match self.validity {
            Validity::Valid(c) => Some(c),
            Validity::Invalid(_) => None,
        }
    }

    pub fn invalid_reason(&self) -> Option<InvalidReason> {
        match self.validity {
            Validity::Valid(_) => None,
            Validity::Invalid(r) => Some(r),
        }
    }

    pub fn long_signal(&self) -> bool {
        self.is_valid() && self.direction == BreakoutDirection::Bullish
    }

    pub fn short_signal(&self) -> bool {
        self.is_valid() && self.direction == BreakoutDirection::Bearish
    }

    pub fn signal_type(&self) -> SignalType {
        match (self.validity, self.direction) {
            (Validity::Invalid(_), _) => SignalType::Invalid,
            (Validity::Valid(_), BreakoutDirection::Bullish) => SignalType::BullishValid,
            (Validity::Valid(_), BreakoutDirection::Bearish) => SignalType::BearishValid,
        }
    }
}

/// Validator output for one bar. Most bars carry no signal.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EntrySignal(pub Option<BreakoutSignal>);

impl EntrySignal {
    pub fn breakout_detected(&self) -> bool {
        self.0.is_some()
    }

    pub fn long_signal(&self) -> bool {
        self.0.is_some_and(|s| s.long_signal())
    }

    pub fn short_signal(&self) -> bool {
        self.0.is_some_and(|s| s.short_signal())
    }

    pub fn is_valid_breakout(&self) -> bool {
        self.0.is_some_and(|s| s.is_valid())
    }

    pub fn invalid_reason(&self) -> Option<InvalidReason> {
        self.0.and_then(|s| s.invalid_reason())
    }

    pub fn signal_type(&self) -> SignalType {
        self.0.map(|s| s.signal_type()).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signal(direction: BreakoutDirection, validity: Validity) -> BreakoutSignal {
        BreakoutSignal {
            index: 0,
            date: NaiveDate::from_ymd_opt(2024, 3, 1).expect("valid date"),
            direction,
            validity,
            close: 10.0,
            momentum: 1.0,
            trend_avg: None,
        }
    }

    #[test]
    fn lower_confidence_breakouts_still_trade() {
        let s = signal(
            BreakoutDirection::Bullish,
            Validity::Valid(Confidence::TrendUnavailable),
        );
        assert!(s.long_signal());
        assert!(!s.short_signal());
        assert_eq!(s.confidence(), Some(Confidence::TrendUnavailable));
        assert_eq!(s.signal_type(), SignalType::BullishValid);
    }

    #[test]
    fn invalid_breakouts_are_reported_but_not_tradeable() {
        let row = EntrySignal(Some(signal(
            BreakoutDirection::Bearish,
            Validity::Invalid(InvalidReason::AboveTrendForBearish),
        )));
        assert!(row.breakout_detected());
        assert!(!row.short_signal());
        assert!(!row.is_valid_breakout());
        assert_eq!(row.signal_type().to_string(), "Invalid Breakout");
        assert_eq!(
            row.invalid_reason(),
            Some(InvalidReason::AboveTrendForBearish)
        );
    }

    #[test]
    fn empty_row_has_no_signal() {
        let row = EntrySignal::default();
        assert!(!row.breakout_detected());
        assert_eq!(row.signal_type(), SignalType::NoSignal);
    }
}
