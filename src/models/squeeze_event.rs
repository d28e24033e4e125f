use {
    crate::{
        config::{ClosePrice, MovePct},
        models::{BreakoutDirection, Confidence},
        utils::format_date,
    },
    chrono::NaiveDate,
    serde::{Deserialize, Serialize},
    std::fmt,
    strum_macros::{Display, EnumIter},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventDirection {
    Bullish,
    Bearish,
    /// Closed, but momentum and trend did not agree on a side.
    Invalid,
    /// Series ended while the squeeze was still on.
    Pending,
}

impl From<BreakoutDirection> for EventDirection {
    fn from(d: BreakoutDirection) -> Self {
        match d {
            BreakoutDirection::Bullish => Self::Bullish,
            BreakoutDirection::Bearish => Self::Bearish,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventEnd {
    /// The fire bar.
    Closed { index: usize, date: NaiveDate },
    Ongoing,
}

impl fmt::Display for EventEnd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Closed { date, .. } => write!(f, "{}", format_date(*date)),
            Self::Ongoing => write!(f, "Ongoing"),
        }
    }
}

/// % move from the fire close to the close `horizon` bars later.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForwardMove {
    pub horizon: usize,
    /// Sampled close. `None` while the episode is still pending.
    pub price: Option<ClosePrice>,
    pub pct: MovePct,
}

/// One contiguous run of squeeze-ON bars.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SqueezeEvent {
    pub start_index: usize,
    pub start_date: NaiveDate,
    pub end: EventEnd,
    pub duration: usize,
    pub direction: EventDirection,
    /// Set for Bullish/Bearish only.
    pub confidence: Option<Confidence>,
    /// Width of the last ON bar, one bar before the fire.
    pub bb_width_before_breakout: Option<f64>,
    pub min_bb_width_during_squeeze: f64,
    pub price_at_breakout: Option<ClosePrice>,
    pub momentum_at_breakout: Option<f64>,
    pub trend_avg_at_breakout: Option<f64>,
    pub forward_moves: Vec<ForwardMove>,
}

impl SqueezeEvent {
    pub fn is_ongoing(&self) -> bool {
        matches!(self.end, EventEnd::Ongoing)
    }

    pub fn end_index(&self) -> Option<usize> {
        match self.end {
            EventEnd::Closed { index, .. } => Some(index),
            EventEnd::Ongoing => None,
        }
    }

    pub fn move_at(&self, horizon: usize) -> Option<MovePct> {
        self.forward_moves
            .iter()
            .find(|m| m.horizon == horizon)
            .map(|m| m.pct)
    }
}

/// An event tagged with the instrument it came from, for cross-universe history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolEvent {
    pub symbol: String,
    pub display_name: String,
    pub event: SqueezeEvent,
}
