use {
    crate::{
        config::{ClosePrice, MovePct, Volume},
        models::{BreakoutSignal, Confidence, MomentumDirection, SqueezeStatus},
    },
    chrono::NaiveDate,
    serde::{Deserialize, Serialize},
    std::cmp::Ordering,
    strum_macros::Display,
};

/// Which side of the trend average the latest close sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum TrendPosition {
    #[strum(serialize = "Above")]
    Above,
    #[strum(serialize = "Below")]
    Below,
}

impl TrendPosition {
    pub fn from_above(above: bool) -> Self {
        if above { Self::Above } else { Self::Below }
    }
}

/// Latest-bar snapshot of one instrument. Rebuilt from scratch every scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanResult {
    pub symbol: String,
    pub display_name: String,
    pub date: NaiveDate,

    pub current_price: ClosePrice,
    /// Change against the previous close; zero on a single-bar history.
    pub price_change_pct: MovePct,
    pub volume: Volume,

    pub squeeze_on: bool,
    pub squeeze_fire: bool,
    pub squeeze_duration: usize,
    pub status: SqueezeStatus,

    pub momentum: Option<f64>,
    pub momentum_direction: MomentumDirection,
    pub bb_width: Option<f64>,

    pub trend_avg: Option<f64>,
    pub trend_position: Option<TrendPosition>,
    pub trend_distance_pct: Option<f64>,

    /// Momentum agrees with the trend side, or no trend average exists yet.
    pub signal_valid: bool,
    pub signal_confidence: Confidence,

    /// Breakout on the latest bar, if it fired with alignment.
    pub breakout: Option<BreakoutSignal>,
}

impl ScanResult {
    /// Priority order: active squeezes, then fresh fires, then longer runs, then stronger momentum.
    pub fn priority_cmp(&self, other: &Self) -> Ordering {
        other
            .squeeze_on
            .cmp(&self.squeeze_on)
            .then_with(|| other.squeeze_fire.cmp(&self.squeeze_fire))
            .then_with(|| other.squeeze_duration.cmp(&self.squeeze_duration))
            .then_with(|| {
                let a = self.momentum.unwrap_or(0.0);
                let b = other.momentum.unwrap_or(0.0);
                b.total_cmp(&a)
            })
    }
}

/// Headline counts for a finished scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScanSummary {
    pub total: usize,
    pub active_squeezes: usize,
    pub fired_today: usize,
    /// Active squeezes with positive momentum.
    pub bullish_momentum: usize,
    /// Active squeezes with negative momentum.
    pub bearish_momentum: usize,
}

impl ScanSummary {
    pub fn from_results(results: &[ScanResult]) -> Self {
        results.iter().fold(
            Self {
                total: results.len(),
                ..Self::default()
            },
            |mut acc, r| {
                if r.squeeze_fire {
                    acc.fired_today += 1;
                }
                if r.squeeze_on {
                    acc.active_squeezes += 1;
                    match r.momentum {
                        Some(m) if m > 0.0 => acc.bullish_momentum += 1,
                        Some(m) if m < 0.0 => acc.bearish_momentum += 1,
                        _ => {}
                    }
                }
                acc
            },
        )
    }
}
