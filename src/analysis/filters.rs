use {
    crate::{
        config::constants::filter::{BB_WIDTH_RANGE, TREND_DISTANCE_RANGE},
        models::{MomentumDirection, ScanResult, SqueezeStatus, TrendPosition},
    },
    serde::{Deserialize, Serialize},
    std::collections::HashSet,
};

/// Row filter over scan results. `None` on a list-valued criterion means "no restriction".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanFilter {
    pub valid_signals_only: bool,
    pub statuses: Option<Vec<SqueezeStatus>>,
    pub min_duration: usize,
    /// Inclusive. Rows without a defined width never pass.
    pub bb_width_range: (f64, f64),
    pub momentum_directions: Option<Vec<MomentumDirection>>,
    /// Keep only rows above the trend average, within this inclusive distance (%).
    pub above_trend_range: Option<(f64, f64)>,
    /// Keep only rows below the trend average, within this inclusive distance (%).
    pub below_trend_range: Option<(f64, f64)>,
    pub watchlist: Option<HashSet<String>>,
}

impl Default for ScanFilter {
    fn default() -> Self {
        Self {
            valid_signals_only: false,
            statuses: None,
            min_duration: 0,
            bb_width_range: BB_WIDTH_RANGE,
            momentum_directions: None,
            above_trend_range: None,
            below_trend_range: None,
            watchlist: None,
        }
    }
}

fn within((lo, hi): (f64, f64), v: f64) -> bool {
    v >= lo && v <= hi
}

impl ScanFilter {
    /// Above-trend filter over the default distance window.
    pub fn above_trend() -> Self {
        Self {
            above_trend_range: Some(TREND_DISTANCE_RANGE),
            ..Self::default()
        }
    }

    /// Below-trend filter over the default distance window.
    pub fn below_trend() -> Self {
        Self {
            below_trend_range: Some(TREND_DISTANCE_RANGE),
            ..Self::default()
        }
    }

    pub fn matches(&self, row: &ScanResult) -> bool {
        if self.valid_signals_only && !row.signal_valid {
            return false;
        }
        if let Some(statuses) = &self.statuses {
            if !statuses.contains(&row.status) {
                return false;
            }
        }
        if row.squeeze_duration < self.min_duration {
            return false;
        }
        if !row.bb_width.is_some_and(|w| within(self.bb_width_range, w)) {
            return false;
        }
        if let Some(dirs) = &self.momentum_directions {
            if !dirs.contains(&row.momentum_direction) {
                return false;
            }
        }
        if let Some(range) = self.above_trend_range {
            if !Self::on_side(row, TrendPosition::Above, range) {
                return false;
            }
        }
        if let Some(range) = self.below_trend_range {
            if !Self::on_side(row, TrendPosition::Below, range) {
                return false;
            }
        }
        if let Some(watchlist) = &self.watchlist {
            if !watchlist.contains(&row.symbol) {
                return false;
            }
        }
        true
    }

    fn on_side(row: &ScanResult, side: TrendPosition, range: (f64, f64)) -> bool {
        row.trend_position == Some(side)
            && row.trend_distance_pct.is_some_and(|d| within(range, d))
    }

    /// Keeps matching rows in their original order.
    pub fn apply(&self, rows: &[ScanResult]) -> Vec<ScanResult> {
        rows.iter().filter(|r| self.matches(r)).cloned().collect()
    }
}
