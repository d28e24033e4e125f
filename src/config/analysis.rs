//! Analysis and scan configuration (Immutable Blueprints)

use anyhow::{Result, bail, ensure};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

use crate::config::constants::{
    BB_PERIOD, BB_STD_DEV, KC_ATR_MULTIPLIER, KC_ATR_PERIOD, KC_EMA_PERIOD, MOMENTUM_LENGTH,
    TREND_PERIOD, scan,
};

/// How much history to request from the data provider.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter, EnumString,
    Default,
)]
pub enum HistoryPeriod {
    #[strum(serialize = "6mo")]
    #[serde(rename = "6mo")]
    SixMonths,
    #[default]
    #[strum(serialize = "1y")]
    #[serde(rename = "1y")]
    OneYear,
    #[strum(serialize = "2y")]
    #[serde(rename = "2y")]
    TwoYears,
    #[strum(serialize = "5y")]
    #[serde(rename = "5y")]
    FiveYears,
    #[strum(serialize = "max")]
    #[serde(rename = "max")]
    Max,
}

impl HistoryPeriod {
    /// Approximate number of trading sessions covered. `None` for unbounded history.
    pub fn approx_sessions(&self) -> Option<usize> {
        match self {
            Self::SixMonths => Some(126),
            Self::OneYear => Some(252),
            Self::TwoYears => Some(504),
            Self::FiveYears => Some(1260),
            Self::Max => None,
        }
    }

    /// How long fetched bars for this period stay fresh in an external cache.
    pub fn cache_expiry_hours(&self) -> u64 {
        match self {
            Self::SixMonths | Self::OneYear => 24,
            Self::TwoYears => 48,
            Self::FiveYears | Self::Max => 168,
        }
    }
}

/// Inner volatility band.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BollingerSettings {
    pub period: usize,
    pub std_dev: f64,
}

/// Outer volatility band.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct KeltnerSettings {
    pub ema_period: usize,
    pub atr_period: usize,
    pub atr_multiplier: f64,
}

/// Everything the single-instrument pipeline needs: indicator lookbacks plus history sampling.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SqueezeConfig {
    pub bollinger: BollingerSettings,
    pub keltner: KeltnerSettings,
    /// Rolling linear-regression window for the momentum oscillator.
    pub momentum_length: usize,
    /// Simple moving average period of the long-horizon trend filter.
    pub trend_period: usize,
    /// Bars after the fire bar at which forward moves are sampled.
    pub forward_horizons: Vec<usize>,
}

impl Default for SqueezeConfig {
    fn default() -> Self {
        Self {
            bollinger: BollingerSettings {
                period: BB_PERIOD,
                std_dev: BB_STD_DEV,
            },
            keltner: KeltnerSettings {
                ema_period: KC_EMA_PERIOD,
                atr_period: KC_ATR_PERIOD,
                atr_multiplier: KC_ATR_MULTIPLIER,
            },
            momentum_length: MOMENTUM_LENGTH,
            trend_period: TREND_PERIOD,
            forward_horizons: scan::FORWARD_HORIZONS.to_vec(),
        }
    }
}

impl SqueezeConfig {
    /// Number of bars required before every derived column is defined.
    /// True range needs one prior close, so ATR (and everything built on it) starts one bar late.
    pub fn warmup_bars(&self) -> usize {
        let momentum_warmup = self.keltner.atr_period + self.momentum_length;
        self.bollinger
            .period
            .max(self.keltner.atr_period + 1)
            .max(momentum_warmup)
            .max(self.trend_period)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(self.bollinger.period >= 2, "bollinger.period must be >= 2");
        ensure!(
            self.bollinger.std_dev.is_finite() && self.bollinger.std_dev > 0.0,
            "bollinger.std_dev must be a positive number"
        );
        ensure!(self.keltner.ema_period >= 1, "keltner.ema_period must be >= 1");
        ensure!(self.keltner.atr_period >= 1, "keltner.atr_period must be >= 1");
        ensure!(
            self.keltner.atr_multiplier.is_finite() && self.keltner.atr_multiplier > 0.0,
            "keltner.atr_multiplier must be a positive number"
        );
        ensure!(self.momentum_length >= 2, "momentum_length must be >= 2");
        ensure!(self.trend_period >= 1, "trend_period must be >= 1");
        if self.forward_horizons.is_empty() {
            bail!("forward_horizons must list at least one horizon");
        }
        ensure!(
            self.forward_horizons.iter().all(|&h| h > 0),
            "forward_horizons must be > 0 bars"
        );
        Ok(())
    }
}

/// Batch-level settings shared by every symbol in one scan.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    pub period: HistoryPeriod,
    /// Histories shorter than this are treated as thin/illiquid and skipped.
    pub min_bars: usize,
    /// Bounded worker count for concurrent per-symbol tasks.
    pub workers: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            period: HistoryPeriod::default(),
            min_bars: scan::MIN_BARS,
            workers: default_workers(),
        }
    }
}

impl ScanConfig {
    pub fn validate(&self) -> Result<()> {
        ensure!(self.min_bars >= 2, "min_bars must be >= 2");
        ensure!(self.workers >= 1, "workers must be >= 1");
        Ok(())
    }
}

/// A small multiple of the available cores.
pub fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get() * scan::WORKERS_PER_CORE)
        .unwrap_or(scan::FALLBACK_WORKERS)
}
