use std::time::Duration;

// Bollinger Bands (inner volatility band)
pub const BB_PERIOD: usize = 20;
pub const BB_STD_DEV: f64 = 2.0;

// Keltner Channels (outer volatility band)
pub const KC_EMA_PERIOD: usize = 20;
pub const KC_ATR_PERIOD: usize = 10;
pub const KC_ATR_MULTIPLIER: f64 = 1.5;

// Squeeze momentum (rolling linear regression length)
pub const MOMENTUM_LENGTH: usize = 20;

// Long-horizon trend filter
pub const TREND_PERIOD: usize = 200;

pub mod scan {
    use super::Duration;

    /// Thin histories below this are rejected before analysis.
    pub const MIN_BARS: usize = 50;

    /// Bars after the fire bar at which the forward move is sampled.
    pub const FORWARD_HORIZONS: &[usize] = &[5, 10, 20];

    /// Worker pool = cores * this, bounded below by FALLBACK_WORKERS when core count is unknown.
    pub const WORKERS_PER_CORE: usize = 2;
    pub const FALLBACK_WORKERS: usize = 4;

    pub const FETCH_TIMEOUT: Duration = Duration::from_secs(10);
    pub const FETCH_RETRIES: usize = 2;
    pub const FETCH_BACKOFF: Duration = Duration::from_millis(500);
}

pub mod filter {
    /// Default inclusive BB width window used by the result filter.
    pub const BB_WIDTH_RANGE: (f64, f64) = (0.0, 50.0);
    /// Default inclusive distance window (%) for the above/below trend filters.
    pub const TREND_DISTANCE_RANGE: (f64, f64) = (0.0, 50.0);
}
