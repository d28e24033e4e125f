//! Configuration module for the squeeze scanner.

// Can all be private now because we have a public re-export.
mod analysis;
mod debug;
mod persistence;
mod types;

// Public
pub mod constants;

// Re-export commonly used items
pub use analysis::{
    BollingerSettings, HistoryPeriod, KeltnerSettings, ScanConfig, SqueezeConfig, default_workers,
};
pub use debug::DF;
pub use persistence::{ConfigFile, DEFAULT_CONFIG_PATH};
pub use types::{
    ClosePrice, HighPrice, LowPrice, MovePct, OpenPrice, Price, PriceLike, Volume,
};

/// Master switch read by `trace_time!`.
pub const LOG_PERFORMANCE: bool = DF.log_performance;
