#![allow(clippy::collapsible_if)]
#![allow(clippy::type_complexity)]

// Core modules
pub mod analysis;
pub mod config;
pub mod data;
pub mod domain;
pub mod engine;
pub mod models;
pub mod utils;

// Re-export commonly used types outside of crate (for the binary and integration tests)
pub use analysis::{ScanFilter, compute_indicators, detect_squeeze, extract_history};
pub use config::{HistoryPeriod, ScanConfig, SqueezeConfig};
pub use data::{InMemoryProvider, MarketDataProvider, RetryingProvider};
pub use domain::{Instrument, PriceBar};
pub use engine::{BatchOutcome, BatchScanner, CancelToken, InstrumentAnalysis, analyze_instrument};
pub use models::{PriceSeries, ScanResult, ScanSummary, SqueezeEvent};

// CLI argument parsing
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// JSON file mapping each symbol to its daily bars
    #[arg(long)]
    pub bars: PathBuf,

    /// JSON settings file (defaults to ./squeeze_scanner.json when present)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// History period to request: 6mo, 1y, 2y, 5y or max
    #[arg(long)]
    pub period: Option<HistoryPeriod>,

    /// Concurrent symbol workers
    #[arg(long)]
    pub workers: Option<usize>,

    /// Print the squeeze episode ledger for one symbol instead of scanning
    #[arg(long)]
    pub history: Option<String>,

    /// Only show rows whose momentum agrees with the trend average
    #[arg(long, default_value_t = false)]
    pub only_valid: bool,
}

impl Cli {
    /// Command-line overrides on top of the file settings.
    pub fn apply_overrides(&self, cfg: &mut config::ConfigFile) {
        if let Some(period) = self.period {
            cfg.scan.period = period;
        }
        if let Some(workers) = self.workers {
            cfg.scan.workers = workers;
        }
    }
}
