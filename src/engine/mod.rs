mod messages;
mod scanner;
mod worker;

pub use {
    messages::{BatchOutcome, CancelToken, FailedSymbol, ProgressUpdate, ScanProgress},
    scanner::{BatchScanner, scan_loaded, sort_results},
    worker::{InstrumentAnalysis, analyze_instrument, instrument_history},
};
