use {
    crate::models::{ScanResult, ScanSummary},
    serde::{Deserialize, Serialize},
    std::sync::{
        Arc,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
};

/// Sent once per finished symbol (success or failure).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressUpdate {
    pub completed: usize,
    pub total: usize,
    pub symbol: String,
}

/// Completed/total counter shared by every task of one batch. Advisory only.
#[derive(Debug, Default)]
pub struct ScanProgress {
    completed: AtomicUsize,
    total: AtomicUsize,
}

impl ScanProgress {
    pub(crate) fn reset(&self, total: usize) {
        self.total.store(total, Ordering::Relaxed);
        self.completed.store(0, Ordering::Relaxed);
    }

    /// Returns the new completed count.
    pub(crate) fn tick(&self) -> usize {
        self.completed.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::Relaxed)
    }

    pub fn total(&self) -> usize {
        self.total.load(Ordering::Relaxed)
    }
}

/// Cooperative stop flag. Checked before a symbol starts, never in the middle of one.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// A symbol that was dropped from the batch, and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedSymbol {
    pub symbol: String,
    pub reason: String,
}

/// Everything a batch scan produced. Failures never abort the batch; they land here instead.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchOutcome {
    /// Sorted by scan priority.
    pub results: Vec<ScanResult>,
    pub failures: Vec<FailedSymbol>,
    /// Symbols that were started (cancelled ones are not counted).
    pub attempted: usize,
    pub cancelled: bool,
}

impl BatchOutcome {
    pub fn succeeded(&self) -> usize {
        self.results.len()
    }

    pub fn summary(&self) -> ScanSummary {
        ScanSummary::from_results(&self.results)
    }
}
