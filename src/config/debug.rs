//! Debugging feature flags.

#[allow(dead_code)]
pub struct LogFlags {
    /// Activate trace_time macro (for scope-level timing)
    pub log_performance: bool,

    /// Log every symbol as the batch scanner completes it.
    pub log_scan_progress: bool,

    /// Log each squeeze episode as the history extractor closes it.
    pub log_history: bool,

    /// Log fetch retries and timeouts.
    pub log_fetch: bool,
}

pub const DF: LogFlags = LogFlags {
    log_performance: false,
    log_scan_progress: false,
    log_history: false,
    log_fetch: true,
};
