use {
    super::{
        messages::{BatchOutcome, CancelToken, FailedSymbol, ProgressUpdate, ScanProgress},
        worker::{analyze_instrument, instrument_history},
    },
    crate::{
        config::{DF, ScanConfig, SqueezeConfig},
        data::MarketDataProvider,
        domain::{Instrument, PriceBar},
        models::{ScanResult, SqueezeEvent, SymbolEvent},
    },
    anyhow::{Context, Result},
    futures::{StreamExt, stream},
    itertools::Itertools,
    rayon::prelude::*,
    std::sync::{Arc, mpsc::Sender},
};

/// Per-symbol job run off the async executor.
type Job<T> = fn(&Instrument, &[PriceBar], &SqueezeConfig, usize) -> Result<T>;

enum TaskOutcome<T> {
    Done(T),
    Failed(FailedSymbol),
    Skipped,
}

struct Collected<T> {
    items: Vec<T>,
    failures: Vec<FailedSymbol>,
    attempted: usize,
}

impl<T> Collected<T> {
    fn from_outcomes(outcomes: impl IntoIterator<Item = TaskOutcome<T>>) -> Self {
        let mut collected = Self {
            items: Vec::new(),
            failures: Vec::new(),
            attempted: 0,
        };
        for outcome in outcomes {
            match outcome {
                TaskOutcome::Done(item) => {
                    collected.attempted += 1;
                    collected.items.push(item);
                }
                TaskOutcome::Failed(failure) => {
                    collected.attempted += 1;
                    collected.failures.push(failure);
                }
                TaskOutcome::Skipped => {}
            }
        }
        collected
    }
}

fn history_job(
    instrument: &Instrument,
    bars: &[PriceBar],
    cfg: &SqueezeConfig,
    _min_bars: usize,
) -> Result<(Instrument, Vec<SqueezeEvent>)> {
    Ok((instrument.clone(), instrument_history(instrument, bars, cfg)?))
}

fn failed<T>(instrument: &Instrument, reason: String) -> TaskOutcome<T> {
    log::warn!("Skipping {}: {}", instrument.symbol, reason);
    TaskOutcome::Failed(FailedSymbol {
        symbol: instrument.symbol.clone(),
        reason,
    })
}

/// Priority order, then symbol so equal rows come out the same way every run.
pub fn sort_results(results: Vec<ScanResult>) -> Vec<ScanResult> {
    results
        .into_iter()
        .sorted_by(|a, b| a.priority_cmp(b).then_with(|| a.symbol.cmp(&b.symbol)))
        .collect()
}

/// Fans the single-instrument pipeline out across a universe with bounded concurrency.
pub struct BatchScanner<P> {
    provider: P,
    squeeze: Arc<SqueezeConfig>,
    scan: ScanConfig,
    cancel: CancelToken,
    progress: Arc<ScanProgress>,
    progress_tx: Option<Sender<ProgressUpdate>>,
}

impl<P: MarketDataProvider> BatchScanner<P> {
    pub fn new(provider: P, squeeze: SqueezeConfig, scan: ScanConfig) -> Self {
        Self {
            provider,
            squeeze: Arc::new(squeeze),
            scan,
            cancel: CancelToken::new(),
            progress: Arc::new(ScanProgress::default()),
            progress_tx: None,
        }
    }

    pub fn with_progress_channel(mut self, tx: Sender<ProgressUpdate>) -> Self {
        self.progress_tx = Some(tx);
        self
    }

    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn progress(&self) -> Arc<ScanProgress> {
        Arc::clone(&self.progress)
    }

    pub fn squeeze_config(&self) -> &SqueezeConfig {
        &self.squeeze
    }

    /// Scans every instrument and returns the sorted rows. Never fails as a whole.
    pub async fn run(&self, instruments: &[Instrument]) -> BatchOutcome {
        let collected = self.fan_out(instruments, analyze_instrument).await;
        let cancelled = self.cancel.is_cancelled();

        log::info!(
            "Scan complete: {} attempted, {} succeeded, {} failed{}",
            collected.attempted,
            collected.items.len(),
            collected.failures.len(),
            if cancelled { " (cancelled)" } else { "" }
        );

        BatchOutcome {
            results: sort_results(collected.items),
            failures: collected.failures,
            attempted: collected.attempted,
            cancelled,
        }
    }

    /// Episode ledgers for the whole universe, grouped by symbol in input order.
    pub async fn history(&self, instruments: &[Instrument]) -> Vec<SymbolEvent> {
        let collected = self.fan_out(instruments, history_job).await;

        let order: Vec<&str> = instruments.iter().map(|i| i.symbol.as_str()).collect();
        collected
            .items
            .into_iter()
            .sorted_by_key(|(instrument, _)| {
                order
                    .iter()
                    .position(|s| *s == instrument.symbol)
                    .unwrap_or(usize::MAX)
            })
            .flat_map(|(instrument, events)| {
                events.into_iter().map(move |event| SymbolEvent {
                    symbol: instrument.symbol.clone(),
                    display_name: instrument.display_name.clone(),
                    event,
                })
            })
            .collect()
    }

    /// Episode ledger for one symbol, with an explicit error when there is no data.
    pub async fn symbol_history(&self, instrument: &Instrument) -> Result<Vec<SqueezeEvent>> {
        let bars = self
            .provider
            .fetch_bars(&instrument.symbol, self.scan.period)
            .await
            .with_context(|| format!("fetching {}", instrument.symbol))?
            .with_context(|| format!("no data for {}", instrument.symbol))?;
        instrument_history(instrument, &bars, &self.squeeze)
    }

    async fn fan_out<T>(&self, instruments: &[Instrument], job: Job<T>) -> Collected<T>
    where
        T: Send + 'static,
    {
        self.progress.reset(instruments.len());
        let workers = self.scan.workers.max(1);

        let outcomes: Vec<TaskOutcome<T>> = stream::iter(instruments)
            .map(|instrument| self.run_one(instrument, job))
            .buffer_unordered(workers)
            .collect()
            .await;

        Collected::from_outcomes(outcomes)
    }

    async fn run_one<T>(&self, instrument: &Instrument, job: Job<T>) -> TaskOutcome<T>
    where
        T: Send + 'static,
    {
        if self.cancel.is_cancelled() {
            return TaskOutcome::Skipped;
        }

        let outcome = match self
            .provider
            .fetch_bars(&instrument.symbol, self.scan.period)
            .await
        {
            Ok(Some(bars)) => {
                let cfg = Arc::clone(&self.squeeze);
                let min_bars = self.scan.min_bars;
                let owned = instrument.clone();
                let handle =
                    tokio::task::spawn_blocking(move || job(&owned, &bars, &cfg, min_bars));
                match handle.await {
                    Ok(Ok(item)) => TaskOutcome::Done(item),
                    Ok(Err(e)) => failed(instrument, format!("{:#}", e)),
                    Err(e) => failed(instrument, format!("analysis task failed: {}", e)),
                }
            }
            Ok(None) => failed(instrument, "no data".to_string()),
            Err(e) => failed(instrument, format!("fetch failed: {:#}", e)),
        };

        self.report(&instrument.symbol);
        outcome
    }

    fn report(&self, symbol: &str) {
        let completed = self.progress.tick();
        let total = self.progress.total();
        if DF.log_scan_progress {
            log::info!("[{}/{}] {}", completed, total, symbol);
        }
        if let Some(tx) = &self.progress_tx {
            let _ = tx.send(ProgressUpdate {
                completed,
                total,
                symbol: symbol.to_string(),
            });
        }
    }
}

/// Synchronous scan over bars that are already in memory, on a dedicated bounded rayon pool.
pub fn scan_loaded(
    loaded: &[(Instrument, Vec<PriceBar>)],
    squeeze: &SqueezeConfig,
    scan: &ScanConfig,
) -> Result<BatchOutcome> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(scan.workers.max(1))
        .build()
        .context("building scan thread pool")?;

    let outcomes: Vec<TaskOutcome<ScanResult>> = pool.install(|| {
        loaded
            .par_iter()
            .map(|(instrument, bars)| {
                match analyze_instrument(instrument, bars, squeeze, scan.min_bars) {
                    Ok(row) => TaskOutcome::Done(row),
                    Err(e) => failed(instrument, format!("{:#}", e)),
                }
            })
            .collect()
    });

    let collected = Collected::from_outcomes(outcomes);
    Ok(BatchOutcome {
        results: sort_results(collected.items),
        failures: collected.failures,
        attempted: collected.attempted,
        cancelled: false,
    })
}
