use {
    super::MarketDataProvider,
    crate::{
        config::{DF, HistoryPeriod, constants::scan},
        domain::PriceBar,
    },
    anyhow::Result,
    async_trait::async_trait,
    std::time::Duration,
};

/// Per-attempt timeout plus bounded retry with linear back-off.
///
/// Errors and timeouts are retried. A clean `Ok(None)` is final. When every attempt fails the
/// symbol is reported as having no data.
#[derive(Debug, Clone)]
pub struct RetryingProvider<P> {
    inner: P,
    timeout: Duration,
    attempts: usize,
    backoff: Duration,
}

impl<P: MarketDataProvider> RetryingProvider<P> {
    pub fn new(inner: P) -> Self {
        Self {
            inner,
            timeout: scan::FETCH_TIMEOUT,
            attempts: scan::FETCH_RETRIES,
            backoff: scan::FETCH_BACKOFF,
        }
    }

    pub fn with_policy(mut self, timeout: Duration, attempts: usize, backoff: Duration) -> Self {
        self.timeout = timeout;
        self.attempts = attempts.max(1);
        self.backoff = backoff;
        self
    }

    pub fn inner(&self) -> &P {
        &self.inner
    }
}

#[async_trait]
impl<P: MarketDataProvider> MarketDataProvider for RetryingProvider<P> {
    async fn fetch_bars(
        &self,
        symbol: &str,
        period: HistoryPeriod,
    ) -> Result<Option<Vec<PriceBar>>> {
        for attempt in 0..self.attempts {
            match tokio::time::timeout(self.timeout, self.inner.fetch_bars(symbol, period)).await {
                Ok(Ok(bars)) => return Ok(bars),
                Ok(Err(e)) => {
                    if DF.log_fetch {
                        log::warn!(
                            "Fetch {} attempt {}/{} failed: {:#}",
                            symbol,
                            attempt + 1,
                            self.attempts,
                            e
                        );
                    }
                }
                Err(_) => {
                    if DF.log_fetch {
                        log::warn!(
                            "Fetch {} attempt {}/{} timed out after {:?}",
                            symbol,
                            attempt + 1,
                            self.attempts,
                            self.timeout
                        );
                    }
                }
            }

            if attempt + 1 < self.attempts {
                tokio::time::sleep(self.backoff * (attempt as u32 + 1)).await;
            }
        }

        log::warn!("Giving up on {} after {} attempts", symbol, self.attempts);
        Ok(None)
    }
}
