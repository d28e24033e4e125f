use {
    crate::{config::HistoryPeriod, domain::PriceBar},
    anyhow::Result,
    async_trait::async_trait,
};

/// Abstract interface for fetching daily history.
///
/// `Ok(None)` is a clean "no data for this symbol". `Err` is a failed attempt that may be retried.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Bars for `symbol` covering `period`, ascending by date.
    async fn fetch_bars(&self, symbol: &str, period: HistoryPeriod)
    -> Result<Option<Vec<PriceBar>>>;
}

#[async_trait]
impl<P: MarketDataProvider + ?Sized> MarketDataProvider for std::sync::Arc<P> {
    async fn fetch_bars(
        &self,
        symbol: &str,
        period: HistoryPeriod,
    ) -> Result<Option<Vec<PriceBar>>> {
        (**self).fetch_bars(symbol, period).await
    }
}
