use {
    super::MarketDataProvider,
    crate::{config::HistoryPeriod, domain::PriceBar},
    anyhow::{Result, bail},
    async_trait::async_trait,
    std::collections::{HashMap, HashSet},
};

/// Serves pre-loaded bars, trimmed to the most recent sessions of the requested period.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProvider {
    bars: HashMap<String, Vec<PriceBar>>,
    failing: HashSet<String>,
}

impl InMemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, symbol: impl Into<String>, bars: Vec<PriceBar>) {
        self.bars.insert(symbol.into(), bars);
    }

    pub fn with_bars(mut self, symbol: impl Into<String>, bars: Vec<PriceBar>) -> Self {
        self.insert(symbol, bars);
        self
    }

    /// Every fetch of `symbol` returns an error.
    pub fn with_failure(mut self, symbol: impl Into<String>) -> Self {
        self.failing.insert(symbol.into());
        self
    }

    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.bars.keys().map(String::as_str)
    }
}

impl From<HashMap<String, Vec<PriceBar>>> for InMemoryProvider {
    fn from(bars: HashMap<String, Vec<PriceBar>>) -> Self {
        Self {
            bars,
            failing: HashSet::new(),
        }
    }
}

#[async_trait]
impl MarketDataProvider for InMemoryProvider {
    async fn fetch_bars(
        &self,
        symbol: &str,
        period: HistoryPeriod,
    ) -> Result<Option<Vec<PriceBar>>> {
        if self.failing.contains(symbol) {
            bail!("{}: simulated fetch failure", symbol);
        }
        let Some(bars) = self.bars.get(symbol) else {
            return Ok(None);
        };
        if bars.is_empty() {
            return Ok(None);
        }
        let keep = period.approx_sessions().unwrap_or(bars.len()).min(bars.len());
        Ok(Some(bars[bars.len() - keep..].to_vec()))
    }
}
