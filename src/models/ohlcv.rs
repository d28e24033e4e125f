use {
    crate::{
        config::{ClosePrice, HighPrice, LowPrice, OpenPrice, PriceLike, Volume},
        domain::PriceBar,
    },
    anyhow::{Result, bail},
    chrono::NaiveDate,
    serde::{Deserialize, Serialize},
};

/// Columnar OHLCV history for one instrument, ascending by date.
///
/// Construction goes through [`PriceSeries::from_bars`], which is the ingestion boundary:
/// unordered dates or non-finite prices are rejected there so nothing downstream has to care.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PriceSeries {
    pub symbol: String,
    pub dates: Vec<NaiveDate>,
    pub open_prices: Vec<OpenPrice>,
    pub high_prices: Vec<HighPrice>,
    pub low_prices: Vec<LowPrice>,
    pub close_prices: Vec<ClosePrice>,
    pub volumes: Vec<Volume>,
}

impl PriceSeries {
    pub fn from_bars(symbol: impl Into<String>, bars: &[PriceBar]) -> Result<Self> {
        let symbol = symbol.into();
        let len = bars.len();

        let mut dates = Vec::with_capacity(len);
        let mut open_vec = Vec::with_capacity(len);
        let mut high_vec = Vec::with_capacity(len);
        let mut low_vec = Vec::with_capacity(len);
        let mut close_vec = Vec::with_capacity(len);
        let mut volume_vec = Vec::with_capacity(len);

        for (i, bar) in bars.iter().enumerate() {
            if !bar.is_finite() {
                bail!("{}: bar {} ({}) has a non-finite field", symbol, i, bar.date);
            }
            if let Some(prev) = dates.last() {
                if bar.date <= *prev {
                    bail!(
                        "{}: bars must be strictly ascending by date, but bar {} ({}) follows {}",
                        symbol,
                        i,
                        bar.date,
                        prev
                    );
                }
            }

            dates.push(bar.date);
            open_vec.push(bar.open);
            high_vec.push(bar.high);
            low_vec.push(bar.low);
            close_vec.push(bar.close);
            volume_vec.push(bar.volume);
        }

        Ok(Self {
            symbol,
            dates,
            open_prices: open_vec,
            high_prices: high_vec,
            low_prices: low_vec,
            close_prices: close_vec,
            volumes: volume_vec,
        })
    }

    pub fn get_bar(&self, idx: usize) -> PriceBar {
        PriceBar {
            date: self.dates[idx],
            open: self.open_prices[idx],
            high: self.high_prices[idx],
            low: self.low_prices[idx],
            close: self.close_prices[idx],
            volume: self.volumes[idx],
        }
    }

    pub fn bars(&self) -> usize {
        self.close_prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.close_prices.is_empty()
    }

    pub(crate) fn close_values(&self) -> Vec<Option<f64>> {
        self.close_prices.iter().map(|p| Some(p.value())).collect()
    }

    /// Close of the bar `offset` bars after `idx`, clamped to the last bar.
    pub(crate) fn close_clamped(&self, idx: usize, offset: usize) -> ClosePrice {
        let last = self.bars().saturating_sub(1);
        self.close_prices[idx.saturating_add(offset).min(last)]
    }
}
