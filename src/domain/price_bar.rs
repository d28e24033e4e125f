use {
    crate::config::{ClosePrice, HighPrice, LowPrice, OpenPrice, PriceLike, Volume},
    chrono::NaiveDate,
    serde::{Deserialize, Serialize},
};

/// One trading session. Immutable once fetched.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub date: NaiveDate,

    pub open: OpenPrice,
    pub high: HighPrice,
    pub low: LowPrice,
    pub close: ClosePrice,

    pub volume: Volume,
}

impl PriceBar {
    // A constructor for convenience
    pub fn new(date: NaiveDate, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        PriceBar {
            date,
            open: OpenPrice::new(open),
            high: HighPrice::new(high),
            low: LowPrice::new(low),
            close: ClosePrice::new(close),
            volume: Volume::new(volume),
        }
    }

    /// A bar where every price equals `close` (handy for synthetic series).
    pub fn flat(date: NaiveDate, close: f64, volume: f64) -> Self {
        Self::new(date, close, close, close, close, volume)
    }

    pub fn is_finite(&self) -> bool {
        [
            self.open.value(),
            self.high.value(),
            self.low.value(),
            self.close.value(),
            self.volume.value(),
        ]
        .iter()
        .all(|v| v.is_finite())
    }
}
