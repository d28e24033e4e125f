mod bar_file;
mod memory;
mod provider;
mod retry;

pub use {
    bar_file::{BarMap, into_universe, load_bar_file},
    memory::InMemoryProvider,
    provider::MarketDataProvider,
    retry::RetryingProvider,
};
