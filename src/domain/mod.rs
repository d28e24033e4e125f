// Domain types and value objects
mod instrument;
mod price_bar;

// Re-export commonly used types to the world
pub use instrument::Instrument;
pub use price_bar::PriceBar;
