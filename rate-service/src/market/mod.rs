pub mod grinex;
pub mod rate;
pub mod types;

pub use rate::{ExtractError, extract_rate};
pub use types::{OrderBookSnapshot, PriceLevel, Rate, Side};
