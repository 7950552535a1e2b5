use thiserror::Error;

use crate::clock::Clock;
use crate::market::types::{OrderBookSnapshot, PriceLevel, Rate, Side};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExtractError {
    #[error("empty {side} array")]
    EmptySide { side: Side },

    #[error("parse {} price failed: {reason} (raw value {raw:?})", .side.level_name())]
    PriceParse {
        side: Side,
        raw: String,
        reason: String,
    },
}

/// Builds a [`Rate`] from the best level of each side.
///
/// Levels are taken as published; the first entry is the best one. Both sides
/// are checked for emptiness before either price is parsed.
pub fn extract_rate(snapshot: &OrderBookSnapshot, clock: &dyn Clock) -> Result<Rate, ExtractError> {
    let best_ask = best_level(&snapshot.asks, Side::Asks)?;
    let best_bid = best_level(&snapshot.bids, Side::Bids)?;

    let ask = parse_price(&best_ask.price, Side::Asks)?;
    let bid = parse_price(&best_bid.price, Side::Bids)?;

    Ok(Rate {
        ask,
        bid,
        timestamp: clock.now_unix_secs(),
    })
}

fn best_level(levels: &[PriceLevel], side: Side) -> Result<&PriceLevel, ExtractError> {
    levels.first().ok_or(ExtractError::EmptySide { side })
}

fn parse_price(raw: &str, side: Side) -> Result<f64, ExtractError> {
    let fail = |reason: String| ExtractError::PriceParse {
        side,
        raw: raw.to_string(),
        reason,
    };

    let value = raw.parse::<f64>().map_err(|e| fail(e.to_string()))?;

    // `inf`, `NaN` and out-of-range literals parse successfully in Rust.
    if !value.is_finite() {
        return Err(fail("value is not finite".to_string()));
    }

    Ok(value)
}
