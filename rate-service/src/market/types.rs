use std::fmt;

use serde::{Deserialize, Deserializer};

/// One price level as published upstream. Both values stay as text until the
/// rate is extracted so no precision is lost in transit.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PriceLevel {
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    pub volume: String,
}

/// Bid/ask depth, best level first on each side.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct OrderBookSnapshot {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub asks: Vec<PriceLevel>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub bids: Vec<PriceLevel>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<PriceLevel>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<PriceLevel>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Best ask/bid captured at `timestamp` (unix seconds).
///
/// No ordering between `ask` and `bid` is enforced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rate {
    pub ask: f64,
    pub bid: f64,
    pub timestamp: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Asks,
    Bids,
}

impl Side {
    /// Name of the whole side, as it appears in the upstream payload.
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Asks => "asks",
            Side::Bids => "bids",
        }
    }

    /// Name of a single level on this side.
    pub fn level_name(&self) -> &'static str {
        match self {
            Side::Asks => "ask",
            Side::Bids => "bid",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_depth_payload() {
        let raw = r#"{
            "asks": [{"price": "100.5", "volume": "10"}, {"price": "101.0", "volume": "3"}],
            "bids": [{"price": "99.5", "volume": "20"}]
        }"#;

        let snapshot: OrderBookSnapshot = serde_json::from_str(raw).unwrap();

        assert_eq!(snapshot.asks.len(), 2);
        assert_eq!(snapshot.asks[0].price, "100.5");
        assert_eq!(snapshot.bids[0].volume, "20");
    }

    #[test]
    fn missing_or_null_sides_decode_as_empty() {
        let snapshot: OrderBookSnapshot =
            serde_json::from_str(r#"{"asks": null, "extra": 1}"#).unwrap();

        assert!(snapshot.asks.is_empty());
        assert!(snapshot.bids.is_empty());
    }

    #[test]
    fn numeric_prices_are_rejected() {
        let res = serde_json::from_str::<OrderBookSnapshot>(
            r#"{"asks": [{"price": 100.5, "volume": "1"}], "bids": []}"#,
        );
        assert!(res.is_err());
    }
}
