//! Token metadata and holder snapshots decoded from the data API.

use crate::{Error, Result};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;

/// Market data for a token at the time of the fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenSnapshot {
    pub symbol: String,
    pub market_cap: Decimal,
    pub price: Decimal,
}

impl TokenSnapshot {
    /// Placeholder used when the metadata carries no symbol.
    pub const UNKNOWN_SYMBOL: &'static str = "N/A";

    /// Decode a metadata response. Absent numeric fields default to zero;
    /// present but non-numeric ones are rejected.
    #[allow(clippy::result_large_err)]
    pub fn from_meta(meta: &Value) -> Result<Self> {
        let symbol = match meta.get("symbol") {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Null) | None => Self::UNKNOWN_SYMBOL.to_string(),
            Some(other) => other.to_string(),
        };

        Ok(Self {
            symbol,
            market_cap: decimal_field(meta, "market_cap")?,
            price: decimal_field(meta, "price")?,
        })
    }
}

/// Holder statistics for a token. Only the number of returned holder
/// records is kept.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HolderSnapshot {
    pub holders_count: u64,
}

impl HolderSnapshot {
    /// Count the records in the `data` array of a holder listing.
    pub fn from_listing(listing: &Value) -> Self {
        let holders_count = listing
            .get("data")
            .and_then(Value::as_array)
            .map(|records| records.len() as u64)
            .unwrap_or(0);
        Self { holders_count }
    }
}

/// Whether a response body carries no usable data (`null` or `{}`).
pub fn is_empty_response(body: &Value) -> bool {
    match body {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

/// Read a numeric field that may be encoded as a JSON number or a numeric
/// string. Finite values beyond `Decimal`'s range saturate at
/// `Decimal::MAX` / `Decimal::MIN`, which keeps band ordering intact.
#[allow(clippy::result_large_err)]
pub fn decimal_field(obj: &Value, field: &'static str) -> Result<Decimal> {
    let invalid = |value: &Value| Error::InvalidField {
        field,
        value: value.to_string(),
    };

    let value = match obj.get(field) {
        None | Some(Value::Null) => return Ok(Decimal::ZERO),
        Some(value) => value,
    };

    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Decimal::from(i))
            } else if let Some(u) = n.as_u64() {
                Ok(Decimal::from(u))
            } else {
                n.as_f64()
                    .and_then(saturating_decimal)
                    .ok_or_else(|| invalid(value))
            }
        }
        Value::String(s) => {
            let s = s.trim();
            Decimal::from_str(s)
                .or_else(|_| Decimal::from_scientific(s))
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(saturating_decimal))
                .ok_or_else(|| invalid(value))
        }
        _ => Err(invalid(value)),
    }
}

fn saturating_decimal(value: f64) -> Option<Decimal> {
    if !value.is_finite() {
        return None;
    }
    match Decimal::from_f64(value) {
        Some(d) => Some(d),
        // Below Decimal's precision
        None if value.abs() < 1.0 => Some(Decimal::ZERO),
        None if value.is_sign_negative() => Some(Decimal::MIN),
        None => Some(Decimal::MAX),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_snapshot_from_numbers() {
        let meta = json!({"symbol": "BONK", "market_cap": 2_000_000_000u64, "price": 0.25});
        let snapshot = TokenSnapshot::from_meta(&meta).unwrap();

        assert_eq!(snapshot.symbol, "BONK");
        assert_eq!(snapshot.market_cap, Decimal::new(2_000_000_000, 0));
        assert_eq!(snapshot.price, Decimal::new(25, 2));
    }

    #[test]
    fn test_snapshot_from_numeric_strings() {
        let meta = json!({"symbol": "WIF", "market_cap": "1e9", "price": " 12.5 "});
        let snapshot = TokenSnapshot::from_meta(&meta).unwrap();

        assert_eq!(snapshot.market_cap, Decimal::new(1_000_000_000, 0));
        assert_eq!(snapshot.price, Decimal::new(125, 1));
    }

    #[test]
    fn test_snapshot_defaults() {
        let snapshot = TokenSnapshot::from_meta(&json!({"decimals": 6})).unwrap();

        assert_eq!(snapshot.symbol, TokenSnapshot::UNKNOWN_SYMBOL);
        assert_eq!(snapshot.market_cap, Decimal::ZERO);
        assert_eq!(snapshot.price, Decimal::ZERO);
    }

    #[test]
    fn test_snapshot_rejects_non_numeric() {
        let err = TokenSnapshot::from_meta(&json!({"market_cap": "lots", "price": 1})).unwrap_err();
        assert!(matches!(err, Error::InvalidField { field: "market_cap", .. }));

        let err = TokenSnapshot::from_meta(&json!({"price": true})).unwrap_err();
        assert!(matches!(err, Error::InvalidField { field: "price", .. }));
    }

    #[test]
    fn test_out_of_range_values_saturate() {
        let snapshot = TokenSnapshot::from_meta(&json!({"market_cap": 1e30, "price": -1e30})).unwrap();
        assert_eq!(snapshot.market_cap, Decimal::MAX);
        assert_eq!(snapshot.price, Decimal::MIN);

        let snapshot = TokenSnapshot::from_meta(&json!({"market_cap": "1e30", "price": "-2.5E31"})).unwrap();
        assert_eq!(snapshot.market_cap, Decimal::MAX);
        assert_eq!(snapshot.price, Decimal::MIN);

        // Not numbers at all
        assert!(TokenSnapshot::from_meta(&json!({"market_cap": "inf"})).is_err());
        assert!(TokenSnapshot::from_meta(&json!({"market_cap": "NaN"})).is_err());
    }

    #[test]
    fn test_holder_count() {
        let listing = json!({"data": [{"owner": "a"}, {"owner": "b"}, {"owner": "c"}], "total": 9000});
        assert_eq!(HolderSnapshot::from_listing(&listing).holders_count, 3);

        assert_eq!(HolderSnapshot::from_listing(&json!({"total": 5})).holders_count, 0);
        assert_eq!(HolderSnapshot::from_listing(&json!({"data": "oops"})).holders_count, 0);
    }

    #[test]
    fn test_empty_response() {
        assert!(is_empty_response(&Value::Null));
        assert!(is_empty_response(&json!({})));
        assert!(!is_empty_response(&json!({"symbol": "X"})));
        assert!(!is_empty_response(&json!([])));
    }
}
