use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::LookupError;

/// Identifier of an order as typed by the user, already trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OrderUid(String);

impl OrderUid {
    /// Trims `raw` and rejects it when nothing is left.
    pub fn parse(raw: &str) -> Result<Self, LookupError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(LookupError::Validation);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrderUid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Order document as returned by the order service. The shape is not
/// interpreted here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderRecord(pub Value);

impl OrderRecord {
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes).map(Self)
    }

    /// Two-space indented JSON, keys in the order the service sent them.
    pub fn to_pretty_json(&self) -> String {
        serde_json::to_string_pretty(&self.0).unwrap_or_else(|_| self.0.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_trims_surrounding_whitespace() {
        let uid = OrderUid::parse("  b563feb7b2b84b6test \t\n").expect("uid");
        assert_eq!(uid.as_str(), "b563feb7b2b84b6test");
    }

    #[test]
    fn parse_rejects_blank_input() {
        for raw in ["", " ", "\t", "\n  \r\n"] {
            assert_eq!(OrderUid::parse(raw), Err(LookupError::Validation));
        }
    }

    #[test]
    fn pretty_json_keeps_service_key_order() {
        let record =
            OrderRecord::from_json_slice(br#"{"order_uid":"a","entry":"WBIL","items":[]}"#)
                .expect("record");
        assert_eq!(
            record.to_pretty_json(),
            "{\n  \"order_uid\": \"a\",\n  \"entry\": \"WBIL\",\n  \"items\": []\n}"
        );
    }
}
