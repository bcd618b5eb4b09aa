//! Document identifier checks
//!
//! Identifiers are BSON ObjectIds travelling as 24 hex characters. Extended JSON
//! (`{"$oid": "..."}`) is accepted wherever a plain string is.

use serde_json::Value;

pub use bson::oid::ObjectId;

/// Length of the hex text form
pub const OBJECT_ID_HEX_LEN: usize = 24;

/// Returns whether `s` is a valid identifier text
pub fn is_valid_str(s: &str) -> bool {
    ObjectId::parse_str(s).is_ok()
}

/// Returns whether a JSON value holds a valid identifier.
///
/// Accepts a hex string or an extended JSON `{"$oid": "<hex>"}` object.
pub fn is_valid(value: &Value) -> bool {
    extended_oid(value)
        .or_else(|| value.as_str())
        .map_or(false, is_valid_str)
}

/// Extracts the inner string of `{"$oid": "..."}`.
pub(crate) fn extended_oid(value: &Value) -> Option<&str> {
    let obj = value.as_object()?;
    if obj.len() != 1 {
        return None;
    }
    obj.get("$oid").and_then(Value::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_valid_strings() {
        assert!(is_valid_str("507f1f77bcf86cd799439011"));
        assert!(is_valid_str("507F1F77BCF86CD799439011"));
        assert!(is_valid_str(&ObjectId::from_bytes([7; 12]).to_hex()));
    }

    #[test]
    fn test_rejects_wrong_length_and_non_hex() {
        assert!(!is_valid_str("short"));
        assert!(!is_valid_str(""));
        assert!(!is_valid_str("507f1f77bcf86cd79943901z"));
        assert!(!is_valid_str("507f1f77bcf86cd7994390111"));
    }

    #[test]
    fn test_is_valid_on_json_values() {
        assert!(is_valid(&json!("507f191e810c19729de860ea")));
        assert!(is_valid(&json!({ "$oid": "507f191e810c19729de860ea" })));
        assert!(!is_valid(&json!(123)));
        assert!(!is_valid(&json!(null)));
        assert!(!is_valid(&json!({ "$oid": "abc" })));
        assert!(!is_valid(&json!({ "$oid": "507f191e810c19729de860ea", "extra": 1 })));
    }

    #[test]
    fn test_extended_oid_extraction() {
        let value = json!({ "$oid": "507f191e810c19729de860ea" });
        assert_eq!(extended_oid(&value), Some("507f191e810c19729de860ea"));
        assert_eq!(extended_oid(&json!("507f191e810c19729de860ea")), None);
    }
}
