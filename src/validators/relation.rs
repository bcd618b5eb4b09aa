//! Relation identifier checks

use std::borrow::Cow;

use serde::Serialize;
use serde_json::Value;

use super::{CheckResult, Validate, ValidationContext};
use crate::object_id::{self, extended_oid, OBJECT_ID_HEX_LEN};

pub const INVALID_ID: &str = "ID is invalid";
pub const INVALID_IDS: &str = "One or more IDs are invalid";

/// String form of a candidate identifier; `None` for null.
fn id_text(value: &Value) -> Option<Cow<'_, str>> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(Cow::Borrowed(s.as_str())),
        Value::Number(n) => Some(Cow::Owned(n.to_string())),
        Value::Bool(b) => Some(Cow::Owned(b.to_string())),
        other => match extended_oid(other) {
            Some(oid) => Some(Cow::Borrowed(oid)),
            None => Some(Cow::Owned(other.to_string())),
        },
    }
}

/// Single relation: the identifier text must be exactly 24 characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationValidator {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collection: Option<String>,
    /// Empty text passes when set
    pub optional: bool,
}

impl RelationValidator {
    pub fn new(collection: Option<String>, optional: bool) -> Self {
        Self {
            collection,
            optional,
        }
    }
}

impl Validate for RelationValidator {
    fn validate(&self, value: &Value, _ctx: &ValidationContext<'_>) -> CheckResult {
        let Some(text) = id_text(value) else {
            return CheckResult::fail(INVALID_ID);
        };

        if self.optional && text.is_empty() {
            return CheckResult::pass();
        }

        CheckResult::check(text.chars().count() == OBJECT_ID_HEX_LEN, INVALID_ID)
    }
}

/// Multiple relation: every element must be a valid [`ObjectId`](crate::ObjectId).
///
/// An empty array passes whether or not the field is optional; rejecting an
/// empty required list is left to the consuming engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationListValidator {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collection: Option<String>,
    pub optional: bool,
}

impl RelationListValidator {
    pub fn new(collection: Option<String>, optional: bool) -> Self {
        Self {
            collection,
            optional,
        }
    }
}

impl Validate for RelationListValidator {
    fn validate(&self, value: &Value, _ctx: &ValidationContext<'_>) -> CheckResult {
        let Some(ids) = value.as_array() else {
            return CheckResult::fail(INVALID_IDS);
        };

        if self.optional && ids.is_empty() {
            return CheckResult::pass();
        }

        CheckResult::check(ids.iter().all(object_id::is_valid), INVALID_IDS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ObjectId;
    use serde_json::json;

    const VALID: &str = "507f1f77bcf86cd799439011";

    #[test]
    fn test_single_null_is_invalid() {
        let ctx = ValidationContext::default();
        for optional in [true, false] {
            let v = RelationValidator::new(None, optional);
            assert_eq!(v.validate(&json!(null), &ctx), CheckResult::fail("ID is invalid"));
        }
    }

    #[test]
    fn test_single_length_check() {
        let v = RelationValidator::new(Some("users".into()), false);
        let ctx = ValidationContext::default();

        assert_eq!(v.validate(&json!(VALID), &ctx), CheckResult::pass());
        assert_eq!(v.validate(&json!("short"), &ctx), CheckResult::fail("ID is invalid"));
        assert!(!v.validate(&json!(""), &ctx).result);
        // length only, not hex content
        assert!(v.validate(&json!("zzzzzzzzzzzzzzzzzzzzzzzz"), &ctx).result);
    }

    #[test]
    fn test_single_optional_empty_passes() {
        let v = RelationValidator::new(None, true);
        assert!(v.validate(&json!(""), &ValidationContext::default()).result);
    }

    #[test]
    fn test_single_coerces_non_strings() {
        let v = RelationValidator::new(None, false);
        let ctx = ValidationContext::default();

        assert!(v.validate(&json!({ "$oid": VALID }), &ctx).result);
        assert!(!v.validate(&json!(12345), &ctx).result);
        assert!(!v.validate(&json!({ "id": VALID }), &ctx).result);
    }

    #[test]
    fn test_many_all_valid() {
        let v = RelationListValidator::new(None, false);
        let ctx = ValidationContext::default();

        let result = v.validate(&json!([VALID, "507f191e810c19729de860ea"]), &ctx);
        assert_eq!(result, CheckResult::pass());

        let fresh = ObjectId::new().to_hex();
        assert!(v.validate(&json!([fresh, { "$oid": VALID }]), &ctx).result);
    }

    #[test]
    fn test_many_rejects_any_invalid() {
        let v = RelationListValidator::new(None, true);
        let ctx = ValidationContext::default();

        for ids in [json!([VALID, "short"]), json!([VALID, ""]), json!(["abc", "123", "xyz"])] {
            assert_eq!(
                v.validate(&ids, &ctx),
                CheckResult::fail("One or more IDs are invalid")
            );
        }
    }

    #[test]
    fn test_many_empty_array() {
        let ctx = ValidationContext::default();
        assert!(RelationListValidator::new(None, true).validate(&json!([]), &ctx).result);
        // vacuously valid even when required
        assert!(RelationListValidator::new(None, false).validate(&json!([]), &ctx).result);
    }

    #[test]
    fn test_many_rejects_non_array() {
        let v = RelationListValidator::new(None, true);
        assert!(!v.validate(&json!(VALID), &ValidationContext::default()).result);
    }
}
