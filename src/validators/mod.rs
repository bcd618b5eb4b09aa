//! Custom validators attached to compiled rule sets
//!
//! A custom validator is a small value that owns its configuration and answers
//! one question: does a candidate value pass? Failures are reported through
//! [`CheckResult`], never as errors.

mod date;
mod domain;
mod json;
mod relation;

pub use date::DateRangeValidator;
pub use domain::{DomainPolicy, EmailValidator, UrlValidator};
pub use json::{is_valid_json, INVALID_JSON};
pub use relation::{RelationListValidator, RelationValidator};

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Outcome of a custom validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResult {
    pub result: bool,
    /// Empty on success, a human-readable reason on failure
    pub details: String,
}

impl CheckResult {
    pub fn pass() -> Self {
        Self {
            result: true,
            details: String::new(),
        }
    }

    pub fn fail(details: impl Into<String>) -> Self {
        Self {
            result: false,
            details: details.into(),
        }
    }

    /// Pass when `ok`, otherwise fail with `details`
    pub fn check(ok: bool, details: &str) -> Self {
        if ok {
            Self::pass()
        } else {
            Self::fail(details)
        }
    }

    pub fn is_pass(&self) -> bool {
        self.result
    }
}

/// Context handed to validators by the consuming engine
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidationContext<'a> {
    /// Key of the field being validated
    pub key: &'a str,
}

impl<'a> ValidationContext<'a> {
    pub fn for_field(key: &'a str) -> Self {
        Self { key }
    }
}

/// One-method validation capability
pub trait Validate {
    fn validate(&self, value: &Value, ctx: &ValidationContext<'_>) -> CheckResult;
}

/// Every custom validator the compiler can attach
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "validator", rename_all = "camelCase")]
pub enum CustomValidator {
    DateRange(DateRangeValidator),
    Json,
    Email(EmailValidator),
    Url(UrlValidator),
    RelationOne(RelationValidator),
    RelationMany(RelationListValidator),
}

impl CustomValidator {
    /// Short name used in logs, matching the serialized `validator` tag
    pub fn kind(&self) -> &'static str {
        match self {
            CustomValidator::DateRange(_) => "dateRange",
            CustomValidator::Json => "json",
            CustomValidator::Email(_) => "email",
            CustomValidator::Url(_) => "url",
            CustomValidator::RelationOne(_) => "relationOne",
            CustomValidator::RelationMany(_) => "relationMany",
        }
    }
}

impl Validate for CustomValidator {
    fn validate(&self, value: &Value, ctx: &ValidationContext<'_>) -> CheckResult {
        match self {
            CustomValidator::DateRange(v) => v.validate(value, ctx),
            CustomValidator::Json => {
                let ok = value.as_str().map_or(false, is_valid_json);
                CheckResult::check(ok, INVALID_JSON)
            }
            CustomValidator::Email(v) => v.validate(value, ctx),
            CustomValidator::Url(v) => v.validate(value, ctx),
            CustomValidator::RelationOne(v) => v.validate(value, ctx),
            CustomValidator::RelationMany(v) => v.validate(value, ctx),
        }
    }
}
