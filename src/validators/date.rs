//! Inclusive date range check

use serde::Serialize;
use serde_json::Value;

use super::{CheckResult, Validate, ValidationContext};
use crate::schema::DateValue;

pub const DATE_OUT_OF_RANGE: &str = "Date is out of allowed range";

/// Rejects dates earlier than `min` or later than `max`.
///
/// Values that cannot be read as a date fail as out of range.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DateRangeValidator {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<DateValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<DateValue>,
}

impl DateRangeValidator {
    pub fn new(min: Option<DateValue>, max: Option<DateValue>) -> Self {
        Self { min, max }
    }
}

impl Validate for DateRangeValidator {
    fn validate(&self, value: &Value, _ctx: &ValidationContext<'_>) -> CheckResult {
        let Some(at) = DateValue::from_json(value).map(|d| d.timestamp_millis()) else {
            return CheckResult::fail(DATE_OUT_OF_RANGE);
        };

        let min_ok = self.min.map_or(true, |min| at >= min.timestamp_millis());
        let max_ok = self.max.map_or(true, |max| at <= max.timestamp_millis());

        CheckResult::check(min_ok && max_ok, DATE_OUT_OF_RANGE)
    }
}
