//! Per-type constraint specs
//!
//! Every member is optional: `null` and absence both mean "not configured".

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Number, Value};

/// Constraints for `string` fields
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StringSpecs {
    pub length_min: Option<u64>,
    pub length_max: Option<u64>,
    pub pattern: Option<String>,
    pub may_be_empty: Option<bool>,
}

/// Constraints for `number` fields
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NumberSpecs {
    pub min: Option<Number>,
    pub max: Option<Number>,
    pub may_be_empty: Option<bool>,
}

/// Constraints for `boolean` fields
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BooleanSpecs {
    pub only_true: Option<bool>,
}

/// Constraints for `date` fields
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DateSpecs {
    /// Earliest accepted date; unreadable bounds count as unconfigured
    #[serde(deserialize_with = "lenient_date_bound")]
    pub min: Option<DateValue>,
    /// Latest accepted date; unreadable bounds count as unconfigured
    #[serde(deserialize_with = "lenient_date_bound")]
    pub max: Option<DateValue>,
    pub may_be_empty: Option<bool>,
}

/// Constraints for `json` fields
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct JsonSpecs {
    pub may_be_empty: Option<bool>,
}

/// Constraints for `email` and `url` fields
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DomainSpecs {
    /// Domains a value must belong to (compared case-insensitively)
    pub allowed_domains: Option<Vec<String>>,
    /// Domains a value must not belong to (compared case-insensitively)
    pub except_domains: Option<Vec<String>>,
    pub may_be_empty: Option<bool>,
}

/// Constraints for `select` fields
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SelectSpecs {
    pub allowed_values: Option<Vec<String>>,
    pub multiple: Option<bool>,
    pub may_be_empty: Option<bool>,
}

/// Constraints for `relation` fields
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RelationSpecs {
    /// Target collection of the relation
    pub collection: Option<String>,
    pub multiple: Option<bool>,
    pub may_be_empty: Option<bool>,
}

macro_rules! emptiness_accessors {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $ty {
                /// True when the field explicitly forbids empty values.
                pub fn requires_value(&self) -> bool {
                    self.may_be_empty == Some(false)
                }

                /// True when the field explicitly permits empty values.
                pub fn allows_empty(&self) -> bool {
                    self.may_be_empty == Some(true)
                }
            }
        )+
    };
}

emptiness_accessors!(
    StringSpecs,
    NumberSpecs,
    DateSpecs,
    JsonSpecs,
    DomainSpecs,
    SelectSpecs,
    RelationSpecs,
);

impl DomainSpecs {
    /// Non-empty allow-list, lower-cased
    pub fn allowed(&self) -> Option<Vec<String>> {
        lowered(self.allowed_domains.as_deref())
    }

    /// Non-empty deny-list, lower-cased
    pub fn excepted(&self) -> Option<Vec<String>> {
        lowered(self.except_domains.as_deref())
    }
}

fn lowered(domains: Option<&[String]>) -> Option<Vec<String>> {
    match domains {
        Some(list) if !list.is_empty() => Some(list.iter().map(|d| d.to_lowercase()).collect()),
        _ => None,
    }
}

impl SelectSpecs {
    pub fn is_multiple(&self) -> bool {
        self.multiple == Some(true)
    }

    /// Non-empty allowed values
    pub fn allowed(&self) -> Option<&[String]> {
        self.allowed_values.as_deref().filter(|v| !v.is_empty())
    }
}

impl RelationSpecs {
    pub fn is_multiple(&self) -> bool {
        self.multiple == Some(true)
    }
}

const NAIVE_DATETIME_FORMATS: [&str; 3] =
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%d %H:%M"];

fn lenient_date_bound<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<DateValue>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(None);
    }

    let bound = DateValue::from_json(&value);
    if bound.is_none() {
        tracing::debug!(bound = %value, "ignoring unreadable date bound");
    }
    Ok(bound)
}

/// A point in time used as a date bound.
///
/// Accepted forms: RFC 3339 text, `YYYY-MM-DD`, naive `YYYY-MM-DDTHH:MM:SS[.fff]` or
/// `YYYY-MM-DD HH:MM[:SS[.fff]]` (read as UTC), a millisecond timestamp, or
/// `{"$date": <any of these>}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct DateValue(DateTime<Utc>);

impl DateValue {
    pub fn new(at: DateTime<Utc>) -> Self {
        Self(at)
    }

    pub fn at(&self) -> DateTime<Utc> {
        self.0
    }

    /// Milliseconds since the Unix epoch
    pub fn timestamp_millis(&self) -> i64 {
        self.0.timestamp_millis()
    }

    /// Reads a date from a JSON value, `None` if it is not a recognisable date.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => {
                let millis = match n.as_i64() {
                    Some(ms) => ms,
                    None => {
                        let ms = n.as_f64().filter(|f| f.is_finite())?;
                        ms.trunc() as i64
                    }
                };
                DateTime::from_timestamp_millis(millis).map(Self)
            }
            Value::String(s) => Self::parse_str(s),
            Value::Object(obj) if obj.len() == 1 => match obj.get("$date") {
                Some(inner @ (Value::String(_) | Value::Number(_))) => Self::from_json(inner),
                _ => None,
            },
            _ => None,
        }
    }

    /// Parses the textual forms.
    pub fn parse_str(s: &str) -> Option<Self> {
        let s = s.trim();

        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Some(Self(dt.with_timezone(&Utc)));
        }

        for format in NAIVE_DATETIME_FORMATS {
            if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
                return Some(Self(naive.and_utc()));
            }
        }

        let date = NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()?;
        date.and_hms_opt(0, 0, 0).map(|naive| Self(naive.and_utc()))
    }
}

impl From<DateTime<Utc>> for DateValue {
    fn from(at: DateTime<Utc>) -> Self {
        Self(at)
    }
}

impl Serialize for DateValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_rfc3339_opts(SecondsFormat::Millis, true))
    }
}

impl<'de> Deserialize<'de> for DateValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_json(&value)
            .ok_or_else(|| serde::de::Error::custom(format!("unrecognised date value: {}", value)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_null_members_are_unconfigured() {
        let specs: StringSpecs = serde_json::from_value(json!({
            "lengthMin": null,
            "lengthMax": 100,
            "mayBeEmpty": true,
            "pattern": null
        }))
        .unwrap();

        assert_eq!(specs.length_min, None);
        assert_eq!(specs.length_max, Some(100));
        assert!(specs.allows_empty());
        assert!(!specs.requires_value());
    }

    #[test]
    fn test_missing_may_be_empty_is_neither() {
        let specs = NumberSpecs::default();
        assert!(!specs.allows_empty());
        assert!(!specs.requires_value());
    }

    #[test]
    fn test_domain_lists_lowercased_and_empty_ignored() {
        let specs = DomainSpecs {
            allowed_domains: Some(vec!["Example.COM".into()]),
            except_domains: Some(vec![]),
            may_be_empty: None,
        };

        assert_eq!(specs.allowed(), Some(vec!["example.com".to_string()]));
        assert_eq!(specs.excepted(), None);
    }

    #[test]
    fn test_select_allowed_ignores_empty_list() {
        let specs = SelectSpecs {
            allowed_values: Some(vec![]),
            ..Default::default()
        };
        assert!(specs.allowed().is_none());
        assert!(!specs.is_multiple());
    }

    #[test]
    fn test_date_value_forms() {
        let rfc = DateValue::parse_str("2024-01-01T00:00:00Z").unwrap();
        let plain = DateValue::parse_str("2024-01-01").unwrap();
        let naive = DateValue::parse_str("2024-01-01T00:00:00.000").unwrap();
        let millis = DateValue::from_json(&json!(1_704_067_200_000_i64)).unwrap();
        let extended = DateValue::from_json(&json!({ "$date": "2024-01-01" })).unwrap();

        assert_eq!(rfc, plain);
        assert_eq!(rfc, naive);
        assert_eq!(rfc, millis);
        assert_eq!(rfc, extended);
        assert_eq!(rfc.timestamp_millis(), 1_704_067_200_000);
    }

    #[test]
    fn test_date_value_offset_normalised() {
        let a = DateValue::parse_str("2024-01-01T02:00:00+02:00").unwrap();
        let b = DateValue::parse_str("2024-01-01T00:00:00Z").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_date_value_rejects_garbage() {
        assert!(DateValue::parse_str("not a date").is_none());
        assert!(DateValue::from_json(&json!(true)).is_none());
        assert!(DateValue::from_json(&json!(null)).is_none());

        let result: Result<DateValue, _> = serde_json::from_value(json!("yesterday"));
        assert!(result.is_err());
    }

    #[test]
    fn test_space_separated_datetimes() {
        let spaced = DateValue::parse_str("2024-01-15 10:30:00").unwrap();
        let t = DateValue::parse_str("2024-01-15T10:30:00Z").unwrap();
        assert_eq!(spaced, t);
        assert_eq!(DateValue::parse_str("2024-01-15 10:30"), Some(t));
    }

    #[test]
    fn test_unreadable_bounds_are_unconfigured() {
        let specs: DateSpecs = serde_json::from_value(json!({
            "min": "yesterday",
            "max": "2024-01-15 10:30:00",
            "mayBeEmpty": true
        }))
        .unwrap();

        assert!(specs.min.is_none());
        assert_eq!(specs.max, DateValue::parse_str("2024-01-15T10:30:00Z"));
        assert!(specs.allows_empty());
    }

    #[test]
    fn test_date_specs_null_bounds() {
        let specs: DateSpecs = serde_json::from_value(json!({
            "min": null,
            "max": "2030-12-31",
            "mayBeEmpty": false
        }))
        .unwrap();
        assert!(specs.min.is_none());
        assert!(specs.max.is_some());
        assert!(specs.requires_value());
    }
}
