//! Compiled schema model
//!
//! Mirrors the validation library's schema shape: each field maps to
//! `{ type, rules? }` where `rules` maps a rule name to its value.

use std::collections::BTreeMap;
use std::fmt;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::{Number, Value};

use super::errors::CompileResult;
use crate::validators::{CheckResult, CustomValidator, Validate, ValidationContext};

/// Expected shape of a valid value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ValueType {
    String,
    Number,
    Boolean,
    Date,
    Array,
    ObjectId,
}

impl ValueType {
    pub fn name(&self) -> &'static str {
        match self {
            ValueType::String => "String",
            ValueType::Number => "Number",
            ValueType::Boolean => "Boolean",
            ValueType::Date => "Date",
            ValueType::Array => "Array",
            ValueType::ObjectId => "ObjectId",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A compiled regular expression, compared by its source text.
///
/// Supports look-around and backreferences, as designer patterns are written
/// for JavaScript's `RegExp`.
#[derive(Debug, Clone)]
pub struct Pattern(fancy_regex::Regex);

impl Pattern {
    pub fn new(source: &str) -> Result<Self, fancy_regex::Error> {
        fancy_regex::Regex::new(source).map(Self)
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Returns whether `text` matches. Exceeding the backtrack limit counts as no match.
    pub fn is_match(&self, text: &str) -> bool {
        self.0.is_match(text).unwrap_or(false)
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Serialize for Pattern {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// One constraint understood by the validation library
#[derive(Debug, Clone, PartialEq)]
pub enum Rule {
    LengthMax(u64),
    LengthMin(u64),
    /// Length must differ from the value (`0` forbids empty strings)
    LengthNot(u64),
    Regex(Pattern),
    Min(Number),
    Max(Number),
    /// Value must equal the literal
    Is(Value),
    /// Value must differ from the literal
    IsNot(Value),
    Enum(Vec<String>),
    /// Element type of an array
    EachType(ValueType),
    Custom(CustomValidator),
}

impl Rule {
    /// Rule name in the validation library
    pub fn name(&self) -> &'static str {
        match self {
            Rule::LengthMax(_) => "lengthMax",
            Rule::LengthMin(_) => "lengthMin",
            Rule::LengthNot(_) => "lengthNot",
            Rule::Regex(_) => "regex",
            Rule::Min(_) => "min",
            Rule::Max(_) => "max",
            Rule::Is(_) => "is",
            Rule::IsNot(_) => "isNot",
            Rule::Enum(_) => "enum",
            Rule::EachType(_) => "eachType",
            Rule::Custom(_) => "custom",
        }
    }
}

impl Serialize for Rule {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Rule::LengthMax(n) | Rule::LengthMin(n) | Rule::LengthNot(n) => {
                serializer.serialize_u64(*n)
            }
            Rule::Regex(p) => p.serialize(serializer),
            Rule::Min(n) | Rule::Max(n) => n.serialize(serializer),
            Rule::Is(v) | Rule::IsNot(v) => v.serialize(serializer),
            Rule::Enum(values) => values.serialize(serializer),
            Rule::EachType(t) => t.serialize(serializer),
            Rule::Custom(c) => c.serialize(serializer),
        }
    }
}

/// Rules keyed by name, in insertion order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a rule, replacing any rule with the same name.
    pub fn insert(&mut self, rule: Rule) {
        match self.rules.iter_mut().find(|r| r.name() == rule.name()) {
            Some(existing) => *existing = rule,
            None => self.rules.push(rule),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Rule> {
        self.rules.iter().find(|r| r.name() == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter()
    }

    /// Rule names in insertion order
    pub fn names(&self) -> Vec<&'static str> {
        self.rules.iter().map(Rule::name).collect()
    }

    pub fn custom(&self) -> Option<&CustomValidator> {
        match self.get("custom") {
            Some(Rule::Custom(c)) => Some(c),
            _ => None,
        }
    }

    pub fn enum_values(&self) -> Option<&[String]> {
        match self.get("enum") {
            Some(Rule::Enum(values)) => Some(values),
            _ => None,
        }
    }
}

impl FromIterator<Rule> for RuleSet {
    fn from_iter<I: IntoIterator<Item = Rule>>(iter: I) -> Self {
        let mut set = RuleSet::new();
        for rule in iter {
            set.insert(rule);
        }
        set
    }
}

impl Serialize for RuleSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.rules.len()))?;
        for rule in &self.rules {
            map.serialize_entry(rule.name(), rule)?;
        }
        map.end()
    }
}

/// Compiled form of one field
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldDescriptor {
    #[serde(rename = "type")]
    pub value_type: ValueType,
    /// `None` when no constraint applies, distinct from an empty rule set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rules: Option<RuleSet>,
}

impl FieldDescriptor {
    /// A descriptor with no rules object
    pub fn bare(value_type: ValueType) -> Self {
        Self {
            value_type,
            rules: None,
        }
    }

    /// A descriptor that always carries a rules object, even an empty one
    pub fn with_rules(value_type: ValueType, rules: RuleSet) -> Self {
        Self {
            value_type,
            rules: Some(rules),
        }
    }

    /// A descriptor whose rules object is dropped when empty
    pub fn with_optional_rules(value_type: ValueType, rules: RuleSet) -> Self {
        Self {
            value_type,
            rules: (!rules.is_empty()).then_some(rules),
        }
    }

    pub fn rule(&self, name: &str) -> Option<&Rule> {
        self.rules.as_ref().and_then(|r| r.get(name))
    }

    pub fn custom(&self) -> Option<&CustomValidator> {
        self.rules.as_ref().and_then(RuleSet::custom)
    }

    /// Runs the custom validator, if the field has one.
    pub fn check_custom(&self, value: &Value, ctx: &ValidationContext<'_>) -> Option<CheckResult> {
        self.custom().map(|c| c.validate(value, ctx))
    }
}

/// Field key to compiled descriptor
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct CompiledSchema {
    fields: BTreeMap<String, FieldDescriptor>,
}

impl CompiledSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, key: impl Into<String>, descriptor: FieldDescriptor) {
        self.fields.insert(key.into(), descriptor);
    }

    pub fn get(&self, key: &str) -> Option<&FieldDescriptor> {
        self.fields.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldDescriptor)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Renders the schema in the validation library's shape
    pub fn to_json(&self) -> CompileResult<Value> {
        Ok(serde_json::to_value(self)?)
    }
}

impl IntoIterator for CompiledSchema {
    type Item = (String, FieldDescriptor);
    type IntoIter = std::collections::btree_map::IntoIter<String, FieldDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}
