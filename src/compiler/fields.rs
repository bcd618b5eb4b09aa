//! One compiling function per field kind
//!
//! Each function is pure: it reads its spec and returns a fresh descriptor.

use serde_json::{json, Value};

use super::errors::{CompileError, CompileResult};
use super::options::CompilerOptions;
use super::output::{FieldDescriptor, Pattern, Rule, RuleSet, ValueType};
use crate::schema::{
    BooleanSpecs, DateSpecs, DomainSpecs, JsonSpecs, NumberSpecs, RelationSpecs, SelectSpecs,
    StringSpecs,
};
use crate::validators::{
    CustomValidator, DateRangeValidator, DomainPolicy, EmailValidator, RelationListValidator,
    RelationValidator, UrlValidator,
};

fn empty_string() -> Value {
    Value::String(String::new())
}

/// `string`: length bounds, pattern and non-empty requirement.
///
/// Fails only when `pattern` is not a valid regular expression.
pub fn compile_string(key: &str, specs: &StringSpecs) -> CompileResult<FieldDescriptor> {
    let mut rules = RuleSet::new();

    if let Some(max) = specs.length_max {
        rules.insert(Rule::LengthMax(max));
    }
    if let Some(min) = specs.length_min {
        rules.insert(Rule::LengthMin(min));
    }
    if let Some(source) = &specs.pattern {
        let pattern = Pattern::new(source).map_err(|e| CompileError::InvalidPattern {
            key: key.to_string(),
            pattern: source.clone(),
            reason: e.to_string(),
        })?;
        rules.insert(Rule::Regex(pattern));
    }
    if specs.requires_value() {
        rules.insert(Rule::LengthNot(0));
    }

    Ok(FieldDescriptor::with_optional_rules(ValueType::String, rules))
}

/// `number`: verbatim bounds, `isNot: 0` when required.
pub fn compile_number(specs: &NumberSpecs) -> FieldDescriptor {
    let mut rules = RuleSet::new();

    if let Some(min) = &specs.min {
        rules.insert(Rule::Min(min.clone()));
    }
    if let Some(max) = &specs.max {
        rules.insert(Rule::Max(max.clone()));
    }
    if specs.requires_value() {
        rules.insert(Rule::IsNot(json!(0)));
    }

    FieldDescriptor::with_optional_rules(ValueType::Number, rules)
}

/// `boolean`: `is: true` when only `true` is accepted.
pub fn compile_boolean(specs: &BooleanSpecs) -> FieldDescriptor {
    let mut rules = RuleSet::new();

    if specs.only_true == Some(true) {
        rules.insert(Rule::Is(Value::Bool(true)));
    }

    FieldDescriptor::with_optional_rules(ValueType::Boolean, rules)
}

/// `date`: `isNot: null` when required, range validator when bounded.
pub fn compile_date(specs: &DateSpecs) -> FieldDescriptor {
    let mut rules = RuleSet::new();

    if specs.requires_value() {
        rules.insert(Rule::IsNot(Value::Null));
    }
    if specs.min.is_some() || specs.max.is_some() {
        rules.insert(Rule::Custom(CustomValidator::DateRange(DateRangeValidator::new(
            specs.min, specs.max,
        ))));
    }

    FieldDescriptor::with_optional_rules(ValueType::Date, rules)
}

/// `json`: serialized text, always validated as JSON.
pub fn compile_json(specs: &JsonSpecs) -> FieldDescriptor {
    let mut rules = RuleSet::new();

    if specs.requires_value() {
        rules.insert(Rule::IsNot(empty_string()));
    }
    rules.insert(Rule::Custom(CustomValidator::Json));

    FieldDescriptor::with_rules(ValueType::String, rules)
}

fn domain_policy(specs: &DomainSpecs) -> DomainPolicy {
    DomainPolicy::new(specs.allowed(), specs.excepted())
}

/// `email`: always carries a rules object.
///
/// The validator is attached when a domain list is configured or a value is required.
pub fn compile_email(specs: &DomainSpecs) -> FieldDescriptor {
    let mut rules = RuleSet::new();
    let policy = domain_policy(specs);

    if specs.requires_value() {
        rules.insert(Rule::IsNot(empty_string()));
    }
    if policy.is_configured() || specs.requires_value() {
        rules.insert(Rule::Custom(CustomValidator::Email(EmailValidator::new(
            policy,
            specs.allows_empty(),
        ))));
    }

    FieldDescriptor::with_rules(ValueType::String, rules)
}

/// `url`: host allow/deny lists; no rules object when nothing is configured.
pub fn compile_url(specs: &DomainSpecs) -> FieldDescriptor {
    let mut rules = RuleSet::new();
    let policy = domain_policy(specs);

    if specs.requires_value() {
        rules.insert(Rule::IsNot(empty_string()));
    }
    if policy.is_configured() {
        rules.insert(Rule::Custom(CustomValidator::Url(UrlValidator::new(
            policy,
            specs.allows_empty(),
        ))));
    }

    FieldDescriptor::with_optional_rules(ValueType::String, rules)
}

/// `select`: single string or array of strings drawn from `allowedValues`.
pub fn compile_select(specs: &SelectSpecs) -> FieldDescriptor {
    let mut rules = RuleSet::new();

    if specs.requires_value() {
        rules.insert(Rule::IsNot(empty_string()));
    }

    if specs.is_multiple() {
        rules.insert(Rule::EachType(ValueType::String));
        if let Some(values) = specs.allowed() {
            rules.insert(Rule::Enum(values.to_vec()));
        }
        return FieldDescriptor::with_rules(ValueType::Array, rules);
    }

    let mut values = specs.allowed().map(<[String]>::to_vec);
    if specs.allows_empty() {
        // an optional single choice may be left blank
        let values = values.get_or_insert_with(Vec::new);
        if !values.iter().any(String::is_empty) {
            values.push(String::new());
        }
    }
    if let Some(values) = values {
        rules.insert(Rule::Enum(values));
    }

    FieldDescriptor::with_rules(ValueType::String, rules)
}

/// `relation`: identifier or list of identifiers.
pub fn compile_relation(specs: &RelationSpecs, options: &CompilerOptions) -> FieldDescriptor {
    let id_type = if options.relation_as_object_id {
        ValueType::ObjectId
    } else {
        ValueType::String
    };
    let mut rules = RuleSet::new();

    if specs.is_multiple() {
        rules.insert(Rule::EachType(id_type));
        rules.insert(Rule::Custom(CustomValidator::RelationMany(
            RelationListValidator::new(specs.collection.clone(), specs.allows_empty()),
        )));
        return FieldDescriptor::with_rules(ValueType::Array, rules);
    }

    rules.insert(Rule::Custom(CustomValidator::RelationOne(RelationValidator::new(
        specs.collection.clone(),
        specs.allows_empty(),
    ))));
    FieldDescriptor::with_rules(id_type, rules)
}
