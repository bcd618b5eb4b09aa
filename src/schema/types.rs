//! Table field descriptors
//!
//! Wire shape (camelCase JSON):
//!
//! ```json
//! { "id": "f1", "order": 1, "isAuto": false,
//!   "item": { "key": "name", "type": "string", "title": "Name", "specs": { ... } } }
//! ```
//!
//! Supported type tags: string, number, boolean, date, json, email, url, select, relation.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::specs::{
    BooleanSpecs, DateSpecs, DomainSpecs, JsonSpecs, NumberSpecs, RelationSpecs, SelectSpecs,
    StringSpecs,
};

/// Keys managed by the storage layer, never compiled
pub const RESERVED_KEYS: [&str; 3] = ["_id", "createdAt", "updatedAt"];

/// Field kind with its type-specific constraints
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    String(StringSpecs),
    Number(NumberSpecs),
    Boolean(BooleanSpecs),
    Date(DateSpecs),
    Json(JsonSpecs),
    Email(DomainSpecs),
    Url(DomainSpecs),
    Select(SelectSpecs),
    Relation(RelationSpecs),
    /// A type tag this crate does not know, kept verbatim
    Unsupported { type_tag: String, specs: Value },
}

impl FieldKind {
    /// Builds a kind from its type tag and raw specs.
    ///
    /// Unknown tags never fail; known tags fail if the specs do not match their shape.
    pub fn from_parts(type_tag: &str, specs: Value) -> Result<Self, serde_json::Error> {
        // absent specs behave like an empty object
        let specs = match specs {
            Value::Null => Value::Object(Default::default()),
            other => other,
        };

        Ok(match type_tag {
            "string" => FieldKind::String(serde_json::from_value(specs)?),
            "number" => FieldKind::Number(serde_json::from_value(specs)?),
            "boolean" => FieldKind::Boolean(serde_json::from_value(specs)?),
            "date" => FieldKind::Date(serde_json::from_value(specs)?),
            "json" => FieldKind::Json(serde_json::from_value(specs)?),
            "email" => FieldKind::Email(serde_json::from_value(specs)?),
            "url" => FieldKind::Url(serde_json::from_value(specs)?),
            "select" => FieldKind::Select(serde_json::from_value(specs)?),
            "relation" => FieldKind::Relation(serde_json::from_value(specs)?),
            other => FieldKind::Unsupported {
                type_tag: other.to_string(),
                specs,
            },
        })
    }

    /// Returns the type tag
    pub fn type_tag(&self) -> &str {
        match self {
            FieldKind::String(_) => "string",
            FieldKind::Number(_) => "number",
            FieldKind::Boolean(_) => "boolean",
            FieldKind::Date(_) => "date",
            FieldKind::Json(_) => "json",
            FieldKind::Email(_) => "email",
            FieldKind::Url(_) => "url",
            FieldKind::Select(_) => "select",
            FieldKind::Relation(_) => "relation",
            FieldKind::Unsupported { type_tag, .. } => type_tag,
        }
    }

    /// Returns the specs in wire form
    pub fn specs_json(&self) -> Value {
        let encoded = match self {
            FieldKind::String(s) => serde_json::to_value(s),
            FieldKind::Number(s) => serde_json::to_value(s),
            FieldKind::Boolean(s) => serde_json::to_value(s),
            FieldKind::Date(s) => serde_json::to_value(s),
            FieldKind::Json(s) => serde_json::to_value(s),
            FieldKind::Email(s) | FieldKind::Url(s) => serde_json::to_value(s),
            FieldKind::Select(s) => serde_json::to_value(s),
            FieldKind::Relation(s) => serde_json::to_value(s),
            FieldKind::Unsupported { specs, .. } => Ok(specs.clone()),
        };
        encoded.unwrap_or(Value::Null)
    }
}

/// The descriptive part of a table field.
///
/// Specs stay in wire form until [`FieldItem::kind`] decodes them, so fields that are
/// never compiled are never decoded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldItem {
    /// Field key; absent or empty keys are never compiled
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    /// Human-readable title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Type tag as written by the designer
    #[serde(rename = "type")]
    pub type_tag: String,
    /// Type-specific constraints, undecoded
    #[serde(default)]
    pub specs: Value,
}

impl FieldItem {
    /// Builds an item from a decoded kind
    pub fn new(key: Option<String>, kind: &FieldKind) -> Self {
        Self {
            key,
            title: None,
            type_tag: kind.type_tag().to_string(),
            specs: kind.specs_json(),
        }
    }

    /// Returns the key when it is present and non-empty
    pub fn compilable_key(&self) -> Option<&str> {
        self.key.as_deref().filter(|k| !k.is_empty())
    }

    /// Returns whether the key is one of [`RESERVED_KEYS`]
    pub fn is_reserved(&self) -> bool {
        self.key
            .as_deref()
            .map_or(false, |k| RESERVED_KEYS.contains(&k))
    }

    /// Decodes the type tag and specs.
    ///
    /// Unknown tags never fail; known tags fail if the specs do not match their shape.
    pub fn kind(&self) -> Result<FieldKind, serde_json::Error> {
        FieldKind::from_parts(&self.type_tag, self.specs.clone())
    }
}

/// A table field as stored by the table designer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableField {
    /// Designer-assigned identifier
    #[serde(default)]
    pub id: String,
    /// Display order
    #[serde(default)]
    pub order: i64,
    /// Whether the value is filled automatically
    #[serde(default)]
    pub is_auto: bool,
    pub item: FieldItem,
}

impl TableField {
    /// Create a field with the given key and kind
    pub fn new(key: impl Into<String>, kind: FieldKind) -> Self {
        let key = key.into();
        Self {
            id: key.clone(),
            order: 0,
            is_auto: false,
            item: FieldItem::new(Some(key), &kind),
        }
    }

    /// Sets the title
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.item.title = Some(title.into());
        self
    }

    /// Returns the field key, if any
    pub fn key(&self) -> Option<&str> {
        self.item.key.as_deref()
    }

    /// Decodes the field kind
    pub fn kind(&self) -> Result<FieldKind, serde_json::Error> {
        self.item.kind()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_designer_field() {
        let field: TableField = serde_json::from_value(json!({
            "id": "xxx",
            "order": 1,
            "isAuto": false,
            "item": {
                "key": "basicString",
                "type": "string",
                "title": "Basic String",
                "specs": {
                    "lengthMin": null,
                    "lengthMax": 10,
                    "mayBeEmpty": true,
                    "pattern": null
                }
            }
        }))
        .unwrap();

        assert_eq!(field.key(), Some("basicString"));
        assert_eq!(field.item.title.as_deref(), Some("Basic String"));
        match field.kind().unwrap() {
            FieldKind::String(specs) => assert_eq!(specs.length_max, Some(10)),
            other => panic!("unexpected kind {:?}", other),
        }
    }

    #[test]
    fn test_unknown_tag_is_kept() {
        let field: TableField = serde_json::from_value(json!({
            "item": { "key": "geo", "type": "geopoint", "specs": { "precision": 6 } }
        }))
        .unwrap();

        let kind = field.kind().unwrap();
        assert_eq!(kind.type_tag(), "geopoint");
        assert!(matches!(kind, FieldKind::Unsupported { .. }));
    }

    #[test]
    fn test_missing_specs_default() {
        let raw = json!({ "item": { "key": "flag", "type": "boolean" } });
        let field: TableField = serde_json::from_value(raw).unwrap();
        let expected = FieldKind::Boolean(BooleanSpecs::default());
        assert_eq!(field.kind().unwrap(), expected);
    }

    #[test]
    fn test_mistyped_specs_fail_on_decode() {
        let field: TableField = serde_json::from_value(json!({
            "item": { "key": "n", "type": "string", "specs": { "lengthMax": "ten" } }
        }))
        .unwrap();

        assert_eq!(field.item.type_tag, "string");
        assert!(field.kind().is_err());
    }

    #[test]
    fn test_reserved_and_empty_keys() {
        let reserved = TableField::new("_id", FieldKind::String(StringSpecs::default()));
        assert!(reserved.item.is_reserved());

        let mut empty = TableField::new("", FieldKind::Json(JsonSpecs::default()));
        assert!(empty.item.compilable_key().is_none());
        empty.item.key = None;
        assert!(!empty.item.is_reserved());
    }

    #[test]
    fn test_serialize_keeps_wire_shape() {
        let field = TableField::new(
            "tags",
            FieldKind::Select(SelectSpecs {
                multiple: Some(true),
                ..Default::default()
            }),
        )
        .with_title("Tags");

        let value = serde_json::to_value(&field).unwrap();
        assert_eq!(value["isAuto"], json!(false));
        assert_eq!(value["item"]["type"], json!("select"));
        assert_eq!(value["item"]["specs"]["multiple"], json!(true));

        let back: TableField = serde_json::from_value(value).unwrap();
        assert_eq!(back, field);
    }
}
