//! Compiler configuration

use serde::{Deserialize, Serialize};

use super::errors::CompileResult;

/// Options controlling schema compilation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompilerOptions {
    /// Compile relations to the ObjectId type instead of String (default: true)
    #[serde(default = "default_relation_as_object_id")]
    pub relation_as_object_id: bool,

    /// Reject unknown type tags instead of skipping them (default: false)
    #[serde(default)]
    pub strict_types: bool,
}

fn default_relation_as_object_id() -> bool {
    true
}

impl Default for CompilerOptions {
    fn default() -> Self {
        Self {
            relation_as_object_id: default_relation_as_object_id(),
            strict_types: false,
        }
    }
}

impl CompilerOptions {
    /// Backend mode: relations are ObjectIds
    pub fn backend() -> Self {
        Self::default()
    }

    /// Frontend mode: relations are plain strings
    pub fn frontend() -> Self {
        Self {
            relation_as_object_id: false,
            ..Self::default()
        }
    }

    pub fn with_relation_as_object_id(mut self, enabled: bool) -> Self {
        self.relation_as_object_id = enabled;
        self
    }

    pub fn with_strict_types(mut self, enabled: bool) -> Self {
        self.strict_types = enabled;
        self
    }

    /// Parses options from JSON; absent members take their defaults.
    pub fn from_json(text: &str) -> CompileResult<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = CompilerOptions::default();
        assert!(options.relation_as_object_id);
        assert!(!options.strict_types);
    }

    #[test]
    fn test_partial_json_merges_over_defaults() {
        let options = CompilerOptions::from_json("{}").unwrap();
        assert_eq!(options, CompilerOptions::default());

        let options = CompilerOptions::from_json(r#"{"relationAsObjectId": false}"#).unwrap();
        assert_eq!(options, CompilerOptions::frontend());

        let options = CompilerOptions::from_json(r#"{"strictTypes": true}"#).unwrap();
        assert!(options.relation_as_object_id);
        assert!(options.strict_types);
    }

    #[test]
    fn test_bad_json_rejected() {
        let err = CompilerOptions::from_json(r#"{"relationAsObjectId": "yes"}"#).unwrap_err();
        assert_eq!(err.code(), "SCHEMAC_MALFORMED_DESCRIPTOR");
    }

    #[test]
    fn test_builders() {
        let options = CompilerOptions::backend()
            .with_relation_as_object_id(false)
            .with_strict_types(true);
        assert!(!options.relation_as_object_id);
        assert!(options.strict_types);
    }
}
