//! Compiler error types
//!
//! Error codes:
//! - SCHEMAC_INVALID_PATTERN
//! - SCHEMAC_UNSUPPORTED_FIELD_TYPE
//! - SCHEMAC_MALFORMED_DESCRIPTOR
//! - SCHEMAC_MALFORMED_SPECS

use thiserror::Error;

/// Result type for compiler operations
pub type CompileResult<T> = Result<T, CompileError>;

/// Errors raised while compiling a table schema
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    /// A string field's `pattern` is not a valid regular expression
    #[error("Invalid pattern for field '{key}': {reason}")]
    InvalidPattern {
        key: String,
        pattern: String,
        reason: String,
    },

    /// Unknown type tag, raised only with `strict_types`
    #[error("Unsupported type '{type_tag}' for field '{key}'")]
    UnsupportedFieldType { key: String, type_tag: String },

    /// Input does not match the field descriptor contract
    #[error("Malformed field descriptor: {0}")]
    MalformedDescriptor(String),

    /// A compiled field's specs do not match its type
    #[error("Malformed specs for field '{key}': {reason}")]
    MalformedSpecs { key: String, reason: String },
}

impl CompileError {
    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            CompileError::InvalidPattern { .. } => "SCHEMAC_INVALID_PATTERN",
            CompileError::UnsupportedFieldType { .. } => "SCHEMAC_UNSUPPORTED_FIELD_TYPE",
            CompileError::MalformedDescriptor(_) => "SCHEMAC_MALFORMED_DESCRIPTOR",
            CompileError::MalformedSpecs { .. } => "SCHEMAC_MALFORMED_SPECS",
        }
    }

    /// Returns the offending field key, if known
    pub fn field(&self) -> Option<&str> {
        match self {
            CompileError::InvalidPattern { key, .. }
            | CompileError::UnsupportedFieldType { key, .. }
            | CompileError::MalformedSpecs { key, .. } => Some(key),
            CompileError::MalformedDescriptor(_) => None,
        }
    }
}

impl From<serde_json::Error> for CompileError {
    fn from(e: serde_json::Error) -> Self {
        CompileError::MalformedDescriptor(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = CompileError::InvalidPattern {
            key: "code".into(),
            pattern: "(".into(),
            reason: "unclosed group".into(),
        };
        assert_eq!(err.code(), "SCHEMAC_INVALID_PATTERN");
        assert_eq!(err.field(), Some("code"));

        let err = CompileError::MalformedDescriptor("missing type".into());
        assert_eq!(err.code(), "SCHEMAC_MALFORMED_DESCRIPTOR");
        assert!(err.field().is_none());
    }

    #[test]
    fn test_display_names_field() {
        let err = CompileError::UnsupportedFieldType {
            key: "geo".into(),
            type_tag: "geopoint".into(),
        };
        let display = format!("{}", err);
        assert!(display.contains("geo"));
        assert!(display.contains("geopoint"));
    }

    #[test]
    fn test_from_serde_error() {
        let serde_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: CompileError = serde_err.into();
        assert_eq!(err.code(), "SCHEMAC_MALFORMED_DESCRIPTOR");
    }
}
