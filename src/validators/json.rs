//! JSON text validity

/// Failure detail for text that is not JSON
pub const INVALID_JSON: &str = "Invalid JSON format";

/// Returns whether `text` parses as a JSON document.
pub fn is_valid_json(text: &str) -> bool {
    serde_json::from_str::<serde::de::IgnoredAny>(text).is_ok()
}
