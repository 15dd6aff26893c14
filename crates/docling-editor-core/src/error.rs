//! Error types for the fallible edges of the editor core.
//!
//! The lookup, validation and geometry helpers never fail. Errors only come
//! from parsing: JSON text into page objects, strict block-type tags, and hex
//! color strings.

use thiserror::Error;

/// Errors raised while parsing editor data.
///
/// # Examples
///
/// ```
/// use docling_editor_core::{BlockType, EditorError};
///
/// match "Heading".parse::<BlockType>() {
///     Err(EditorError::UnknownBlockType(tag)) => assert_eq!(tag, "Heading"),
///     other => panic!("unexpected: {other:?}"),
/// }
/// ```
#[derive(Error, Debug)]
pub enum EditorError {
    /// JSON serialization/deserialization error.
    ///
    /// This occurs when page metadata or block JSON is malformed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The tag is not one of the fixed block types (matching is case-sensitive).
    #[error("Unknown block type: '{0}'")]
    UnknownBlockType(String),

    /// The string is not a `#RRGGBB` hex color.
    #[error("Invalid color: '{0}'")]
    InvalidColor(String),
}

/// Result type alias for editor operations.
pub type Result<T> = std::result::Result<T, EditorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = EditorError::UnknownBlockType("sidebar".to_string());
        assert_eq!(err.to_string(), "Unknown block type: 'sidebar'");

        let err = EditorError::InvalidColor("#12".to_string());
        assert_eq!(err.to_string(), "Invalid color: '#12'");
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: EditorError = json_err.into();
        assert!(matches!(err, EditorError::Json(_)));
        assert!(err.to_string().starts_with("JSON error:"));
    }
}
