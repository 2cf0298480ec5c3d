//! Error handling for the validation library
//!
//! This module provides the error type shared by every validator, with
//! structured aggregates for composite (object/array) failures.

use std::collections::BTreeMap;
use std::fmt;

use serde_json::{json, Value};
use thiserror::Error;

/// Result type for validation operations
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Enum representing different validation error types
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// A required field was absent from the input
    #[error("Field is required")]
    Required,

    /// Null was supplied for a field that does not accept it
    #[error("Field cannot be null")]
    NullNotAllowed,

    /// Input type does not match the validator variant
    #[error("{0}")]
    InvalidType(String),

    /// String or array shorter than the configured minimum
    #[error("{0}")]
    TooShort(String),

    /// String or array longer than the configured maximum
    #[error("{0}")]
    TooLong(String),

    /// Empty string where content is required
    #[error("String cannot be empty")]
    Empty,

    /// String did not match the configured pattern
    #[error("String does not match pattern: {0}")]
    PatternMismatch(String),

    /// Value is outside the configured membership set
    #[error("Value must be one of: {0}")]
    NotAllowed(String),

    /// Numeric or date value outside the inclusive bounds
    #[error("{0}")]
    OutOfRange(String),

    /// Date string could not be parsed
    #[error("Invalid date format")]
    InvalidDateFormat,

    /// Array items are not pairwise distinct
    #[error("Array items must be unique")]
    DuplicateItems,

    /// Key present in the input but not declared by the schema
    #[error("Unexpected field")]
    UnexpectedField,

    /// Invalid regex supplied at construction time (configuration error,
    /// surfaced eagerly rather than at validation time)
    #[error("Invalid regex pattern: {0}")]
    InvalidPattern(String),

    /// Failure reported by a user-supplied custom check, or a configured
    /// override message
    #[error("{0}")]
    Custom(String),

    /// Logging/subscriber setup failure
    #[error("Initialization failed: {0}")]
    Initialization(String),

    /// Per-field failures from object/schema validation
    #[error("{0}")]
    Fields(FieldErrors),

    /// Per-index failures from array item validation
    #[error("{0}")]
    Items(ItemErrors),
}

impl ValidationError {
    /// Create a custom validation error with a message
    pub fn custom<S: Into<String>>(message: S) -> Self {
        ValidationError::Custom(message.into())
    }

    /// Stable snake_case tag for this error, used as the metrics
    /// error-distribution key
    pub fn kind(&self) -> &'static str {
        match self {
            ValidationError::Required => "required",
            ValidationError::NullNotAllowed => "null_not_allowed",
            ValidationError::InvalidType(_) => "invalid_type",
            ValidationError::TooShort(_) => "too_short",
            ValidationError::TooLong(_) => "too_long",
            ValidationError::Empty => "empty",
            ValidationError::PatternMismatch(_) => "pattern_mismatch",
            ValidationError::NotAllowed(_) => "not_allowed",
            ValidationError::OutOfRange(_) => "out_of_range",
            ValidationError::InvalidDateFormat => "invalid_date_format",
            ValidationError::DuplicateItems => "duplicate_items",
            ValidationError::UnexpectedField => "unexpected_field",
            ValidationError::InvalidPattern(_) => "invalid_pattern",
            ValidationError::Custom(_) => "custom",
            ValidationError::Initialization(_) => "initialization",
            ValidationError::Fields(_) => "fields",
            ValidationError::Items(_) => "items",
        }
    }

    /// Structured JSON rendering, suitable for API error responses
    pub fn to_json(&self) -> Value {
        match self {
            ValidationError::Fields(fields) => {
                let rendered: serde_json::Map<String, Value> = fields
                    .iter()
                    .map(|(name, error)| (name.clone(), error.to_json()))
                    .collect();
                json!({ "kind": self.kind(), "fields": rendered })
            }
            ValidationError::Items(items) => {
                let rendered: Vec<Value> = items
                    .iter()
                    .map(|item| json!({ "index": item.index, "error": item.error.to_json() }))
                    .collect();
                json!({ "kind": self.kind(), "items": rendered })
            }
            _ => json!({ "kind": self.kind(), "message": self.to_string() }),
        }
    }
}

/// Aggregate of per-field failures, keyed by field name
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FieldErrors {
    errors: BTreeMap<String, ValidationError>,
}

impl FieldErrors {
    /// Create an empty aggregate
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a failure for `field`
    pub fn insert<S: Into<String>>(&mut self, field: S, error: ValidationError) {
        self.errors.insert(field.into(), error);
    }

    /// Look up the failure recorded for `field`, if any
    pub fn get(&self, field: &str) -> Option<&ValidationError> {
        self.errors.get(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.errors.contains_key(field)
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Iterate over `(field, error)` pairs in field-name order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &ValidationError)> {
        self.errors.iter()
    }

    /// Rendered field→message mapping
    pub fn messages(&self) -> BTreeMap<String, String> {
        self.errors
            .iter()
            .map(|(name, error)| (name.clone(), error.to_string()))
            .collect()
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} field validation errors:", self.errors.len())?;

        for (name, error) in &self.errors {
            writeln!(f, "  {}: {}", name, error)?;
        }

        Ok(())
    }
}

/// One failing array element
#[derive(Debug, Clone, PartialEq)]
pub struct ItemError {
    /// Zero-based position in the validated array
    pub index: usize,
    /// The failure at that position
    pub error: ValidationError,
}

/// Aggregate of per-index failures from array item validation
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ItemErrors {
    errors: Vec<ItemError>,
}

impl ItemErrors {
    /// Create an empty aggregate
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a failure at `index`
    pub fn push(&mut self, index: usize, error: ValidationError) {
        self.errors.push(ItemError { index, error });
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Iterate over the failing items in index order
    pub fn iter(&self) -> impl Iterator<Item = &ItemError> {
        self.errors.iter()
    }

    /// Rendered "item {index}: {message}" strings, failing indexes only
    pub fn messages(&self) -> Vec<String> {
        self.errors
            .iter()
            .map(|item| format!("item {}: {}", item.index, item.error))
            .collect()
    }
}

impl fmt::Display for ItemErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} invalid array items:", self.errors.len())?;

        for item in &self.errors {
            writeln!(f, "  item {}: {}", item.index, item.error)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_error_messages() {
        assert_eq!(ValidationError::Required.to_string(), "Field is required");
        assert_eq!(
            ValidationError::NullNotAllowed.to_string(),
            "Field cannot be null"
        );
        assert_eq!(
            ValidationError::PatternMismatch("^[a-z]+$".to_string()).to_string(),
            "String does not match pattern: ^[a-z]+$"
        );
        assert_eq!(
            ValidationError::NotAllowed("red, green".to_string()).to_string(),
            "Value must be one of: red, green"
        );
    }

    #[test]
    fn test_custom_error_creation() {
        let err = ValidationError::custom("Test error");
        assert!(matches!(err, ValidationError::Custom(_)));
        assert_eq!(err.to_string(), "Test error");
    }

    #[test]
    fn test_error_kind_tags() {
        assert_eq!(ValidationError::Required.kind(), "required");
        assert_eq!(ValidationError::DuplicateItems.kind(), "duplicate_items");
        assert_eq!(ValidationError::Fields(FieldErrors::new()).kind(), "fields");
    }

    #[test]
    fn test_field_errors_messages() {
        let mut fields = FieldErrors::new();
        fields.insert("age", ValidationError::OutOfRange("Value must be at least 18".to_string()));
        fields.insert("name", ValidationError::Required);

        assert_eq!(fields.len(), 2);
        assert!(fields.contains("age"));
        assert_eq!(fields.get("name"), Some(&ValidationError::Required));

        let messages = fields.messages();
        assert_eq!(messages["age"], "Value must be at least 18");
        assert_eq!(messages["name"], "Field is required");
    }

    #[test]
    fn test_item_errors_messages() {
        let mut items = ItemErrors::new();
        items.push(1, ValidationError::PatternMismatch("^[a-z]+$".to_string()));

        let messages = items.messages();
        assert_eq!(
            messages,
            vec!["item 1: String does not match pattern: ^[a-z]+$".to_string()]
        );
    }

    #[test]
    fn test_to_json_structure() {
        let mut fields = FieldErrors::new();
        fields.insert("name", ValidationError::Required);
        let err = ValidationError::Fields(fields);

        let rendered = err.to_json();
        assert_eq!(rendered["kind"], "fields");
        assert_eq!(rendered["fields"]["name"]["kind"], "required");
        assert_eq!(rendered["fields"]["name"]["message"], "Field is required");

        let scalar = ValidationError::Empty.to_json();
        assert_eq!(scalar["kind"], "empty");
        assert_eq!(scalar["message"], "String cannot be empty");
    }
}
