//! Array validation
//!
//! Length and uniqueness rules run before per-item validation. Item
//! validation does not short-circuit; every failing index is collected
//! so callers see the full picture in one pass.

use std::sync::Arc;

use serde_json::Value;

use crate::errors::{ItemErrors, ValidationError, ValidationResult};

use super::{evaluate, CommonRules, RuleSet, Validator};

/// Validates arrays: length bounds, uniqueness, and an optional
/// per-item validator
#[derive(Debug, Clone, Default)]
pub struct ArrayValidator {
    common: CommonRules,
    item_validator: Option<Box<Validator>>,
    min_length: Option<usize>,
    max_length: Option<usize>,
    unique: bool,
}

impl ArrayValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validator applied to every item
    pub fn item_validator<V: Into<Validator>>(mut self, validator: V) -> Self {
        self.item_validator = Some(Box::new(validator.into()));
        self
    }

    /// Minimum number of items, inclusive
    pub fn min_length(mut self, min: usize) -> Self {
        self.min_length = Some(min);
        self
    }

    /// Maximum number of items, inclusive
    pub fn max_length(mut self, max: usize) -> Self {
        self.max_length = Some(max);
        self
    }

    /// Reject arrays containing equal items
    pub fn unique(mut self, unique: bool) -> Self {
        self.unique = unique;
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.common.required = required;
        self
    }

    pub fn nullable(mut self, nullable: bool) -> Self {
        self.common.nullable = nullable;
        self
    }

    pub fn error_message<S: Into<String>>(mut self, message: S) -> Self {
        self.common.error_override = Some(message.into());
        self
    }

    /// Additional check run on the whole array after all other rules pass
    pub fn custom_check<F>(mut self, check: F) -> Self
    where
        F: Fn(&Value) -> ValidationResult<()> + Send + Sync + 'static,
    {
        self.common.custom_check = Some(Arc::new(check));
        self
    }

    pub fn validate(&self, value: &Value) -> ValidationResult<()> {
        evaluate(self, Some(value))
    }

    pub fn validate_optional(&self, value: Option<&Value>) -> ValidationResult<()> {
        evaluate(self, value)
    }
}

/// Pairwise equality scan; JSON values of any shape compare structurally,
/// so objects and arrays participate too.
fn has_duplicates(items: &[Value]) -> bool {
    for (index, item) in items.iter().enumerate() {
        if items[index + 1..].iter().any(|other| other == item) {
            return true;
        }
    }
    false
}

impl RuleSet for ArrayValidator {
    fn common(&self) -> &CommonRules {
        &self.common
    }

    fn check(&self, value: &Value) -> ValidationResult<Option<Value>> {
        let items = match value {
            Value::Array(items) => items,
            _ => {
                return Err(ValidationError::InvalidType(
                    "Value must be an array".to_string(),
                ))
            }
        };

        if let Some(min) = self.min_length {
            if items.len() < min {
                return Err(ValidationError::TooShort(format!(
                    "Array must have at least {} items",
                    min
                )));
            }
        }

        if let Some(max) = self.max_length {
            if items.len() > max {
                return Err(ValidationError::TooLong(format!(
                    "Array must have at most {} items",
                    max
                )));
            }
        }

        if self.unique && has_duplicates(items) {
            return Err(ValidationError::DuplicateItems);
        }

        if let Some(validator) = &self.item_validator {
            let mut errors = ItemErrors::new();
            for (index, item) in items.iter().enumerate() {
                if let Err(error) = validator.validate_optional(Some(item)) {
                    errors.push(index, error);
                }
            }
            if !errors.is_empty() {
                return Err(ValidationError::Items(errors));
            }
        }

        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validators::{NumberValidator, StringValidator};
    use serde_json::json;

    #[test]
    fn test_length_bounds() {
        let validator = ArrayValidator::new().min_length(2).max_length(3);

        assert_eq!(
            validator.validate(&json!([1])),
            Err(ValidationError::TooShort(
                "Array must have at least 2 items".to_string()
            ))
        );
        assert!(validator.validate(&json!([1, 2])).is_ok());
        assert!(validator.validate(&json!([1, 2, 3])).is_ok());
        assert_eq!(
            validator.validate(&json!([1, 2, 3, 4])),
            Err(ValidationError::TooLong(
                "Array must have at most 3 items".to_string()
            ))
        );
    }

    #[test]
    fn test_unique_rejects_duplicates() {
        let validator = ArrayValidator::new().unique(true);
        assert!(validator.validate(&json!([1, 2, 3])).is_ok());
        assert_eq!(
            validator.validate(&json!([1, 2, 1])),
            Err(ValidationError::DuplicateItems)
        );
    }

    #[test]
    fn test_unique_compares_objects_structurally() {
        let validator = ArrayValidator::new().unique(true);
        assert_eq!(
            validator.validate(&json!([{"a": 1}, {"a": 1}])),
            Err(ValidationError::DuplicateItems)
        );
        assert!(validator.validate(&json!([{"a": 1}, {"a": 2}])).is_ok());
    }

    #[test]
    fn test_every_failing_item_is_reported() {
        let validator =
            ArrayValidator::new().item_validator(StringValidator::new().min_length(2));

        let result = validator.validate(&json!(["ab", "1", "cd", "2"]));
        match result {
            Err(ValidationError::Items(errors)) => {
                assert_eq!(errors.len(), 2);
                assert_eq!(
                    errors.messages(),
                    vec![
                        "item 1: String length must be at least 2 characters".to_string(),
                        "item 3: String length must be at least 2 characters".to_string(),
                    ]
                );
            }
            other => panic!("expected item errors, got {:?}", other),
        }
    }

    #[test]
    fn test_item_type_errors() {
        let validator = ArrayValidator::new().item_validator(NumberValidator::new());
        let result = validator.validate(&json!([1, "two", 3]));
        match result {
            Err(ValidationError::Items(errors)) => {
                assert_eq!(
                    errors.messages(),
                    vec!["item 1: Value must be a number".to_string()]
                );
            }
            other => panic!("expected item errors, got {:?}", other),
        }
    }

    #[test]
    fn test_non_array_fails_type_check() {
        let validator = ArrayValidator::new();
        assert_eq!(
            validator.validate(&json!("not an array")),
            Err(ValidationError::InvalidType(
                "Value must be an array".to_string()
            ))
        );
    }

    #[test]
    fn test_custom_check_runs_after_items_pass() {
        let validator = ArrayValidator::new()
            .item_validator(NumberValidator::new())
            .custom_check(|value| {
                let sum: f64 = value
                    .as_array()
                    .map(|items| items.iter().filter_map(Value::as_f64).sum())
                    .unwrap_or(0.0);
                if sum <= 10.0 {
                    Ok(())
                } else {
                    Err(ValidationError::custom("Sum must not exceed 10"))
                }
            });

        assert!(validator.validate(&json!([1, 2, 3])).is_ok());
        assert_eq!(
            validator.validate(&json!([5, 6])),
            Err(ValidationError::custom("Sum must not exceed 10"))
        );
        // Item failures win; the custom check never runs.
        assert!(matches!(
            validator.validate(&json!(["x", 20])),
            Err(ValidationError::Items(_))
        ));
    }

    #[test]
    fn test_empty_array_passes_without_rules() {
        let validator = ArrayValidator::new().item_validator(StringValidator::new());
        assert!(validator.validate(&json!([])).is_ok());
    }
}
