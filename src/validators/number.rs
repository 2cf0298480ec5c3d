//! Numeric validation
//!
//! `integer_only` rejects by JSON representation, not numeric wholeness:
//! `5.0` is a float and fails even though it is numerically whole.

use std::sync::Arc;

use serde_json::Value;

use crate::errors::{ValidationError, ValidationResult};

use super::{evaluate, CommonRules, RuleSet};

/// Validates JSON numbers against range and membership rules
#[derive(Debug, Clone, Default)]
pub struct NumberValidator {
    common: CommonRules,
    min_value: Option<f64>,
    max_value: Option<f64>,
    integer_only: bool,
    allowed_values: Option<Vec<f64>>,
}

impl NumberValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Minimum value, inclusive
    pub fn min_value(mut self, min: f64) -> Self {
        self.min_value = Some(min);
        self
    }

    /// Maximum value, inclusive
    pub fn max_value(mut self, max: f64) -> Self {
        self.max_value = Some(max);
        self
    }

    /// Reject values whose JSON representation is not an integer
    pub fn integer_only(mut self, integer_only: bool) -> Self {
        self.integer_only = integer_only;
        self
    }

    /// Restrict the number to a closed set of values (numeric equality)
    pub fn allowed_values<I>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        self.allowed_values = Some(values.into_iter().collect());
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

    /// Replace any generated failure message with `message`
    pub fn error_message<S: Into<String>>(mut self, message: S) -> Self {
        self.common.error_override = Some(message.into());
        self
    }

    /// Additional check run after the built-in rules pass
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

impl RuleSet for NumberValidator {
    fn common(&self) -> &CommonRules {
        &self.common
    }

    fn check(&self, value: &Value) -> ValidationResult<Option<Value>> {
        let number = match value {
            Value::Number(n) => n,
            _ => {
                return Err(ValidationError::InvalidType(
                    "Value must be a number".to_string(),
                ))
            }
        };

        if self.integer_only && !(number.is_i64() || number.is_u64()) {
            return Err(ValidationError::InvalidType(
                "Value must be an integer".to_string(),
            ));
        }

        let numeric = match number.as_f64() {
            Some(n) => n,
            None => {
                return Err(ValidationError::InvalidType(
                    "Value must be a number".to_string(),
                ))
            }
        };

        if let Some(min) = self.min_value {
            if numeric < min {
                return Err(ValidationError::OutOfRange(format!(
                    "Value must be at least {}",
                    min
                )));
            }
        }

        if let Some(max) = self.max_value {
            if numeric > max {
                return Err(ValidationError::OutOfRange(format!(
                    "Value must be at most {}",
                    max
                )));
            }
        }

        if let Some(allowed) = &self.allowed_values {
            if !allowed.iter().any(|candidate| *candidate == numeric) {
                let rendered: Vec<String> = allowed.iter().map(|v| v.to_string()).collect();
                return Err(ValidationError::NotAllowed(rendered.join(", ")));
            }
        }

        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use test_case::test_case;

    #[test_case(json!(15), false ; "below minimum")]
    #[test_case(json!(25), true ; "inside range")]
    #[test_case(json!(150), false ; "above maximum")]
    #[test_case(json!(18), true ; "minimum is inclusive")]
    #[test_case(json!(120), true ; "maximum is inclusive")]
    fn test_range_bounds(value: Value, expected: bool) {
        let validator = NumberValidator::new().min_value(18.0).max_value(120.0);
        assert_eq!(validator.validate(&value).is_ok(), expected);
    }

    #[test]
    fn test_range_messages() {
        let validator = NumberValidator::new().min_value(18.0).max_value(120.0);
        assert_eq!(
            validator.validate(&json!(15)).unwrap_err().to_string(),
            "Value must be at least 18"
        );
        assert_eq!(
            validator.validate(&json!(150)).unwrap_err().to_string(),
            "Value must be at most 120"
        );
    }

    #[test]
    fn test_type_mismatch() {
        let validator = NumberValidator::new();
        assert_eq!(
            validator.validate(&json!("42")),
            Err(ValidationError::InvalidType(
                "Value must be a number".to_string()
            ))
        );
    }

    #[test]
    fn test_integer_only_rejects_floats_by_type() {
        let validator = NumberValidator::new().integer_only(true);
        assert!(validator.validate(&json!(5)).is_ok());

        // Numerically whole, but still a float in the input.
        let result = validator.validate(&json!(5.0));
        assert_eq!(
            result,
            Err(ValidationError::InvalidType(
                "Value must be an integer".to_string()
            ))
        );
    }

    #[test]
    fn test_floats_accepted_without_integer_only() {
        let validator = NumberValidator::new().min_value(0.5);
        assert!(validator.validate(&json!(0.75)).is_ok());
        assert!(validator.validate(&json!(0.25)).is_err());
    }

    #[test]
    fn test_allowed_values_numeric_equality() {
        let validator = NumberValidator::new().allowed_values([1.0, 2.0, 3.0]);
        // Integer 2 equals allowed 2.0.
        assert!(validator.validate(&json!(2)).is_ok());

        let rejected = validator.validate(&json!(4));
        assert_eq!(
            rejected.unwrap_err().to_string(),
            "Value must be one of: 1, 2, 3"
        );
    }

    #[test]
    fn test_rule_order_min_before_allowed() {
        let validator = NumberValidator::new().min_value(10.0).allowed_values([5.0]);
        // 5 violates both rules; the range rule fires first.
        let result = validator.validate(&json!(5));
        assert_eq!(
            result.unwrap_err().to_string(),
            "Value must be at least 10"
        );
    }
}
