//! Validation driven entirely by a user-supplied check
//!
//! `CustomValidator` carries no type or rule checks of its own; the shared
//! presence and null handling still applies, so a custom check never sees
//! an absent value or (unless marked nullable) a null.

use std::sync::Arc;

use serde_json::Value;

use crate::errors::{ValidationError, ValidationResult};

use super::{evaluate, CommonRules, RuleSet};

/// Wraps an arbitrary check into the standard validation pipeline
#[derive(Debug, Clone, Default)]
pub struct CustomValidator {
    common: CommonRules,
}

impl CustomValidator {
    pub fn new<F>(check: F) -> Self
    where
        F: Fn(&Value) -> ValidationResult<()> + Send + Sync + 'static,
    {
        let mut common = CommonRules::default();
        common.custom_check = Some(Arc::new(check));
        Self { common }
    }

    /// Build from a boolean predicate; failures carry `message`
    pub fn from_predicate<F, S>(predicate: F, message: S) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
        S: Into<String>,
    {
        let message = message.into();
        Self::new(move |value| {
            if predicate(value) {
                Ok(())
            } else {
                Err(ValidationError::Custom(message.clone()))
            }
        })
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

    pub fn validate(&self, value: &Value) -> ValidationResult<()> {
        evaluate(self, Some(value))
    }

    pub fn validate_optional(&self, value: Option<&Value>) -> ValidationResult<()> {
        evaluate(self, value)
    }
}

impl RuleSet for CustomValidator {
    fn common(&self) -> &CommonRules {
        &self.common
    }

    fn check(&self, _value: &Value) -> ValidationResult<Option<Value>> {
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_check_outcome_passes_through() {
        let validator = CustomValidator::new(|value| {
            if value.as_i64().map_or(false, |n| n % 2 == 0) {
                Ok(())
            } else {
                Err(ValidationError::custom("Value must be even"))
            }
        });

        assert!(validator.validate(&json!(4)).is_ok());
        assert_eq!(
            validator.validate(&json!(3)),
            Err(ValidationError::custom("Value must be even"))
        );
    }

    #[test]
    fn test_predicate_message() {
        let validator =
            CustomValidator::from_predicate(|value| value.is_string(), "Expected a string");

        assert!(validator.validate(&json!("ok")).is_ok());
        assert_eq!(
            validator.validate(&json!(1)),
            Err(ValidationError::custom("Expected a string"))
        );
    }

    #[test]
    fn test_check_never_sees_null_when_nullable() {
        let validator = CustomValidator::from_predicate(|_| false, "always fails").nullable(true);
        assert!(validator.validate(&Value::Null).is_ok());
    }

    #[test]
    fn test_required_absent() {
        let validator = CustomValidator::from_predicate(|_| true, "unused");
        assert_eq!(
            validator.validate_optional(None),
            Err(ValidationError::Required)
        );
    }

    #[test]
    fn test_error_override() {
        let validator =
            CustomValidator::from_predicate(|_| false, "inner message").error_message("outer");
        assert_eq!(
            validator.validate(&json!(1)),
            Err(ValidationError::custom("outer"))
        );
    }
}
