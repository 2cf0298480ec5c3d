//! Boolean validation with optional coercion from string and numeric forms

use std::sync::Arc;

use serde_json::Value;

use crate::errors::{ValidationError, ValidationResult};

use super::{evaluate, CommonRules, RuleSet};

/// Validates JSON booleans; in non-strict mode the strings
/// "true"/"false"/"1"/"0" (any case) and the numbers 0/1 coerce
#[derive(Debug, Clone)]
pub struct BooleanValidator {
    common: CommonRules,
    strict: bool,
}

impl Default for BooleanValidator {
    fn default() -> Self {
        Self {
            common: CommonRules::default(),
            strict: true,
        }
    }
}

impl BooleanValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Require an exact JSON boolean (the default); set false to accept
    /// the coercible string and numeric forms
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
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

    /// Additional check run after coercion; it always receives a
    /// normalized JSON boolean
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

impl RuleSet for BooleanValidator {
    fn common(&self) -> &CommonRules {
        &self.common
    }

    fn check(&self, value: &Value) -> ValidationResult<Option<Value>> {
        match value {
            Value::Bool(_) => Ok(None),
            _ if self.strict => Err(ValidationError::InvalidType(
                "Value must be a boolean".to_string(),
            )),
            Value::String(s) => match s.to_lowercase().as_str() {
                "true" | "1" => Ok(Some(Value::Bool(true))),
                "false" | "0" => Ok(Some(Value::Bool(false))),
                _ => Err(ValidationError::InvalidType(
                    "Value must be a valid boolean".to_string(),
                )),
            },
            Value::Number(n) => match n.as_f64() {
                Some(x) if x == 0.0 => Ok(Some(Value::Bool(false))),
                Some(x) if x == 1.0 => Ok(Some(Value::Bool(true))),
                _ => Err(ValidationError::InvalidType(
                    "Value must be 0 or 1".to_string(),
                )),
            },
            _ => Err(ValidationError::InvalidType(
                "Value must be a valid boolean".to_string(),
            )),
        }
    }
}
