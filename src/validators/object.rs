//! Nested object validation
//!
//! Field errors aggregate instead of short-circuiting: every declared
//! field is checked and, in strict mode, every undeclared key is flagged,
//! all in a single pass. The field-walk helpers here are shared with the
//! top-level schema.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::errors::{FieldErrors, ValidationError, ValidationResult};

use super::{evaluate, CommonRules, RuleSet, Validator};

/// Validates objects against a per-field validator map
#[derive(Debug, Clone)]
pub struct ObjectValidator {
    common: CommonRules,
    schema: BTreeMap<String, Validator>,
    strict: bool,
    allow_unknown: bool,
}

impl Default for ObjectValidator {
    fn default() -> Self {
        Self {
            common: CommonRules::default(),
            schema: BTreeMap::new(),
            strict: false,
            allow_unknown: true,
        }
    }
}

impl ObjectValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a field and its validator
    pub fn field<S, V>(mut self, name: S, validator: V) -> Self
    where
        S: Into<String>,
        V: Into<Validator>,
    {
        self.schema.insert(name.into(), validator.into());
        self
    }

    /// Reject keys not declared in the schema
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Tolerate undeclared keys (the default); setting this to false is
    /// equivalent to strict mode
    pub fn allow_unknown(mut self, allow: bool) -> Self {
        self.allow_unknown = allow;
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

    /// Additional check run on the whole object after every field passes
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

/// Flag every key in `data` that the field map does not declare.
pub(crate) fn collect_unknown_fields<V>(
    fields: &BTreeMap<String, V>,
    data: &Map<String, Value>,
    errors: &mut FieldErrors,
) {
    for key in data.keys() {
        if !fields.contains_key(key) {
            errors.insert(key.clone(), ValidationError::UnexpectedField);
        }
    }
}

/// Run every declared field validator over `data`, collecting failures
/// by field name. Absent keys surface to each validator as `None` so its
/// own required flag decides the outcome.
pub(crate) fn validate_fields(
    fields: &BTreeMap<String, Validator>,
    reject_unknown: bool,
    data: &Map<String, Value>,
) -> FieldErrors {
    let mut errors = FieldErrors::new();

    if reject_unknown {
        collect_unknown_fields(fields, data, &mut errors);
    }

    for (name, validator) in fields {
        if let Err(error) = validator.validate_optional(data.get(name)) {
            errors.insert(name.clone(), error);
        }
    }

    errors
}

impl RuleSet for ObjectValidator {
    fn common(&self) -> &CommonRules {
        &self.common
    }

    fn check(&self, value: &Value) -> ValidationResult<Option<Value>> {
        let map = match value {
            Value::Object(map) => map,
            _ => {
                return Err(ValidationError::InvalidType(
                    "Value must be an object".to_string(),
                ))
            }
        };

        let errors = validate_fields(&self.schema, self.strict || !self.allow_unknown, map);
        if !errors.is_empty() {
            return Err(ValidationError::Fields(errors));
        }

        Ok(None)
    }
}
