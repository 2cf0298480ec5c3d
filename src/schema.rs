//! Top-level schema
//!
//! A `Schema` maps field names to validators and checks whole JSON
//! objects in one pass, aggregating failures by field name. Schemas are
//! immutable once built and safe to share across threads, so one schema
//! can validate any number of payloads.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::context::ValidationContext;
use crate::errors::{FieldErrors, ValidationError, ValidationResult};
use crate::validators::{collect_unknown_fields, validate_fields, Validator};

/// Field-to-validator mapping applied to whole objects
#[derive(Debug, Clone, Default)]
pub struct Schema {
    fields: BTreeMap<String, Validator>,
    strict: bool,
}

impl Schema {
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::default()
    }

    /// Validate a payload against every declared field.
    ///
    /// All fields are checked before returning; the error carries one
    /// entry per failing field. In strict mode undeclared keys fail with
    /// "Unexpected field" and are collected alongside field failures.
    pub fn validate(&self, data: &Value) -> ValidationResult<()> {
        let map = match data {
            Value::Object(map) => map,
            _ => {
                return Err(ValidationError::InvalidType(
                    "Value must be an object".to_string(),
                ))
            }
        };

        let errors = validate_fields(&self.fields, self.strict, map);
        if !errors.is_empty() {
            return Err(ValidationError::Fields(errors));
        }

        Ok(())
    }

    /// Validate while recording per-field paths and timings into `context`
    pub fn validate_with_context(
        &self,
        data: &Value,
        context: &ValidationContext,
    ) -> ValidationResult<()> {
        let map = match data {
            Value::Object(map) => map,
            _ => {
                return Err(ValidationError::InvalidType(
                    "Value must be an object".to_string(),
                ))
            }
        };

        let mut errors = FieldErrors::new();
        if self.strict {
            collect_unknown_fields(&self.fields, map, &mut errors);
        }

        for (name, validator) in &self.fields {
            let _guard = context.enter(name);
            let outcome = context.observe(|| validator.validate_optional(map.get(name)));
            if let Err(error) = outcome {
                errors.insert(name.clone(), error);
            }
        }

        if !errors.is_empty() {
            return Err(ValidationError::Fields(errors));
        }

        Ok(())
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Declared field names, in sorted order
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }
}

/// Builder for [`Schema`]
#[derive(Debug, Clone, Default)]
pub struct SchemaBuilder {
    fields: BTreeMap<String, Validator>,
    strict: bool,
}

impl SchemaBuilder {
    /// Declare a field and its validator
    pub fn field<S, V>(mut self, name: S, validator: V) -> Self
    where
        S: Into<String>,
        V: Into<Validator>,
    {
        self.fields.insert(name.into(), validator.into());
        self
    }

    /// Reject keys not declared in the schema
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn build(self) -> Schema {
        Schema {
            fields: self.fields,
            strict: self.strict,
        }
    }
}
