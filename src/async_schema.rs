//! Async validation
//!
//! Fields that need I/O to validate, such as uniqueness lookups or
//! remote policy checks, pair a synchronous validator with an async
//! check. The synchronous rules run first and the async check only fires
//! once they pass, so a check never sees a value of the wrong shape.
//! Across a schema, field checks run concurrently.

use std::collections::BTreeMap;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use futures::future::join_all;
use serde_json::Value;

use crate::errors::{FieldErrors, ValidationError, ValidationResult};
use crate::validators::{collect_unknown_fields, Validator};

type BoxedCheckFuture = Pin<Box<dyn Future<Output = ValidationResult<()>> + Send>>;
type AsyncCheckFn = Arc<dyn Fn(Value) -> BoxedCheckFuture + Send + Sync>;

/// An asynchronous check over a single value
#[derive(Clone)]
pub struct AsyncValidator {
    check: AsyncCheckFn,
}

impl fmt::Debug for AsyncValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AsyncValidator")
            .field("check", &"<async check>")
            .finish()
    }
}

impl AsyncValidator {
    pub fn new<F, Fut>(check: F) -> Self
    where
        F: Fn(Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ValidationResult<()>> + Send + 'static,
    {
        Self {
            check: Arc::new(move |value| Box::pin(check(value))),
        }
    }

    /// Build from an async boolean predicate; failures carry `message`
    pub fn from_predicate<F, Fut, S>(predicate: F, message: S) -> Self
    where
        F: Fn(Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = bool> + Send + 'static,
        S: Into<String>,
    {
        let message = message.into();
        Self::new(move |value| {
            let passed = predicate(value);
            let message = message.clone();
            async move {
                if passed.await {
                    Ok(())
                } else {
                    Err(ValidationError::Custom(message))
                }
            }
        })
    }

    pub async fn validate(&self, value: &Value) -> ValidationResult<()> {
        (self.check)(value.clone()).await
    }
}

/// A field's synchronous rules plus an optional async check
#[derive(Debug, Clone)]
pub struct AsyncField {
    rules: Validator,
    check: Option<AsyncValidator>,
}

impl AsyncField {
    pub fn new<V: Into<Validator>>(rules: V) -> Self {
        Self {
            rules: rules.into(),
            check: None,
        }
    }

    pub fn with_check(mut self, check: AsyncValidator) -> Self {
        self.check = Some(check);
        self
    }

    /// Synchronous rules first; the async check runs only when they pass
    /// and the value is present and non-null.
    pub async fn validate(&self, value: Option<&Value>) -> ValidationResult<()> {
        self.rules.validate_optional(value)?;

        if let (Some(check), Some(present)) = (&self.check, value) {
            if !present.is_null() {
                check.validate(present).await?;
            }
        }

        Ok(())
    }
}

impl From<Validator> for AsyncField {
    fn from(rules: Validator) -> Self {
        Self::new(rules)
    }
}

/// Schema whose fields validate concurrently
#[derive(Debug, Clone, Default)]
pub struct AsyncSchema {
    fields: BTreeMap<String, AsyncField>,
    strict: bool,
}

impl AsyncSchema {
    pub fn builder() -> AsyncSchemaBuilder {
        AsyncSchemaBuilder::default()
    }

    /// Validate a payload, running every field's check concurrently and
    /// aggregating failures by field name.
    pub async fn validate(&self, data: &Value) -> ValidationResult<()> {
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

        let checks = self.fields.iter().map(|(name, field)| async move {
            (name.as_str(), field.validate(map.get(name)).await)
        });

        for (name, outcome) in join_all(checks).await {
            if let Err(error) = outcome {
                errors.insert(name.to_string(), error);
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
}

/// Builder for [`AsyncSchema`]
#[derive(Debug, Clone, Default)]
pub struct AsyncSchemaBuilder {
    fields: BTreeMap<String, AsyncField>,
    strict: bool,
}

impl AsyncSchemaBuilder {
    /// Declare a field validated by synchronous rules only
    pub fn field<S, V>(mut self, name: S, rules: V) -> Self
    where
        S: Into<String>,
        V: Into<Validator>,
    {
        self.fields.insert(name.into(), AsyncField::new(rules));
        self
    }

    /// Declare a field with synchronous rules and an async check
    pub fn field_with_check<S, V>(mut self, name: S, rules: V, check: AsyncValidator) -> Self
    where
        S: Into<String>,
        V: Into<Validator>,
    {
        self.fields
            .insert(name.into(), AsyncField::new(rules).with_check(check));
        self
    }

    /// Reject keys not declared in the schema
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn build(self) -> AsyncSchema {
        AsyncSchema {
            fields: self.fields,
            strict: self.strict,
        }
    }
}
