//! # Schema Validation
//!
//! Schema-based validation for JSON values. Validators for the common
//! JSON shapes compose into whole-object schemas that check every field
//! in one pass and report every failure at once, instead of stopping at
//! the first.
//!
//! ## Features
//!
//! - Typed validators for strings, numbers, booleans, dates, objects, and arrays
//! - Whole-object schemas that aggregate failures per field
//! - Custom checks, synchronous and async, running after the built-in rules
//! - A process-wide regex cache and per-validator LRU result caching
//! - Path-aware validation context with per-field timing metrics
//!
//! ## Example
//!
//! ```
//! use schema_validation::{NumberValidator, Schema, StringValidator};
//! use serde_json::json;
//!
//! let schema = Schema::builder()
//!     .field("username", StringValidator::new().min_length(3).max_length(20))
//!     .field("age", NumberValidator::new().integer_only(true).min_value(0.0))
//!     .build();
//!
//! assert!(schema.validate(&json!({"username": "ada", "age": 36})).is_ok());
//! assert!(schema.validate(&json!({"username": "x", "age": -1})).is_err());
//! ```

pub mod async_schema;
pub mod validators;

mod cache;
mod context;
mod errors;
mod logging;
mod monitoring;
mod schema;

pub use async_schema::{AsyncField, AsyncSchema, AsyncSchemaBuilder, AsyncValidator};
pub use cache::{
    regex_cache, CacheInfo, CachedValidator, RegexCache, DEFAULT_RESULT_CACHE_CAPACITY,
};
pub use context::{PathGuard, ValidationContext};
pub use errors::{FieldErrors, ItemError, ItemErrors, ValidationError, ValidationResult};
pub use logging::{init_logging, LoggingConfig};
pub use monitoring::{FieldStats, MetricsSummary, ValidationMetrics};
pub use schema::{Schema, SchemaBuilder};
pub use validators::{
    ArrayValidator, BooleanValidator, CustomValidator, DateValidator, NumberValidator,
    ObjectValidator, StringValidator, Validator,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Commonly used types, importable in one line
pub mod prelude {
    pub use crate::async_schema::{AsyncField, AsyncSchema, AsyncValidator};
    pub use crate::errors::{ValidationError, ValidationResult};
    pub use crate::schema::{Schema, SchemaBuilder};
    pub use crate::validators::{
        ArrayValidator, BooleanValidator, CustomValidator, DateValidator, NumberValidator,
        ObjectValidator, StringValidator, Validator,
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_end_to_end_nested_schema() {
        let schema = Schema::builder()
            .field("username", StringValidator::new().min_length(3))
            .field(
                "profile",
                ObjectValidator::new()
                    .field("age", NumberValidator::new().integer_only(true).min_value(0.0))
                    .field("tags", ArrayValidator::new()
                        .item_validator(StringValidator::new().min_length(1))
                        .unique(true)
                        .required(false)),
            )
            .strict(true)
            .build();

        let valid = json!({
            "username": "ada",
            "profile": {"age": 36, "tags": ["admin", "ops"]}
        });
        assert!(schema.validate(&valid).is_ok());

        let invalid = json!({
            "username": "ada",
            "profile": {"age": -1},
            "extra": true
        });
        match schema.validate(&invalid) {
            Err(ValidationError::Fields(errors)) => {
                let messages = errors.messages();
                assert_eq!(messages.get("extra"), Some(&"Unexpected field".to_string()));
                assert!(messages.get("profile").is_some());
            }
            other => panic!("expected field errors, got {:?}", other),
        }
    }
}
