//! String validation
//!
//! Length bounds are counted in Unicode scalar values, and the optional
//! whitespace trim runs before every other rule.

use std::sync::Arc;

use regex::Regex;
use serde_json::Value;

use crate::cache::RegexCache;
use crate::errors::{ValidationError, ValidationResult};

use super::{evaluate, CommonRules, RuleSet};

/// Validates JSON strings against length, pattern, and membership rules
#[derive(Debug, Clone, Default)]
pub struct StringValidator {
    common: CommonRules,
    min_length: Option<usize>,
    max_length: Option<usize>,
    pattern: Option<CompiledPattern>,
    allowed_values: Option<Vec<String>>,
    trim_whitespace: bool,
}

#[derive(Debug, Clone)]
struct CompiledPattern {
    /// Pattern as supplied, used in failure messages
    source: String,
    regex: Regex,
}

/// Anchor a pattern at the start of the subject without otherwise changing
/// its meaning (top-level alternations stay grouped).
fn anchored(pattern: &str) -> String {
    format!("^(?:{})", pattern)
}

impl StringValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Minimum length in characters, inclusive
    pub fn min_length(mut self, min: usize) -> Self {
        self.min_length = Some(min);
        self
    }

    /// Maximum length in characters, inclusive
    pub fn max_length(mut self, max: usize) -> Self {
        self.max_length = Some(max);
        self
    }

    /// Require the string to match `pattern` from its start.
    ///
    /// Matching is prefix-anchored: the pattern must match at position 0 but
    /// need not consume the whole string. Append `$` for a full match. The
    /// pattern compiles eagerly, so a malformed pattern fails here rather
    /// than during validation.
    pub fn pattern(mut self, pattern: &str) -> ValidationResult<Self> {
        let regex = Regex::new(&anchored(pattern))
            .map_err(|e| ValidationError::InvalidPattern(e.to_string()))?;
        self.pattern = Some(CompiledPattern {
            source: pattern.to_string(),
            regex,
        });
        Ok(self)
    }

    /// Same as [`StringValidator::pattern`], but compiled through `cache` so
    /// repeated schema constructions reuse one compiled instance.
    pub fn pattern_cached(mut self, pattern: &str, cache: &RegexCache) -> ValidationResult<Self> {
        let regex = cache.get_or_compile(&anchored(pattern))?;
        self.pattern = Some(CompiledPattern {
            source: pattern.to_string(),
            regex: regex.as_ref().clone(),
        });
        Ok(self)
    }

    /// Restrict the string to a closed set of values
    pub fn allowed_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_values = Some(values.into_iter().map(Into::into).collect());
        self
    }

    /// Strip leading/trailing whitespace before every check
    pub fn trim_whitespace(mut self, trim: bool) -> Self {
        self.trim_whitespace = trim;
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

    /// Additional check run after the built-in rules pass; it receives the
    /// trimmed string when `trim_whitespace` is set
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

impl RuleSet for StringValidator {
    fn common(&self) -> &CommonRules {
        &self.common
    }

    fn check(&self, value: &Value) -> ValidationResult<Option<Value>> {
        let raw = match value {
            Value::String(s) => s,
            _ => {
                return Err(ValidationError::InvalidType(
                    "Value must be a string".to_string(),
                ))
            }
        };

        let text = if self.trim_whitespace {
            raw.trim()
        } else {
            raw.as_str()
        };
        let length = text.chars().count();

        if let Some(min) = self.min_length {
            if length < min {
                return Err(ValidationError::TooShort(format!(
                    "String length must be at least {} characters",
                    min
                )));
            }
        }

        if let Some(max) = self.max_length {
            if length > max {
                return Err(ValidationError::TooLong(format!(
                    "String length must be at most {} characters",
                    max
                )));
            }
        }

        if matches!(self.min_length, Some(min) if min > 0) && length == 0 {
            return Err(ValidationError::Empty);
        }

        if let Some(pattern) = &self.pattern {
            if !pattern.regex.is_match(text) {
                return Err(ValidationError::PatternMismatch(pattern.source.clone()));
            }
        }

        if let Some(allowed) = &self.allowed_values {
            if !allowed.iter().any(|candidate| candidate == text) {
                return Err(ValidationError::NotAllowed(allowed.join(", ")));
            }
        }

        if self.trim_whitespace && text != raw.as_str() {
            Ok(Some(Value::String(text.to_string())))
        } else {
            Ok(None)
        }
    }
}
