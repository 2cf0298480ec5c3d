//! Date and datetime validation
//!
//! In the JSON value model dates arrive as strings, so `allow_strings`
//! defaults to true; turning it off makes every non-null input fail the
//! type check. Parsed timestamps are normalized to `NaiveDateTime`, with
//! date-only input promoted to midnight.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value;

use crate::errors::{ValidationError, ValidationResult};

use super::{evaluate, CommonRules, RuleSet};

const TYPE_MESSAGE: &str = "Value must be a date or datetime";
const CANONICAL_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Validates date/datetime strings against parse and range rules
#[derive(Debug, Clone)]
pub struct DateValidator {
    common: CommonRules,
    min_value: Option<NaiveDateTime>,
    max_value: Option<NaiveDateTime>,
    format: Option<String>,
    allow_strings: bool,
}

impl Default for DateValidator {
    fn default() -> Self {
        Self {
            common: CommonRules::default(),
            min_value: None,
            max_value: None,
            format: None,
            allow_strings: true,
        }
    }
}

impl DateValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Earliest accepted timestamp, inclusive
    pub fn min_value(mut self, min: NaiveDateTime) -> Self {
        self.min_value = Some(min);
        self
    }

    /// Latest accepted timestamp, inclusive
    pub fn max_value(mut self, max: NaiveDateTime) -> Self {
        self.max_value = Some(max);
        self
    }

    /// Earliest accepted date, inclusive (midnight of `min`)
    pub fn min_date(self, min: NaiveDate) -> Self {
        match min.and_hms_opt(0, 0, 0) {
            Some(datetime) => self.min_value(datetime),
            None => self,
        }
    }

    /// Latest accepted date, inclusive (midnight of `max`)
    pub fn max_date(self, max: NaiveDate) -> Self {
        match max.and_hms_opt(0, 0, 0) {
            Some(datetime) => self.max_value(datetime),
            None => self,
        }
    }

    /// Parse input with a chrono format string instead of ISO-8601
    pub fn format<S: Into<String>>(mut self, format: S) -> Self {
        self.format = Some(format.into());
        self
    }

    /// Enable or disable string→date coercion (enabled by default)
    pub fn allow_strings(mut self, allow: bool) -> Self {
        self.allow_strings = allow;
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

    /// Additional check run after parsing; it receives the canonical
    /// "%Y-%m-%dT%H:%M:%S" rendering of the parsed timestamp
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

/// Parse with an explicit chrono format; a date-only format is promoted
/// to midnight.
fn parse_with_format(text: &str, format: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(text, format).ok().or_else(|| {
        NaiveDate::parse_from_str(text, format)
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
    })
}

/// Generic ISO-8601 parse: RFC 3339 first (handles a trailing "Z" or a
/// numeric UTC offset), then offset-less datetime forms, then a bare date.
fn parse_iso(text: &str) -> Option<NaiveDateTime> {
    DateTime::parse_from_rfc3339(text)
        .ok()
        .map(|datetime| datetime.naive_utc())
        .or_else(|| NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f").ok())
        .or_else(|| NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S%.f").ok())
        .or_else(|| {
            NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

impl RuleSet for DateValidator {
    fn common(&self) -> &CommonRules {
        &self.common
    }

    fn check(&self, value: &Value) -> ValidationResult<Option<Value>> {
        let text = match value {
            Value::String(s) => s,
            _ => return Err(ValidationError::InvalidType(TYPE_MESSAGE.to_string())),
        };

        if !self.allow_strings {
            return Err(ValidationError::InvalidType(TYPE_MESSAGE.to_string()));
        }

        // A parse failure is terminal; it does not fall through to the
        // type check.
        let parsed = match &self.format {
            Some(format) => parse_with_format(text, format),
            None => parse_iso(text),
        }
        .ok_or(ValidationError::InvalidDateFormat)?;

        if let Some(min) = self.min_value {
            if parsed < min {
                return Err(ValidationError::OutOfRange(format!(
                    "Date must be at least {}",
                    min.format(CANONICAL_FORMAT)
                )));
            }
        }

        if let Some(max) = self.max_value {
            if parsed > max {
                return Err(ValidationError::OutOfRange(format!(
                    "Date must be at most {}",
                    max.format(CANONICAL_FORMAT)
                )));
            }
        }

        Ok(Some(Value::String(
            parsed.format(CANONICAL_FORMAT).to_string(),
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn datetime(text: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S").unwrap()
    }

    #[test]
    fn test_iso_forms_parse() {
        let validator = DateValidator::new();
        assert!(validator.validate(&json!("2024-01-15")).is_ok());
        assert!(validator.validate(&json!("2024-01-15T10:30:00")).is_ok());
        assert!(validator.validate(&json!("2024-01-15 10:30:00")).is_ok());
        assert!(validator.validate(&json!("2024-01-15T10:30:00.250")).is_ok());
    }

    #[test]
    fn test_trailing_z_is_utc() {
        let validator = DateValidator::new().min_value(datetime("2024-01-15T10:00:00"));
        assert!(validator.validate(&json!("2024-01-15T10:30:00Z")).is_ok());
        assert!(validator.validate(&json!("2024-01-15T09:30:00Z")).is_err());
    }

    #[test]
    fn test_parse_failure_is_terminal() {
        let validator = DateValidator::new();
        assert_eq!(
            validator.validate(&json!("not a date")),
            Err(ValidationError::InvalidDateFormat)
        );
        assert_eq!(
            validator.validate(&json!("2024-13-45")),
            Err(ValidationError::InvalidDateFormat)
        );
    }

    #[test]
    fn test_custom_format() {
        let validator = DateValidator::new().format("%d/%m/%Y");
        assert!(validator.validate(&json!("15/01/2024")).is_ok());
        assert_eq!(
            validator.validate(&json!("2024-01-15")),
            Err(ValidationError::InvalidDateFormat)
        );
    }

    #[test]
    fn test_non_string_fails_type_check() {
        let validator = DateValidator::new();
        assert_eq!(
            validator.validate(&json!(1705312200)),
            Err(ValidationError::InvalidType(
                "Value must be a date or datetime".to_string()
            ))
        );
    }

    #[test]
    fn test_allow_strings_disabled_rejects_strings() {
        let validator = DateValidator::new().allow_strings(false);
        assert_eq!(
            validator.validate(&json!("2024-01-15")),
            Err(ValidationError::InvalidType(
                "Value must be a date or datetime".to_string()
            ))
        );
    }

    #[test]
    fn test_range_bounds_inclusive() {
        let validator = DateValidator::new()
            .min_date(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
            .max_date(NaiveDate::from_ymd_opt(2024, 12, 31).unwrap());

        assert!(validator.validate(&json!("2024-01-01")).is_ok());
        assert!(validator.validate(&json!("2024-06-15")).is_ok());

        let early = validator.validate(&json!("2023-12-31"));
        assert!(early.unwrap_err().to_string().starts_with("Date must be at least"));

        let late = validator.validate(&json!("2025-01-01"));
        assert!(late.unwrap_err().to_string().starts_with("Date must be at most"));
    }

    #[test]
    fn test_custom_check_sees_canonical_form() {
        let validator = DateValidator::new().custom_check(|value| {
            if value.as_str() == Some("2024-01-15T00:00:00") {
                Ok(())
            } else {
                Err(ValidationError::custom("unexpected canonical form"))
            }
        });

        assert!(validator.validate(&json!("2024-01-15")).is_ok());
    }

    #[test]
    fn test_nullable_short_circuit() {
        let validator = DateValidator::new().nullable(true);
        assert!(validator.validate(&Value::Null).is_ok());
    }
}
