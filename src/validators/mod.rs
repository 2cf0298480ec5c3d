//! Validator variants and the shared evaluation pipeline
//!
//! Every variant runs the same check sequence (required, nullable, type,
//! variant rules, custom check), implemented once in [`evaluate`] and
//! parameterized by the variant's [`RuleSet`]. The [`Validator`] enum is the
//! closed set of variants a schema can hold.

mod array;
mod boolean;
mod custom;
mod date;
mod number;
mod object;
mod string;

pub use array::ArrayValidator;
pub use boolean::BooleanValidator;
pub use custom::CustomValidator;
pub use date::DateValidator;
pub use number::NumberValidator;
pub use object::ObjectValidator;
pub use string::StringValidator;

pub(crate) use object::{collect_unknown_fields, validate_fields};

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::errors::{ValidationError, ValidationResult};

/// User-supplied check run after the built-in rules pass
pub type CustomCheck = Arc<dyn Fn(&Value) -> ValidationResult<()> + Send + Sync>;

/// Rules shared by every validator variant
#[derive(Clone)]
pub struct CommonRules {
    pub(crate) required: bool,
    pub(crate) nullable: bool,
    pub(crate) custom_check: Option<CustomCheck>,
    pub(crate) error_override: Option<String>,
}

impl Default for CommonRules {
    fn default() -> Self {
        Self {
            required: true,
            nullable: false,
            custom_check: None,
            error_override: None,
        }
    }
}

impl fmt::Debug for CommonRules {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommonRules")
            .field("required", &self.required)
            .field("nullable", &self.nullable)
            .field("custom_check", &self.custom_check.is_some())
            .field("error_override", &self.error_override)
            .finish()
    }
}

/// Variant-specific hooks the shared pipeline dispatches to
pub(crate) trait RuleSet {
    fn common(&self) -> &CommonRules;

    /// Type check plus variant rules, in the variant's fixed order; the
    /// first failing rule wins. Returns the normalized value when the
    /// variant coerces its input (whitespace trim, boolean or date
    /// coercion), so the custom check sees what the rules validated.
    fn check(&self, value: &Value) -> ValidationResult<Option<Value>>;
}

/// The common check pipeline, shared by all variants.
///
/// `None` means the field was absent from the input, which is distinct from
/// an explicit null. A nullable null passes immediately without running the
/// custom check. A configured override message replaces any failure.
pub(crate) fn evaluate<R: RuleSet + ?Sized>(
    rules: &R,
    value: Option<&Value>,
) -> ValidationResult<()> {
    let common = rules.common();

    let outcome = match value {
        None if common.required => Err(ValidationError::Required),
        None => Ok(()),
        Some(Value::Null) if common.nullable => Ok(()),
        Some(Value::Null) => Err(ValidationError::NullNotAllowed),
        Some(present) => rules.check(present).and_then(|coerced| {
            match &common.custom_check {
                Some(check) => check(coerced.as_ref().unwrap_or(present)),
                None => Ok(()),
            }
        }),
    };

    match (&common.error_override, outcome) {
        (Some(message), Err(_)) => Err(ValidationError::Custom(message.clone())),
        (_, outcome) => outcome,
    }
}

/// Closed set of validator variants.
///
/// Composite variants (object, array) own their nested validators through
/// this enum, so arbitrarily deep schemas are plain values.
#[derive(Debug, Clone)]
pub enum Validator {
    String(StringValidator),
    Number(NumberValidator),
    Boolean(BooleanValidator),
    Date(DateValidator),
    Object(ObjectValidator),
    Array(ArrayValidator),
    Custom(CustomValidator),
}

impl Validator {
    /// Validate a present value
    pub fn validate(&self, value: &Value) -> ValidationResult<()> {
        self.validate_optional(Some(value))
    }

    /// Validate a field that may be absent (`None` means the key was
    /// missing from the input mapping)
    pub fn validate_optional(&self, value: Option<&Value>) -> ValidationResult<()> {
        evaluate(self.rules(), value)
    }

    fn rules(&self) -> &dyn RuleSet {
        match self {
            Validator::String(v) => v,
            Validator::Number(v) => v,
            Validator::Boolean(v) => v,
            Validator::Date(v) => v,
            Validator::Object(v) => v,
            Validator::Array(v) => v,
            Validator::Custom(v) => v,
        }
    }
}

impl From<StringValidator> for Validator {
    fn from(validator: StringValidator) -> Self {
        Validator::String(validator)
    }
}

impl From<NumberValidator> for Validator {
    fn from(validator: NumberValidator) -> Self {
        Validator::Number(validator)
    }
}

impl From<BooleanValidator> for Validator {
    fn from(validator: BooleanValidator) -> Self {
        Validator::Boolean(validator)
    }
}

impl From<DateValidator> for Validator {
    fn from(validator: DateValidator) -> Self {
        Validator::Date(validator)
    }
}

impl From<ObjectValidator> for Validator {
    fn from(validator: ObjectValidator) -> Self {
        Validator::Object(validator)
    }
}

impl From<ArrayValidator> for Validator {
    fn from(validator: ArrayValidator) -> Self {
        Validator::Array(validator)
    }
}

impl From<CustomValidator> for Validator {
    fn from(validator: CustomValidator) -> Self {
        Validator::Custom(validator)
    }
}
