//! Per-field row validators.

use regex::Regex;

use crate::config::ValidatorConfig;
use crate::value::Value;

/// Outcome of validating one value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Validation {
    pub is_invalid: bool,
    pub message: String,
}

impl Validation {
    pub fn valid() -> Self {
        Self::default()
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self {
            is_invalid: true,
            message: message.into(),
        }
    }
}

/// A check applied to a field's value before a row is written.
#[derive(Debug, Clone)]
pub enum Validator {
    /// Value must be present and non-empty.
    Required,
    /// String length in characters must not exceed `max`.
    MaxLength { max: usize },
    /// Numeric value must fall within the bounds, inclusive.
    Range { min: Option<f64>, max: Option<f64> },
    /// String must match the regex.
    Pattern {
        regex: Regex,
        message: Option<String>,
    },
}

impl Validator {
    /// Build from configuration. A malformed pattern is reported as a message.
    pub fn from_config(config: &ValidatorConfig) -> Result<Self, String> {
        Ok(match config {
            ValidatorConfig::Required => Validator::Required,
            ValidatorConfig::MaxLength { max } => Validator::MaxLength { max: *max },
            ValidatorConfig::Range { min, max } => {
                if let (Some(lo), Some(hi)) = (min, max) {
                    if lo > hi {
                        return Err(format!("range minimum {lo} exceeds maximum {hi}"));
                    }
                }
                Validator::Range {
                    min: *min,
                    max: *max,
                }
            }
            ValidatorConfig::Pattern { pattern, message } => Validator::Pattern {
                regex: Regex::new(pattern).map_err(|e| e.to_string())?,
                message: message.clone(),
            },
        })
    }

    /// Validate a coerced value. `None` is an absent value.
    pub fn validate(&self, value: Option<&Value>) -> Validation {
        match self {
            Validator::Required => match value {
                None => Validation::invalid("a value is required"),
                Some(Value::Str(s)) if s.trim().is_empty() => {
                    Validation::invalid("a value is required")
                }
                Some(_) => Validation::valid(),
            },
            Validator::MaxLength { max } => match value {
                Some(Value::Str(s)) if s.chars().count() > *max => {
                    Validation::invalid(format!("must be at most {max} characters"))
                }
                _ => Validation::valid(),
            },
            Validator::Range { min, max } => {
                let Some(n) = value.and_then(Value::as_f64) else {
                    return Validation::valid();
                };
                match (min, max) {
                    (Some(lo), _) if n < *lo => Validation::invalid(range_message(*min, *max)),
                    (_, Some(hi)) if n > *hi => Validation::invalid(range_message(*min, *max)),
                    _ => Validation::valid(),
                }
            }
            Validator::Pattern { regex, message } => match value {
                Some(Value::Str(s)) if !s.is_empty() && !regex.is_match(s) => {
                    Validation::invalid(
                        message
                            .clone()
                            .unwrap_or_else(|| format!("must match '{}'", regex.as_str())),
                    )
                }
                _ => Validation::valid(),
            },
        }
    }
}

fn range_message(min: Option<f64>, max: Option<f64>) -> String {
    match (min, max) {
        (Some(lo), Some(hi)) => format!("must be between {lo} and {hi}"),
        (Some(lo), None) => format!("must be at least {lo}"),
        (None, Some(hi)) => format!("must be at most {hi}"),
        (None, None) => String::new(),
    }
}
