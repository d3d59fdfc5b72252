//! Configuration validation utilities and rules

use crate::RollcallError;
use std::fmt;

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Value is required but missing
    Required { field: String },
    /// Value is out of acceptable range
    OutOfRange {
        field: String,
        min: Option<f64>,
        max: Option<f64>,
        actual: f64,
    },
    /// Custom validation failed
    Custom { field: String, message: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::Required { field } => {
                write!(f, "Field '{field}' is required but missing")
            }
            ValidationError::OutOfRange {
                field,
                min,
                max,
                actual,
            } => {
                let range_desc = match (min, max) {
                    (Some(min), Some(max)) => format!("between {min} and {max}"),
                    (Some(min), None) => format!("at least {min}"),
                    (None, Some(max)) => format!("at most {max}"),
                    (None, None) => "in valid range".to_string(),
                };
                write!(f, "Field '{field}' must be {range_desc} (got {actual})")
            }
            ValidationError::Custom { field, message } => {
                write!(f, "Field '{field}': {message}")
            }
        }
    }
}

impl std::error::Error for ValidationError {}

impl From<ValidationError> for RollcallError {
    fn from(err: ValidationError) -> Self {
        RollcallError::invalid(err.to_string())
    }
}

/// Accumulates validation failures so one pass reports all of them.
#[derive(Debug, Default)]
pub struct ConfigValidator {
    errors: Vec<ValidationError>,
    field_prefix: String,
}

impl ConfigValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validator whose field names are prefixed with `section.`
    pub fn for_section(section: &str) -> Self {
        Self {
            errors: Vec::new(),
            field_prefix: section.to_string(),
        }
    }

    /// Validate that a string is present and non-blank
    pub fn non_empty(&mut self, field_name: &str, value: &str) -> &mut Self {
        if value.trim().is_empty() {
            self.errors.push(ValidationError::Required {
                field: self.full_field_name(field_name),
            });
        }
        self
    }

    /// Validate that a number is finite and within the inclusive range
    pub fn range<T>(&mut self, field_name: &str, value: T, min: Option<T>, max: Option<T>) -> &mut Self
    where
        T: PartialOrd + Copy + Into<f64>,
    {
        let actual: f64 = value.into();
        let below = min.is_some_and(|min| value < min);
        let above = max.is_some_and(|max| value > max);

        if !actual.is_finite() || below || above {
            self.errors.push(ValidationError::OutOfRange {
                field: self.full_field_name(field_name),
                min: min.map(Into::into),
                max: max.map(Into::into),
                actual,
            });
        }
        self
    }

    /// Record a custom failure when `ok` is false
    pub fn check(&mut self, field_name: &str, ok: bool, message: impl Into<String>) -> &mut Self {
        if !ok {
            self.errors.push(ValidationError::Custom {
                field: self.full_field_name(field_name),
                message: message.into(),
            });
        }
        self
    }

    /// Merge errors collected by a nested validator
    pub fn absorb(&mut self, other: ConfigValidator) -> &mut Self {
        self.errors.extend(other.errors);
        self
    }

    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// Fold accumulated errors into a single result
    pub fn finish(self) -> Result<(), RollcallError> {
        if self.errors.is_empty() {
            return Ok(());
        }
        let joined = self
            .errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        Err(RollcallError::invalid(joined))
    }

    fn full_field_name(&self, field_name: &str) -> String {
        if self.field_prefix.is_empty() {
            field_name.to_string()
        } else {
            format!("{}.{}", self.field_prefix, field_name)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_rejects_out_of_bounds_and_nan() {
        let mut validator = ConfigValidator::for_section("matching");
        validator
            .range("face", 1.5f32, Some(0.0), Some(1.0))
            .range("fingerprint", f32::NAN, Some(0.0), Some(1.0))
            .range("ok", 0.5f32, Some(0.0), Some(1.0));

        assert_eq!(validator.errors().len(), 2);
        let message = validator.finish().unwrap_err().to_string();
        assert!(message.contains("matching.face"));
        assert!(message.contains("matching.fingerprint"));
    }

    #[test]
    fn test_absorb_nested_sections() {
        let mut zone = ConfigValidator::for_section("zone");
        zone.non_empty("name", "  ");

        let mut root = ConfigValidator::new();
        root.absorb(zone);
        assert_eq!(
            root.errors(),
            &[ValidationError::Required {
                field: "zone.name".to_string()
            }]
        );
    }
}
