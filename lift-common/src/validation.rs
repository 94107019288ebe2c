//! Configuration and input validation.
//!
//! Provides the validation error type shared by the configuration layer and
//! the calculator, plus range checks that name the offending field.

use thiserror::Error;

use crate::config::{CalculatorDefaults, Config, ObservabilityConfig, ServicesConfig};

/// Validation error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Configuration conflict: {reason}")]
    Conflict { reason: String },

    #[error("Multiple validation errors: {0:?}")]
    Multiple(Vec<ValidationError>),
}

impl ValidationError {
    /// Build an `InvalidValue` error.
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// The offending field, when the error is about a single field.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::MissingField { field } | Self::InvalidValue { field, .. } => Some(field),
            Self::Conflict { .. } | Self::Multiple(_) => None,
        }
    }
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Trait for validatable configuration sections and inputs.
pub trait Validate {
    /// Validate this value.
    fn validate(&self) -> ValidationResult<()>;
}

/// Require a finite value strictly greater than zero.
pub fn require_positive(field: &str, value: f64) -> ValidationResult<()> {
    if !value.is_finite() {
        return Err(ValidationError::invalid(field, format!("must be finite, got {value}")));
    }
    if value <= 0.0 {
        return Err(ValidationError::invalid(field, format!("must be greater than 0, got {value}")));
    }
    Ok(())
}

/// Require a finite value in the open interval (0, 1).
pub fn require_open_unit(field: &str, value: f64) -> ValidationResult<()> {
    if !value.is_finite() || value <= 0.0 || value >= 1.0 {
        return Err(ValidationError::invalid(field, format!("must be in (0, 1), got {value}")));
    }
    Ok(())
}

/// Require a finite value in the half-open interval (0, 1].
pub fn require_unit_rate(field: &str, value: f64) -> ValidationResult<()> {
    if !value.is_finite() || value <= 0.0 || value > 1.0 {
        return Err(ValidationError::invalid(field, format!("must be in (0, 1], got {value}")));
    }
    Ok(())
}

/// Require a finite value in the closed interval `[min, max]`.
pub fn require_in_range(field: &str, value: f64, min: f64, max: f64) -> ValidationResult<()> {
    if !value.is_finite() || value < min || value > max {
        return Err(ValidationError::invalid(
            field,
            format!("must be in [{min}, {max}], got {value}"),
        ));
    }
    Ok(())
}

/// Fold a list of section errors into a single result.
fn collect(mut errors: Vec<ValidationError>) -> ValidationResult<()> {
    if errors.is_empty() {
        Ok(())
    } else if errors.len() == 1 {
        Err(errors.remove(0))
    } else {
        Err(ValidationError::Multiple(errors))
    }
}

impl Config {
    /// Validate the entire configuration.
    pub fn validate(&self) -> ValidationResult<()> {
        let mut errors = Vec::new();

        if let Err(e) = self.observability.validate() {
            errors.push(e);
        }

        if let Err(e) = self.services.validate() {
            errors.push(e);
        }

        if let Err(e) = self.calculator.validate() {
            errors.push(e);
        }

        if self.network.bind.trim().is_empty() {
            errors.push(ValidationError::MissingField {
                field: "network.bind".into(),
            });
        }

        collect(errors)
    }

    /// Load and validate configuration.
    pub fn load_and_validate() -> anyhow::Result<Self> {
        let config = Self::load_with_env()?;
        config.validate().map_err(|e| anyhow::anyhow!("{}", e))?;
        Ok(config)
    }
}

impl Validate for ObservabilityConfig {
    fn validate(&self) -> ValidationResult<()> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.to_lowercase().as_str()) {
            return Err(ValidationError::InvalidValue {
                field: "observability.log_level".into(),
                reason: format!("must be one of: {}", valid_levels.join(", ")),
            });
        }

        let valid_formats = ["json", "pretty"];
        if !valid_formats.contains(&self.log_format.to_lowercase().as_str()) {
            return Err(ValidationError::InvalidValue {
                field: "observability.log_format".into(),
                reason: format!("must be one of: {}", valid_formats.join(", ")),
            });
        }

        Ok(())
    }
}

impl Validate for ServicesConfig {
    fn validate(&self) -> ValidationResult<()> {
        if self.api.port == Some(0) {
            return Err(ValidationError::InvalidValue {
                field: "services.api.port".into(),
                reason: "must be between 1 and 65535".into(),
            });
        }
        Ok(())
    }
}

impl Validate for CalculatorDefaults {
    fn validate(&self) -> ValidationResult<()> {
        let mut errors = Vec::new();
        let mut check = |result: ValidationResult<()>| {
            if let Err(e) = result {
                errors.push(e);
            }
        };

        check(require_open_unit("calculator.baseline_rate", self.baseline_rate));
        check(require_open_unit("calculator.mde", self.mde));
        check(require_open_unit("calculator.power", self.power));
        check(require_open_unit("calculator.p_value", self.p_value));
        check(require_unit_rate("calculator.conversion_rate", self.conversion_rate));
        if self.test_duration_weeks == 0 {
            check(Err(ValidationError::invalid(
                "calculator.test_duration_weeks",
                "must be at least 1",
            )));
        }
        check(require_in_range(
            "calculator.cap_multiplier",
            self.cap_multiplier,
            CalculatorDefaults::MIN_CAP_MULTIPLIER,
            CalculatorDefaults::MAX_CAP_MULTIPLIER,
        ));

        collect(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_valid_default_config() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_log_level() {
        let mut config = Config::default();
        config.observability.log_level = "invalid".into();
        let result = config.validate();
        assert!(result.is_err());
        if let Err(ValidationError::InvalidValue { field, .. }) = result {
            assert_eq!(field, "observability.log_level");
        }
    }

    #[test]
    fn test_zero_api_port() {
        let mut config = Config::default();
        config.services.api.port = Some(0);
        let err = config.validate().unwrap_err();
        assert_eq!(err.field(), Some("services.api.port"));
    }

    #[test]
    fn test_multiple_errors_collected() {
        let mut config = Config::default();
        config.observability.log_format = "xml".into();
        config.calculator.power = 1.5;
        config.calculator.cap_multiplier = 50.0;
        match config.validate() {
            Err(ValidationError::Multiple(errors)) => assert_eq!(errors.len(), 2),
            other => panic!("expected Multiple, got {other:?}"),
        }
    }

    #[test]
    fn test_calculator_defaults_collects_every_field() {
        let defaults = CalculatorDefaults {
            mde: 0.0,
            p_value: 1.0,
            test_duration_weeks: 0,
            ..CalculatorDefaults::default()
        };
        match defaults.validate() {
            Err(ValidationError::Multiple(errors)) => {
                let fields: Vec<_> = errors.iter().filter_map(|e| e.field()).collect();
                assert_eq!(
                    fields,
                    vec![
                        "calculator.mde",
                        "calculator.p_value",
                        "calculator.test_duration_weeks"
                    ]
                );
            }
            other => panic!("expected Multiple, got {other:?}"),
        }
    }

    #[test_case(0.5, true ; "inside")]
    #[test_case(0.0, false ; "zero")]
    #[test_case(1.0, false ; "one")]
    #[test_case(-0.2, false ; "negative")]
    #[test_case(f64::NAN, false ; "nan")]
    fn test_require_open_unit(value: f64, ok: bool) {
        assert_eq!(require_open_unit("power", value).is_ok(), ok);
    }

    #[test_case(1.0, true ; "one is allowed")]
    #[test_case(0.65, true ; "typical")]
    #[test_case(0.0, false ; "zero")]
    #[test_case(1.01, false ; "above one")]
    fn test_require_unit_rate(value: f64, ok: bool) {
        assert_eq!(require_unit_rate("conversion_rate", value).is_ok(), ok);
    }

    #[test_case(1.5, true ; "lower bound")]
    #[test_case(20.0, true ; "upper bound")]
    #[test_case(1.49, false ; "below")]
    #[test_case(20.5, false ; "above")]
    #[test_case(f64::INFINITY, false ; "infinite")]
    fn test_require_in_range(value: f64, ok: bool) {
        assert_eq!(require_in_range("cap_multiplier", value, 1.5, 20.0).is_ok(), ok);
    }

    #[test]
    fn test_require_positive_names_field() {
        let err = require_positive("monthly_spend", -10.0).unwrap_err();
        assert_eq!(err.field(), Some("monthly_spend"));
        assert!(err.to_string().contains("greater than 0"));
    }
}
