//! Calculation errors.

use lift_common::ValidationError;
use thiserror::Error;

/// Why a calculation request could not produce a result.
///
/// Both kinds are terminal for the request; callers fix the inputs and
/// submit a new calculation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalcError {
    /// An input lies outside its declared domain.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The effect size resolves to zero lift, so no finite sample size exists.
    #[error(
        "Minimum detectable effect must be nonzero: mde {mde} on baseline rate {baseline_rate} produces no detectable lift"
    )]
    DegenerateEffect { mde: f64, baseline_rate: f64 },
}

impl CalcError {
    /// Stable machine-readable code.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::DegenerateEffect { .. } => "DEGENERATE_EFFECT",
        }
    }

    /// The offending input field, if the error names one.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::Validation(e) => e.field(),
            Self::DegenerateEffect { .. } => Some("mde"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_passes_through() {
        let err: CalcError = ValidationError::invalid("power", "must be in (0, 1), got 1.2").into();
        assert_eq!(err.code(), "VALIDATION_ERROR");
        assert_eq!(err.field(), Some("power"));
        assert_eq!(
            err.to_string(),
            "Invalid value for power: must be in (0, 1), got 1.2"
        );
    }

    #[test]
    fn test_degenerate_effect_message() {
        let err = CalcError::DegenerateEffect {
            mde: 0.0,
            baseline_rate: 0.05,
        };
        assert_eq!(err.code(), "DEGENERATE_EFFECT");
        assert_eq!(err.field(), Some("mde"));
        assert!(err.to_string().contains("must be nonzero"));
    }
}
