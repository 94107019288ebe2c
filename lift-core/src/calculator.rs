//! The single calculation entry point.

use lift_common::Validate;

use crate::budget::BudgetEstimator;
use crate::error::CalcError;
use crate::power::PowerAnalyzer;
use crate::types::{CalculationResult, ExperimentInputs};

/// Compute the required sample size and budget recommendation for one request.
///
/// Inputs are validated first and the first out-of-domain field is reported.
/// A zero effect passes validation and fails as [`CalcError::DegenerateEffect`].
pub fn calculate(inputs: &ExperimentInputs) -> Result<CalculationResult, CalcError> {
    inputs.validate()?;

    let analysis =
        PowerAnalyzer::analyze(inputs.baseline_rate, inputs.mde, inputs.power, inputs.p_value)?;
    let result = BudgetEstimator::estimate(analysis.required_sample_size, inputs)?;

    tracing::debug!(
        channel = %inputs.channel,
        mde = inputs.mde,
        power = inputs.power,
        p_value = inputs.p_value,
        z_alpha = analysis.z_alpha,
        z_beta = analysis.z_beta,
        sample_size = result.required_sample_size,
        required_budget = result.required_budget,
        recommended_budget = result.recommended_budget,
        binding = ?result.binding,
        "Calculated test budget"
    );

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BindingConstraint;

    fn reference_inputs() -> ExperimentInputs {
        ExperimentInputs {
            monthly_spend: 10_000.0,
            cost_per_conversion: 600.0,
            conversion_rate: 1.0,
            baseline_rate: 0.05,
            mde: 0.20,
            power: 0.80,
            p_value: 0.05,
            cap_enabled: true,
            cap_multiplier: 5.0,
            ..ExperimentInputs::default()
        }
    }

    #[test]
    fn test_reference_scenario_capped() {
        let result = calculate(&reference_inputs()).unwrap();
        assert!(result.required_budget > 50_000.0);
        assert_eq!(result.recommended_budget, 50_000.0);
        assert!(result.is_capped);
        assert_eq!(result.binding, BindingConstraint::Cap);
    }

    #[test]
    fn test_reference_scenario_uncapped() {
        let inputs = ExperimentInputs {
            cap_enabled: false,
            ..reference_inputs()
        };
        let result = calculate(&inputs).unwrap();
        assert_eq!(result.recommended_budget, result.required_budget);
        assert!(!result.is_capped);
    }

    #[test]
    fn test_zero_mde_is_degenerate() {
        let inputs = ExperimentInputs {
            mde: 0.0,
            ..reference_inputs()
        };
        assert!(matches!(
            calculate(&inputs),
            Err(CalcError::DegenerateEffect { .. })
        ));
    }

    #[test]
    fn test_validation_precedes_degenerate_check() {
        let inputs = ExperimentInputs {
            mde: 0.0,
            monthly_spend: 0.0,
            ..reference_inputs()
        };
        let err = calculate(&inputs).unwrap_err();
        assert_eq!(err.field(), Some("monthly_spend"));
    }

    #[test]
    fn test_channel_does_not_affect_arithmetic() {
        let youtube = calculate(&reference_inputs()).unwrap();
        let linkedin = calculate(&ExperimentInputs {
            channel: crate::types::Channel::LinkedIn,
            ..reference_inputs()
        })
        .unwrap();
        assert_eq!(youtube.required_budget, linkedin.required_budget);
        assert_eq!(youtube.recommended_budget, linkedin.recommended_budget);
    }

    #[test]
    fn test_explanation_mentions_binding() {
        let capped = calculate(&reference_inputs()).unwrap();
        assert!(capped.explanation().starts_with("Capped"));

        let uncapped = calculate(&ExperimentInputs {
            cap_enabled: false,
            ..reference_inputs()
        })
        .unwrap();
        assert!(uncapped.explanation().starts_with("Uncapped"));
    }
}
