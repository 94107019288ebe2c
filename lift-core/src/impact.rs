//! Expected measurable impact of a recommended test.

use serde::{Deserialize, Serialize};

use crate::types::{CalculationResult, ExperimentInputs};

/// What the recommended budget is expected to produce if the true lift equals the MDE.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpectedImpact {
    /// Conversions bought by the recommended budget
    pub total_conversions: f64,
    pub control_conversions: f64,
    pub treatment_conversions: f64,
    pub incremental_conversions: f64,
    /// Incremental conversions that become qualified
    pub incremental_qualified: f64,
    /// Incremental budget per incremental qualified conversion
    pub cost_per_incremental_qualified: Option<f64>,
}

impl ExpectedImpact {
    pub fn estimate(inputs: &ExperimentInputs, result: &CalculationResult) -> Self {
        let total_conversions = result.recommended_budget / inputs.cost_per_conversion;
        let control_conversions = total_conversions / 2.0;
        let treatment_conversions = control_conversions * (1.0 + inputs.mde);
        let incremental_conversions = treatment_conversions - control_conversions;
        let incremental_qualified = incremental_conversions * inputs.conversion_rate;

        let cost_per_incremental_qualified = (incremental_qualified > 0.0
            && result.window.incremental_budget > 0.0)
            .then(|| result.window.incremental_budget / incremental_qualified);

        Self {
            total_conversions,
            control_conversions,
            treatment_conversions,
            incremental_conversions,
            incremental_qualified,
            cost_per_incremental_qualified,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculator::calculate;

    #[test]
    fn test_impact_split() {
        let inputs = ExperimentInputs {
            monthly_spend: 10_000.0,
            cost_per_conversion: 500.0,
            conversion_rate: 0.5,
            mde: 0.20,
            test_duration_weeks: 2,
            cap_enabled: true,
            cap_multiplier: 4.0,
            ..ExperimentInputs::default()
        };
        let result = calculate(&inputs).unwrap();
        assert_eq!(result.recommended_budget, 40_000.0);

        let impact = ExpectedImpact::estimate(&inputs, &result);
        assert!((impact.total_conversions - 80.0).abs() < 1e-9);
        assert!((impact.control_conversions - 40.0).abs() < 1e-9);
        assert!((impact.treatment_conversions - 48.0).abs() < 1e-9);
        assert!((impact.incremental_conversions - 8.0).abs() < 1e-9);
        assert!((impact.incremental_qualified - 4.0).abs() < 1e-9);

        let expected_cost = result.window.incremental_budget / 4.0;
        let cost = impact.cost_per_incremental_qualified.unwrap();
        assert!((cost - expected_cost).abs() < 1e-6);
    }

    #[test]
    fn test_no_cost_when_no_incremental_budget() {
        let inputs = ExperimentInputs {
            monthly_spend: 10_000.0,
            cost_per_conversion: 1.0,
            conversion_rate: 1.0,
            test_duration_weeks: 16,
            ..ExperimentInputs::default()
        };
        let result = calculate(&inputs).unwrap();
        assert_eq!(result.window.incremental_budget, 0.0);

        let impact = ExpectedImpact::estimate(&inputs, &result);
        assert!(impact.cost_per_incremental_qualified.is_none());
    }
}
