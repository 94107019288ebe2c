//! Budget estimation and cap policy.
//!
//! Turns a required sample size into a spend recommendation. The cap bounds
//! the recommendation relative to current monthly spend; the floor keeps it
//! from ever dropping below current spend.

use lift_common::validation::{require_in_range, require_positive, require_unit_rate};
use lift_common::{CalculatorDefaults, ValidationError, ValidationResult};
use serde::{Deserialize, Serialize};

use crate::error::CalcError;
use crate::types::{
    BindingConstraint, CalculationResult, ExperimentInputs, Feasibility, TestWindow,
};

/// Average number of weeks in a month.
pub const WEEKS_PER_MONTH: f64 = 4.33;

// ============================================================================
// Cap Policy
// ============================================================================

/// Upper bound on the recommended budget relative to monthly spend.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum CapPolicy {
    Disabled,
    Multiplier { max: f64 },
}

/// Result of applying the cap policy to a budget.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CapOutcome {
    pub recommended_budget: f64,
    pub is_capped: bool,
    pub binding: BindingConstraint,
}

impl CapPolicy {
    /// Build a policy from the raw cap inputs.
    ///
    /// The multiplier is only checked against [1.5, 20] when capping is enabled.
    pub fn from_inputs(enabled: bool, multiplier: f64) -> ValidationResult<Self> {
        if !enabled {
            return Ok(Self::Disabled);
        }
        require_in_range(
            "cap_multiplier",
            multiplier,
            CalculatorDefaults::MIN_CAP_MULTIPLIER,
            CalculatorDefaults::MAX_CAP_MULTIPLIER,
        )?;
        Ok(Self::Multiplier { max: multiplier })
    }

    /// Apply the cap, then the baseline floor.
    ///
    /// Idempotent: feeding `recommended_budget` back in yields the same budget.
    pub fn apply(&self, required_budget: f64, monthly_spend: f64) -> CapOutcome {
        let mut outcome = match *self {
            Self::Multiplier { max } if required_budget / monthly_spend > max => CapOutcome {
                recommended_budget: monthly_spend * max,
                is_capped: true,
                binding: BindingConstraint::Cap,
            },
            _ => CapOutcome {
                recommended_budget: required_budget,
                is_capped: false,
                binding: BindingConstraint::Statistical,
            },
        };

        if required_budget < monthly_spend {
            outcome = CapOutcome {
                recommended_budget: monthly_spend,
                is_capped: false,
                binding: BindingConstraint::BaselineFloor,
            };
        }

        outcome
    }
}

// ============================================================================
// Budget Estimator
// ============================================================================

/// Translates a required sample size into a budget recommendation.
#[derive(Debug, Clone, Copy, Default)]
pub struct BudgetEstimator;

impl BudgetEstimator {
    /// Total spend needed to buy `sample_size` qualified conversions.
    pub fn required_budget(sample_size: u64, cost_per_conversion: f64, conversion_rate: f64) -> f64 {
        sample_size as f64 * cost_per_conversion / conversion_rate
    }

    /// Produce the full result for a sample size and the request's economics.
    pub fn estimate(
        required_sample_size: u64,
        inputs: &ExperimentInputs,
    ) -> Result<CalculationResult, CalcError> {
        require_positive("monthly_spend", inputs.monthly_spend)?;
        require_positive("cost_per_conversion", inputs.cost_per_conversion)?;
        if inputs.test_duration_weeks == 0 {
            return Err(ValidationError::invalid("test_duration_weeks", "must be at least 1").into());
        }
        require_unit_rate("conversion_rate", inputs.conversion_rate)?;
        let policy = CapPolicy::from_inputs(inputs.cap_enabled, inputs.cap_multiplier)?;

        let required_budget = Self::required_budget(
            required_sample_size,
            inputs.cost_per_conversion,
            inputs.conversion_rate,
        );
        let outcome = policy.apply(required_budget, inputs.monthly_spend);
        let multiplier = outcome.recommended_budget / inputs.monthly_spend;

        let window = Self::window(
            inputs.monthly_spend,
            inputs.test_duration_weeks,
            outcome.recommended_budget,
        );

        Ok(CalculationResult {
            channel: inputs.channel,
            required_sample_size,
            required_budget,
            recommended_budget: outcome.recommended_budget,
            multiplier,
            statistical_multiplier: required_budget / inputs.monthly_spend,
            is_capped: outcome.is_capped,
            binding: outcome.binding,
            feasibility: Feasibility::from_multiplier(multiplier),
            window,
        })
    }

    /// Frame a recommendation against the test duration.
    pub fn window(monthly_spend: f64, weeks: u32, recommended_budget: f64) -> TestWindow {
        let weekly_baseline_spend = monthly_spend / WEEKS_PER_MONTH;
        let baseline_window_spend = weekly_baseline_spend * f64::from(weeks);

        TestWindow {
            weeks,
            weekly_baseline_spend,
            baseline_window_spend,
            recommended_weekly_spend: recommended_budget / f64::from(weeks),
            incremental_budget: (recommended_budget - baseline_window_spend).max(0.0),
        }
    }
}
