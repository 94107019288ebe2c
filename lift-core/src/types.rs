//! Experiment inputs and calculation results.

use std::fmt;
use std::str::FromStr;

use lift_common::validation::{
    require_in_range, require_open_unit, require_positive, require_unit_rate,
};
use lift_common::{CalculatorDefaults, Validate, ValidationError, ValidationResult};
use serde::{Deserialize, Serialize};

// ============================================================================
// Channel
// ============================================================================

/// Advertising channel under test.
///
/// Informational only: the channel never changes the arithmetic, it only
/// supplies a suggested cost per conversion when the caller has none.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Channel {
    #[default]
    #[serde(rename = "youtube")]
    YouTube,
    #[serde(rename = "facebook")]
    Facebook,
    #[serde(rename = "google_search")]
    GoogleSearch,
    #[serde(rename = "linkedin")]
    LinkedIn,
    #[serde(rename = "other")]
    Other,
}

impl Channel {
    pub const ALL: [Channel; 5] = [
        Self::YouTube,
        Self::Facebook,
        Self::GoogleSearch,
        Self::LinkedIn,
        Self::Other,
    ];

    /// Typical cost per conversion for the channel.
    pub const fn default_cost_per_conversion(self) -> f64 {
        match self {
            Self::YouTube => 500.0,
            Self::Facebook => 200.0,
            Self::GoogleSearch => 150.0,
            Self::LinkedIn => 300.0,
            Self::Other => 200.0,
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::YouTube => write!(f, "YouTube"),
            Self::Facebook => write!(f, "Facebook"),
            Self::GoogleSearch => write!(f, "Google Search"),
            Self::LinkedIn => write!(f, "LinkedIn"),
            Self::Other => write!(f, "Other"),
        }
    }
}

impl FromStr for Channel {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .to_lowercase()
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .collect();

        match normalized.as_str() {
            "youtube" => Ok(Self::YouTube),
            "facebook" => Ok(Self::Facebook),
            "googlesearch" | "google" => Ok(Self::GoogleSearch),
            "linkedin" => Ok(Self::LinkedIn),
            "other" => Ok(Self::Other),
            _ => Err(ValidationError::invalid(
                "channel",
                format!(
                    "unknown channel '{s}', expected one of: youtube, facebook, google_search, linkedin, other"
                ),
            )),
        }
    }
}

// ============================================================================
// Experiment Inputs
// ============================================================================

/// Everything a single calculation needs, supplied explicitly by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentInputs {
    pub channel: Channel,
    /// Current baseline spend per month
    pub monthly_spend: f64,
    /// Cost per conversion event (form)
    pub cost_per_conversion: f64,
    pub test_duration_weeks: u32,
    /// Conversion-to-qualified rate in (0, 1]
    pub conversion_rate: f64,
    /// Baseline rate `p0` for the two-proportion comparison
    pub baseline_rate: f64,
    /// Minimum detectable relative lift
    pub mde: f64,
    pub power: f64,
    /// Two-sided significance threshold
    pub p_value: f64,
    pub cap_enabled: bool,
    /// Upper bound on recommended budget / monthly spend, in [1.5, 20]
    pub cap_multiplier: f64,
}

impl Default for ExperimentInputs {
    fn default() -> Self {
        let channel = Channel::default();
        Self::from_defaults(&CalculatorDefaults::default(), channel, 30_000.0, None)
    }
}

impl ExperimentInputs {
    /// Build inputs from configured design defaults.
    ///
    /// A missing cost per conversion falls back to the channel's typical cost.
    pub fn from_defaults(
        defaults: &CalculatorDefaults,
        channel: Channel,
        monthly_spend: f64,
        cost_per_conversion: Option<f64>,
    ) -> Self {
        Self {
            channel,
            monthly_spend,
            cost_per_conversion: cost_per_conversion
                .unwrap_or_else(|| channel.default_cost_per_conversion()),
            test_duration_weeks: defaults.test_duration_weeks,
            conversion_rate: defaults.conversion_rate,
            baseline_rate: defaults.baseline_rate,
            mde: defaults.mde,
            power: defaults.power,
            p_value: defaults.p_value,
            cap_enabled: defaults.cap_enabled,
            cap_multiplier: defaults.cap_multiplier,
        }
    }
}

/// Validate an effect size: zero is allowed here and rejected later as a
/// degenerate effect, anything negative or at least 1 is out of domain.
pub(crate) fn validate_mde(mde: f64) -> ValidationResult<()> {
    if !mde.is_finite() || !(0.0..1.0).contains(&mde) {
        return Err(ValidationError::invalid("mde", format!("must be in [0, 1), got {mde}")));
    }
    Ok(())
}

impl Validate for ExperimentInputs {
    /// Fail-fast validation in field order; the first violation is reported.
    fn validate(&self) -> ValidationResult<()> {
        require_positive("monthly_spend", self.monthly_spend)?;
        require_positive("cost_per_conversion", self.cost_per_conversion)?;
        if self.test_duration_weeks == 0 {
            return Err(ValidationError::invalid("test_duration_weeks", "must be at least 1"));
        }
        require_unit_rate("conversion_rate", self.conversion_rate)?;
        require_open_unit("baseline_rate", self.baseline_rate)?;
        validate_mde(self.mde)?;
        require_open_unit("power", self.power)?;
        require_open_unit("p_value", self.p_value)?;
        if self.cap_enabled {
            require_in_range(
                "cap_multiplier",
                self.cap_multiplier,
                CalculatorDefaults::MIN_CAP_MULTIPLIER,
                CalculatorDefaults::MAX_CAP_MULTIPLIER,
            )?;
        }
        Ok(())
    }
}

// ============================================================================
// Calculation Result
// ============================================================================

/// Which constraint determined the recommended budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BindingConstraint {
    /// The statistical requirement was used as is.
    Statistical,
    /// The multiplier cap reduced the requirement.
    Cap,
    /// The requirement was below current spend, so current spend is recommended.
    BaselineFloor,
}

/// Budget practicality rating derived from the multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feasibility {
    High,
    Medium,
    Low,
}

impl Feasibility {
    pub fn from_multiplier(multiplier: f64) -> Self {
        if multiplier < 3.0 {
            Self::High
        } else if multiplier < 5.0 {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

impl fmt::Display for Feasibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::High => write!(f, "HIGH"),
            Self::Medium => write!(f, "MEDIUM"),
            Self::Low => write!(f, "LOW"),
        }
    }
}

/// How the recommendation maps onto the test window.
///
/// None of these figures shrink the requirement; the budget is a one-shot
/// total for the whole test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestWindow {
    pub weeks: u32,
    /// Current monthly spend expressed per week
    pub weekly_baseline_spend: f64,
    /// What the channel would spend over the window without a test
    pub baseline_window_spend: f64,
    pub recommended_weekly_spend: f64,
    /// Spend above the baseline window spend, never negative
    pub incremental_budget: f64,
}

/// Outcome of a single calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationResult {
    pub channel: Channel,
    /// Conversions required per test arm
    pub required_sample_size: u64,
    /// Statistically required budget before the cap policy
    pub required_budget: f64,
    /// Budget after the cap and floor policy
    pub recommended_budget: f64,
    /// `recommended_budget / monthly_spend`
    pub multiplier: f64,
    /// `required_budget / monthly_spend`
    pub statistical_multiplier: f64,
    pub is_capped: bool,
    pub binding: BindingConstraint,
    pub feasibility: Feasibility,
    pub window: TestWindow,
}

impl CalculationResult {
    /// Human-readable account of why the recommendation is what it is.
    pub fn explanation(&self) -> String {
        match self.binding {
            BindingConstraint::Statistical => format!(
                "Uncapped: the full statistical requirement of {:.0} ({:.1}x current spend) is recommended.",
                self.required_budget, self.multiplier
            ),
            BindingConstraint::Cap => format!(
                "Capped: the statistical requirement of {:.0} ({:.1}x current spend) exceeds the cap, so {:.0} ({:.1}x) is recommended. The test will be underpowered for the configured effect size.",
                self.required_budget,
                self.statistical_multiplier,
                self.recommended_budget,
                self.multiplier
            ),
            BindingConstraint::BaselineFloor => format!(
                "Baseline: the statistical requirement of {:.0} is below current spend, so current spend of {:.0} is recommended.",
                self.required_budget, self.recommended_budget
            ),
        }
    }
}
