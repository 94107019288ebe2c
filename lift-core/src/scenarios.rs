//! Preset confidence scenarios.
//!
//! Evaluates a fixed set of standard test designs against the same channel
//! economics so callers can compare budgets side by side.

use serde::{Deserialize, Serialize};

use crate::calculator::calculate;
use crate::error::CalcError;
use crate::types::{CalculationResult, ExperimentInputs};

/// A standard statistical design.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioPreset {
    /// 10% MDE, 90% power, p < 0.05
    HighConfidence,
    /// 10% MDE, 80% power, p < 0.05
    MediumConfidence,
    /// 15% MDE, 70% power, p < 0.05
    LowConfidence,
}

/// Design parameters a preset overrides.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScenarioSettings {
    pub mde: f64,
    pub power: f64,
    pub p_value: f64,
}

impl ScenarioPreset {
    pub const ALL: [ScenarioPreset; 3] = [
        Self::HighConfidence,
        Self::MediumConfidence,
        Self::LowConfidence,
    ];

    pub const fn settings(self) -> ScenarioSettings {
        match self {
            Self::HighConfidence => ScenarioSettings {
                mde: 0.10,
                power: 0.90,
                p_value: 0.05,
            },
            Self::MediumConfidence => ScenarioSettings {
                mde: 0.10,
                power: 0.80,
                p_value: 0.05,
            },
            Self::LowConfidence => ScenarioSettings {
                mde: 0.15,
                power: 0.70,
                p_value: 0.05,
            },
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::HighConfidence => "High Confidence",
            Self::MediumConfidence => "Medium Confidence",
            Self::LowConfidence => "Low Confidence",
        }
    }

    /// Rough chance the test reaches a conclusive result.
    pub const fn success_probability(self) -> &'static str {
        match self {
            Self::HighConfidence => "60-90%",
            Self::MediumConfidence => "30-60%",
            Self::LowConfidence => "0-30%",
        }
    }

    /// Copy `base`, replacing its design parameters with the preset's.
    pub fn apply(self, base: &ExperimentInputs) -> ExperimentInputs {
        let settings = self.settings();
        ExperimentInputs {
            mde: settings.mde,
            power: settings.power,
            p_value: settings.p_value,
            ..base.clone()
        }
    }
}

/// One evaluated preset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioOutcome {
    pub preset: ScenarioPreset,
    pub settings: ScenarioSettings,
    pub result: CalculationResult,
}

/// Evaluate every preset against the economics in `base`, in preset order.
pub fn evaluate_scenarios(base: &ExperimentInputs) -> Result<Vec<ScenarioOutcome>, CalcError> {
    ScenarioPreset::ALL
        .iter()
        .map(|&preset| {
            let result = calculate(&preset.apply(base))?;
            Ok(ScenarioOutcome {
                preset,
                settings: preset.settings(),
                result,
            })
        })
        .collect()
}
