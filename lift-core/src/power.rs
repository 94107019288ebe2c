//! Power analysis for a two-proportion lift test.
//!
//! Computes how many conversions each arm needs to detect a relative lift of
//! `mde` over a baseline rate `p0`:
//!
//! ```text
//! p1   = p0 * (1 + mde)
//! pbar = (p0 + p1) / 2
//! n    = (z_α·√(2·pbar·(1−pbar)) + z_β·√(p0(1−p0) + p1(1−p1)))² / (p1 − p0)²
//! ```
//!
//! where `z_α` is the two-sided critical value for the significance
//! threshold and `z_β` the one-sided critical value for the target power.

use std::f64::consts::SQRT_2;
use std::fmt;

use lift_common::validation::require_open_unit;
use serde::{Deserialize, Serialize};
use statrs::function::erf::erfc_inv;

use crate::error::CalcError;
use crate::types::validate_mde;

/// Smallest distance the shifted rate keeps from 1.
const RATE_EPSILON: f64 = 1e-9;

/// Inverse CDF of the standard normal distribution.
pub fn standard_normal_quantile(p: f64) -> f64 {
    -SQRT_2 * erfc_inv(2.0 * p)
}

/// Intermediate values and the resulting sample size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerAnalysis {
    pub z_alpha: f64,
    pub z_beta: f64,
    pub baseline_rate: f64,
    /// Baseline rate shifted by the effect, kept below 1
    pub treatment_rate: f64,
    /// Conversions required per arm, at least 1
    pub required_sample_size: u64,
}

/// Converts a statistical design into a required sample size.
#[derive(Debug, Clone, Copy, Default)]
pub struct PowerAnalyzer;

impl PowerAnalyzer {
    /// Two-sided critical value for the significance threshold.
    pub fn z_alpha(p_value: f64) -> f64 {
        standard_normal_quantile(1.0 - p_value / 2.0)
    }

    /// One-sided critical value for the target power.
    pub fn z_beta(power: f64) -> f64 {
        standard_normal_quantile(power)
    }

    /// Run the analysis, returning the intermediate values alongside the sample size.
    pub fn analyze(
        baseline_rate: f64,
        mde: f64,
        power: f64,
        p_value: f64,
    ) -> Result<PowerAnalysis, CalcError> {
        require_open_unit("baseline_rate", baseline_rate)?;
        validate_mde(mde)?;
        require_open_unit("power", power)?;
        require_open_unit("p_value", p_value)?;

        let degenerate = || CalcError::DegenerateEffect { mde, baseline_rate };

        let p0 = baseline_rate;
        let p1 = (p0 * (1.0 + mde)).min(1.0 - RATE_EPSILON);
        let delta = p1 - p0;
        if delta <= 0.0 {
            return Err(degenerate());
        }

        let z_alpha = Self::z_alpha(p_value);
        let z_beta = Self::z_beta(power);

        let pbar = (p0 + p1) / 2.0;
        let pooled = z_alpha * (2.0 * pbar * (1.0 - pbar)).sqrt();
        let unpooled = z_beta * (p0 * (1.0 - p0) + p1 * (1.0 - p1)).sqrt();
        let n = (pooled + unpooled).powi(2) / delta.powi(2);

        if !n.is_finite() {
            return Err(degenerate());
        }

        let required_sample_size = (n.ceil() as u64).max(1);

        Ok(PowerAnalysis {
            z_alpha,
            z_beta,
            baseline_rate: p0,
            treatment_rate: p1,
            required_sample_size,
        })
    }

    /// Minimum conversions per arm to detect `mde` at the requested power and threshold.
    pub fn required_sample_size(
        baseline_rate: f64,
        mde: f64,
        power: f64,
        p_value: f64,
    ) -> Result<u64, CalcError> {
        Self::analyze(baseline_rate, mde, power, p_value).map(|a| a.required_sample_size)
    }
}

/// Coarse size band for an effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MdeCategory {
    VerySmall,
    Small,
    Moderate,
    Large,
    VeryLarge,
}

impl MdeCategory {
    pub fn from_mde(mde: f64) -> Self {
        if mde <= 0.05 {
            Self::VerySmall
        } else if mde <= 0.10 {
            Self::Small
        } else if mde <= 0.15 {
            Self::Moderate
        } else if mde <= 0.20 {
            Self::Large
        } else {
            Self::VeryLarge
        }
    }
}

impl fmt::Display for MdeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::VerySmall => write!(f, "Very Small"),
            Self::Small => write!(f, "Small"),
            Self::Moderate => write!(f, "Moderate"),
            Self::Large => write!(f, "Large"),
            Self::VeryLarge => write!(f, "Very Large"),
        }
    }
}
