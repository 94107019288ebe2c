//! Lift Core - incrementality test budget estimation.
//!
//! Converts a statistical test design (minimum detectable effect, power,
//! significance threshold) into the number of conversions a lift test needs,
//! then translates that sample size into a spend recommendation for a single
//! advertising channel.
//!
//! # Pipeline
//!
//! ```text
//! ExperimentInputs ──► PowerAnalyzer ──► required sample size
//!                                              │
//!                      CapPolicy ──► BudgetEstimator ──► CalculationResult
//! ```
//!
//! Every stage is a pure function of its inputs. Independent calculations
//! (for example the preset confidence scenarios) share no state and can be
//! evaluated in any order.
//!
//! # Usage
//!
//! ```
//! use lift_core::{calculate, ExperimentInputs};
//!
//! let inputs = ExperimentInputs {
//!     monthly_spend: 10_000.0,
//!     cost_per_conversion: 600.0,
//!     conversion_rate: 1.0,
//!     mde: 0.20,
//!     ..ExperimentInputs::default()
//! };
//!
//! let result = calculate(&inputs).unwrap();
//! assert!(result.recommended_budget >= inputs.monthly_spend);
//! ```

#![warn(clippy::all)]
#![allow(clippy::pedantic)]

pub mod budget;
pub mod calculator;
pub mod context;
pub mod error;
pub mod impact;
pub mod power;
pub mod scenarios;
pub mod types;

pub use budget::{BudgetEstimator, CapOutcome, CapPolicy, WEEKS_PER_MONTH};
pub use calculator::calculate;
pub use context::{ChannelContext, ShareSignal};
pub use error::CalcError;
pub use impact::ExpectedImpact;
pub use power::{MdeCategory, PowerAnalysis, PowerAnalyzer};
pub use scenarios::{evaluate_scenarios, ScenarioOutcome, ScenarioPreset, ScenarioSettings};
pub use types::{
    BindingConstraint, CalculationResult, Channel, ExperimentInputs, Feasibility, TestWindow,
};
