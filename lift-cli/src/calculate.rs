//! Calculation commands.

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use lift_common::CalculatorDefaults;
use lift_core::{
    calculate, evaluate_scenarios, CalculationResult, Channel, ChannelContext, ExpectedImpact,
    ExperimentInputs, MdeCategory, ScenarioOutcome,
};
use serde::Serialize;

use crate::output;

/// How results are printed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

/// Test design flags shared by `calculate` and `scenarios`.
///
/// Anything left unset falls back to the `calculator` section of the config.
#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// Advertising channel (youtube, facebook, google_search, linkedin, other)
    #[arg(long, default_value = "youtube")]
    pub channel: Channel,

    /// Current monthly spend on the channel
    #[arg(long)]
    pub monthly_spend: f64,

    /// Cost per conversion (defaults to the channel's typical cost)
    #[arg(long)]
    pub cost_per_conversion: Option<f64>,

    /// Test duration in weeks
    #[arg(long)]
    pub weeks: Option<u32>,

    /// Conversion-to-qualified rate in (0, 1]
    #[arg(long)]
    pub conversion_rate: Option<f64>,

    /// Baseline rate for the two-proportion comparison
    #[arg(long)]
    pub baseline_rate: Option<f64>,

    /// Minimum detectable relative lift, e.g. 0.15
    #[arg(long)]
    pub mde: Option<f64>,

    /// Statistical power, e.g. 0.8
    #[arg(long)]
    pub power: Option<f64>,

    /// Two-sided significance threshold, e.g. 0.05
    #[arg(long)]
    pub p_value: Option<f64>,

    /// Maximum recommended budget as a multiple of monthly spend (enables the cap)
    #[arg(long, conflicts_with = "no_cap")]
    pub cap_multiplier: Option<f64>,

    /// Recommend the full statistical requirement, however large
    #[arg(long)]
    pub no_cap: bool,
}

impl InputArgs {
    /// Merge the flags over the configured defaults.
    pub fn to_inputs(&self, defaults: &CalculatorDefaults) -> ExperimentInputs {
        let base = ExperimentInputs::from_defaults(
            defaults,
            self.channel,
            self.monthly_spend,
            self.cost_per_conversion,
        );

        ExperimentInputs {
            test_duration_weeks: self.weeks.unwrap_or(base.test_duration_weeks),
            conversion_rate: self.conversion_rate.unwrap_or(base.conversion_rate),
            baseline_rate: self.baseline_rate.unwrap_or(base.baseline_rate),
            mde: self.mde.unwrap_or(base.mde),
            power: self.power.unwrap_or(base.power),
            p_value: self.p_value.unwrap_or(base.p_value),
            cap_enabled: !self.no_cap && (base.cap_enabled || self.cap_multiplier.is_some()),
            cap_multiplier: self.cap_multiplier.unwrap_or(base.cap_multiplier),
            ..base
        }
    }
}

/// Flags for `lift calculate`.
#[derive(Args, Debug, Clone)]
pub struct CalculateArgs {
    #[command(flatten)]
    pub inputs: InputArgs,

    /// Total monthly spend across all channels, for context
    #[arg(long, requires = "total_conversions")]
    pub total_marketing_spend: Option<f64>,

    /// Total monthly conversions across all channels, for context
    #[arg(long, requires = "total_marketing_spend")]
    pub total_conversions: Option<f64>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

/// Flags for `lift scenarios`.
#[derive(Args, Debug, Clone)]
pub struct ScenarioArgs {
    #[command(flatten)]
    pub inputs: InputArgs,

    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

/// Everything `lift calculate` reports.
#[derive(Debug, Clone, Serialize)]
pub struct CalculationReport {
    pub inputs: ExperimentInputs,
    pub result: CalculationResult,
    pub explanation: String,
    pub impact: ExpectedImpact,
    pub mde_category: MdeCategory,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<ChannelContext>,
}

impl CalculationReport {
    pub fn build(args: &CalculateArgs, defaults: &CalculatorDefaults) -> Result<Self> {
        let inputs = args.inputs.to_inputs(defaults);
        let result = calculate(&inputs)?;

        let context = match (args.total_marketing_spend, args.total_conversions) {
            (Some(total_spend), Some(total_conversions)) => Some(
                ChannelContext::evaluate(
                    inputs.monthly_spend,
                    inputs.cost_per_conversion,
                    total_spend,
                    total_conversions,
                )
                .context("Invalid channel context")?,
            ),
            _ => None,
        };

        Ok(Self {
            explanation: result.explanation(),
            impact: ExpectedImpact::estimate(&inputs, &result),
            mde_category: MdeCategory::from_mde(inputs.mde),
            inputs,
            result,
            context,
        })
    }
}

/// Run `lift calculate` and return the rendered output.
pub fn run_calculate(args: &CalculateArgs, defaults: &CalculatorDefaults) -> Result<String> {
    let report = CalculationReport::build(args, defaults)?;
    tracing::debug!(
        channel = %report.inputs.channel,
        recommended_budget = report.result.recommended_budget,
        "Calculation complete"
    );

    match args.format {
        OutputFormat::Table => Ok(output::render_report(&report)),
        OutputFormat::Json => {
            serde_json::to_string_pretty(&report).context("Failed to serialize report")
        }
    }
}

/// Run `lift scenarios` and return the rendered output.
pub fn run_scenarios(args: &ScenarioArgs, defaults: &CalculatorDefaults) -> Result<String> {
    let inputs = args.inputs.to_inputs(defaults);
    let outcomes: Vec<ScenarioOutcome> = evaluate_scenarios(&inputs)?;

    match args.format {
        OutputFormat::Table => Ok(output::render_scenarios(&inputs, &outcomes)),
        OutputFormat::Json => {
            serde_json::to_string_pretty(&outcomes).context("Failed to serialize scenarios")
        }
    }
}
