//! Plain-text rendering for terminal output.

use std::fmt::Write;

use console::style;
use lift_core::{
    BindingConstraint, ExperimentInputs, Feasibility, ScenarioOutcome, WEEKS_PER_MONTH,
};

use crate::calculate::CalculationReport;

/// Format a currency amount with thousands separators and no cents.
pub fn money(amount: f64) -> String {
    let rounded = amount.round();
    let digits = format!("{:.0}", rounded.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if rounded < 0.0 {
        format!("-${grouped}")
    } else {
        format!("${grouped}")
    }
}

fn feasibility_label(feasibility: Feasibility) -> String {
    match feasibility {
        Feasibility::High => style(feasibility).green().bold().to_string(),
        Feasibility::Medium => style(feasibility).yellow().bold().to_string(),
        Feasibility::Low => style(feasibility).red().bold().to_string(),
    }
}

fn binding_label(binding: BindingConstraint) -> &'static str {
    match binding {
        BindingConstraint::Statistical => "statistical requirement",
        BindingConstraint::Cap => "multiplier cap",
        BindingConstraint::BaselineFloor => "current spend floor",
    }
}

fn heading(out: &mut String, title: &str) {
    let _ = writeln!(out, "{}", style(title).bold());
    let _ = writeln!(out, "{}", "=".repeat(title.chars().count()));
}

fn design_lines(out: &mut String, inputs: &ExperimentInputs) {
    let _ = writeln!(out, "Channel:              {}", inputs.channel);
    let _ = writeln!(out, "Monthly spend:        {}", money(inputs.monthly_spend));
    let _ = writeln!(out, "Cost per conversion:  {}", money(inputs.cost_per_conversion));
    let _ = writeln!(out, "Conversion rate:      {:.0}%", inputs.conversion_rate * 100.0);
    let _ = writeln!(out, "Duration:             {} weeks", inputs.test_duration_weeks);
    if inputs.cap_enabled {
        let _ = writeln!(out, "Cap:                  {:.1}x", inputs.cap_multiplier);
    } else {
        let _ = writeln!(out, "Cap:                  disabled");
    }
}

/// Render a full calculation report.
pub fn render_report(report: &CalculationReport) -> String {
    let inputs = &report.inputs;
    let result = &report.result;
    let window = &result.window;
    let impact = &report.impact;
    let mut out = String::new();

    heading(&mut out, "Lift Test Budget");
    design_lines(&mut out, inputs);
    let _ = writeln!(
        out,
        "Design:               MDE {:.0}% ({}), power {:.0}%, p {}",
        inputs.mde * 100.0,
        report.mde_category,
        inputs.power * 100.0,
        inputs.p_value
    );
    let _ = writeln!(out);

    heading(&mut out, "Recommendation");
    let _ = writeln!(out, "Sample size per arm:  {}", result.required_sample_size);
    let _ = writeln!(
        out,
        "Required budget:      {} ({:.1}x)",
        money(result.required_budget),
        result.statistical_multiplier
    );
    let _ = writeln!(
        out,
        "Recommended budget:   {} ({:.1}x)",
        style(money(result.recommended_budget)).bold(),
        result.multiplier
    );
    let _ = writeln!(out, "Set by:               {}", binding_label(result.binding));
    let _ = writeln!(out, "Feasibility:          {}", feasibility_label(result.feasibility));
    let _ = writeln!(out);

    heading(&mut out, "Test Window");
    let _ = writeln!(
        out,
        "Weekly baseline:      {} (monthly / {WEEKS_PER_MONTH})",
        money(window.weekly_baseline_spend)
    );
    let _ = writeln!(out, "Baseline over window: {}", money(window.baseline_window_spend));
    let _ = writeln!(out, "Recommended weekly:   {}", money(window.recommended_weekly_spend));
    let _ = writeln!(out, "Incremental budget:   {}", money(window.incremental_budget));
    let _ = writeln!(out);

    heading(&mut out, "Expected Impact");
    let _ = writeln!(out, "Total conversions:    {:.0}", impact.total_conversions);
    let _ = writeln!(
        out,
        "Control / treatment:  {:.0} / {:.0}",
        impact.control_conversions, impact.treatment_conversions
    );
    let _ = writeln!(out, "Incremental qualified: {:.1}", impact.incremental_qualified);
    match impact.cost_per_incremental_qualified {
        Some(cost) => {
            let _ = writeln!(out, "Cost per incremental: {}", money(cost));
        }
        None => {
            let _ = writeln!(out, "Cost per incremental: n/a");
        }
    }

    if let Some(context) = &report.context {
        let _ = writeln!(out);
        heading(&mut out, "Channel Context");
        let _ = writeln!(out, "Spend share:          {:.1}%", context.spend_share_pct);
        let _ = writeln!(out, "Conversion share:     {:.1}%", context.conversion_share_pct);
        let _ = writeln!(out, "{}", style(context.signal.message()).dim());
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "{}", report.explanation);
    out
}

/// Render the three preset scenarios side by side.
pub fn render_scenarios(inputs: &ExperimentInputs, outcomes: &[ScenarioOutcome]) -> String {
    let mut out = String::new();

    heading(&mut out, "Confidence Scenarios");
    design_lines(&mut out, inputs);
    let _ = writeln!(out);

    let _ = writeln!(
        out,
        "{:<18} {:>5} {:>6} {:>10} {:>14} {:>7}  {:<11} {}",
        "Scenario", "MDE", "Power", "Per arm", "Recommended", "Mult", "Feasibility", "Success"
    );
    for outcome in outcomes {
        let result = &outcome.result;
        let _ = writeln!(
            out,
            "{:<18} {:>4.0}% {:>5.0}% {:>10} {:>14} {:>6.1}x  {:<11} {}",
            outcome.preset.label(),
            outcome.settings.mde * 100.0,
            outcome.settings.power * 100.0,
            result.required_sample_size,
            money(result.recommended_budget),
            result.multiplier,
            result.feasibility.to_string(),
            outcome.preset.success_probability()
        );
    }
    out
}
