//! End-to-end checks of the reference scenarios.

use lift_core::{
    calculate, evaluate_scenarios, BindingConstraint, ExpectedImpact, ExperimentInputs,
    MdeCategory, ScenarioPreset,
};

fn reference() -> ExperimentInputs {
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
fn capped_reference_recommends_cap() {
    let result = calculate(&reference()).unwrap();

    let expected_required = result.required_sample_size as f64 * 600.0;
    assert!((result.required_budget - expected_required).abs() < 1e-6);
    assert!(result.required_budget > 10_000.0 * 5.0);
    assert_eq!(result.recommended_budget, 50_000.0);
    assert!(result.is_capped);
    assert!((result.multiplier - 5.0).abs() < 1e-12);
}

#[test]
fn uncapped_reference_recommends_requirement() {
    let inputs = ExperimentInputs {
        cap_enabled: false,
        ..reference()
    };
    let result = calculate(&inputs).unwrap();
    assert_eq!(result.recommended_budget, result.required_budget);
    assert!(!result.is_capped);
    assert_eq!(result.binding, BindingConstraint::Statistical);
}

#[test]
fn result_serializes_for_front_ends() {
    let result = calculate(&reference()).unwrap();
    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["is_capped"], true);
    assert_eq!(json["binding"], "cap");
    assert_eq!(json["channel"], "youtube");
    assert_eq!(json["feasibility"], "low");
    assert!(json["window"]["weekly_baseline_spend"].is_number());
}

#[test]
fn scenario_budgets_follow_confidence() {
    let base = ExperimentInputs {
        cap_enabled: false,
        ..reference()
    };
    let outcomes = evaluate_scenarios(&base).unwrap();
    assert_eq!(outcomes.len(), ScenarioPreset::ALL.len());
    assert!(outcomes[0].result.required_budget > outcomes[1].result.required_budget);
    assert!(outcomes[1].result.required_budget > outcomes[2].result.required_budget);
}

#[test]
fn impact_uses_mde_lift() {
    let inputs = reference();
    let result = calculate(&inputs).unwrap();
    let impact = ExpectedImpact::estimate(&inputs, &result);
    let ratio = impact.treatment_conversions / impact.control_conversions;
    assert!((ratio - 1.2).abs() < 1e-12);
    assert_eq!(MdeCategory::from_mde(inputs.mde), MdeCategory::Large);
}
