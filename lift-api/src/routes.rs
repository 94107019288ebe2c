//! HTTP API routes.

use axum::{
    extract::State,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use lift_common::logging::generate_request_id;
use lift_common::{CalculatorDefaults, Config, Validate};
use lift_core::{
    calculate, evaluate_scenarios, CalcError, CalculationResult, Channel, ChannelContext,
    ExpectedImpact, ExperimentInputs, MdeCategory, ScenarioOutcome,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::ApiError;

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub defaults: Arc<CalculatorDefaults>,
}

impl AppState {
    pub fn new(defaults: CalculatorDefaults) -> Self {
        Self {
            defaults: Arc::new(defaults),
        }
    }

    /// Build state from configuration, rejecting invalid calculator defaults.
    pub fn from_config(config: &Config) -> lift_common::Result<Self> {
        config.calculator.validate()?;
        Ok(Self::new(config.calculator.clone()))
    }
}

/// Build the application router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/v1/calculate", post(calculate_budget))
        .route("/api/v1/scenarios", post(scenarios))
        .route("/api/v1/context", post(channel_context))
        .with_state(state)
}

// ============ Request / Response Types ============

/// Calculation request; omitted design fields fall back to configured defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CalculateRequest {
    pub channel: Option<Channel>,
    pub monthly_spend: Option<f64>,
    pub cost_per_conversion: Option<f64>,
    pub test_duration_weeks: Option<u32>,
    pub conversion_rate: Option<f64>,
    pub baseline_rate: Option<f64>,
    pub mde: Option<f64>,
    pub power: Option<f64>,
    pub p_value: Option<f64>,
    pub cap_enabled: Option<bool>,
    pub cap_multiplier: Option<f64>,
}

impl CalculateRequest {
    /// Merge the request over `defaults`.
    pub fn into_inputs(self, defaults: &CalculatorDefaults) -> lift_common::Result<ExperimentInputs> {
        let monthly_spend = self
            .monthly_spend
            .ok_or_else(|| lift_common::Error::InvalidInput("monthly_spend is required".into()))?;
        let channel = self.channel.unwrap_or_default();

        let base =
            ExperimentInputs::from_defaults(defaults, channel, monthly_spend, self.cost_per_conversion);

        Ok(ExperimentInputs {
            test_duration_weeks: self.test_duration_weeks.unwrap_or(base.test_duration_weeks),
            conversion_rate: self.conversion_rate.unwrap_or(base.conversion_rate),
            baseline_rate: self.baseline_rate.unwrap_or(base.baseline_rate),
            mde: self.mde.unwrap_or(base.mde),
            power: self.power.unwrap_or(base.power),
            p_value: self.p_value.unwrap_or(base.p_value),
            cap_enabled: self.cap_enabled.unwrap_or(base.cap_enabled),
            cap_multiplier: self.cap_multiplier.unwrap_or(base.cap_multiplier),
            ..base
        })
    }
}

/// Channel context request.
#[derive(Debug, Clone, Deserialize)]
pub struct ContextRequest {
    #[serde(default)]
    pub channel: Channel,
    pub monthly_spend: f64,
    pub cost_per_conversion: Option<f64>,
    pub total_marketing_spend: f64,
    pub total_monthly_conversions: f64,
}

#[derive(Debug, Serialize)]
struct ApiResponse<T> {
    success: bool,
    data: T,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Json<Self> {
        Json(Self {
            success: true,
            data,
        })
    }
}

#[derive(Debug, Serialize)]
struct CalculateResponse {
    inputs: ExperimentInputs,
    result: CalculationResult,
    explanation: String,
    impact: ExpectedImpact,
    mde_category: MdeCategory,
}

// ============ Handlers ============

async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "lift-api",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

async fn calculate_budget(
    State(state): State<AppState>,
    Json(request): Json<CalculateRequest>,
) -> Result<Json<ApiResponse<CalculateResponse>>, ApiError> {
    let span = tracing::info_span!("calculate", request_id = %generate_request_id());
    span.in_scope(|| -> Result<_, ApiError> {
        let inputs = request.into_inputs(&state.defaults)?;
        let result = calculate(&inputs)?;
        let impact = ExpectedImpact::estimate(&inputs, &result);

        tracing::info!(
            channel = %inputs.channel,
            recommended_budget = result.recommended_budget,
            is_capped = result.is_capped,
            "Calculation served"
        );

        Ok(ApiResponse::ok(CalculateResponse {
            mde_category: MdeCategory::from_mde(inputs.mde),
            explanation: result.explanation(),
            inputs,
            result,
            impact,
        }))
    })
}

async fn scenarios(
    State(state): State<AppState>,
    Json(request): Json<CalculateRequest>,
) -> Result<Json<ApiResponse<Vec<ScenarioOutcome>>>, ApiError> {
    let span = tracing::info_span!("scenarios", request_id = %generate_request_id());
    span.in_scope(|| -> Result<_, ApiError> {
        let inputs = request.into_inputs(&state.defaults)?;
        let outcomes = evaluate_scenarios(&inputs)?;
        tracing::info!(count = outcomes.len(), "Scenarios served");
        Ok(ApiResponse::ok(outcomes))
    })
}

async fn channel_context(
    Json(request): Json<ContextRequest>,
) -> Result<Json<ApiResponse<ChannelContext>>, ApiError> {
    let cost_per_conversion = request
        .cost_per_conversion
        .unwrap_or_else(|| request.channel.default_cost_per_conversion());

    let context = ChannelContext::evaluate(
        request.monthly_spend,
        cost_per_conversion,
        request.total_marketing_spend,
        request.total_monthly_conversions,
    )
    .map_err(CalcError::from)?;

    Ok(ApiResponse::ok(context))
}
