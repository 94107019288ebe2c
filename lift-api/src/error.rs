//! Error types for lift-api.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use lift_core::CalcError;
use serde::Serialize;

/// Service errors surfaced to HTTP callers.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The calculation rejected its inputs.
    #[error(transparent)]
    Calculation(#[from] CalcError),

    /// The request could not be turned into calculation inputs.
    #[error(transparent)]
    Request(#[from] lift_common::Error),
}

/// Error body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Calculation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Request(e) => {
                StatusCode::from_u16(e.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            }
        }
    }

    fn body(&self) -> ErrorBody {
        let (code, field) = match self {
            Self::Calculation(e) => (e.code(), e.field().map(str::to_string)),
            Self::Request(e) => ("INVALID_REQUEST", e.field().map(str::to_string)),
        };

        ErrorBody {
            code: code.to_string(),
            message: self.to_string(),
            field,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::debug!(error = %self, "Request rejected");
        }

        let body = serde_json::json!({
            "success": false,
            "error": self.body(),
        });

        (status, axum::Json(body)).into_response()
    }
}
