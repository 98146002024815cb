// src/server/error.rs
//! HTTP mapping of pipeline failures.

use crate::utils::error::PipelineError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

/// `{"error": message}` with the given status.
pub fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorBody {
            error: message.into(),
        }),
    )
        .into_response()
}

impl PipelineError {
    pub fn status_code(&self) -> StatusCode {
        if self.is_not_found() {
            StatusCode::NOT_FOUND
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl IntoResponse for PipelineError {
    fn into_response(self) -> Response {
        // Detail was logged where the failure happened; only the short
        // message goes back to the client.
        error_response(self.status_code(), self.to_string())
    }
}
