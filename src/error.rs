// src/error.rs

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::validation::ValidationError;

/// Failure envelope for lookups whose primary dependency failed.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FailureBody {
    pub success: bool,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_output: Option<String>,
}

impl FailureBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
            username: None,
            ip: None,
            raw_output: None,
        }
    }

    pub fn with_username(mut self, username: &str) -> Self {
        self.username = Some(username.to_string());
        self
    }

    pub fn with_ip(mut self, ip: impl ToString) -> Self {
        self.ip = Some(ip.to_string());
        self
    }

    pub fn with_raw_output(mut self, raw_output: impl Into<String>) -> Self {
        self.raw_output = Some(raw_output.into());
        self
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or malformed request parameter (400).
    #[error(transparent)]
    InvalidInput(#[from] ValidationError),
    /// The primary external dependency failed and nothing useful remains (500).
    #[error("{}", .0.error)]
    Upstream(FailureBody),
    /// Anything unexpected; the detail is only logged (500).
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ApiError::Upstream(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match self {
            ApiError::InvalidInput(e) => (
                status,
                Json(json!({"success": false, "error": e.to_string()})),
            )
                .into_response(),
            ApiError::Upstream(body) => (status, Json(body)).into_response(),
            ApiError::Internal(detail) => {
                error!(%detail, "Internal server error");
                (
                    status,
                    Json(json!({"success": false, "error": "Internal server error"})),
                )
                    .into_response()
            }
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::from(ValidationError::InvalidEmail).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Upstream(FailureBody::new("IPwho.is API timeout")).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_failure_body_skips_absent_fields() {
        let body = FailureBody::new("Sherlock execution timed out").with_username("octocat");
        let value = serde_json::to_value(&body).unwrap();

        assert_eq!(
            value,
            json!({"success": false, "error": "Sherlock execution timed out", "username": "octocat"})
        );
    }
}
