//! Service and HTTP error types.

use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

use crate::services::generation_service::GenerationExhausted;

/// Errors that can occur in service layer operations.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// No generative backend is installed.
    #[error("quiz generation unavailable (degraded mode)")]
    Degraded,
    /// Invalid input provided by the client.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// Operation cannot be performed in the current state.
    #[error("invalid state: {0}")]
    InvalidState(String),
    /// Every generation attempt failed.
    #[error("quiz generation failed")]
    GenerationFailed(#[source] GenerationExhausted),
}

impl From<GenerationExhausted> for ServiceError {
    fn from(err: GenerationExhausted) -> Self {
        ServiceError::GenerationFailed(err)
    }
}

/// Application-level errors that are converted to HTTP responses.
#[derive(Debug, Error)]
pub enum AppError {
    /// Bad request with invalid input.
    #[error("{0}")]
    BadRequest(String),
    /// Conflict with current state.
    #[error("{0}")]
    Conflict(String),
    /// Service unavailable or degraded.
    #[error("{0}")]
    ServiceUnavailable(String),
    /// Internal server error. The message is safe to show to the caller.
    #[error("{0}")]
    Internal(String),
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Degraded => {
                AppError::ServiceUnavailable("quiz generation is not configured".into())
            }
            ServiceError::InvalidInput(message) => AppError::BadRequest(message),
            ServiceError::InvalidState(message) => AppError::Conflict(message),
            // The cause was logged by the pipeline; callers only learn that it failed.
            ServiceError::GenerationFailed(_) => AppError::Internal("AI failed".into()),
        }
    }
}

/// JSON body returned with every error status.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Always `false`.
    pub success: bool,
    /// What went wrong, safe to display.
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let payload = Json(ErrorBody {
            success: false,
            message: self.to_string(),
        });

        (status, payload).into_response()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::services::generation_service::AttemptError;

    #[test]
    fn service_errors_map_to_expected_statuses() {
        let cases = [
            (
                ServiceError::InvalidInput("No text provided".into()),
                StatusCode::BAD_REQUEST,
            ),
            (
                ServiceError::InvalidState("busy".into()),
                StatusCode::CONFLICT,
            ),
            (ServiceError::Degraded, StatusCode::SERVICE_UNAVAILABLE),
            (
                ServiceError::GenerationFailed(GenerationExhausted {
                    attempts: 3,
                    last_error: AttemptError::Timeout(Duration::from_secs(60)),
                }),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            let response = AppError::from(err).into_response();
            assert_eq!(response.status(), expected);
        }
    }

    #[test]
    fn missing_text_message_is_passed_through() {
        let err = AppError::from(ServiceError::InvalidInput("No text provided".into()));
        assert_eq!(err.to_string(), "No text provided");
    }

    #[test]
    fn generation_failure_hides_the_cause() {
        let err = AppError::from(ServiceError::GenerationFailed(GenerationExhausted {
            attempts: 3,
            last_error: AttemptError::Timeout(Duration::from_secs(60)),
        }));
        assert_eq!(err.to_string(), "AI failed");
    }
}
