//! Error types raised by the Gemini question source.

use reqwest::StatusCode;
use thiserror::Error;

use crate::dao::generation::GenerationError;

/// Convenient result alias returning [`GeminiError`] failures.
pub type GeminiResult<T> = Result<T, GeminiError>;

/// Failures that can occur while talking to the Gemini API.
#[derive(Debug, Error)]
pub enum GeminiError {
    /// Required environment variable is missing.
    #[error("missing Gemini environment variable `{var}`")]
    MissingEnvVar {
        /// Name of the variable.
        var: &'static str,
    },
    /// Building the HTTP client failed (invalid TLS setup, etc).
    #[error("failed to build Gemini client")]
    ClientBuilder {
        /// Underlying reqwest error.
        #[source]
        source: reqwest::Error,
    },
    /// The request could not be sent.
    #[error("failed to send Gemini request for model `{model}`")]
    RequestSend {
        /// Model the request targeted.
        model: String,
        /// Underlying reqwest error.
        #[source]
        source: reqwest::Error,
    },
    /// Gemini answered with a non-success status.
    #[error("unexpected Gemini response status {status} for model `{model}`")]
    RequestStatus {
        /// Model the request targeted.
        model: String,
        /// Status returned by the API.
        status: StatusCode,
    },
    /// Response payload could not be parsed into JSON.
    #[error("failed to decode Gemini response for model `{model}`")]
    DecodeResponse {
        /// Model the request targeted.
        model: String,
        /// Underlying reqwest error.
        #[source]
        source: reqwest::Error,
    },
    /// The response carried no candidate text.
    #[error("Gemini returned no candidate text")]
    EmptyCandidate,
}

impl From<GeminiError> for GenerationError {
    fn from(err: GeminiError) -> Self {
        match err {
            GeminiError::EmptyCandidate => GenerationError::EmptyResponse,
            other => GenerationError::unavailable("Gemini request failed".into(), other),
        }
    }
}
