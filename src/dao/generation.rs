//! Provider-independent failures of a generative backend.

use std::error::Error;
use thiserror::Error;

/// Result alias for calls to a generative backend.
pub type GenerationResult<T> = Result<T, GenerationError>;

/// Error raised by question sources regardless of the underlying provider.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// The request could not be completed (transport, status, decoding).
    #[error("generative backend unavailable: {message}")]
    Unavailable {
        /// Short description of the failed step.
        message: String,
        /// Underlying provider error.
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },
    /// The backend answered without any usable text.
    #[error("generative backend returned an empty response")]
    EmptyResponse,
}

impl GenerationError {
    /// Construct an unavailable error from any backend failure.
    pub fn unavailable(message: String, source: impl Error + Send + Sync + 'static) -> Self {
        GenerationError::Unavailable {
            message,
            source: Box::new(source),
        }
    }
}
