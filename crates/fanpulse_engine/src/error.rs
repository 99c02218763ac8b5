use fanpulse_core::ValidationError;
use thiserror::Error;

/// Failure of one gateway request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The request never got a response.
    #[error("cannot reach server: {0}")]
    NetworkUnreachable(String),
    /// The server answered with a non-2xx status.
    #[error("request failed with status {status}: {}", .message.as_deref().unwrap_or("no details"))]
    Http {
        status: u16,
        /// Backend-supplied `message`, when the error body carried one.
        message: Option<String>,
    },
    /// Serialization faults and anything else that is not the network's fault.
    #[error("unexpected error: {0}")]
    Unexpected(String),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Backend message when present, otherwise a generic description.
    pub fn message(&self) -> String {
        match self {
            ApiError::Http {
                message: Some(message),
                ..
            } => message.clone(),
            other => other.to_string(),
        }
    }
}

/// Error returned by session operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DashboardError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Api(#[from] ApiError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid base url {url:?}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },
    #[error("api key contains characters not allowed in a header")]
    InvalidApiKey,
    #[error("invalid timeout {0:?}, expected whole seconds")]
    InvalidTimeout(String),
    #[error("failed to build http client: {0}")]
    Client(String),
}
