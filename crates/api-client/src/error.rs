//! Error types for the API client

use thiserror::Error;

/// Result type alias for API operations
pub type ApiResult<T> = Result<T, ApiError>;

/// API client errors
#[derive(Error, Debug)]
pub enum ApiError {
    /// Request pipeline failure (transport, encoding, authentication)
    #[error(transparent)]
    Core(#[from] delivery_core::Error),

    /// Endpoint answered with a status other than its success status
    #[error("{operation} failed ({status}): {message}")]
    UnexpectedStatus {
        /// Operation that was attempted
        operation: String,
        /// HTTP status code
        status: u16,
        /// Response body, as text
        message: String,
    },

    /// JSON deserialization of a success response failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// An argument was rejected before any request was sent
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Missing environment variable
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
}

impl ApiError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a missing env var error
    pub fn missing_env(var: impl Into<String>) -> Self {
        Self::MissingEnvVar(var.into())
    }

    /// Create an invalid argument error
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Create an unexpected status error
    pub fn unexpected_status(
        operation: impl Into<String>,
        status: u16,
        message: impl Into<String>,
    ) -> Self {
        Self::UnexpectedStatus {
            operation: operation.into(),
            status,
            message: message.into(),
        }
    }

    /// HTTP status of a rejected call, if any
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::UnexpectedStatus { status, .. }
            | Self::Core(delivery_core::Error::Unauthorized { status, .. }) => Some(*status),
            _ => None,
        }
    }

    /// Check if this is a client error (4xx)
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::UnexpectedStatus { status, .. } if (400..500).contains(status))
    }

    /// Check if this is a server error (5xx)
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        matches!(self, Self::UnexpectedStatus { status, .. } if *status >= 500)
    }

    /// Credentials were rejected, missing, or the token was refused
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        match self {
            Self::Core(e) => e.is_auth(),
            Self::UnexpectedStatus { status, .. } => *status == 401,
            _ => false,
        }
    }

    /// The network could not be reached
    #[must_use]
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Core(e) if e.is_network())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classification() {
        let not_found = ApiError::unexpected_status("get merchant", 404, "not found");
        assert!(not_found.is_client_error());
        assert!(!not_found.is_server_error());
        assert_eq!(not_found.status(), Some(404));

        let outage = ApiError::unexpected_status("poll events", 503, "");
        assert!(outage.is_server_error());
    }

    #[test]
    fn test_unauthorized_detection() {
        let rejected: ApiError = delivery_core::Error::unauthorized(400, "invalid_grant").into();
        assert!(rejected.is_unauthorized());
        assert_eq!(rejected.status(), Some(400));

        assert!(ApiError::from(delivery_core::Error::NotAuthenticated).is_unauthorized());
        assert!(ApiError::unexpected_status("list merchants", 401, "").is_unauthorized());
        assert!(!ApiError::invalid_argument("empty id").is_unauthorized());
    }

    #[test]
    fn test_display() {
        let err = ApiError::unexpected_status("confirm order 42", 409, "already confirmed");
        assert_eq!(err.to_string(), "confirm order 42 failed (409): already confirmed");
    }
}
