//! Error taxonomy for the authenticated request pipeline
//!
//! Callers can tell apart "could not reach the network", "could not
//! authenticate" and "request malformed" through the classifier methods
//! on [`Error`].

use thiserror::Error;

/// Boxed source error carried by transport failures
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core pipeline errors
#[derive(Error, Debug)]
pub enum Error {
    /// Method, path, headers or body could not form a valid request
    #[error("Invalid request: {0}")]
    RequestConstruction(String),

    /// The network call itself failed (DNS, refused connection, timeout, TLS)
    #[error("Transport failure: {message}")]
    Transport {
        /// Human-readable description
        message: String,
        /// Underlying network error, when one exists
        #[source]
        source: Option<BoxError>,
    },

    /// An encoder was handed no data
    #[error("No payload supplied")]
    NilPayload,

    /// Payload could not be serialized or framed
    #[error("Encoding failed: {0}")]
    Encoding(String),

    /// The token endpoint rejected the credentials
    #[error("Authentication rejected ({status}): {message}")]
    Unauthorized {
        /// HTTP status returned by the token endpoint
        status: u16,
        /// Response body, as text
        message: String,
    },

    /// A response body could not be decoded
    #[error("Failed to decode {what}: {source}")]
    Decode {
        /// What was being decoded
        what: &'static str,
        /// JSON error
        #[source]
        source: serde_json::Error,
    },

    /// An issued token's expiry instant cannot be represented
    #[error("Token lifetime out of range: {0}")]
    TokenLifetime(String),

    /// Token renewal was requested before any successful authentication
    #[error("No cached credentials - authenticate before validating the session")]
    NotAuthenticated,
}

impl Error {
    /// Create a request construction error
    pub fn request(msg: impl Into<String>) -> Self {
        Self::RequestConstruction(msg.into())
    }

    /// Create a transport error without an underlying source
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport {
            message: msg.into(),
            source: None,
        }
    }

    /// Create an encoding error
    pub fn encoding(msg: impl Into<String>) -> Self {
        Self::Encoding(msg.into())
    }

    /// Create a token lifetime error
    pub fn token_lifetime(msg: impl Into<String>) -> Self {
        Self::TokenLifetime(msg.into())
    }

    /// Create an authentication rejection
    pub fn unauthorized(status: u16, message: impl Into<String>) -> Self {
        Self::Unauthorized {
            status,
            message: message.into(),
        }
    }

    /// The network could not be reached
    #[must_use]
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }

    /// Credentials were rejected or are missing
    #[must_use]
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Unauthorized { .. } | Self::NotAuthenticated)
    }

    /// The caller handed in something that cannot be sent
    #[must_use]
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            Self::RequestConstruction(_) | Self::NilPayload | Self::Encoding(_)
        )
    }

    /// Whether the transport failure was a deadline expiry
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::Transport {
                source: Some(source),
                ..
            } => source
                .downcast_ref::<reqwest::Error>()
                .is_some_and(reqwest::Error::is_timeout),
            _ => false,
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_builder() {
            return Self::RequestConstruction(err.to_string());
        }
        Self::Transport {
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classifiers() {
        assert!(Error::transport("connection refused").is_network());
        assert!(Error::unauthorized(401, "bad credentials").is_auth());
        assert!(Error::NotAuthenticated.is_auth());
        assert!(Error::request("bad path").is_malformed());
        assert!(Error::NilPayload.is_malformed());
        assert!(!Error::NilPayload.is_network());
    }

    #[test]
    fn test_display() {
        let err = Error::unauthorized(400, "invalid_grant");
        assert_eq!(err.to_string(), "Authentication rejected (400): invalid_grant");
        assert!(!Error::transport("dns").is_timeout());

        let err = Error::token_lifetime("expires_in = 9223372036854775807");
        assert_eq!(
            err.to_string(),
            "Token lifetime out of range: expires_in = 9223372036854775807"
        );
        assert!(!err.is_network());
    }
}
