//! Configuration for the delivery platform API client
//!
//! Supports environment-based configuration with sensible defaults.

use crate::error::{ApiError, ApiResult};
use delivery_core::AuthEncoding;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

/// Default production API URL
const DEFAULT_API_URL: &str = "https://merchant-api.example.com";

/// Default token trust window (seconds)
const DEFAULT_TOKEN_WINDOW_SECS: u64 = 3600;

/// Longest token trust window accepted (30 days)
const MAX_TOKEN_WINDOW_SECS: u64 = 30 * 24 * 3600;

/// Client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL every endpoint path is appended to
    pub base_url: String,
    /// Network timeout for each request
    #[serde(with = "duration_secs")]
    pub timeout: Duration,
    /// OAuth client ID
    pub client_id: String,
    /// OAuth client secret
    #[serde(default, skip_serializing)]
    pub client_secret: String,
    /// Token request framing expected by the targeted API generation
    pub auth_encoding: AuthEncoding,
    /// How long an issued token is trusted; `None` uses the server's `expires_in`
    #[serde(with = "option_duration_secs")]
    pub token_window: Option<Duration>,
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        duration.as_secs().serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

mod option_duration_secs {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    #[allow(clippy::ref_option)]
    pub fn serialize<S: Serializer>(
        duration: &Option<Duration>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        duration.map(|d| d.as_secs()).serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Duration>, D::Error> {
        let secs = Option::<u64>::deserialize(deserializer)?;
        Ok(secs.map(Duration::from_secs))
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout: Duration::from_secs(30),
            client_id: String::new(),
            client_secret: String::new(),
            auth_encoding: AuthEncoding::default(),
            token_window: Some(Duration::from_secs(DEFAULT_TOKEN_WINDOW_SECS)),
        }
    }
}

impl ClientConfig {
    /// Create configuration from environment variables
    ///
    /// Reads the following environment variables:
    /// - `DELIVERY_API_URL`: Base URL (optional)
    /// - `DELIVERY_CLIENT_ID`: OAuth client ID (required)
    /// - `DELIVERY_CLIENT_SECRET`: OAuth client secret (required)
    /// - `DELIVERY_TIMEOUT_SECS`: Request timeout in seconds
    /// - `DELIVERY_AUTH_ENCODING`: `multipart-related` or `form-data`
    /// - `DELIVERY_TOKEN_WINDOW_SECS`: Token trust window, `server` to use `expires_in`
    pub fn from_env() -> ApiResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Create configuration from an arbitrary variable lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> ApiResult<Self> {
        let defaults = Self::default();

        let base_url = lookup("DELIVERY_API_URL").unwrap_or(defaults.base_url);
        let client_id = lookup("DELIVERY_CLIENT_ID")
            .ok_or_else(|| ApiError::missing_env("DELIVERY_CLIENT_ID"))?;
        let client_secret = lookup("DELIVERY_CLIENT_SECRET")
            .ok_or_else(|| ApiError::missing_env("DELIVERY_CLIENT_SECRET"))?;

        let timeout = match lookup("DELIVERY_TIMEOUT_SECS") {
            Some(secs) => Duration::from_secs(
                secs.parse()
                    .map_err(|_| ApiError::config(format!("invalid timeout: {secs}")))?,
            ),
            None => defaults.timeout,
        };

        let auth_encoding = match lookup("DELIVERY_AUTH_ENCODING") {
            Some(value) => value
                .parse()
                .map_err(|_| ApiError::config(format!("unknown auth encoding: {value}")))?,
            None => defaults.auth_encoding,
        };

        let token_window = match lookup("DELIVERY_TOKEN_WINDOW_SECS").as_deref() {
            Some("server") => None,
            Some(secs) => Some(Duration::from_secs(secs.parse().map_err(|_| {
                ApiError::config(format!("invalid token window: {secs}"))
            })?)),
            None => defaults.token_window,
        };

        Ok(Self {
            base_url,
            timeout,
            client_id,
            client_secret,
            auth_encoding,
            token_window,
        })
    }

    /// Builder-style method to set base URL
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Builder-style method to set client credentials
    #[must_use]
    pub fn with_client_credentials(
        mut self,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        self.client_id = client_id.into();
        self.client_secret = client_secret.into();
        self
    }

    /// Builder-style method to set timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Builder-style method to set the token request framing
    #[must_use]
    pub fn with_auth_encoding(mut self, encoding: AuthEncoding) -> Self {
        self.auth_encoding = encoding;
        self
    }

    /// Builder-style method to set the token trust window
    #[must_use]
    pub fn with_token_window(mut self, window: Option<Duration>) -> Self {
        self.token_window = window;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> ApiResult<()> {
        if self.base_url.is_empty() {
            return Err(ApiError::config("base_url cannot be empty"));
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ApiError::config("base_url must start with http:// or https://"));
        }

        if self.timeout.is_zero() {
            return Err(ApiError::config("timeout cannot be zero"));
        }

        if self.client_id.is_empty() || self.client_secret.is_empty() {
            return Err(ApiError::config("client_id and client_secret are required"));
        }

        if self.token_window.is_some_and(|w| w.is_zero()) {
            return Err(ApiError::config("token_window cannot be zero"));
        }

        if self
            .token_window
            .is_some_and(|w| w.as_secs() > MAX_TOKEN_WINDOW_SECS)
        {
            return Err(ApiError::config(format!(
                "token_window cannot exceed {MAX_TOKEN_WINDOW_SECS} seconds"
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert!(config.base_url.starts_with("https://"));
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.token_window, Some(Duration::from_secs(3600)));
        assert_eq!(config.auth_encoding, AuthEncoding::MultipartRelated);
    }

    #[test]
    fn test_from_lookup() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("DELIVERY_API_URL", "http://localhost:8080"),
            ("DELIVERY_CLIENT_ID", "id"),
            ("DELIVERY_CLIENT_SECRET", "secret"),
            ("DELIVERY_TIMEOUT_SECS", "5"),
            ("DELIVERY_AUTH_ENCODING", "form-data"),
            ("DELIVERY_TOKEN_WINDOW_SECS", "server"),
        ]))
        .unwrap();

        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.auth_encoding, AuthEncoding::FormData);
        assert_eq!(config.token_window, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_lookup_requires_credentials() {
        let err = ClientConfig::from_lookup(lookup(&[("DELIVERY_CLIENT_ID", "id")])).unwrap_err();
        assert!(matches!(err, ApiError::MissingEnvVar(ref var) if var == "DELIVERY_CLIENT_SECRET"));
    }

    #[test]
    fn test_from_lookup_rejects_bad_values() {
        let base = [("DELIVERY_CLIENT_ID", "id"), ("DELIVERY_CLIENT_SECRET", "s")];

        let mut vars = base.to_vec();
        vars.push(("DELIVERY_AUTH_ENCODING", "soap"));
        assert!(ClientConfig::from_lookup(lookup(&vars)).is_err());

        let mut vars = base.to_vec();
        vars.push(("DELIVERY_TOKEN_WINDOW_SECS", "soon"));
        assert!(ClientConfig::from_lookup(lookup(&vars)).is_err());

        let mut vars = base.to_vec();
        vars.push(("DELIVERY_TIMEOUT_SECS", "30s"));
        let err = ClientConfig::from_lookup(lookup(&vars)).unwrap_err();
        assert!(matches!(err, ApiError::Config(ref msg) if msg == "invalid timeout: 30s"));
    }

    #[test]
    fn test_token_window_upper_bound() {
        let valid = ClientConfig::default().with_client_credentials("id", "secret");
        let month = Duration::from_secs(MAX_TOKEN_WINDOW_SECS);

        assert!(valid.clone().with_token_window(Some(month)).validate().is_ok());
        assert!(valid.clone().with_token_window(None).validate().is_ok());
        let err = valid
            .with_token_window(Some(Duration::from_secs(1_000_000_000_000_000)))
            .validate()
            .unwrap_err();
        assert!(matches!(err, ApiError::Config(_)));
    }

    #[test]
    fn test_from_lookup_accepts_huge_window_but_validate_rejects_it() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("DELIVERY_CLIENT_ID", "id"),
            ("DELIVERY_CLIENT_SECRET", "secret"),
            ("DELIVERY_TOKEN_WINDOW_SECS", "1000000000000000"),
        ]))
        .unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_builder_pattern() {
        let config = ClientConfig::default()
            .with_base_url("https://sandbox.example.com")
            .with_client_credentials("id", "secret")
            .with_timeout(Duration::from_secs(60));

        assert_eq!(config.base_url, "https://sandbox.example.com");
        assert_eq!(config.timeout, Duration::from_secs(60));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation() {
        let valid = ClientConfig::default().with_client_credentials("id", "secret");
        assert!(valid.validate().is_ok());

        assert!(valid.clone().with_base_url("").validate().is_err());
        assert!(valid.clone().with_base_url("ftp://x").validate().is_err());
        assert!(valid.clone().with_timeout(Duration::ZERO).validate().is_err());
        assert!(ClientConfig::default().validate().is_err());
    }

    #[test]
    fn test_secret_is_not_serialized() {
        let config = ClientConfig::default().with_client_credentials("id", "hunter2");
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("hunter2"));
        assert!(json.contains("\"timeout\":30"));
    }
}
