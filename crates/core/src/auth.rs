//! Token lifecycle for the delivery platform API
//!
//! [`Authenticator`] fetches bearer tokens from `POST /oauth/token` and
//! renews them lazily. The session has two states:
//!
//! - **Unauthenticated**: no token yet, or the last fetch never succeeded
//! - **Authenticated**: a token plus the instant it stops being trusted
//!
//! [`Authenticator::validate`] is the only entry point resource calls need.
//! It is free while the token is fresh and performs one re-authentication
//! with the cached username and password once it is not.
//!
//! Concurrent `validate` calls near expiry share a single refresh: the
//! check-and-refresh sequence runs under an async mutex and waiters re-check
//! freshness once they acquire it.

use crate::clock::{Clock, SystemClock};
use crate::encoding::{encode_form_data, encode_multipart_related, MultipartBody};
use crate::error::{Error, Result};
use crate::transport::{Headers, HttpAdapter};
use chrono::{DateTime, Duration, Utc};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, PoisonError, RwLock};
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

/// Token endpoint path
pub const TOKEN_PATH: &str = "/oauth/token";

const GRANT_TYPE: &str = "password";

/// Token issued by the authentication endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    /// Bearer token
    pub access_token: String,
    /// Token type, usually `bearer`
    pub token_type: String,
    /// Granted scope
    #[serde(default)]
    pub scope: String,
    /// Lifetime reported by the server, in seconds
    #[serde(rename = "expires_in")]
    pub expires_in_seconds: i64,
}

/// How the token request body is framed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AuthEncoding {
    /// One `Content-ID: metadata` JSON part inside `multipart/related`
    #[default]
    MultipartRelated,
    /// Plain fields inside `multipart/form-data`
    FormData,
}

impl std::str::FromStr for AuthEncoding {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "multipart-related" | "related" | "json" => Ok(Self::MultipartRelated),
            "form-data" | "form" => Ok(Self::FormData),
            other => Err(Error::request(format!("unknown auth encoding: {other}"))),
        }
    }
}

/// How long a freshly issued token is trusted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpiryPolicy {
    /// Trust the token for a fixed window, ignoring `expires_in`
    Fixed(Duration),
    /// Trust the token for the server-reported `expires_in`
    ServerProvided,
}

impl Default for ExpiryPolicy {
    /// One hour, regardless of what the server reports
    fn default() -> Self {
        Self::Fixed(Duration::hours(1))
    }
}

impl ExpiryPolicy {
    /// Instant at which a token issued at `issued_at` must be renewed
    ///
    /// Fails with [`Error::TokenLifetime`] when the window does not fit the
    /// calendar range.
    pub fn expires_at(
        &self,
        issued_at: DateTime<Utc>,
        credentials: &Credentials,
    ) -> Result<DateTime<Utc>> {
        let window = match self {
            Self::Fixed(window) => *window,
            Self::ServerProvided => Duration::try_seconds(credentials.expires_in_seconds)
                .ok_or_else(|| {
                    Error::token_lifetime(format!(
                        "expires_in = {}",
                        credentials.expires_in_seconds
                    ))
                })?,
        };
        issued_at
            .checked_add_signed(window)
            .ok_or_else(|| Error::token_lifetime(format!("{issued_at} + {window}")))
    }
}

#[derive(Serialize)]
struct TokenRequest<'a> {
    client_id: &'a str,
    client_secret: &'a str,
    grant_type: &'a str,
    username: &'a str,
    password: &'a str,
}

#[derive(Default)]
struct Session {
    login: Option<(String, String)>,
    token: String,
    expires_at: Option<DateTime<Utc>>,
}

/// Authentication component holding the current bearer token
pub struct Authenticator {
    adapter: Arc<HttpAdapter>,
    client_id: String,
    client_secret: String,
    encoding: AuthEncoding,
    expiry: ExpiryPolicy,
    clock: Arc<dyn Clock>,
    session: RwLock<Session>,
    refresh: Mutex<()>,
}

impl std::fmt::Debug for Authenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Authenticator")
            .field("client_id", &self.client_id)
            .field("encoding", &self.encoding)
            .field("expiry", &self.expiry)
            .field("expires_at", &self.expires_at())
            .finish_non_exhaustive()
    }
}

impl Authenticator {
    /// Create an authenticator for one API client
    pub fn new(
        adapter: Arc<HttpAdapter>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            adapter,
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            encoding: AuthEncoding::default(),
            expiry: ExpiryPolicy::default(),
            clock: Arc::new(SystemClock),
            session: RwLock::new(Session::default()),
            refresh: Mutex::new(()),
        }
    }

    /// Builder-style method to set the token request framing
    #[must_use]
    pub fn with_encoding(mut self, encoding: AuthEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// Builder-style method to set the expiry policy
    #[must_use]
    pub fn with_expiry(mut self, expiry: ExpiryPolicy) -> Self {
        self.expiry = expiry;
        self
    }

    /// Builder-style method to set the time source
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Fetch a new token, whatever the current state
    ///
    /// On success the token is stored, its expiry computed from the
    /// [`ExpiryPolicy`], and `username`/`password` cached for silent renewal.
    /// On failure the previous session is left untouched.
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<Credentials> {
        let _guard = self.refresh.lock().await;
        self.fetch_token(username, password).await
    }

    /// Make sure a fresh token is held, renewing it if it expired
    ///
    /// Fails with [`Error::NotAuthenticated`] when renewal is needed but
    /// [`Authenticator::authenticate`] never succeeded.
    pub async fn validate(&self) -> Result<()> {
        if self.is_fresh() {
            return Ok(());
        }

        let _guard = self.refresh.lock().await;
        if self.is_fresh() {
            debug!("Token renewed by a concurrent caller");
            return Ok(());
        }

        let (username, password) = self.read().login.clone().ok_or(Error::NotAuthenticated)?;
        debug!("Token expired, re-authenticating");
        self.fetch_token(&username, &password).await.map(|_| ())
    }

    /// Current access token, empty if none was ever issued
    ///
    /// Performs no validation; call [`Authenticator::validate`] first.
    #[must_use]
    pub fn token(&self) -> String {
        self.read().token.clone()
    }

    /// Instant after which the current token is renewed
    #[must_use]
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.read().expires_at
    }

    /// Whether a token has ever been issued
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        !self.read().token.is_empty()
    }

    /// Token is held and the clock has not passed its expiry
    ///
    /// Exactly at `expires_at` the token is still fresh.
    fn is_fresh(&self) -> bool {
        let session = self.read();
        match session.expires_at {
            Some(expires_at) => !session.token.is_empty() && self.clock.now() <= expires_at,
            None => false,
        }
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Session> {
        self.session.read().unwrap_or_else(PoisonError::into_inner)
    }

    #[instrument(skip(self, password), fields(encoding = ?self.encoding))]
    async fn fetch_token(&self, username: &str, password: &str) -> Result<Credentials> {
        let body = self.token_request_body(username, password)?;
        let headers = Headers::new()
            .with(CONTENT_TYPE.as_str(), body.content_type())
            .with(ACCEPT.as_str(), "*/*");

        let response = self
            .adapter
            .do_request(Method::POST, TOKEN_PATH, Some(body.body), &headers)
            .await?;

        if response.status != 200 {
            warn!(status = response.status, "Token request rejected");
            return Err(Error::unauthorized(response.status, response.text()));
        }

        let credentials: Credentials =
            serde_json::from_slice(&response.body).map_err(|source| Error::Decode {
                what: "token response",
                source,
            })?;

        let issued_at = self.clock.now();
        let expires_at = self.expiry.expires_at(issued_at, &credentials)?;
        {
            let mut session = self.session.write().unwrap_or_else(PoisonError::into_inner);
            session.token.clone_from(&credentials.access_token);
            session.expires_at = Some(expires_at);
            session.login = Some((username.to_string(), password.to_string()));
        }

        info!(%expires_at, token_type = %credentials.token_type, "Authenticated");
        Ok(credentials)
    }

    fn token_request_body(&self, username: &str, password: &str) -> Result<MultipartBody> {
        match self.encoding {
            AuthEncoding::MultipartRelated => encode_multipart_related(Some(&TokenRequest {
                client_id: &self.client_id,
                client_secret: &self.client_secret,
                grant_type: GRANT_TYPE,
                username,
                password,
            })),
            AuthEncoding::FormData => encode_form_data(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("grant_type", GRANT_TYPE),
                ("username", username),
                ("password", password),
            ]),
        }
    }
}
