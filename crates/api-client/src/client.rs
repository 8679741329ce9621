//! Main API client implementation

use crate::config::ClientConfig;
use crate::endpoints::{CatalogApi, EventsApi, MerchantsApi, OrdersApi};
use crate::error::{ApiError, ApiResult};
use delivery_core::encoding::encode_json;
use delivery_core::{
    Authenticator, Credentials, ExpiryPolicy, Headers, HttpAdapter, HttpResponse,
};
use reqwest::header::CONTENT_TYPE;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// Delivery platform API client
///
/// Builds one transport adapter and one authenticator and hands both to
/// every resource service it creates. Cloning is cheap and clones share the
/// same token.
#[derive(Clone, Debug)]
pub struct DeliveryClient {
    adapter: Arc<HttpAdapter>,
    auth: Arc<Authenticator>,
}

impl DeliveryClient {
    /// Create a new client with configuration from environment
    pub fn new() -> ApiResult<Self> {
        let config = ClientConfig::from_env()?;
        Self::with_config(config)
    }

    /// Create a new client with specific configuration
    pub fn with_config(config: ClientConfig) -> ApiResult<Self> {
        config.validate()?;

        let adapter = Arc::new(HttpAdapter::new(config.base_url, config.timeout)?);
        let expiry = match config.token_window {
            Some(window) => ExpiryPolicy::Fixed(
                chrono::Duration::from_std(window)
                    .map_err(|e| ApiError::config(format!("token_window out of range: {e}")))?,
            ),
            None => ExpiryPolicy::ServerProvided,
        };
        let auth = Authenticator::new(adapter.clone(), config.client_id, config.client_secret)
            .with_encoding(config.auth_encoding)
            .with_expiry(expiry);

        Ok(Self::from_parts(adapter, Arc::new(auth)))
    }

    /// Assemble a client from pre-built parts
    #[must_use]
    pub fn from_parts(adapter: Arc<HttpAdapter>, auth: Arc<Authenticator>) -> Self {
        Self { adapter, auth }
    }

    /// Log in and cache the credentials for silent renewal
    pub async fn authenticate(&self, username: &str, password: &str) -> ApiResult<Credentials> {
        Ok(self.auth.authenticate(username, password).await?)
    }

    /// Shared authenticator
    #[must_use]
    pub fn auth(&self) -> &Arc<Authenticator> {
        &self.auth
    }

    /// Shared transport adapter
    #[must_use]
    pub fn adapter(&self) -> &Arc<HttpAdapter> {
        &self.adapter
    }

    // -------------------------------------------------------------------------
    // Endpoint API accessors
    // -------------------------------------------------------------------------

    /// Access merchant endpoints
    #[must_use]
    pub fn merchants(&self) -> MerchantsApi {
        MerchantsApi::new(self.adapter.clone(), self.auth.clone())
    }

    /// Access catalog endpoints
    #[must_use]
    pub fn catalog(&self) -> CatalogApi {
        CatalogApi::new(self.adapter.clone(), self.auth.clone())
    }

    /// Access order endpoints
    #[must_use]
    pub fn orders(&self) -> OrdersApi {
        OrdersApi::new(self.adapter.clone(), self.auth.clone())
    }

    /// Access event polling endpoints
    #[must_use]
    pub fn events(&self) -> EventsApi {
        EventsApi::new(self.adapter.clone(), self.auth.clone())
    }
}

/// Authenticated request helper shared by the resource services
///
/// Every call validates the token first, so a failed renewal means the
/// resource endpoint is never contacted.
#[derive(Clone, Debug)]
pub(crate) struct Requester {
    adapter: Arc<HttpAdapter>,
    auth: Arc<Authenticator>,
}

impl Requester {
    pub(crate) fn new(adapter: Arc<HttpAdapter>, auth: Arc<Authenticator>) -> Self {
        Self { adapter, auth }
    }

    /// Send a request and check its status against `expected`
    #[instrument(skip(self, body, expected))]
    pub(crate) async fn send<B: Serialize + ?Sized>(
        &self,
        operation: &str,
        method: Method,
        path: &str,
        body: Option<&B>,
        expected: &[u16],
    ) -> ApiResult<HttpResponse> {
        self.auth.validate().await?;

        let mut headers = Headers::new().with_bearer(&self.auth.token());
        let payload = match body {
            Some(body) => {
                headers.add(CONTENT_TYPE.as_str(), "application/json");
                Some(encode_json(Some(body))?)
            }
            None => None,
        };

        let response = self
            .adapter
            .do_request(method, path, payload, &headers)
            .await?;

        if !expected.contains(&response.status) {
            warn!(status = response.status, "Unexpected status");
            return Err(ApiError::unexpected_status(
                operation,
                response.status,
                response.text(),
            ));
        }

        debug!(status = response.status, "Request succeeded");
        Ok(response)
    }

    /// Send a request and decode the JSON success body
    pub(crate) async fn send_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        operation: &str,
        method: Method,
        path: &str,
        body: Option<&B>,
        expected: u16,
    ) -> ApiResult<T> {
        let response = self.send(operation, method, path, body, &[expected]).await?;
        Ok(serde_json::from_slice(&response.body)?)
    }

    /// GET a JSON resource answered with 200
    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        operation: &str,
        path: &str,
    ) -> ApiResult<T> {
        self.send_json(operation, Method::GET, path, Option::<&()>::None, 200)
            .await
    }
}

/// Reject blank body fields
pub(crate) fn require_non_empty(name: &str, value: &str) -> ApiResult<()> {
    if value.trim().is_empty() {
        return Err(ApiError::invalid_argument(format!("{name} cannot be empty")));
    }
    Ok(())
}

/// Reject identifiers that are empty or would change the path they are placed in
pub(crate) fn require(name: &str, value: &str) -> ApiResult<()> {
    require_non_empty(name, value)?;
    if value == "." || value == ".." || value.contains(['/', '?', '#']) {
        return Err(ApiError::invalid_argument(format!(
            "{name} is not a single path segment: {value:?}"
        )));
    }
    Ok(())
}
