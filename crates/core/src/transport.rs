//! HTTP transport adapter
//!
//! [`HttpAdapter`] turns a method, a path, an optional body and a header list
//! into a fully buffered [`HttpResponse`]. The network itself sits behind the
//! [`HttpClient`] trait so it can be replaced in tests.
//!
//! A non-2xx status is not an error here. Endpoints disagree on what counts
//! as success (200, 201 and 202 all occur), so status interpretation is left
//! to the caller.
//!
//! # Example
//!
//! ```rust,no_run
//! use delivery_core::transport::{Headers, HttpAdapter};
//! use reqwest::Method;
//! use std::time::Duration;
//!
//! # async fn run() -> delivery_core::Result<()> {
//! let adapter = HttpAdapter::new("https://api.example.com", Duration::from_secs(30))?;
//! let response = adapter
//!     .do_request(Method::GET, "/v1.0/merchants", None, &Headers::new())
//!     .await?;
//! println!("{} -> {} bytes", response.status, response.body.len());
//! # Ok(())
//! # }
//! ```

use crate::error::{Error, Result};
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method, Url};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, instrument};

/// Ordered request headers with add semantics
///
/// Adding a name twice sends both values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers(Vec<(String, String)>);

impl Headers {
    /// Create an empty header list
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a header
    pub fn add(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.0.push((name.into(), value.into()));
        self
    }

    /// Builder-style variant of [`Headers::add`]
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.add(name, value);
        self
    }

    /// Builder-style `Authorization: Bearer <token>` header
    #[must_use]
    pub fn with_bearer(self, token: &str) -> Self {
        self.with(reqwest::header::AUTHORIZATION.as_str(), format!("Bearer {token}"))
    }

    /// First value stored under `name` (ASCII case-insensitive)
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Iterate over `(name, value)` pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of header entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no headers are set
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn to_header_map(&self) -> Result<HeaderMap> {
        let mut map = HeaderMap::with_capacity(self.0.len());
        for (name, value) in &self.0 {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| Error::request(format!("invalid header name {name:?}: {e}")))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| Error::request(format!("invalid value for header {name}: {e}")))?;
            map.append(name, value);
        }
        Ok(map)
    }
}

/// A request ready to hand to the network
#[derive(Debug, Clone)]
pub struct HttpRequest {
    /// HTTP verb
    pub method: Method,
    /// Absolute URL
    pub url: Url,
    /// Headers, possibly with repeated names
    pub headers: HeaderMap,
    /// Request body, `None` when nothing is sent
    pub body: Option<Bytes>,
    /// Per-request deadline overriding the client default
    pub timeout: Option<Duration>,
}

/// A fully buffered response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code
    pub status: u16,
    /// Entire response body
    pub body: Bytes,
}

impl HttpResponse {
    /// Create a response from a status and body
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Whether the status is in the 2xx range
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body as lossy UTF-8, for error messages
    #[must_use]
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Network client capability
///
/// Implementations send one request and buffer the whole response. Any
/// failure to reach the server or to read the body is a
/// [`Error::Transport`].
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Execute a single request
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse>;
}

/// [`HttpClient`] backed by `reqwest`
#[derive(Debug, Clone)]
pub struct ReqwestClient {
    inner: Client,
}

impl ReqwestClient {
    /// Build a client with a default timeout for every request
    pub fn new(timeout: Duration) -> Result<Self> {
        let inner = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("delivery-sdk/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { inner })
    }

    /// Wrap an already configured `reqwest::Client`
    #[must_use]
    pub fn from_client(inner: Client) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl HttpClient for ReqwestClient {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
        let mut builder = self
            .inner
            .request(request.method, request.url)
            .headers(request.headers);

        if let Some(body) = request.body {
            builder = builder.body(body);
        }
        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        // `bytes()` consumes the response, so the connection is released
        // whether or not the read succeeds.
        let body = response.bytes().await?;

        Ok(HttpResponse { status, body })
    }
}

/// Transport adapter bound to one base URL
#[derive(Clone)]
pub struct HttpAdapter {
    base_url: String,
    client: Arc<dyn HttpClient>,
}

impl std::fmt::Debug for HttpAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpAdapter")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl HttpAdapter {
    /// Create an adapter backed by `reqwest` with the given network timeout
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = ReqwestClient::new(timeout)?;
        Ok(Self::with_client(base_url, Arc::new(client)))
    }

    /// Create an adapter around any network client
    pub fn with_client(base_url: impl Into<String>, client: Arc<dyn HttpClient>) -> Self {
        Self {
            base_url: base_url.into(),
            client,
        }
    }

    /// The base URL every path is appended to
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send one request and return the buffered response
    ///
    /// `path` is appended to the base URL verbatim.
    pub async fn do_request(
        &self,
        method: Method,
        path: &str,
        body: Option<Bytes>,
        headers: &Headers,
    ) -> Result<HttpResponse> {
        self.do_request_with_timeout(method, path, body, headers, None)
            .await
    }

    /// Like [`HttpAdapter::do_request`] with an optional per-call deadline
    #[instrument(skip(self, body, headers), fields(base_url = %self.base_url))]
    pub async fn do_request_with_timeout(
        &self,
        method: Method,
        path: &str,
        body: Option<Bytes>,
        headers: &Headers,
        timeout: Option<Duration>,
    ) -> Result<HttpResponse> {
        let request = self.build_request(method, path, body, headers, timeout)?;

        let start = Instant::now();
        let result = self.client.execute(request).await;
        let elapsed = start.elapsed();

        match &result {
            Ok(response) => debug!(
                status = response.status,
                bytes = response.body.len(),
                elapsed_ms = elapsed.as_millis(),
                "Request completed"
            ),
            Err(e) => debug!(
                error = %e,
                elapsed_ms = elapsed.as_millis(),
                "Request failed"
            ),
        }

        result
    }

    fn build_request(
        &self,
        method: Method,
        path: &str,
        body: Option<Bytes>,
        headers: &Headers,
        timeout: Option<Duration>,
    ) -> Result<HttpRequest> {
        let raw = format!("{}{}", self.base_url, path);
        let url =
            Url::parse(&raw).map_err(|e| Error::request(format!("invalid URL {raw:?}: {e}")))?;

        Ok(HttpRequest {
            method,
            url,
            headers: headers.to_header_map()?,
            body,
            timeout,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeHttpClient;
    use proptest::prelude::*;
    use tokio_test::{assert_err, assert_ok};

    const BASE: &str = "https://api.example.com";

    fn adapter(fake: &Arc<FakeHttpClient>) -> HttpAdapter {
        HttpAdapter::with_client(BASE, fake.clone())
    }

    #[tokio::test]
    async fn test_canned_response_passes_through() {
        let fake = Arc::new(FakeHttpClient::new().reply(
            Method::GET,
            "/v1.0/merchants",
            200,
            r#"[{"id":"1","name":"Test"}]"#,
        ));

        let response = assert_ok!(
            adapter(&fake)
                .do_request(Method::GET, "/v1.0/merchants", None, &Headers::new())
                .await
        );

        assert_eq!(response.status, 200);
        assert_eq!(&response.body[..], br#"[{"id":"1","name":"Test"}]"#);
    }

    #[tokio::test]
    async fn test_non_success_status_is_not_an_error() {
        let fake =
            Arc::new(FakeHttpClient::new().reply(Method::DELETE, "/v1.0/thing", 404, "gone"));

        let response = assert_ok!(
            adapter(&fake)
                .do_request(Method::DELETE, "/v1.0/thing", None, &Headers::new())
                .await
        );

        assert_eq!(response.status, 404);
        assert!(!response.is_success());
        assert_eq!(response.text(), "gone");
    }

    #[tokio::test]
    async fn test_transport_failure_surfaces_error() {
        let fake = Arc::new(FakeHttpClient::new().fail(
            Method::GET,
            "/v1.0/merchants",
            "connection refused",
        ));

        let err = assert_err!(
            adapter(&fake)
                .do_request(Method::GET, "/v1.0/merchants", None, &Headers::new())
                .await
        );

        assert!(err.is_network());
    }

    #[tokio::test]
    async fn test_path_is_appended_verbatim() {
        let fake = Arc::new(FakeHttpClient::new());
        let _ = adapter(&fake)
            .do_request(Method::GET, "//v1.0//double", None, &Headers::new())
            .await;

        let calls = fake.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].url.as_str(), "https://api.example.com//v1.0//double");
    }

    #[tokio::test]
    async fn test_headers_use_add_semantics() {
        let fake = Arc::new(FakeHttpClient::new().reply(Method::POST, "/echo", 201, ""));
        let headers = Headers::new()
            .with("X-Tag", "a")
            .with("X-Tag", "b")
            .with_bearer("tok");

        assert_ok!(
            adapter(&fake)
                .do_request(Method::POST, "/echo", Some(Bytes::from_static(b"{}")), &headers)
                .await
        );

        let call = &fake.calls()[0];
        let tags: Vec<_> = call.headers.get_all("x-tag").iter().collect();
        assert_eq!(tags.len(), 2);
        assert_eq!(call.headers["authorization"], "Bearer tok");
        assert_eq!(call.body.as_deref(), Some(&b"{}"[..]));
    }

    #[tokio::test]
    async fn test_timeout_is_threaded_through() {
        let fake = Arc::new(FakeHttpClient::new());
        let _ = adapter(&fake)
            .do_request_with_timeout(
                Method::GET,
                "/slow",
                None,
                &Headers::new(),
                Some(Duration::from_millis(250)),
            )
            .await;

        assert_eq!(fake.calls()[0].timeout, Some(Duration::from_millis(250)));
    }

    #[tokio::test]
    async fn test_malformed_path_is_rejected_before_sending() {
        let fake = Arc::new(FakeHttpClient::new());

        let err = assert_err!(
            adapter(&fake)
                .do_request(Method::GET, " bad host", None, &Headers::new())
                .await
        );

        assert!(matches!(err, Error::RequestConstruction(_)));
        assert!(fake.calls().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_header_name_is_rejected() {
        let fake = Arc::new(FakeHttpClient::new());
        let headers = Headers::new().with("bad header", "x");

        let err = assert_err!(
            adapter(&fake)
                .do_request(Method::GET, "/v1.0/merchants", None, &headers)
                .await
        );

        assert!(err.is_malformed());
        assert!(fake.calls().is_empty());
    }

    #[test]
    fn test_headers_lookup_is_case_insensitive() {
        let headers = Headers::new().with("Content-Type", "application/json");
        assert_eq!(headers.get("content-type"), Some("application/json"));
        assert_eq!(headers.len(), 1);
        assert!(headers.get("accept").is_none());
    }

    proptest! {
        #[test]
        fn prop_response_bytes_and_status_unmodified(
            status in 100u16..600,
            body in proptest::collection::vec(any::<u8>(), 0..512),
            segment in "[a-z0-9]{1,16}",
        ) {
            let path = format!("/v1.0/{segment}");
            let fake =
                Arc::new(FakeHttpClient::new().reply(Method::PUT, &path, status, body.clone()));
            let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();

            let response = runtime
                .block_on(adapter(&fake).do_request(Method::PUT, &path, None, &Headers::new()))
                .unwrap();

            prop_assert_eq!(response.status, status);
            prop_assert_eq!(&response.body[..], &body[..]);
        }
    }
}
