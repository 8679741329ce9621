//! Test doubles for the request pipeline
//!
//! [`FakeHttpClient`] stands in for the network: each `(method, path)` pair
//! maps to a queue of canned replies, consumed in order, with the last one
//! repeating. Every request is recorded for later assertions.

use crate::clock::Clock;
use crate::error::{Error, Result};
use crate::transport::{HttpClient, HttpRequest, HttpResponse};
use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Duration, Utc};
use reqwest::Method;
use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, PoisonError};

#[derive(Debug, Clone)]
enum Canned {
    Response { status: u16, body: Bytes },
    Failure(String),
}

impl Canned {
    fn produce(&self) -> Result<HttpResponse> {
        match self {
            Self::Response { status, body } => Ok(HttpResponse::new(*status, body.clone())),
            Self::Failure(message) => Err(Error::transport(message.clone())),
        }
    }
}

/// Table-driven fake network client
#[derive(Debug, Default)]
pub struct FakeHttpClient {
    routes: Mutex<HashMap<(Method, String), VecDeque<Canned>>>,
    calls: Mutex<Vec<HttpRequest>>,
}

impl FakeHttpClient {
    /// Create a fake with no routes; unmatched requests fail as transport errors
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a canned response for `method path`
    #[must_use]
    pub fn reply(
        self,
        method: Method,
        path: impl Into<String>,
        status: u16,
        body: impl Into<Bytes>,
    ) -> Self {
        self.push(
            method,
            path.into(),
            Canned::Response {
                status,
                body: body.into(),
            },
        )
    }

    /// Queue a transport failure for `method path`
    #[must_use]
    pub fn fail(self, method: Method, path: impl Into<String>, message: impl Into<String>) -> Self {
        self.push(method, path.into(), Canned::Failure(message.into()))
    }

    fn push(self, method: Method, path: String, canned: Canned) -> Self {
        self.routes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry((method, path))
            .or_default()
            .push_back(canned);
        self
    }

    /// Every request seen so far, in order
    #[must_use]
    pub fn calls(&self) -> Vec<HttpRequest> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of requests seen for `method path`
    #[must_use]
    pub fn call_count(&self, method: &Method, path: &str) -> usize {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|call| call.method == *method && route_path(call) == path)
            .count()
    }

    fn next_reply(&self, method: &Method, path: &str) -> Option<Canned> {
        let mut routes = self.routes.lock().unwrap_or_else(PoisonError::into_inner);
        let queue = routes.get_mut(&(method.clone(), path.to_string()))?;
        if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        }
    }
}

/// Path plus query, the key routes are matched on
fn route_path(request: &HttpRequest) -> String {
    match request.url.query() {
        Some(query) => format!("{}?{}", request.url.path(), query),
        None => request.url.path().to_string(),
    }
}

#[async_trait]
impl HttpClient for FakeHttpClient {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
        let path = route_path(&request);
        let reply = self.next_reply(&request.method, &path);
        let method = request.method.clone();
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request);

        match reply {
            Some(canned) => canned.produce(),
            None => Err(Error::transport(format!("no canned reply for {method} {path}"))),
        }
    }
}

/// Clock that only moves when told to
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    /// Start the clock at `start`
    #[must_use]
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    /// Move the clock forward
    pub fn advance(&self, by: Duration) {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner) += by;
    }

    /// Jump to an absolute instant
    pub fn set(&self, to: DateTime<Utc>) {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner) = to;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
