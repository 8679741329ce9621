//! Event polling endpoints
//!
//! The platform queues order events per merchant. Polling returns what is
//! pending; acknowledged events are removed from the queue.

use crate::client::Requester;
use crate::error::ApiResult;
use delivery_core::{Authenticator, HttpAdapter};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

const NO_CONTENT: u16 = 204;

/// Events API interface
#[derive(Clone, Debug)]
pub struct EventsApi {
    requester: Requester,
}

impl EventsApi {
    /// Create an events API interface over shared pipeline parts
    #[must_use]
    pub fn new(adapter: Arc<HttpAdapter>, auth: Arc<Authenticator>) -> Self {
        Self {
            requester: Requester::new(adapter, auth),
        }
    }

    /// Fetch pending events
    ///
    /// GET /v3.0/events:polling. An empty queue answers 204.
    pub async fn poll(&self) -> ApiResult<Vec<Event>> {
        let response = self
            .requester
            .send(
                "poll events",
                Method::GET,
                "/v3.0/events:polling",
                Option::<&()>::None,
                &[200, NO_CONTENT],
            )
            .await?;

        if response.status == NO_CONTENT || response.body.is_empty() {
            return Ok(Vec::new());
        }

        let events: Vec<Event> = serde_json::from_slice(&response.body)?;
        debug!(count = events.len(), "Polled events");
        Ok(events)
    }

    /// Remove events from the queue
    ///
    /// POST /v1.0/events/acknowledgment. Nothing is sent for an empty slice.
    pub async fn acknowledge(&self, events: &[Event]) -> ApiResult<()> {
        if events.is_empty() {
            return Ok(());
        }

        let body: Vec<Acknowledgment<'_>> = events
            .iter()
            .map(|event| Acknowledgment { id: &event.id })
            .collect();

        self.requester
            .send(
                &format!("acknowledge {} events", events.len()),
                Method::POST,
                "/v1.0/events/acknowledgment",
                Some(body.as_slice()),
                &[200],
            )
            .await?;
        Ok(())
    }
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Order event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    /// Short event code, e.g. `PLC` for placed
    pub code: String,
    #[serde(rename = "fullCode", default)]
    pub full_code: Option<String>,
    #[serde(rename = "orderId")]
    pub order_id: String,
    #[serde(rename = "createdAt", default)]
    pub created_at: Option<String>,
}

#[derive(Serialize)]
struct Acknowledgment<'a> {
    id: &'a str,
}
