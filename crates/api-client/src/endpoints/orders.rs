//! Order endpoints
//!
//! Order lifecycle: integrate, confirm, dispatch or mark ready for pickup,
//! plus cancellation handling in both directions. Status changes are
//! accepted asynchronously and answer 202.

use crate::client::{require, require_non_empty, Requester};
use crate::error::ApiResult;
use delivery_core::{Authenticator, HttpAdapter};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Orders API interface
#[derive(Clone, Debug)]
pub struct OrdersApi {
    requester: Requester,
}

impl OrdersApi {
    /// Create an orders API interface over shared pipeline parts
    #[must_use]
    pub fn new(adapter: Arc<HttpAdapter>, auth: Arc<Authenticator>) -> Self {
        Self {
            requester: Requester::new(adapter, auth),
        }
    }

    /// Fetch full order details
    ///
    /// GET /v3.0/orders/{reference}
    pub async fn details(&self, reference: &str) -> ApiResult<Order> {
        require("reference", reference)?;
        self.requester
            .get(
                &format!("get order {reference}"),
                &format!("/v3.0/orders/{reference}"),
            )
            .await
    }

    /// Acknowledge that the order reached the merchant's system
    pub async fn integrate(&self, reference: &str) -> ApiResult<()> {
        self.change_status(reference, "integration", None).await
    }

    /// Accept the order
    pub async fn confirm(&self, reference: &str) -> ApiResult<()> {
        self.change_status(reference, "confirmation", None).await
    }

    /// Hand the order to the courier
    pub async fn dispatch(&self, reference: &str) -> ApiResult<()> {
        self.change_status(reference, "dispatch", None).await
    }

    /// Order is ready for customer pickup
    pub async fn ready_to_deliver(&self, reference: &str) -> ApiResult<()> {
        self.change_status(reference, "readyToDeliver", None).await
    }

    /// Ask the platform to cancel the order on the merchant's side
    pub async fn request_cancellation(
        &self,
        reference: &str,
        request: &CancellationRequest,
    ) -> ApiResult<()> {
        require_non_empty("cancellation code", &request.code)?;
        self.change_status(reference, "cancellationRequested", Some(request))
            .await
    }

    /// Accept a cancellation the consumer asked for
    pub async fn accept_consumer_cancellation(&self, reference: &str) -> ApiResult<()> {
        self.change_status(reference, "consumerCancellationAccepted", None)
            .await
    }

    /// Refuse a cancellation the consumer asked for
    pub async fn deny_consumer_cancellation(&self, reference: &str) -> ApiResult<()> {
        self.change_status(reference, "consumerCancellationDenied", None)
            .await
    }

    /// Courier position for a dispatched order
    ///
    /// GET /v2.0/orders/{reference}/tracking
    pub async fn tracking(&self, reference: &str) -> ApiResult<Tracking> {
        require("reference", reference)?;
        self.requester
            .get(
                &format!("track order {reference}"),
                &format!("/v2.0/orders/{reference}/tracking"),
            )
            .await
    }

    /// POST /v1.0/orders/{reference}/statuses/{status} (202)
    async fn change_status(
        &self,
        reference: &str,
        status: &str,
        body: Option<&CancellationRequest>,
    ) -> ApiResult<()> {
        require("reference", reference)?;
        self.requester
            .send(
                &format!("set order {reference} to {status}"),
                Method::POST,
                &format!("/v1.0/orders/{reference}/statuses/{status}"),
                body,
                &[202],
            )
            .await?;
        Ok(())
    }
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Order details
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(rename = "shortReference", default)]
    pub short_reference: Option<String>,
    #[serde(rename = "createdAt", default)]
    pub created_at: Option<String>,
    #[serde(rename = "type", default)]
    pub order_type: Option<String>,
    #[serde(default)]
    pub merchant: Option<OrderMerchant>,
    #[serde(default)]
    pub customer: Option<Customer>,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    #[serde(default)]
    pub total: Option<OrderTotal>,
}

/// Merchant the order was placed with
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderMerchant {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// Ordering customer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

/// One ordered line
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    pub name: String,
    pub quantity: f64,
    #[serde(rename = "unitPrice", default)]
    pub unit_price: Option<f64>,
    #[serde(rename = "totalPrice", default)]
    pub total_price: Option<f64>,
    #[serde(default)]
    pub observations: Option<String>,
}

/// Order totals
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderTotal {
    #[serde(rename = "subTotal", default)]
    pub sub_total: Option<f64>,
    #[serde(rename = "deliveryFee", default)]
    pub delivery_fee: Option<f64>,
    #[serde(rename = "orderAmount", default)]
    pub order_amount: Option<f64>,
}

/// Merchant-side cancellation request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancellationRequest {
    #[serde(rename = "cancellationCode")]
    pub code: String,
    pub details: String,
}

impl CancellationRequest {
    /// Build a cancellation request with a reason code
    pub fn new(code: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            details: details.into(),
        }
    }
}

/// Courier tracking snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tracking {
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(rename = "expectedDelivery", default)]
    pub expected_delivery: Option<String>,
    #[serde(rename = "pickupEtaStart", default)]
    pub pickup_eta_start: Option<i64>,
    #[serde(rename = "deliveryEtaEnd", default)]
    pub delivery_eta_end: Option<i64>,
}
