//! Merchant endpoints
//!
//! - List the merchants the credentials give access to
//! - Fetch one merchant and its operational statuses
//! - Manage unavailability windows (temporary store closures)

use crate::client::{require, Requester};
use crate::error::ApiResult;
use delivery_core::{Authenticator, HttpAdapter};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Merchants API interface
#[derive(Clone, Debug)]
pub struct MerchantsApi {
    requester: Requester,
}

impl MerchantsApi {
    /// Create a merchants API interface over shared pipeline parts
    #[must_use]
    pub fn new(adapter: Arc<HttpAdapter>, auth: Arc<Authenticator>) -> Self {
        Self {
            requester: Requester::new(adapter, auth),
        }
    }

    /// List merchants
    ///
    /// GET /v1.0/merchants
    pub async fn list(&self) -> ApiResult<Vec<Merchant>> {
        self.requester
            .get("list merchants", "/v1.0/merchants")
            .await
    }

    /// Get a single merchant
    ///
    /// GET /v1.0/merchants/{id}
    pub async fn get(&self, merchant_id: &str) -> ApiResult<MerchantDetails> {
        require("merchant_id", merchant_id)?;
        self.requester
            .get(
                &format!("get merchant {merchant_id}"),
                &format!("/v1.0/merchants/{merchant_id}"),
            )
            .await
    }

    /// Operational status of each sales channel
    ///
    /// GET /v1.0/merchants/{id}/statuses
    pub async fn statuses(&self, merchant_id: &str) -> ApiResult<Vec<MerchantStatus>> {
        require("merchant_id", merchant_id)?;
        self.requester
            .get(
                &format!("get statuses of merchant {merchant_id}"),
                &format!("/v1.0/merchants/{merchant_id}/statuses"),
            )
            .await
    }

    /// Active unavailability windows
    ///
    /// GET /v1.0/merchants/{id}/unavailabilities
    pub async fn unavailabilities(&self, merchant_id: &str) -> ApiResult<Vec<Unavailability>> {
        require("merchant_id", merchant_id)?;
        self.requester
            .get(
                &format!("list unavailabilities of merchant {merchant_id}"),
                &format!("/v1.0/merchants/{merchant_id}/unavailabilities"),
            )
            .await
    }

    /// Close the store for a while
    ///
    /// POST /v1.0/merchants/{id}/unavailabilities:universal (201)
    pub async fn create_unavailability(
        &self,
        merchant_id: &str,
        unavailability: &NewUnavailability,
    ) -> ApiResult<Unavailability> {
        require("merchant_id", merchant_id)?;
        self.requester
            .send_json(
                &format!("create unavailability for merchant {merchant_id}"),
                Method::POST,
                &format!("/v1.0/merchants/{merchant_id}/unavailabilities:universal"),
                Some(unavailability),
                201,
            )
            .await
    }

    /// Reopen the store by removing an unavailability window
    ///
    /// DELETE /v1.0/merchants/{id}/unavailabilities/{unavailability_id}
    pub async fn delete_unavailability(
        &self,
        merchant_id: &str,
        unavailability_id: &str,
    ) -> ApiResult<()> {
        require("merchant_id", merchant_id)?;
        require("unavailability_id", unavailability_id)?;
        self.requester
            .send(
                &format!("delete unavailability {unavailability_id} of merchant {merchant_id}"),
                Method::DELETE,
                &format!("/v1.0/merchants/{merchant_id}/unavailabilities/{unavailability_id}"),
                Option::<&()>::None,
                &[200],
            )
            .await?;
        Ok(())
    }
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Merchant summary, as listed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Merchant {
    pub id: String,
    pub name: String,
    #[serde(rename = "corporateName", default)]
    pub corporate_name: Option<String>,
}

/// Full merchant record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MerchantDetails {
    pub id: String,
    pub name: String,
    #[serde(rename = "corporateName", default)]
    pub corporate_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "averageTicket", default)]
    pub average_ticket: Option<f64>,
    #[serde(default)]
    pub address: Option<Address>,
}

/// Postal address
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Address {
    #[serde(default)]
    pub street: Option<String>,
    #[serde(default)]
    pub number: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(rename = "postalCode", default)]
    pub postal_code: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

/// Availability of one sales channel
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MerchantStatus {
    pub operation: String,
    #[serde(rename = "salesChannel", default)]
    pub sales_channel: Option<String>,
    pub available: bool,
    #[serde(default)]
    pub state: Option<String>,
}

/// Unavailability window
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Unavailability {
    pub id: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "authorId", default)]
    pub author_id: Option<String>,
    pub start: String,
    pub end: String,
}

/// Request to close the store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUnavailability {
    pub description: String,
    /// Closure length in minutes
    pub minutes: u32,
}
