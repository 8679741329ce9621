//! Catalog endpoints
//!
//! Catalogs group the categories a merchant sells through each channel;
//! categories hold the items. Item availability is switched in bulk.

use crate::client::{require, require_non_empty, Requester};
use crate::error::ApiResult;
use delivery_core::{Authenticator, HttpAdapter};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Catalog API interface
#[derive(Clone, Debug)]
pub struct CatalogApi {
    requester: Requester,
}

impl CatalogApi {
    /// Create a catalog API interface over shared pipeline parts
    #[must_use]
    pub fn new(adapter: Arc<HttpAdapter>, auth: Arc<Authenticator>) -> Self {
        Self {
            requester: Requester::new(adapter, auth),
        }
    }

    /// List a merchant's catalogs
    ///
    /// GET /v2.0/merchants/{merchant_id}/catalogs
    pub async fn list_catalogs(&self, merchant_id: &str) -> ApiResult<Vec<Catalog>> {
        require("merchant_id", merchant_id)?;
        self.requester
            .get(
                &format!("list catalogs of merchant {merchant_id}"),
                &format!("/v2.0/merchants/{merchant_id}/catalogs"),
            )
            .await
    }

    /// List the categories of one catalog
    ///
    /// GET /v2.0/merchants/{merchant_id}/catalogs/{catalog_id}/categories
    pub async fn list_categories(
        &self,
        merchant_id: &str,
        catalog_id: &str,
    ) -> ApiResult<Vec<Category>> {
        require("merchant_id", merchant_id)?;
        require("catalog_id", catalog_id)?;
        self.requester
            .get(
                &format!("list categories of catalog {catalog_id}"),
                &categories_path(merchant_id, catalog_id),
            )
            .await
    }

    /// Create a category
    ///
    /// POST /v2.0/merchants/{merchant_id}/catalogs/{catalog_id}/categories (201)
    pub async fn create_category(
        &self,
        merchant_id: &str,
        catalog_id: &str,
        category: &NewCategory,
    ) -> ApiResult<Category> {
        require("merchant_id", merchant_id)?;
        require("catalog_id", catalog_id)?;
        self.requester
            .send_json(
                &format!("create category in catalog {catalog_id}"),
                Method::POST,
                &categories_path(merchant_id, catalog_id),
                Some(category),
                201,
            )
            .await
    }

    /// Delete a category
    ///
    /// DELETE /v2.0/merchants/{merchant_id}/catalogs/{catalog_id}/categories/{category_id}
    pub async fn delete_category(
        &self,
        merchant_id: &str,
        catalog_id: &str,
        category_id: &str,
    ) -> ApiResult<()> {
        require("merchant_id", merchant_id)?;
        require("catalog_id", catalog_id)?;
        require("category_id", category_id)?;
        let path = format!("{}/{category_id}", categories_path(merchant_id, catalog_id));
        self.requester
            .send(
                &format!("delete category {category_id}"),
                Method::DELETE,
                &path,
                Option::<&()>::None,
                &[200],
            )
            .await?;
        Ok(())
    }

    /// Switch an item on or off in every catalog
    ///
    /// PATCH /v2.0/merchants/{merchant_id}/items/status (202)
    pub async fn update_item_status(
        &self,
        merchant_id: &str,
        update: &ItemStatusUpdate,
    ) -> ApiResult<()> {
        require("merchant_id", merchant_id)?;
        require_non_empty("item_id", &update.item_id)?;
        self.requester
            .send(
                &format!("update status of item {}", update.item_id),
                Method::PATCH,
                &format!("/v2.0/merchants/{merchant_id}/items/status"),
                Some(update),
                &[202],
            )
            .await?;
        Ok(())
    }
}

fn categories_path(merchant_id: &str, catalog_id: &str) -> String {
    format!("/v2.0/merchants/{merchant_id}/catalogs/{catalog_id}/categories")
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Catalog entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(rename = "catalogId")]
    pub catalog_id: String,
    #[serde(default)]
    pub context: Vec<String>,
    pub status: String,
    #[serde(rename = "modifiedAt", default)]
    pub modified_at: Option<f64>,
}

/// Catalog category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub status: String,
    #[serde(default)]
    pub sequence: i32,
    #[serde(default)]
    pub template: Option<String>,
}

/// Category creation request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCategory {
    pub name: String,
    pub status: String,
    pub template: String,
    pub sequence: i32,
}

impl NewCategory {
    /// An available category using the default template
    pub fn new(name: impl Into<String>, sequence: i32) -> Self {
        Self {
            name: name.into(),
            status: "AVAILABLE".to_string(),
            template: "DEFAULT".to_string(),
            sequence,
        }
    }
}

/// Item availability change
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemStatusUpdate {
    #[serde(rename = "itemId")]
    pub item_id: String,
    /// `AVAILABLE` or `UNAVAILABLE`
    pub status: String,
}
