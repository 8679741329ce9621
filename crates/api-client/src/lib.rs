//! Typed client for the delivery platform merchant API
//!
//! This crate wires the request pipeline from `delivery-core` (transport
//! adapter plus token authenticator) into resource services for merchants,
//! catalogs, orders and events.
//!
//! # Features
//!
//! - **Environment-based configuration**: Load the base URL and client credentials from environment variables
//! - **Silent token renewal**: Every call validates the token and re-authenticates with the cached login when it expired
//! - **Typed resources**: Request and response bodies are plain serde structs
//!
//! # Example
//!
//! ```rust,no_run
//! use delivery_api_client::DeliveryClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Create client with environment configuration
//!     let client = DeliveryClient::new()?;
//!     client.authenticate("merchant@example.com", "secret").await?;
//!
//!     for merchant in client.merchants().list().await? {
//!         println!("{} {}", merchant.id, merchant.name);
//!     }
//!
//!     let events = client.events().poll().await?;
//!     client.events().acknowledge(&events).await?;
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod config;
pub mod endpoints;
pub mod error;

pub use client::DeliveryClient;
pub use config::ClientConfig;
pub use error::{ApiError, ApiResult};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::client::DeliveryClient;
    pub use crate::config::ClientConfig;
    pub use crate::endpoints::{CatalogApi, EventsApi, MerchantsApi, OrdersApi};
    pub use crate::error::{ApiError, ApiResult};
}
