//! Endpoint-specific API implementations
//!
//! Each module provides a typed interface for one family of merchant API
//! endpoints. All of them share the transport adapter and authenticator
//! owned by [`DeliveryClient`](crate::DeliveryClient).
//!
//! | Module | Paths | Description |
//! |--------|-------|-------------|
//! | `merchants` | `/v1.0/merchants` | Merchant records, statuses, unavailability windows |
//! | `catalog` | `/v2.0/merchants/{id}/catalogs`, `/v2.0/merchants/{id}/items` | Catalogs, categories, item availability |
//! | `orders` | `/v3.0/orders`, `/v1.0/orders/{ref}/statuses` | Order details, lifecycle, cancellation, tracking |
//! | `events` | `/v3.0/events:polling`, `/v1.0/events/acknowledgment` | Event polling queue |

pub mod catalog;
pub mod events;
pub mod merchants;
pub mod orders;

pub use catalog::CatalogApi;
pub use events::EventsApi;
pub use merchants::MerchantsApi;
pub use orders::OrdersApi;
