//! Authenticated request pipeline for the delivery platform SDK
//!
//! This crate holds the pieces every resource call goes through:
//!
//! - **Transport**: [`HttpAdapter`] sends one request against a base URL
//!   through a replaceable [`HttpClient`]
//! - **Encoding**: JSON, `multipart/related` and `multipart/form-data` bodies
//! - **Authentication**: [`Authenticator`] fetches bearer tokens and renews
//!   them once they expire
//!
//! # Example
//!
//! ```rust,no_run
//! use delivery_core::{Authenticator, HttpAdapter};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! # async fn run() -> delivery_core::Result<()> {
//! let adapter = Arc::new(HttpAdapter::new("https://api.example.com", Duration::from_secs(30))?);
//! let auth = Authenticator::new(adapter.clone(), "client-id", "client-secret");
//!
//! auth.authenticate("user", "pass").await?;
//!
//! // later, before each resource call
//! auth.validate().await?;
//! let bearer = auth.token();
//! # let _ = bearer;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod auth;
pub mod clock;
pub mod encoding;
pub mod error;
pub mod transport;

#[cfg(any(test, feature = "test-util"))]
pub mod testing;

pub use auth::{AuthEncoding, Authenticator, Credentials, ExpiryPolicy};
pub use clock::{Clock, SystemClock};
pub use error::{Error, Result};
pub use transport::{Headers, HttpAdapter, HttpClient, HttpRequest, HttpResponse, ReqwestClient};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::auth::{AuthEncoding, Authenticator, Credentials, ExpiryPolicy};
    pub use crate::encoding::{encode_form_data, encode_json, encode_multipart_related};
    pub use crate::error::{Error, Result};
    pub use crate::transport::{Headers, HttpAdapter, HttpClient, HttpResponse};
}
