//! CLI command implementations

pub mod auth;
pub mod events;
pub mod merchants;
pub mod order;
