//! ThreadPoint portal server core
//!
//! Lifecycle and authorization engine for the order/quote portal. The
//! transport layer (HTTP, sessions) lives elsewhere and talks to this
//! crate through [`core::ServerState`] and the per-domain services.

pub mod attachments;
pub mod auth;
pub mod conversion;
pub mod core;
pub mod db;
pub mod orders;
pub mod quotes;
pub mod symbols;
pub mod utils;

#[cfg(test)]
pub(crate) mod testing;

pub use crate::core::{Config, ServerState};
