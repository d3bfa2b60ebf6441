//! Data models
//!
//! Shared between the portal core and the HTTP layer (via API).
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (SQLite INTEGER PRIMARY KEY).

pub mod actor;
pub mod attachment;
pub mod catalog;
pub mod design;
pub mod order;
pub mod quote;
pub mod symbol;

// Re-exports
pub use actor::*;
pub use attachment::*;
pub use catalog::*;
pub use design::*;
pub use order::*;
pub use quote::*;
pub use symbol::*;
