//! Shared types for the ThreadPoint portal
//!
//! Common types used across the workspace: error codes and response
//! structures, domain models (orders, quotes, attachments), and the
//! symbolic-value vocabulary shared with the persistence layer.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use http;
pub use serde::{Deserialize, Serialize};

pub use error::{ApiResponse, AppError, AppResult, ErrorCode};
