//! File attachment model

use super::catalog::{EntityKind, FileRole};
use serde::{Deserialize, Serialize};

/// A file attached to an order or a quote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileAttachment {
    pub id: i64,
    pub entity_kind: EntityKind,
    pub entity_id: i64,
    pub role: FileRole,
    /// Filename as uploaded by the user
    pub original_name: String,
    /// Collision-free name under which the blob is stored
    pub stored_name: String,
    pub storage_path: String,
    pub mime_type: String,
    pub size_bytes: i64,
    pub uploader_user_id: i64,
    pub created_at: i64,
}

/// Client-supplied metadata accompanying an upload. The registry
/// stores the bytes itself and derives everything else.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadMeta {
    pub original_name: String,
    /// Content type as reported by the client, if any. The registry
    /// falls back to guessing from the filename extension.
    pub mime_type: Option<String>,
}
