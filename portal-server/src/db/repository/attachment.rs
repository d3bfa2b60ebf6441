//! File attachment repository

use shared::error::AppResult;
use sqlx::SqliteExecutor;

use crate::db::rows::AttachmentRow;

const COLUMNS: &str = "id, entity_type_id, entity_id, file_role_id, original_name, stored_name, \
     storage_path, mime_type, size_bytes, uploader_user_id, created_at";

/// Encoded column values for a new attachment row.
#[derive(Debug, Clone)]
pub struct NewAttachment {
    pub entity_type_id: i64,
    pub entity_id: i64,
    pub file_role_id: i64,
    pub original_name: String,
    pub stored_name: String,
    pub storage_path: String,
    pub mime_type: String,
    pub size_bytes: i64,
    pub uploader_user_id: i64,
}

pub async fn insert(
    exec: impl SqliteExecutor<'_>,
    new: &NewAttachment,
    now: i64,
) -> AppResult<i64> {
    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO file_attachment (entity_type_id, entity_id, file_role_id, original_name, \
         stored_name, storage_path, mime_type, size_bytes, uploader_user_id, created_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?) RETURNING id",
    )
    .bind(new.entity_type_id)
    .bind(new.entity_id)
    .bind(new.file_role_id)
    .bind(&new.original_name)
    .bind(&new.stored_name)
    .bind(&new.storage_path)
    .bind(&new.mime_type)
    .bind(new.size_bytes)
    .bind(new.uploader_user_id)
    .bind(now)
    .fetch_one(exec)
    .await?;
    Ok(id)
}

pub async fn find_by_id(
    exec: impl SqliteExecutor<'_>,
    id: i64,
) -> AppResult<Option<AttachmentRow>> {
    let row = sqlx::query_as::<_, AttachmentRow>(&format!(
        "SELECT {COLUMNS} FROM file_attachment WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(exec)
    .await?;
    Ok(row)
}

pub async fn list_for_entity(
    exec: impl SqliteExecutor<'_>,
    entity_type_id: i64,
    entity_id: i64,
) -> AppResult<Vec<AttachmentRow>> {
    let rows = sqlx::query_as::<_, AttachmentRow>(&format!(
        "SELECT {COLUMNS} FROM file_attachment \
         WHERE entity_type_id = ? AND entity_id = ? ORDER BY created_at, id"
    ))
    .bind(entity_type_id)
    .bind(entity_id)
    .fetch_all(exec)
    .await?;
    Ok(rows)
}

pub async fn delete(exec: impl SqliteExecutor<'_>, id: i64) -> AppResult<u64> {
    let rows = sqlx::query("DELETE FROM file_attachment WHERE id = ?")
        .bind(id)
        .execute(exec)
        .await?;
    Ok(rows.rows_affected())
}

/// Remove every attachment row of an entity (quote-delete cascade).
pub async fn delete_for_entity(
    exec: impl SqliteExecutor<'_>,
    entity_type_id: i64,
    entity_id: i64,
) -> AppResult<u64> {
    let rows = sqlx::query("DELETE FROM file_attachment WHERE entity_type_id = ? AND entity_id = ?")
        .bind(entity_type_id)
        .bind(entity_id)
        .execute(exec)
        .await?;
    Ok(rows.rows_affected())
}

/// Re-point an entity's attachments at another entity under a new role
/// (used when a quote's files follow it into the converted order).
pub async fn relink_entity(
    exec: impl SqliteExecutor<'_>,
    from_type_id: i64,
    from_entity_id: i64,
    to_type_id: i64,
    to_entity_id: i64,
    new_role_id: i64,
) -> AppResult<u64> {
    let rows = sqlx::query(
        "UPDATE file_attachment SET entity_type_id = ?, entity_id = ?, file_role_id = ? \
         WHERE entity_type_id = ? AND entity_id = ?",
    )
    .bind(to_type_id)
    .bind(to_entity_id)
    .bind(new_role_id)
    .bind(from_type_id)
    .bind(from_entity_id)
    .execute(exec)
    .await?;
    Ok(rows.rows_affected())
}
