//! Order repository

use shared::error::AppResult;
use sqlx::SqliteExecutor;

use crate::db::rows::{DesignCols, OrderRow};

const COLUMNS: &str = "id, order_number, owner_user_id, kind_id, status_id, design_name, \
     width, height, unit_id, color_count, fabric, color_type, placements, \
     required_formats, instructions, is_urgent, created_at, updated_at";

pub async fn insert(
    exec: impl SqliteExecutor<'_>,
    order_number: &str,
    owner_user_id: i64,
    status_id: i64,
    cols: &DesignCols,
    now: i64,
) -> AppResult<i64> {
    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO orders (order_number, owner_user_id, kind_id, status_id, design_name, \
         width, height, unit_id, color_count, fabric, color_type, placements, \
         required_formats, instructions, is_urgent, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?) \
         RETURNING id",
    )
    .bind(order_number)
    .bind(owner_user_id)
    .bind(cols.kind_id)
    .bind(status_id)
    .bind(&cols.design_name)
    .bind(cols.width)
    .bind(cols.height)
    .bind(cols.unit_id)
    .bind(cols.color_count)
    .bind(&cols.fabric)
    .bind(&cols.color_type)
    .bind(&cols.placements)
    .bind(&cols.required_formats)
    .bind(&cols.instructions)
    .bind(cols.is_urgent)
    .bind(now)
    .bind(now)
    .fetch_one(exec)
    .await?;
    Ok(id)
}

pub async fn find_by_id(exec: impl SqliteExecutor<'_>, id: i64) -> AppResult<Option<OrderRow>> {
    let row = sqlx::query_as::<_, OrderRow>(&format!(
        "SELECT {COLUMNS} FROM orders WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(exec)
    .await?;
    Ok(row)
}

pub async fn list_all(exec: impl SqliteExecutor<'_>) -> AppResult<Vec<OrderRow>> {
    let rows = sqlx::query_as::<_, OrderRow>(&format!(
        "SELECT {COLUMNS} FROM orders ORDER BY created_at DESC, id DESC"
    ))
    .fetch_all(exec)
    .await?;
    Ok(rows)
}

pub async fn list_by_owner(
    exec: impl SqliteExecutor<'_>,
    owner_user_id: i64,
) -> AppResult<Vec<OrderRow>> {
    let rows = sqlx::query_as::<_, OrderRow>(&format!(
        "SELECT {COLUMNS} FROM orders WHERE owner_user_id = ? ORDER BY created_at DESC, id DESC"
    ))
    .bind(owner_user_id)
    .fetch_all(exec)
    .await?;
    Ok(rows)
}

/// Overwrite the editable columns, guarded on the current status so a
/// stale precondition read cannot land an edit on an order that a
/// concurrent transition already closed. Status itself is untouched;
/// zero rows affected means the order left the allowed set (or is gone).
pub async fn update_design_cas(
    exec: impl SqliteExecutor<'_>,
    id: i64,
    from_ids: &[i64],
    cols: &DesignCols,
    now: i64,
) -> AppResult<u64> {
    let placeholders = vec!["?"; from_ids.len()].join(", ");
    let sql = format!(
        "UPDATE orders SET kind_id = ?, design_name = ?, width = ?, height = ?, unit_id = ?, \
         color_count = ?, fabric = ?, color_type = ?, placements = ?, required_formats = ?, \
         instructions = ?, is_urgent = ?, updated_at = ? \
         WHERE id = ? AND status_id IN ({placeholders})"
    );
    let mut query = sqlx::query(&sql)
        .bind(cols.kind_id)
        .bind(&cols.design_name)
        .bind(cols.width)
        .bind(cols.height)
        .bind(cols.unit_id)
        .bind(cols.color_count)
        .bind(&cols.fabric)
        .bind(&cols.color_type)
        .bind(&cols.placements)
        .bind(&cols.required_formats)
        .bind(&cols.instructions)
        .bind(cols.is_urgent)
        .bind(now)
        .bind(id);
    for from_id in from_ids {
        query = query.bind(from_id);
    }
    let rows = query.execute(exec).await?;
    Ok(rows.rows_affected())
}

/// Compare-and-set status write. Returns the number of rows affected;
/// zero means the order was no longer in any of `from_ids`.
pub async fn update_status_cas(
    exec: impl SqliteExecutor<'_>,
    id: i64,
    from_ids: &[i64],
    to_id: i64,
    now: i64,
) -> AppResult<u64> {
    let placeholders = vec!["?"; from_ids.len()].join(", ");
    let sql = format!(
        "UPDATE orders SET status_id = ?, updated_at = ? \
         WHERE id = ? AND status_id IN ({placeholders})"
    );
    let mut query = sqlx::query(&sql).bind(to_id).bind(now).bind(id);
    for from_id in from_ids {
        query = query.bind(from_id);
    }
    let rows = query.execute(exec).await?;
    Ok(rows.rows_affected())
}
