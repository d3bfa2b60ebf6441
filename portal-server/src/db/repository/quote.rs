//! Quote repository

use shared::error::AppResult;
use sqlx::SqliteExecutor;

use crate::db::rows::{DesignCols, QuoteRow};

const COLUMNS: &str = "id, quote_number, owner_user_id, kind_id, status_id, design_name, \
     width, height, unit_id, color_count, fabric, color_type, placements, \
     required_formats, instructions, is_urgent, price_cents, currency, admin_remarks, \
     converted_order_id, created_at, updated_at";

pub async fn insert(
    exec: impl SqliteExecutor<'_>,
    quote_number: &str,
    owner_user_id: i64,
    status_id: i64,
    cols: &DesignCols,
    now: i64,
) -> AppResult<i64> {
    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO quotes (quote_number, owner_user_id, kind_id, status_id, design_name, \
         width, height, unit_id, color_count, fabric, color_type, placements, \
         required_formats, instructions, is_urgent, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?) \
         RETURNING id",
    )
    .bind(quote_number)
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

pub async fn find_by_id(exec: impl SqliteExecutor<'_>, id: i64) -> AppResult<Option<QuoteRow>> {
    let row = sqlx::query_as::<_, QuoteRow>(&format!(
        "SELECT {COLUMNS} FROM quotes WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(exec)
    .await?;
    Ok(row)
}

pub async fn list_all(exec: impl SqliteExecutor<'_>) -> AppResult<Vec<QuoteRow>> {
    let rows = sqlx::query_as::<_, QuoteRow>(&format!(
        "SELECT {COLUMNS} FROM quotes ORDER BY created_at DESC, id DESC"
    ))
    .fetch_all(exec)
    .await?;
    Ok(rows)
}

pub async fn list_by_owner(
    exec: impl SqliteExecutor<'_>,
    owner_user_id: i64,
) -> AppResult<Vec<QuoteRow>> {
    let rows = sqlx::query_as::<_, QuoteRow>(&format!(
        "SELECT {COLUMNS} FROM quotes WHERE owner_user_id = ? ORDER BY created_at DESC, id DESC"
    ))
    .bind(owner_user_id)
    .fetch_all(exec)
    .await?;
    Ok(rows)
}

/// Overwrite the editable columns, guarded on the current status so a
/// stale precondition read cannot land an edit on a quote that a
/// concurrent transition already locked. Status, pricing and
/// conversion fields are untouched; zero rows affected means the quote
/// left the allowed set (or is gone).
pub async fn update_design_cas(
    exec: impl SqliteExecutor<'_>,
    id: i64,
    from_ids: &[i64],
    cols: &DesignCols,
    now: i64,
) -> AppResult<u64> {
    let placeholders = vec!["?"; from_ids.len()].join(", ");
    let sql = format!(
        "UPDATE quotes SET kind_id = ?, design_name = ?, width = ?, height = ?, unit_id = ?, \
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

/// Compare-and-set status write.
pub async fn update_status_cas(
    exec: impl SqliteExecutor<'_>,
    id: i64,
    from_ids: &[i64],
    to_id: i64,
    now: i64,
) -> AppResult<u64> {
    let placeholders = vec!["?"; from_ids.len()].join(", ");
    let sql = format!(
        "UPDATE quotes SET status_id = ?, updated_at = ? \
         WHERE id = ? AND status_id IN ({placeholders})"
    );
    let mut query = sqlx::query(&sql).bind(to_id).bind(now).bind(id);
    for from_id in from_ids {
        query = query.bind(from_id);
    }
    let rows = query.execute(exec).await?;
    Ok(rows.rows_affected())
}

/// Set price and move to the priced state in one guarded write.
pub async fn set_pricing_cas(
    exec: impl SqliteExecutor<'_>,
    id: i64,
    from_ids: &[i64],
    priced_id: i64,
    price_cents: i64,
    currency: &str,
    remarks: Option<&str>,
    now: i64,
) -> AppResult<u64> {
    let placeholders = vec!["?"; from_ids.len()].join(", ");
    let sql = format!(
        "UPDATE quotes SET status_id = ?, price_cents = ?, currency = ?, admin_remarks = ?, \
         updated_at = ? WHERE id = ? AND status_id IN ({placeholders})"
    );
    let mut query = sqlx::query(&sql)
        .bind(priced_id)
        .bind(price_cents)
        .bind(currency)
        .bind(remarks)
        .bind(now)
        .bind(id);
    for from_id in from_ids {
        query = query.bind(from_id);
    }
    let rows = query.execute(exec).await?;
    Ok(rows.rows_affected())
}

/// Mark a priced quote converted, recording the new order id. Zero
/// rows affected means the quote was no longer priced, so a concurrent
/// conversion (or reject) won.
pub async fn mark_converted_cas(
    exec: impl SqliteExecutor<'_>,
    id: i64,
    priced_id: i64,
    converted_id: i64,
    order_id: i64,
    now: i64,
) -> AppResult<u64> {
    let rows = sqlx::query(
        "UPDATE quotes SET status_id = ?, converted_order_id = ?, updated_at = ? \
         WHERE id = ? AND status_id = ? AND converted_order_id IS NULL",
    )
    .bind(converted_id)
    .bind(order_id)
    .bind(now)
    .bind(id)
    .bind(priced_id)
    .execute(exec)
    .await?;
    Ok(rows.rows_affected())
}

pub async fn delete(exec: impl SqliteExecutor<'_>, id: i64) -> AppResult<u64> {
    let rows = sqlx::query("DELETE FROM quotes WHERE id = ?")
        .bind(id)
        .execute(exec)
        .await?;
    Ok(rows.rows_affected())
}
