//! Human-readable number sequences
//!
//! `TP-<YYYYMMDD>-<seq>` / `QT-<YYYYMMDD>-<seq>` numbers come from a
//! per-prefix, per-day counter row bumped with an UPSERT inside the
//! same transaction that inserts the entity, so a rollback never leaks
//! a duplicate number into a committed row.

use shared::error::AppResult;
use sqlx::SqliteExecutor;

pub const ORDER_PREFIX: &str = "TP";
pub const QUOTE_PREFIX: &str = "QT";

/// Claim the next sequence value for (prefix, day).
pub async fn next_seq(exec: impl SqliteExecutor<'_>, prefix: &str, day: &str) -> AppResult<i64> {
    let seq = sqlx::query_scalar::<_, i64>(
        "INSERT INTO reference_counter (prefix, day, seq) VALUES (?, ?, 1) \
         ON CONFLICT(prefix, day) DO UPDATE SET seq = seq + 1 \
         RETURNING seq",
    )
    .bind(prefix)
    .bind(day)
    .fetch_one(exec)
    .await?;
    Ok(seq)
}

/// Claim and format the next number, e.g. `TP-20260824-0007`.
pub async fn next_number(
    exec: impl SqliteExecutor<'_>,
    prefix: &str,
    day: &str,
) -> AppResult<String> {
    let seq = next_seq(exec, prefix, day).await?;
    Ok(format_number(prefix, day, seq))
}

pub fn format_number(prefix: &str, day: &str, seq: i64) -> String {
    format!("{prefix}-{day}-{seq:04}")
}
