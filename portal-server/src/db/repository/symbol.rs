//! Symbolic value repository

use shared::error::AppResult;
use shared::models::SymbolicValue;
use sqlx::SqliteExecutor;

pub async fn find_all(exec: impl SqliteExecutor<'_>) -> AppResult<Vec<SymbolicValue>> {
    let rows = sqlx::query_as::<_, SymbolicValue>(
        "SELECT id, category, symbol, display_name, sort_order, is_active \
         FROM symbolic_value ORDER BY category, sort_order, symbol",
    )
    .fetch_all(exec)
    .await?;
    Ok(rows)
}

pub async fn find_by_category(
    exec: impl SqliteExecutor<'_>,
    category: &str,
) -> AppResult<Vec<SymbolicValue>> {
    let rows = sqlx::query_as::<_, SymbolicValue>(
        "SELECT id, category, symbol, display_name, sort_order, is_active \
         FROM symbolic_value WHERE category = ? AND is_active = 1 \
         ORDER BY sort_order, symbol",
    )
    .bind(category)
    .fetch_all(exec)
    .await?;
    Ok(rows)
}
