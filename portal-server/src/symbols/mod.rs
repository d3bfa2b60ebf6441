//! Symbolic value resolution
//!
//! The `symbolic_value` table maps categorical fields to surrogate ids.
//! It is seeded at deployment time and read-only at runtime, so the
//! whole table is loaded once at startup into a [`SymbolTable`] and
//! shared as `Arc<SymbolTable>`. Missing resolutions are configuration
//! defects (3xxx codes), never user errors.

use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{
    EntityKind, FileRole, MeasureUnit, OrderStatus, QuoteStatus, ServiceKind, SymbolCoded,
    SymbolicValue,
};
use sqlx::SqlitePool;
use std::collections::HashMap;

use crate::db::repository::symbol;

/// In-memory index over the symbolic value reference table.
pub struct SymbolTable {
    /// Active rows, keyed by (category, symbol)
    by_key: HashMap<(String, String), SymbolicValue>,
    /// Every row (including inactive), keyed by surrogate id
    by_id: HashMap<i64, SymbolicValue>,
}

impl SymbolTable {
    /// Load the full reference table.
    pub async fn load(pool: &SqlitePool) -> AppResult<Self> {
        let rows = symbol::find_all(pool).await?;
        tracing::info!(count = rows.len(), "Loaded symbolic value table");
        Ok(Self::from_rows(rows))
    }

    pub fn from_rows(rows: Vec<SymbolicValue>) -> Self {
        let mut by_key = HashMap::new();
        let mut by_id = HashMap::new();
        for row in rows {
            if row.is_active {
                by_key.insert((row.category.clone(), row.symbol.clone()), row.clone());
            }
            by_id.insert(row.id, row);
        }
        Self { by_key, by_id }
    }

    /// Resolve an active symbol within a category to its surrogate id row.
    pub fn resolve(&self, category: &str, symbol: &str) -> AppResult<&SymbolicValue> {
        self.by_key
            .get(&(category.to_string(), symbol.to_string()))
            .ok_or_else(|| AppError::unknown_symbol(category, symbol))
    }

    /// Resolve trying a primary category, then an explicit fallback.
    ///
    /// The legacy schema has overlapping category families (e.g. quote
    /// statuses seeded under `order_status`); the fallback is fixed per
    /// type, never an open-ended chain.
    pub fn resolve_with_fallback(
        &self,
        primary: &str,
        fallback: Option<&str>,
        symbol: &str,
    ) -> AppResult<&SymbolicValue> {
        match self.resolve(primary, symbol) {
            Ok(row) => Ok(row),
            Err(primary_err) => match fallback {
                Some(category) => self.resolve(category, symbol).map_err(|_| primary_err),
                None => Err(primary_err),
            },
        }
    }

    /// Reverse-resolve a surrogate id. Works for inactive rows too, so
    /// historical data keeps decoding.
    pub fn reverse(&self, id: i64) -> AppResult<&SymbolicValue> {
        self.by_id
            .get(&id)
            .ok_or_else(|| AppError::unknown_symbol_id(id))
    }

    /// Surrogate id for an enum value.
    pub fn encode<T: SymbolCoded>(&self, value: T) -> AppResult<i64> {
        self.resolve_with_fallback(T::CATEGORY, T::FALLBACK_CATEGORY, value.symbol())
            .map(|row| row.id)
    }

    /// Decode a surrogate id back into an enum value, checking that the
    /// row belongs to the expected category (or its fallback).
    pub fn decode<T: SymbolCoded>(&self, id: i64) -> AppResult<T> {
        let row = self.reverse(id)?;
        let category_ok = row.category == T::CATEGORY
            || T::FALLBACK_CATEGORY.is_some_and(|c| row.category == c);
        if !category_ok {
            return Err(AppError::with_message(
                ErrorCode::SymbolCategoryMismatch,
                format!(
                    "Symbol id {id} belongs to category '{}', expected '{}'",
                    row.category,
                    T::CATEGORY
                ),
            ));
        }
        T::from_symbol(&row.symbol)
            .ok_or_else(|| AppError::unknown_symbol(row.category.as_str(), row.symbol.as_str()))
    }

    /// Startup check: every variant of every categorical enum must
    /// resolve against the seeded table. Boot fails otherwise.
    pub fn verify_seed(&self) -> AppResult<()> {
        let mut missing: Vec<String> = Vec::new();

        fn check<T: SymbolCoded>(table: &SymbolTable, missing: &mut Vec<String>) {
            for value in T::ALL {
                if table.encode(*value).is_err() {
                    missing.push(format!("{}/{}", T::CATEGORY, value.symbol()));
                }
            }
        }

        check::<ServiceKind>(self, &mut missing);
        check::<OrderStatus>(self, &mut missing);
        check::<QuoteStatus>(self, &mut missing);
        check::<EntityKind>(self, &mut missing);
        check::<FileRole>(self, &mut missing);
        check::<MeasureUnit>(self, &mut missing);

        if missing.is_empty() {
            Ok(())
        } else {
            Err(AppError::with_message(
                ErrorCode::SymbolSeedIncomplete,
                format!("Missing symbolic values: {}", missing.join(", ")),
            ))
        }
    }
}
