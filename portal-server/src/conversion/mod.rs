//! Quote to order conversion
//!
//! One transaction covers the whole procedure: create the order, mark
//! the quote converted, re-link its files. The quote-side write is a
//! compare-and-set on the priced status, so of two concurrent attempts
//! exactly one commits; the loser's order insert rolls back with the
//! transaction.

use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{Actor, EntityKind, FileRole, Order, OrderStatus, Quote, QuoteStatus};
use shared::util::{now_millis, today_compact};
use sqlx::SqlitePool;
use std::sync::Arc;

use crate::db::repository::{attachment, counter, order, quote};
use crate::db::rows::DesignCols;
use crate::symbols::SymbolTable;

#[derive(Clone)]
pub struct ConversionCoordinator {
    pool: SqlitePool,
    symbols: Arc<SymbolTable>,
}

impl ConversionCoordinator {
    pub fn new(pool: SqlitePool, symbols: Arc<SymbolTable>) -> Self {
        Self { pool, symbols }
    }

    /// Materialize a priced quote as a new order.
    ///
    /// The order copies the quote's kind and design attributes and
    /// enters `IN_PROGRESS`; the quote becomes `CONVERTED` with
    /// `converted_order_id` pointing at the order.
    pub async fn convert(&self, actor: &Actor, quote_id: i64) -> AppResult<(Quote, Order)> {
        let now = now_millis();
        let mut tx = self.pool.begin().await?;

        // The counter upsert is the transaction's first statement, so
        // the write lock is taken before the quote is read. A losing
        // concurrent convert queues here (busy_timeout) and then reads
        // the winner's committed state, instead of starting from a
        // pre-commit snapshot and failing its read-to-write upgrade
        // with a raw SQLITE_BUSY. Error paths roll the increment back.
        let order_number =
            counter::next_number(&mut *tx, counter::ORDER_PREFIX, &today_compact()).await?;

        let quote_row = quote::find_by_id(&mut *tx, quote_id)
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::QuoteNotFound))?;
        if !(actor.is_admin() || actor.owns(quote_row.owner_user_id)) {
            return Err(AppError::forbidden("Not allowed to convert this quote"));
        }

        let status: QuoteStatus = self.symbols.decode(quote_row.status_id)?;
        if status != QuoteStatus::Priced {
            return Err(Self::not_priced(status));
        }

        let cols = DesignCols {
            kind_id: quote_row.kind_id,
            design_name: quote_row.design_name.clone(),
            width: quote_row.width,
            height: quote_row.height,
            unit_id: quote_row.unit_id,
            color_count: quote_row.color_count,
            fabric: quote_row.fabric.clone(),
            color_type: quote_row.color_type.clone(),
            placements: quote_row.placements.clone(),
            required_formats: quote_row.required_formats.clone(),
            instructions: quote_row.instructions.clone(),
            is_urgent: quote_row.is_urgent,
        };
        let in_progress_id = self.symbols.encode(OrderStatus::InProgress)?;
        let order_id = order::insert(
            &mut *tx,
            &order_number,
            quote_row.owner_user_id,
            in_progress_id,
            &cols,
            now,
        )
        .await?;

        let priced_id = self.symbols.encode(QuoteStatus::Priced)?;
        let converted_id = self.symbols.encode(QuoteStatus::Converted)?;
        let changed =
            quote::mark_converted_cas(&mut *tx, quote_id, priced_id, converted_id, order_id, now)
                .await?;
        if changed == 0 {
            // A concurrent conversion or reject won; rolling back takes
            // the order insert with it.
            tx.rollback().await?;
            let fresh: QuoteStatus = self.symbols.decode(
                quote::find_by_id(&self.pool, quote_id)
                    .await?
                    .ok_or_else(|| AppError::new(ErrorCode::QuoteNotFound))?
                    .status_id,
            )?;
            return Err(Self::not_priced(fresh));
        }

        // The quote's files follow it into the order
        let quote_type_id = self.symbols.encode(EntityKind::Quote)?;
        let order_type_id = self.symbols.encode(EntityKind::Order)?;
        let attachment_role_id = self.symbols.encode(FileRole::Attachment)?;
        attachment::relink_entity(
            &mut *tx,
            quote_type_id,
            quote_id,
            order_type_id,
            order_id,
            attachment_role_id,
        )
        .await?;

        tx.commit().await?;
        tracing::info!(
            quote_id,
            order_id,
            order_number = %order_number,
            "Quote converted to order"
        );

        let quote = quote::find_by_id(&self.pool, quote_id)
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::QuoteNotFound))?
            .decode(&self.symbols)?;
        let order = order::find_by_id(&self.pool, order_id)
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound))?
            .decode(&self.symbols)?;
        Ok((quote, order))
    }

    fn not_priced(status: QuoteStatus) -> AppError {
        match status {
            QuoteStatus::Converted => AppError::new(ErrorCode::QuoteAlreadyConverted),
            _ => AppError::with_message(
                ErrorCode::QuoteNotPriced,
                format!("Can only convert priced quotes (quote is {status})"),
            ),
        }
    }
}
