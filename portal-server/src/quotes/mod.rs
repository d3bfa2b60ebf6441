//! Quote lifecycle
//!
//! Quotes start in `PENDING`, get priced by staff, and end either
//! converted into an order or rejected. A `PRICED` quote is never
//! silently re-priced; the customer sends it back through
//! `request_revision` first. Owners may edit fields only while the
//! quote is still `PENDING`; admins while it is non-terminal.

use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{Actor, Quote, QuoteCreate, QuotePricing, QuoteStatus, QuoteUpdate};
use shared::util::{now_millis, today_compact};
use sqlx::SqlitePool;
use std::sync::Arc;

use crate::auth;
use crate::db::repository::{attachment, counter, quote};
use crate::db::rows::{DesignCols, QuoteRow};
use crate::symbols::SymbolTable;
use crate::utils::validation;

/// ISO 4217: three uppercase ASCII letters.
fn validate_currency(currency: &str) -> AppResult<()> {
    if currency.len() == 3 && currency.bytes().all(|b| b.is_ascii_uppercase()) {
        Ok(())
    } else {
        Err(AppError::validation("currency must be a 3-letter ISO 4217 code"))
    }
}

#[derive(Clone)]
pub struct QuoteService {
    pool: SqlitePool,
    symbols: Arc<SymbolTable>,
}

impl QuoteService {
    pub fn new(pool: SqlitePool, symbols: Arc<SymbolTable>) -> Self {
        Self { pool, symbols }
    }

    /// Create a quote owned by the calling actor, in `PENDING`.
    pub async fn create(&self, actor: &Actor, payload: QuoteCreate) -> AppResult<Quote> {
        validation::validate_design(payload.kind, &payload.design)?;

        let cols = DesignCols::encode(&self.symbols, payload.kind, &payload.design, payload.is_urgent)?;
        let status_id = self.symbols.encode(QuoteStatus::Pending)?;
        let now = now_millis();

        let mut tx = self.pool.begin().await?;
        let number =
            counter::next_number(&mut *tx, counter::QUOTE_PREFIX, &today_compact()).await?;
        let id = quote::insert(&mut *tx, &number, actor.id, status_id, &cols, now).await?;
        tx.commit().await?;

        tracing::info!(quote_id = id, quote_number = %number, "Quote created");
        self.load(id).await
    }

    pub async fn get(&self, actor: &Actor, id: i64) -> AppResult<Quote> {
        let row = self.require(id).await?;
        auth::ensure_can_view(actor, row.owner_user_id)?;
        row.decode(&self.symbols)
    }

    pub async fn list(&self, actor: &Actor) -> AppResult<Vec<Quote>> {
        let rows = if actor.is_admin() {
            quote::list_all(&self.pool).await?
        } else {
            quote::list_by_owner(&self.pool, actor.id).await?
        };
        rows.into_iter().map(|r| r.decode(&self.symbols)).collect()
    }

    /// Edit design fields. Owners only while `PENDING`; admins while
    /// the quote is non-terminal. The write is guarded on the same
    /// status set, so it cannot land after a concurrent pricing or
    /// terminal transition.
    pub async fn update(&self, actor: &Actor, id: i64, update: QuoteUpdate) -> AppResult<Quote> {
        if update.is_empty() {
            return Err(AppError::invalid_request("Nothing to update"));
        }

        let row = self.require(id).await?;
        let current = row.decode(&self.symbols)?;
        auth::ensure_can_mutate(
            actor,
            current.owner_user_id,
            current.status != QuoteStatus::Pending,
        )?;
        if current.status.is_terminal() {
            return Err(AppError::with_message(
                ErrorCode::QuoteNotEditable,
                format!("Quote is {} and can no longer be edited", current.status),
            ));
        }

        let kind = update.kind.unwrap_or(current.kind);
        let mut design = current.design;
        update.design.apply(&mut design);
        let is_urgent = update.is_urgent.unwrap_or(current.is_urgent);

        validation::validate_design_fields(&design)?;
        if update.kind.is_some() || update.design.touches_required_fields() {
            validation::validate_design(kind, &design)?;
        }

        let editable_ids = if actor.is_admin() {
            vec![
                self.symbols.encode(QuoteStatus::Pending)?,
                self.symbols.encode(QuoteStatus::Priced)?,
                self.symbols.encode(QuoteStatus::RevisionRequested)?,
            ]
        } else {
            vec![self.symbols.encode(QuoteStatus::Pending)?]
        };
        let cols = DesignCols::encode(&self.symbols, kind, &design, is_urgent)?;
        let rows =
            quote::update_design_cas(&self.pool, id, &editable_ids, &cols, now_millis()).await?;
        if rows == 0 {
            // Lost a race with a status change; report against the fresh state
            let row = self.require(id).await?;
            let current: QuoteStatus = self.symbols.decode(row.status_id)?;
            auth::ensure_can_mutate(
                actor,
                row.owner_user_id,
                current != QuoteStatus::Pending,
            )?;
            return Err(AppError::with_message(
                ErrorCode::QuoteNotEditable,
                format!("Quote is {current} and can no longer be edited"),
            ));
        }
        self.load(id).await
    }

    /// Admin-only pricing. Allowed from `PENDING` and
    /// `REVISION_REQUESTED`; a `PRICED` quote must go through
    /// `request_revision` before it can be priced again.
    pub async fn set_pricing(
        &self,
        actor: &Actor,
        id: i64,
        pricing: QuotePricing,
    ) -> AppResult<Quote> {
        auth::ensure_admin(actor)?;

        if pricing.price_cents < 0 {
            return Err(AppError::validation("price must not be negative"));
        }
        validate_currency(&pricing.currency)?;
        validation::validate_optional_text(
            &pricing.remarks,
            "remarks",
            validation::MAX_NOTE_LEN,
        )?;

        let row = self.require(id).await?;
        let current: QuoteStatus = self.symbols.decode(row.status_id)?;
        Self::check_priceable(current)?;

        let from_ids = [
            self.symbols.encode(QuoteStatus::Pending)?,
            self.symbols.encode(QuoteStatus::RevisionRequested)?,
        ];
        let priced_id = self.symbols.encode(QuoteStatus::Priced)?;
        let changed = quote::set_pricing_cas(
            &self.pool,
            id,
            &from_ids,
            priced_id,
            pricing.price_cents,
            &pricing.currency,
            pricing.remarks.as_deref(),
            now_millis(),
        )
        .await?;
        if changed == 0 {
            let row = self.require(id).await?;
            let current: QuoteStatus = self.symbols.decode(row.status_id)?;
            Self::check_priceable(current)?;
            return Err(AppError::new(ErrorCode::QuoteInvalidTransition));
        }

        tracing::info!(quote_id = id, price_cents = pricing.price_cents, "Quote priced");
        self.load(id).await
    }

    /// Owner or admin sends a `PRICED` quote back for re-pricing.
    pub async fn request_revision(&self, actor: &Actor, id: i64) -> AppResult<Quote> {
        let row = self.require(id).await?;
        if !(actor.is_admin() || actor.owns(row.owner_user_id)) {
            return Err(AppError::forbidden("Not allowed to modify this quote"));
        }

        let from_id = self.symbols.encode(QuoteStatus::Priced)?;
        let to_id = self.symbols.encode(QuoteStatus::RevisionRequested)?;
        let changed =
            quote::update_status_cas(&self.pool, id, &[from_id], to_id, now_millis()).await?;
        if changed == 0 {
            let current: QuoteStatus = self.symbols.decode(self.require(id).await?.status_id)?;
            return Err(AppError::with_message(
                ErrorCode::QuoteInvalidTransition,
                format!("Only priced quotes can be sent back for revision (quote is {current})"),
            ));
        }

        tracing::info!(quote_id = id, "Quote revision requested");
        self.load(id).await
    }

    /// Owner or admin rejects a quote from any non-terminal state.
    pub async fn reject(&self, actor: &Actor, id: i64) -> AppResult<Quote> {
        let row = self.require(id).await?;
        if !(actor.is_admin() || actor.owns(row.owner_user_id)) {
            return Err(AppError::forbidden("Not allowed to modify this quote"));
        }

        let from_ids = [
            self.symbols.encode(QuoteStatus::Pending)?,
            self.symbols.encode(QuoteStatus::Priced)?,
            self.symbols.encode(QuoteStatus::RevisionRequested)?,
        ];
        let to_id = self.symbols.encode(QuoteStatus::Rejected)?;
        let changed =
            quote::update_status_cas(&self.pool, id, &from_ids, to_id, now_millis()).await?;
        if changed == 0 {
            let current: QuoteStatus = self.symbols.decode(self.require(id).await?.status_id)?;
            return Err(match current {
                QuoteStatus::Converted => AppError::new(ErrorCode::QuoteAlreadyConverted),
                _ => AppError::new(ErrorCode::QuoteInvalidTransition),
            });
        }

        tracing::info!(quote_id = id, "Quote rejected");
        self.load(id).await
    }

    /// Admin-only. Refused once the quote has been converted; the
    /// quote's attachment rows go with it in the same transaction.
    pub async fn delete(&self, actor: &Actor, id: i64) -> AppResult<()> {
        auth::ensure_admin(actor)?;

        let row = self.require(id).await?;
        if row.converted_order_id.is_some() {
            return Err(AppError::with_message(
                ErrorCode::QuoteAlreadyConverted,
                "Cannot delete a converted quote",
            ));
        }

        let quote_type_id = self
            .symbols
            .encode(shared::models::EntityKind::Quote)?;

        let mut tx = self.pool.begin().await?;
        attachment::delete_for_entity(&mut *tx, quote_type_id, id).await?;
        let deleted = quote::delete(&mut *tx, id).await?;
        if deleted == 0 {
            return Err(AppError::new(ErrorCode::QuoteNotFound));
        }
        tx.commit().await?;

        tracing::info!(quote_id = id, "Quote deleted");
        Ok(())
    }

    fn check_priceable(current: QuoteStatus) -> AppResult<()> {
        if current.can_price() {
            return Ok(());
        }
        Err(match current {
            QuoteStatus::Priced => AppError::new(ErrorCode::QuoteAlreadyPriced),
            QuoteStatus::Converted => AppError::new(ErrorCode::QuoteAlreadyConverted),
            _ => AppError::with_message(
                ErrorCode::QuoteInvalidTransition,
                format!("Cannot price a {current} quote"),
            ),
        })
    }

    async fn require(&self, id: i64) -> AppResult<QuoteRow> {
        quote::find_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::QuoteNotFound))
    }

    async fn load(&self, id: i64) -> AppResult<Quote> {
        self.require(id).await?.decode(&self.symbols)
    }
}
