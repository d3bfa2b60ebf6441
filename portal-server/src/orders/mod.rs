//! Order lifecycle
//!
//! Directly created orders enter `IN_PROGRESS`; `PENDING` exists only
//! for legacy rows. Terminal orders are immutable for everyone, status
//! included. All conditional status writes are compare-and-set so a
//! stale read can never overwrite a concurrent transition.

use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{Actor, Order, OrderCreate, OrderStatus, OrderUpdate};
use shared::util::{now_millis, today_compact};
use sqlx::SqlitePool;
use std::sync::Arc;

use crate::auth;
use crate::db::repository::{counter, order};
use crate::db::rows::{DesignCols, OrderRow};
use crate::symbols::SymbolTable;
use crate::utils::validation;

#[derive(Clone)]
pub struct OrderService {
    pool: SqlitePool,
    symbols: Arc<SymbolTable>,
}

impl OrderService {
    pub fn new(pool: SqlitePool, symbols: Arc<SymbolTable>) -> Self {
        Self { pool, symbols }
    }

    /// Create an order owned by the calling actor.
    pub async fn create(&self, actor: &Actor, payload: OrderCreate) -> AppResult<Order> {
        validation::validate_design(payload.kind, &payload.design)?;

        let cols = DesignCols::encode(&self.symbols, payload.kind, &payload.design, payload.is_urgent)?;
        let status_id = self.symbols.encode(OrderStatus::InProgress)?;
        let now = now_millis();

        let mut tx = self.pool.begin().await?;
        let number =
            counter::next_number(&mut *tx, counter::ORDER_PREFIX, &today_compact()).await?;
        let id = order::insert(&mut *tx, &number, actor.id, status_id, &cols, now).await?;
        tx.commit().await?;

        tracing::info!(order_id = id, order_number = %number, "Order created");
        self.load(id).await
    }

    pub async fn get(&self, actor: &Actor, id: i64) -> AppResult<Order> {
        let row = self.require(id).await?;
        auth::ensure_can_view(actor, row.owner_user_id)?;
        row.decode(&self.symbols)
    }

    /// Admins see every order, customers only their own.
    pub async fn list(&self, actor: &Actor) -> AppResult<Vec<Order>> {
        let rows = if actor.is_admin() {
            order::list_all(&self.pool).await?
        } else {
            order::list_by_owner(&self.pool, actor.id).await?
        };
        rows.into_iter().map(|r| r.decode(&self.symbols)).collect()
    }

    /// Edit design fields. Kind-specific required fields are
    /// re-validated whenever the kind or one of those fields changes.
    /// The write is guarded on a non-terminal status, like the status
    /// paths, so it cannot land after a concurrent completion or
    /// cancellation.
    pub async fn update(&self, actor: &Actor, id: i64, update: OrderUpdate) -> AppResult<Order> {
        if update.is_empty() {
            return Err(AppError::invalid_request("Nothing to update"));
        }

        let row = self.require(id).await?;
        let current = row.decode(&self.symbols)?;
        auth::ensure_can_mutate(actor, current.owner_user_id, current.status.is_terminal())?;

        let kind = update.kind.unwrap_or(current.kind);
        let mut design = current.design;
        update.design.apply(&mut design);
        let is_urgent = update.is_urgent.unwrap_or(current.is_urgent);

        validation::validate_design_fields(&design)?;
        if update.kind.is_some() || update.design.touches_required_fields() {
            validation::validate_design(kind, &design)?;
        }

        let editable_ids = [
            self.symbols.encode(OrderStatus::Pending)?,
            self.symbols.encode(OrderStatus::InProgress)?,
        ];
        let cols = DesignCols::encode(&self.symbols, kind, &design, is_urgent)?;
        let rows =
            order::update_design_cas(&self.pool, id, &editable_ids, &cols, now_millis()).await?;
        if rows == 0 {
            // Lost a race with a status change; report against the fresh state
            let row = self.require(id).await?;
            let current: OrderStatus = self.symbols.decode(row.status_id)?;
            auth::ensure_can_mutate(actor, row.owner_user_id, current.is_terminal())?;
            return Err(Self::terminal_error(current));
        }
        self.load(id).await
    }

    /// Admin-only transition through the explicit status-change table.
    pub async fn update_status(
        &self,
        actor: &Actor,
        id: i64,
        target: OrderStatus,
    ) -> AppResult<Order> {
        auth::ensure_can_change_status(actor)?;

        let row = self.require(id).await?;
        let current: OrderStatus = self.symbols.decode(row.status_id)?;
        Self::check_transition(current, target)?;

        let from_id = self.symbols.encode(current)?;
        let to_id = self.symbols.encode(target)?;
        let changed =
            order::update_status_cas(&self.pool, id, &[from_id], to_id, now_millis()).await?;
        if changed == 0 {
            // Lost a race; report against the fresh state
            let row = self.require(id).await?;
            let current: OrderStatus = self.symbols.decode(row.status_id)?;
            Self::check_transition(current, target)?;
            return Err(AppError::new(ErrorCode::OrderInvalidTransition));
        }

        tracing::info!(order_id = id, from = %current, to = %target, "Order status changed");
        self.load(id).await
    }

    /// Owner or admin, from any non-terminal state.
    pub async fn cancel(&self, actor: &Actor, id: i64) -> AppResult<Order> {
        let row = self.require(id).await?;
        if !(actor.is_admin() || actor.owns(row.owner_user_id)) {
            return Err(AppError::forbidden("Not allowed to cancel this order"));
        }

        let from_ids = [
            self.symbols.encode(OrderStatus::Pending)?,
            self.symbols.encode(OrderStatus::InProgress)?,
        ];
        let to_id = self.symbols.encode(OrderStatus::Cancelled)?;
        let changed =
            order::update_status_cas(&self.pool, id, &from_ids, to_id, now_millis()).await?;
        if changed == 0 {
            let row = self.require(id).await?;
            let current: OrderStatus = self.symbols.decode(row.status_id)?;
            return Err(Self::terminal_error(current));
        }

        tracing::info!(order_id = id, "Order cancelled");
        self.load(id).await
    }

    fn check_transition(current: OrderStatus, target: OrderStatus) -> AppResult<()> {
        if current.can_transition_to(target) {
            return Ok(());
        }
        Err(match current {
            OrderStatus::Completed => AppError::new(ErrorCode::OrderAlreadyCompleted),
            OrderStatus::Cancelled => AppError::new(ErrorCode::OrderAlreadyCancelled),
            _ => AppError::with_message(
                ErrorCode::OrderInvalidTransition,
                format!("Cannot move order from {current} to {target}"),
            ),
        })
    }

    fn terminal_error(current: OrderStatus) -> AppError {
        match current {
            OrderStatus::Completed => AppError::new(ErrorCode::OrderAlreadyCompleted),
            OrderStatus::Cancelled => AppError::new(ErrorCode::OrderAlreadyCancelled),
            _ => AppError::new(ErrorCode::OrderInvalidTransition),
        }
    }

    async fn require(&self, id: i64) -> AppResult<OrderRow> {
        order::find_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound))
    }

    async fn load(&self, id: i64) -> AppResult<Order> {
        self.require(id).await?.decode(&self.symbols)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing;
    use shared::models::ServiceKind;

    #[tokio::test]
    async fn test_create_enters_in_progress_with_number() {
        let env = testing::TestEnv::new().await;
        let owner = Actor::customer(10);

        let order = env
            .orders()
            .create(&owner, testing::digitizing_order())
            .await
            .unwrap();

        assert_eq!(order.status, OrderStatus::InProgress);
        assert_eq!(order.owner_user_id, 10);
        assert!(order.order_number.starts_with("TP-"));
        assert!(order.order_number.ends_with("-0001"));
    }

    #[tokio::test]
    async fn test_create_rejects_missing_required_fields() {
        let env = testing::TestEnv::new().await;
        let mut payload = testing::digitizing_order();
        payload.design.fabric = None;

        let err = env
            .orders()
            .create(&Actor::customer(10), payload)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::RequiredField);
    }

    #[tokio::test]
    async fn test_visibility_rules() {
        let env = testing::TestEnv::new().await;
        let owner = Actor::customer(10);
        let stranger = Actor::customer(11);
        let admin = Actor::admin(1);

        let order = env
            .orders()
            .create(&owner, testing::digitizing_order())
            .await
            .unwrap();

        assert!(env.orders().get(&owner, order.id).await.is_ok());
        assert!(env.orders().get(&admin, order.id).await.is_ok());
        let err = env.orders().get(&stranger, order.id).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::PermissionDenied);

        assert_eq!(env.orders().list(&owner).await.unwrap().len(), 1);
        assert_eq!(env.orders().list(&stranger).await.unwrap().len(), 0);
        assert_eq!(env.orders().list(&admin).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_admin_transition_table_enforced() {
        let env = testing::TestEnv::new().await;
        let owner = Actor::customer(10);
        let admin = Actor::admin(1);

        let order = env
            .orders()
            .create(&owner, testing::digitizing_order())
            .await
            .unwrap();

        // IN_PROGRESS -> PENDING is not in the table
        let err = env
            .orders()
            .update_status(&admin, order.id, OrderStatus::Pending)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::OrderInvalidTransition);

        let order = env
            .orders()
            .update_status(&admin, order.id, OrderStatus::Completed)
            .await
            .unwrap();
        assert_eq!(order.status, OrderStatus::Completed);

        // Terminal even for admins
        let err = env
            .orders()
            .update_status(&admin, order.id, OrderStatus::Cancelled)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::OrderAlreadyCompleted);
    }

    #[tokio::test]
    async fn test_owner_cannot_set_status_but_can_cancel() {
        let env = testing::TestEnv::new().await;
        let owner = Actor::customer(10);

        let order = env
            .orders()
            .create(&owner, testing::digitizing_order())
            .await
            .unwrap();

        let err = env
            .orders()
            .update_status(&owner, order.id, OrderStatus::Completed)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::PermissionDenied);

        let order = env.orders().cancel(&owner, order.id).await.unwrap();
        assert_eq!(order.status, OrderStatus::Cancelled);

        // Cancelling twice fails
        let err = env.orders().cancel(&owner, order.id).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::OrderAlreadyCancelled);
    }

    #[tokio::test]
    async fn test_update_revalidates_on_kind_change() {
        let env = testing::TestEnv::new().await;
        let owner = Actor::customer(10);

        let order = env
            .orders()
            .create(&owner, testing::digitizing_order())
            .await
            .unwrap();

        // Switching to VECTOR without a color type must fail
        let err = env
            .orders()
            .update(
                &owner,
                order.id,
                OrderUpdate {
                    kind: Some(ServiceKind::Vector),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::RequiredField);

        // An unrelated edit goes through
        let updated = env
            .orders()
            .update(
                &owner,
                order.id,
                OrderUpdate {
                    is_urgent: Some(true),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(updated.is_urgent);
    }

    #[tokio::test]
    async fn test_owner_cannot_edit_terminal_order() {
        let env = testing::TestEnv::new().await;
        let owner = Actor::customer(10);

        let order = env
            .orders()
            .create(&owner, testing::digitizing_order())
            .await
            .unwrap();
        env.orders().cancel(&owner, order.id).await.unwrap();

        let err = env
            .orders()
            .update(
                &owner,
                order.id,
                OrderUpdate {
                    is_urgent: Some(true),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::PermissionDenied);
    }

    #[tokio::test]
    async fn test_design_write_refuses_terminal_status() {
        let env = testing::TestEnv::new().await;
        let owner = Actor::customer(10);

        let order = env
            .orders()
            .create(&owner, testing::digitizing_order())
            .await
            .unwrap();
        env.orders().cancel(&owner, order.id).await.unwrap();

        // A write whose precondition read happened before the cancel
        // must still miss
        let symbols = env.symbols();
        let editable = [
            symbols.encode(OrderStatus::Pending).unwrap(),
            symbols.encode(OrderStatus::InProgress).unwrap(),
        ];
        let cols = DesignCols::encode(&symbols, order.kind, &order.design, true).unwrap();
        let rows = order::update_design_cas(&env.pool(), order.id, &editable, &cols, now_millis())
            .await
            .unwrap();
        assert_eq!(rows, 0);

        let fresh = env.orders().get(&owner, order.id).await.unwrap();
        assert!(!fresh.is_urgent);
    }
}
