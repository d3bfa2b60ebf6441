//! Order model and payloads

use super::catalog::{OrderStatus, ServiceKind};
use super::design::{DesignPatch, DesignSpec};
use serde::{Deserialize, Serialize};

/// A production order as exposed to callers.
///
/// `kind` and `status` are the decoded symbolic values; the surrogate
/// ids never leave the persistence layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: i64,
    pub order_number: String,
    pub owner_user_id: i64,
    pub kind: ServiceKind,
    pub status: OrderStatus,
    #[serde(flatten)]
    pub design: DesignSpec,
    pub is_urgent: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Payload for creating an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderCreate {
    pub kind: ServiceKind,
    #[serde(flatten)]
    pub design: DesignSpec,
    #[serde(default)]
    pub is_urgent: bool,
}

/// Payload for editing an order's fields. Status changes go through
/// the dedicated status operations, never through here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderUpdate {
    pub kind: Option<ServiceKind>,
    #[serde(flatten)]
    pub design: DesignPatch,
    pub is_urgent: Option<bool>,
}

impl OrderUpdate {
    pub fn is_empty(&self) -> bool {
        self.kind.is_none() && self.design.is_empty() && self.is_urgent.is_none()
    }
}
