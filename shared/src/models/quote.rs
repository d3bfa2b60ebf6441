//! Quote model and payloads

use super::catalog::{QuoteStatus, ServiceKind};
use super::design::{DesignPatch, DesignSpec};
use serde::{Deserialize, Serialize};

/// A price inquiry as exposed to callers.
///
/// Invariants maintained by the lifecycle layer:
/// - `converted_order_id` is set if and only if `status` is `Converted`
/// - `price_cents` is set once the quote has been priced and is never
///   cleared afterwards, so converted quotes still carry their price
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub id: i64,
    pub quote_number: String,
    pub owner_user_id: i64,
    pub kind: ServiceKind,
    pub status: QuoteStatus,
    #[serde(flatten)]
    pub design: DesignSpec,
    pub is_urgent: bool,
    /// Price in minor units of `currency` (e.g. cents for USD)
    pub price_cents: Option<i64>,
    pub currency: Option<String>,
    pub admin_remarks: Option<String>,
    pub converted_order_id: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Payload for creating a quote. Quotes always start in `Pending`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteCreate {
    pub kind: ServiceKind,
    #[serde(flatten)]
    pub design: DesignSpec,
    #[serde(default)]
    pub is_urgent: bool,
}

/// Payload for editing a quote's fields. Pricing and status changes go
/// through their dedicated operations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuoteUpdate {
    pub kind: Option<ServiceKind>,
    #[serde(flatten)]
    pub design: DesignPatch,
    pub is_urgent: Option<bool>,
}

impl QuoteUpdate {
    pub fn is_empty(&self) -> bool {
        self.kind.is_none() && self.design.is_empty() && self.is_urgent.is_none()
    }
}

/// Admin pricing payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuotePricing {
    /// Price in minor units, must be non-negative
    pub price_cents: i64,
    /// ISO 4217 code, e.g. "USD"
    pub currency: String,
    pub remarks: Option<String>,
}
