//! Closed categorical enums backed by the symbolic value table
//!
//! Each enum mirrors one seeded category and carries the behavior that
//! depends on it (terminal sets, transition tables). The surrogate-id
//! indirection lives in the server's symbol resolver; transition logic
//! stays type-safe here.

use super::symbol::SymbolCoded;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of service requested on an order or quote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServiceKind {
    Digitizing,
    Vector,
    Patches,
}

impl SymbolCoded for ServiceKind {
    const CATEGORY: &'static str = "order_type";
    const FALLBACK_CATEGORY: Option<&'static str> = Some("service_type");
    const ALL: &'static [Self] = &[Self::Digitizing, Self::Vector, Self::Patches];

    fn symbol(&self) -> &'static str {
        match self {
            Self::Digitizing => "DIGITIZING",
            Self::Vector => "VECTOR",
            Self::Patches => "PATCHES",
        }
    }

    fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "DIGITIZING" => Some(Self::Digitizing),
            "VECTOR" => Some(Self::Vector),
            "PATCHES" => Some(Self::Patches),
            _ => None,
        }
    }
}

/// Order workflow status.
///
/// Directly created orders skip `Pending` and start in `InProgress`;
/// the pending state only occurs for legacy data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Pending,
    InProgress,
    Completed,
    Cancelled,
}

impl OrderStatus {
    /// Terminal states admit no further transitions, not even by admins.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    /// Admin status-change table. Cancellation by the owner goes through
    /// the dedicated cancel action instead, which allows any non-terminal
    /// source state.
    pub fn can_transition_to(&self, target: OrderStatus) -> bool {
        matches!(
            (self, target),
            (Self::Pending, Self::InProgress)
                | (Self::Pending, Self::Cancelled)
                | (Self::InProgress, Self::Completed)
                | (Self::InProgress, Self::Cancelled)
        )
    }
}

impl SymbolCoded for OrderStatus {
    const CATEGORY: &'static str = "order_status";
    const ALL: &'static [Self] = &[
        Self::Pending,
        Self::InProgress,
        Self::Completed,
        Self::Cancelled,
    ];

    fn symbol(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::InProgress => "IN_PROGRESS",
            Self::Completed => "COMPLETED",
            Self::Cancelled => "CANCELLED",
        }
    }

    fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "PENDING" => Some(Self::Pending),
            "IN_PROGRESS" => Some(Self::InProgress),
            "COMPLETED" => Some(Self::Completed),
            "CANCELLED" => Some(Self::Cancelled),
            _ => None,
        }
    }
}

/// Quote workflow status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuoteStatus {
    Pending,
    Priced,
    RevisionRequested,
    Converted,
    Rejected,
}

impl QuoteStatus {
    /// Terminal states admit no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Converted | Self::Rejected)
    }

    /// Pricing is allowed from `Pending` and `RevisionRequested` only.
    /// Re-pricing an already priced quote is rejected so a price the
    /// customer may already be viewing is never silently overwritten.
    pub fn can_price(&self) -> bool {
        matches!(self, Self::Pending | Self::RevisionRequested)
    }
}

impl SymbolCoded for QuoteStatus {
    const CATEGORY: &'static str = "quote_status";
    // Legacy schemas seeded some quote statuses under order_status.
    const FALLBACK_CATEGORY: Option<&'static str> = Some("order_status");
    const ALL: &'static [Self] = &[
        Self::Pending,
        Self::Priced,
        Self::RevisionRequested,
        Self::Converted,
        Self::Rejected,
    ];

    fn symbol(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Priced => "PRICED",
            Self::RevisionRequested => "REVISION_REQUESTED",
            Self::Converted => "CONVERTED",
            Self::Rejected => "REJECTED",
        }
    }

    fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "PENDING" => Some(Self::Pending),
            "PRICED" => Some(Self::Priced),
            "REVISION_REQUESTED" => Some(Self::RevisionRequested),
            "CONVERTED" => Some(Self::Converted),
            "REJECTED" => Some(Self::Rejected),
            _ => None,
        }
    }
}

/// Which entity a file attachment belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityKind {
    Order,
    Quote,
}

impl SymbolCoded for EntityKind {
    const CATEGORY: &'static str = "entity_type";
    const ALL: &'static [Self] = &[Self::Order, Self::Quote];

    fn symbol(&self) -> &'static str {
        match self {
            Self::Order => "ORDER",
            Self::Quote => "QUOTE",
        }
    }

    fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "ORDER" => Some(Self::Order),
            "QUOTE" => Some(Self::Quote),
            _ => None,
        }
    }
}

/// Role a file plays on its parent entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FileRole {
    /// Uploaded by the owner of the parent order/quote
    CustomerUpload,
    /// Uploaded by staff in response
    AdminResponse,
    /// Carried over mechanically, e.g. re-linked during quote conversion
    Attachment,
}

impl SymbolCoded for FileRole {
    const CATEGORY: &'static str = "file_role";
    const ALL: &'static [Self] = &[Self::CustomerUpload, Self::AdminResponse, Self::Attachment];

    fn symbol(&self) -> &'static str {
        match self {
            Self::CustomerUpload => "CUSTOMER_UPLOAD",
            Self::AdminResponse => "ADMIN_RESPONSE",
            Self::Attachment => "ATTACHMENT",
        }
    }

    fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "CUSTOMER_UPLOAD" => Some(Self::CustomerUpload),
            "ADMIN_RESPONSE" => Some(Self::AdminResponse),
            "ATTACHMENT" => Some(Self::Attachment),
            _ => None,
        }
    }
}

/// Measurement unit for design dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MeasureUnit {
    Inch,
    Cm,
    Mm,
}

impl SymbolCoded for MeasureUnit {
    const CATEGORY: &'static str = "unit";
    const FALLBACK_CATEGORY: Option<&'static str> = Some("measurement_unit");
    const ALL: &'static [Self] = &[Self::Inch, Self::Cm, Self::Mm];

    fn symbol(&self) -> &'static str {
        match self {
            Self::Inch => "INCH",
            Self::Cm => "CM",
            Self::Mm => "MM",
        }
    }

    fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "INCH" => Some(Self::Inch),
            "CM" => Some(Self::Cm),
            "MM" => Some(Self::Mm),
            _ => None,
        }
    }
}

macro_rules! impl_display_via_symbol {
    ($($ty:ty),+ $(,)?) => {
        $(impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.symbol())
            }
        })+
    };
}

impl_display_via_symbol!(
    ServiceKind,
    OrderStatus,
    QuoteStatus,
    EntityKind,
    FileRole,
    MeasureUnit,
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_roundtrip() {
        for kind in ServiceKind::ALL {
            assert_eq!(ServiceKind::from_symbol(kind.symbol()), Some(*kind));
        }
        for status in OrderStatus::ALL {
            assert_eq!(OrderStatus::from_symbol(status.symbol()), Some(*status));
        }
        for status in QuoteStatus::ALL {
            assert_eq!(QuoteStatus::from_symbol(status.symbol()), Some(*status));
        }
        for role in FileRole::ALL {
            assert_eq!(FileRole::from_symbol(role.symbol()), Some(*role));
        }
    }

    #[test]
    fn test_symbol_is_case_sensitive() {
        assert_eq!(OrderStatus::from_symbol("pending"), None);
        assert_eq!(ServiceKind::from_symbol("digitizing"), None);
    }

    #[test]
    fn test_order_transition_table() {
        use OrderStatus::*;

        assert!(Pending.can_transition_to(InProgress));
        assert!(Pending.can_transition_to(Cancelled));
        assert!(InProgress.can_transition_to(Completed));
        assert!(InProgress.can_transition_to(Cancelled));

        // No skipping, no leaving terminal states
        assert!(!Pending.can_transition_to(Completed));
        assert!(!Completed.can_transition_to(Cancelled));
        assert!(!Cancelled.can_transition_to(InProgress));
        assert!(!InProgress.can_transition_to(Pending));
    }

    #[test]
    fn test_terminal_states() {
        assert!(OrderStatus::Completed.is_terminal());
        assert!(OrderStatus::Cancelled.is_terminal());
        assert!(!OrderStatus::InProgress.is_terminal());

        assert!(QuoteStatus::Converted.is_terminal());
        assert!(QuoteStatus::Rejected.is_terminal());
        assert!(!QuoteStatus::Priced.is_terminal());
    }

    #[test]
    fn test_quote_pricing_preconditions() {
        assert!(QuoteStatus::Pending.can_price());
        assert!(QuoteStatus::RevisionRequested.can_price());
        assert!(!QuoteStatus::Priced.can_price());
        assert!(!QuoteStatus::Converted.can_price());
        assert!(!QuoteStatus::Rejected.can_price());
    }

    #[test]
    fn test_serde_matches_symbols() {
        let json = serde_json::to_string(&OrderStatus::InProgress).unwrap();
        assert_eq!(json, "\"IN_PROGRESS\"");
        let role: FileRole = serde_json::from_str("\"CUSTOMER_UPLOAD\"").unwrap();
        assert_eq!(role, FileRole::CustomerUpload);
    }
}
