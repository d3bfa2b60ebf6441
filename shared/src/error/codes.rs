//! Unified error codes for the ThreadPoint portal
//!
//! Error codes are shared between the service core and the HTTP layer
//! and are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: Symbolic reference data errors
//! - 4xxx: Order errors
//! - 5xxx: Quote errors
//! - 6xxx: File attachment errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient
/// serialization and cross-language compatibility (Rust, TypeScript).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Required field missing
    RequiredField = 7,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Invalid credentials (username/password)
    InvalidCredentials = 1002,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Admin role required
    AdminRequired = 2003,

    // ==================== 3xxx: Symbolic reference data ====================
    /// No active symbolic value matches the requested (category, symbol)
    UnknownSymbol = 3001,
    /// No symbolic value exists for the given surrogate id
    UnknownSymbolId = 3002,
    /// A surrogate id resolved to an unexpected category
    SymbolCategoryMismatch = 3003,
    /// Seeded reference data is missing expected symbols
    SymbolSeedIncomplete = 3004,

    // ==================== 4xxx: Order ====================
    /// Order not found
    OrderNotFound = 4001,
    /// Requested order status transition is not allowed
    OrderInvalidTransition = 4002,
    /// Order has already been completed
    OrderAlreadyCompleted = 4003,
    /// Order has already been cancelled
    OrderAlreadyCancelled = 4004,

    // ==================== 5xxx: Quote ====================
    /// Quote not found
    QuoteNotFound = 5001,
    /// Quote is not in a priced state
    QuoteNotPriced = 5002,
    /// Quote has already been priced
    QuoteAlreadyPriced = 5003,
    /// Quote has already been converted to an order
    QuoteAlreadyConverted = 5004,
    /// Requested quote status transition is not allowed
    QuoteInvalidTransition = 5005,
    /// Quote can no longer be edited in its current status
    QuoteNotEditable = 5006,

    // ==================== 6xxx: File attachment ====================
    /// File not found
    FileNotFound = 6001,
    /// File too large
    FileTooLarge = 6002,
    /// Unsupported file format
    UnsupportedFileFormat = 6003,
    /// Empty file provided
    EmptyFile = 6005,
    /// No filename provided
    NoFilename = 6006,
    /// File storage failed
    FileStorageFailed = 6009,
    /// The order/quote the attachment points at does not exist
    AttachmentParentNotFound = 6010,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Configuration error
    ConfigError = 9005,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::RequiredField => "Required field is missing",

            // Auth
            ErrorCode::NotAuthenticated => "User is not authenticated",
            ErrorCode::InvalidCredentials => "Invalid username or password",
            ErrorCode::TokenExpired => "Authentication token has expired",
            ErrorCode::TokenInvalid => "Authentication token is invalid",

            // Permission
            ErrorCode::PermissionDenied => "Permission denied",
            ErrorCode::AdminRequired => "Administrator role is required",

            // Symbol
            ErrorCode::UnknownSymbol => "Unknown symbolic value",
            ErrorCode::UnknownSymbolId => "Unknown symbolic value id",
            ErrorCode::SymbolCategoryMismatch => "Symbolic value belongs to another category",
            ErrorCode::SymbolSeedIncomplete => "Symbolic reference data is incomplete",

            // Order
            ErrorCode::OrderNotFound => "Order not found",
            ErrorCode::OrderInvalidTransition => "Order status transition not allowed",
            ErrorCode::OrderAlreadyCompleted => "Order has already been completed",
            ErrorCode::OrderAlreadyCancelled => "Order has already been cancelled",

            // Quote
            ErrorCode::QuoteNotFound => "Quote not found",
            ErrorCode::QuoteNotPriced => "Quote has not been priced",
            ErrorCode::QuoteAlreadyPriced => "Quote has already been priced",
            ErrorCode::QuoteAlreadyConverted => "Quote has already been converted",
            ErrorCode::QuoteInvalidTransition => "Quote status transition not allowed",
            ErrorCode::QuoteNotEditable => "Quote can no longer be edited",

            // File
            ErrorCode::FileNotFound => "File not found",
            ErrorCode::FileTooLarge => "File too large",
            ErrorCode::UnsupportedFileFormat => "Unsupported file format",
            ErrorCode::EmptyFile => "Empty file provided",
            ErrorCode::NoFilename => "No filename provided",
            ErrorCode::FileStorageFailed => "File storage failed",
            ErrorCode::AttachmentParentNotFound => "Attachment parent not found",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::ConfigError => "Configuration error",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            7 => Ok(ErrorCode::RequiredField),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),
            1002 => Ok(ErrorCode::InvalidCredentials),
            1003 => Ok(ErrorCode::TokenExpired),
            1004 => Ok(ErrorCode::TokenInvalid),

            // Permission
            2001 => Ok(ErrorCode::PermissionDenied),
            2003 => Ok(ErrorCode::AdminRequired),

            // Symbol
            3001 => Ok(ErrorCode::UnknownSymbol),
            3002 => Ok(ErrorCode::UnknownSymbolId),
            3003 => Ok(ErrorCode::SymbolCategoryMismatch),
            3004 => Ok(ErrorCode::SymbolSeedIncomplete),

            // Order
            4001 => Ok(ErrorCode::OrderNotFound),
            4002 => Ok(ErrorCode::OrderInvalidTransition),
            4003 => Ok(ErrorCode::OrderAlreadyCompleted),
            4004 => Ok(ErrorCode::OrderAlreadyCancelled),

            // Quote
            5001 => Ok(ErrorCode::QuoteNotFound),
            5002 => Ok(ErrorCode::QuoteNotPriced),
            5003 => Ok(ErrorCode::QuoteAlreadyPriced),
            5004 => Ok(ErrorCode::QuoteAlreadyConverted),
            5005 => Ok(ErrorCode::QuoteInvalidTransition),
            5006 => Ok(ErrorCode::QuoteNotEditable),

            // File
            6001 => Ok(ErrorCode::FileNotFound),
            6002 => Ok(ErrorCode::FileTooLarge),
            6003 => Ok(ErrorCode::UnsupportedFileFormat),
            6005 => Ok(ErrorCode::EmptyFile),
            6006 => Ok(ErrorCode::NoFilename),
            6009 => Ok(ErrorCode::FileStorageFailed),
            6010 => Ok(ErrorCode::AttachmentParentNotFound),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9005 => Ok(ErrorCode::ConfigError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
