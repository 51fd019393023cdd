//! Error taxonomy for catalog, reservation and lifecycle operations
//!
//! Every mutating operation runs inside a single transaction; any of these
//! errors rolls the whole transaction back, so partial state is never
//! observable. The presentation layer translates them into user messages.

use thiserror::Error;

use crate::entities::LineStatus;

/// Errors raised by the stockroom core.
#[derive(Debug, Error)]
pub enum StockError {
    #[error("No unit named '{name}'{} exists", .code.as_deref().map(|c| format!(" with code {c}")).unwrap_or_default())]
    NotFound { name: String, code: Option<String> },

    #[error("Unit '{name}' [{code}] is already reserved or on loan")]
    Unavailable { name: String, code: String },

    #[error("Invalid quantity {quantity}: {reason}")]
    InvalidQuantity { quantity: u32, reason: String },

    #[error("Insufficient stock for '{name}': requested {requested}, only {available} available")]
    InsufficientStock {
        name: String,
        requested: u32,
        available: u32,
    },

    #[error("Illegal status transition: {from} -> {to}")]
    IllegalTransition { from: LineStatus, to: LineStatus },

    #[error("Release shortfall on line item {line_item}: expected to release {expected} unit(s), released {released}")]
    ReleaseShortfall {
        line_item: i64,
        expected: u32,
        released: u32,
    },

    #[error("A unit named '{name}' with code {code} already exists")]
    DuplicateCode { name: String, code: String },

    #[error("Unit {id} is reserved or referenced by a line item and cannot be deleted")]
    UnitInUse { id: i64 },

    #[error("Unit {0} does not exist")]
    UnitNotFound(i64),

    #[error("Line item {0} does not exist")]
    LineItemNotFound(i64),

    #[error("Order {0} does not exist")]
    OrderNotFound(i64),

    #[error("Group {0} does not exist")]
    GroupNotFound(i64),

    #[error("No user with email '{0}'")]
    UserNotFound(String),

    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

pub type Result<T> = std::result::Result<T, StockError>;
