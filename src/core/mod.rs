//! Core module - the transactional supply-room ledger

pub mod catalog;
pub mod config;
pub mod error;
pub mod lifecycle;
pub mod project;
pub mod reserve;
pub mod serialize;
pub mod store;
pub mod sweep;

pub use config::Config;
pub use error::{Result, StockError};
pub use lifecycle::{allowed_transitions, is_legal_transition};
pub use project::{Project, ProjectError};
pub use reserve::ReserveRequest;
pub use store::{PendingLine, Store};
pub use sweep::{SweepFailure, SweepOutcome};
