//! stockroom: university supply-room equipment loan tracker
//!
//! Tracks physical units of lab stock through the request -> loan ->
//! return/deny lifecycle, with atomic reservation against a SQLite ledger
//! and a periodic sweep that reclaims abandoned requests.

pub mod cli;
pub mod core;
pub mod entities;
