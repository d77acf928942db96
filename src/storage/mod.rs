//! SQLite storage layer for Sentlog.
//!
//! Provides:
//! - Schema initialization and connection pragmas
//! - Fixed-width timestamp encoding
//! - The [`log::SendLog`] ledger itself

pub mod log;
pub mod schema;
pub mod timestamp;
