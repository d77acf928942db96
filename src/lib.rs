//! Sentlog: a durable ledger of sent notifications.
//!
//! Records, for an (address, topic) pair, every moment a notification was
//! sent, so a notifier can decide whether it is time to send again without
//! tracking history itself.
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use sentlog::SendLog;
//!
//! let mut log = SendLog::in_memory().unwrap();
//! let at = NaiveDate::from_ymd_opt(2020, 9, 15)
//!     .unwrap()
//!     .and_hms_opt(12, 55, 17)
//!     .unwrap();
//!
//! log.register("test@example.com", "Pay invoice 123", at).unwrap();
//! assert_eq!(log.sent_at_last("test@example.com", "Pay invoice 123").unwrap(), Some(at));
//! ```
//!
//! # Modules
//!
//! - [`config`]: CLI and environment configuration
//! - [`observability`]: Tracing setup
//! - [`storage`]: SQLite persistence layer

// Lint configuration
#![warn(clippy::all)]
#![allow(
    clippy::module_name_repetitions,    // storage::log::SendLogError is fine
    clippy::must_use_candidate,         // Not all functions need #[must_use]
    clippy::missing_errors_doc,         // Error docs can be verbose
    clippy::needless_raw_string_hashes  // r#""# is fine for SQL
)]

pub mod config;
pub mod observability;
pub mod storage;

pub use storage::log::{SendEvent, SendLog, SendLogError, StorageLocation, StorageOptions};
pub use storage::schema::JournalMode;

/// Result type for send log operations.
pub type Result<T> = std::result::Result<T, SendLogError>;
