//! Schema creation and connection pragmas.
//!
//! Every statement is `IF NOT EXISTS`, so opening an existing store leaves
//! its tables, indexes, and rows untouched.

use rusqlite::Connection;
use std::time::Duration;

/// Table and index definitions for the send ledger.
pub const SCHEMA_SQL: &str = r#"
BEGIN;
CREATE TABLE IF NOT EXISTS sent_emails (
    address TEXT NOT NULL,
    topic   TEXT NOT NULL,
    sent_at TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_address ON sent_emails (address);
CREATE INDEX IF NOT EXISTS idx_topic ON sent_emails (topic);
CREATE INDEX IF NOT EXISTS idx_sent_at ON sent_emails (sent_at);
COMMIT;
"#;

/// SQLite journal mode for file-backed stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum JournalMode {
    /// Write-ahead log: readers never block the writer.
    #[default]
    Wal,
    /// Rollback journal, deleted after each transaction.
    Delete,
}

impl JournalMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Wal => "WAL",
            Self::Delete => "DELETE",
        }
    }
}

/// Apply durability and locking pragmas to a fresh connection.
///
/// `journal_mode` is skipped for in-memory databases, which only support
/// SQLite's `memory` journal.
pub fn apply_pragmas(
    conn: &Connection,
    journal_mode: Option<JournalMode>,
    busy_timeout: Duration,
) -> rusqlite::Result<()> {
    conn.busy_timeout(busy_timeout)?;

    if let Some(mode) = journal_mode {
        let applied: String =
            conn.pragma_update_and_check(None, "journal_mode", mode.as_str(), |row| row.get(0))?;
        tracing::debug!(requested = mode.as_str(), applied = %applied, "Journal mode set");
    }

    conn.pragma_update(None, "synchronous", "FULL")?;
    Ok(())
}

/// Create the `sent_emails` table and its indexes if they are missing.
pub fn initialize_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA_SQL)
}
