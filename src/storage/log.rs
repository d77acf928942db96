//! The send ledger.
//!
//! [`SendLog`] owns a single SQLite connection and exposes the append and
//! query operations. Rows are immutable: there is no update or delete.

use chrono::NaiveDateTime;
use rusqlite::{params, Connection, OpenFlags, TransactionBehavior};
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

use super::schema::{apply_pragmas, initialize_schema, JournalMode};
use super::timestamp;

/// Location string that requests a transient in-memory store.
pub const MEMORY_MARKER: &str = ":memory:";

const INSERT_EVENT: &str = "INSERT INTO sent_emails (address, topic, sent_at) VALUES (?1, ?2, ?3)";

// Equal timestamps fall back to insertion order.
const SELECT_SENT_AT: &str = r#"
SELECT sent_at
FROM sent_emails
WHERE address = ?1 AND topic = ?2
ORDER BY sent_at ASC, rowid ASC
"#;

const COUNT_EVENTS: &str = "SELECT COUNT(*) FROM sent_emails WHERE address = ?1 AND topic = ?2";

const SELECT_ALL_EVENTS: &str = r#"
SELECT address, topic, sent_at
FROM sent_emails
ORDER BY sent_at ASC, rowid ASC
"#;

/// Error type for send log operations.
#[derive(Debug, Error)]
pub enum SendLogError {
    #[error("Storage unavailable at {location}: {source}")]
    StorageUnavailable {
        location: String,
        #[source]
        source: rusqlite::Error,
    },

    #[error("Failed to record send event: {0}")]
    WriteFailure(#[source] rusqlite::Error),

    #[error("Failed to query send events: {0}")]
    ReadFailure(#[source] rusqlite::Error),

    #[error("Timestamp {sent_at} is outside the storable years 0000-9999")]
    TimestampOutOfRange { sent_at: NaiveDateTime },

    #[error("Stored timestamp {value:?} is not a valid datetime: {source}")]
    InvalidTimestamp {
        value: String,
        #[source]
        source: chrono::ParseError,
    },
}

/// Where the ledger lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageLocation {
    /// A SQLite database file, created on first open.
    File(PathBuf),
    /// A private in-memory database, gone when the log is dropped.
    InMemory,
}

impl StorageLocation {
    pub fn is_in_memory(&self) -> bool {
        matches!(self, Self::InMemory)
    }
}

impl fmt::Display for StorageLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::InMemory => f.write_str(MEMORY_MARKER),
        }
    }
}

impl From<&str> for StorageLocation {
    fn from(value: &str) -> Self {
        if value == MEMORY_MARKER {
            Self::InMemory
        } else {
            Self::File(PathBuf::from(value))
        }
    }
}

impl From<String> for StorageLocation {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl From<&Path> for StorageLocation {
    fn from(value: &Path) -> Self {
        if value.as_os_str() == MEMORY_MARKER {
            Self::InMemory
        } else {
            Self::File(value.to_path_buf())
        }
    }
}

impl From<PathBuf> for StorageLocation {
    fn from(value: PathBuf) -> Self {
        Self::from(value.as_path())
    }
}

impl From<&PathBuf> for StorageLocation {
    fn from(value: &PathBuf) -> Self {
        Self::from(value.as_path())
    }
}

/// Connection tuning applied on open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StorageOptions {
    /// How long a write waits on another connection's lock before failing.
    pub busy_timeout: Duration,
    /// Journal mode for file stores. Ignored for in-memory stores.
    pub journal_mode: JournalMode,
}

impl Default for StorageOptions {
    fn default() -> Self {
        Self {
            busy_timeout: Duration::from_secs(5),
            journal_mode: JournalMode::Wal,
        }
    }
}

/// One recorded notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SendEvent {
    pub address: String,
    pub topic: String,
    pub sent_at: NaiveDateTime,
}

/// Durable ledger of sent notifications.
///
/// Each instance owns its own connection; several instances may point at
/// the same file and rely on SQLite locking for isolation.
#[derive(Debug)]
pub struct SendLog {
    conn: Connection,
    location: StorageLocation,
}

impl SendLog {
    /// Open (or create) a ledger with default options.
    ///
    /// # Errors
    ///
    /// Returns [`SendLogError::StorageUnavailable`] if the database cannot be
    /// opened or the schema cannot be created.
    pub fn open(location: impl Into<StorageLocation>) -> crate::Result<Self> {
        Self::open_with(location, &StorageOptions::default())
    }

    /// Open (or create) a ledger with explicit connection options.
    pub fn open_with(
        location: impl Into<StorageLocation>,
        options: &StorageOptions,
    ) -> crate::Result<Self> {
        let location = location.into();
        let unavailable = |source| SendLogError::StorageUnavailable {
            location: location.to_string(),
            source,
        };

        let conn = match &location {
            StorageLocation::File(path) => Connection::open_with_flags(
                path,
                OpenFlags::SQLITE_OPEN_READ_WRITE
                    | OpenFlags::SQLITE_OPEN_CREATE
                    | OpenFlags::SQLITE_OPEN_NO_MUTEX,
            ),
            StorageLocation::InMemory => Connection::open_in_memory(),
        }
        .map_err(unavailable)?;

        let journal_mode = (!location.is_in_memory()).then_some(options.journal_mode);
        apply_pragmas(&conn, journal_mode, options.busy_timeout).map_err(unavailable)?;
        initialize_schema(&conn).map_err(unavailable)?;

        info!(location = %location, "Send log opened");
        Ok(Self { conn, location })
    }

    /// Open a private in-memory ledger.
    pub fn in_memory() -> crate::Result<Self> {
        Self::open(StorageLocation::InMemory)
    }

    /// The location this ledger was opened on.
    pub fn location(&self) -> &StorageLocation {
        &self.location
    }

    /// Record that a notification about `topic` was sent to `address` at
    /// `sent_at`.
    ///
    /// The insert runs in its own transaction: on error nothing is visible
    /// to later reads. Years outside 0000-9999 are rejected before anything
    /// is written.
    pub fn register(
        &mut self,
        address: &str,
        topic: &str,
        sent_at: NaiveDateTime,
    ) -> crate::Result<()> {
        let encoded =
            timestamp::encode(&sent_at).ok_or(SendLogError::TimestampOutOfRange { sent_at })?;

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(SendLogError::WriteFailure)?;
        tx.execute(INSERT_EVENT, params![address, topic, encoded])
            .map_err(SendLogError::WriteFailure)?;
        tx.commit().map_err(SendLogError::WriteFailure)?;

        debug!(address, topic, sent_at = %sent_at, "Send event registered");
        Ok(())
    }

    /// All send times for the pair, oldest first.
    ///
    /// Address and topic must match exactly. Duplicates are kept. An unknown
    /// pair yields an empty vector.
    pub fn sent_at_all(&self, address: &str, topic: &str) -> crate::Result<Vec<NaiveDateTime>> {
        let mut stmt = self
            .conn
            .prepare_cached(SELECT_SENT_AT)
            .map_err(SendLogError::ReadFailure)?;
        let raw = stmt
            .query_map(params![address, topic], |row| row.get::<_, String>(0))
            .map_err(SendLogError::ReadFailure)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(SendLogError::ReadFailure)?;

        debug!(address, topic, matches = raw.len(), "Send times queried");
        raw.iter().map(|value| decode(value)).collect()
    }

    /// The most recent send time for the pair, or `None` if nothing was
    /// ever sent.
    pub fn sent_at_last(&self, address: &str, topic: &str) -> crate::Result<Option<NaiveDateTime>> {
        Ok(self.sent_at_all(address, topic)?.pop())
    }

    /// Number of sends recorded for the pair.
    pub fn count(&self, address: &str, topic: &str) -> crate::Result<u64> {
        self.conn
            .query_row(COUNT_EVENTS, params![address, topic], |row| row.get::<_, u64>(0))
            .map_err(SendLogError::ReadFailure)
    }

    /// Every recorded event, oldest first.
    pub fn events(&self) -> crate::Result<Vec<SendEvent>> {
        let mut stmt = self
            .conn
            .prepare_cached(SELECT_ALL_EVENTS)
            .map_err(SendLogError::ReadFailure)?;
        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                ))
            })
            .map_err(SendLogError::ReadFailure)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(SendLogError::ReadFailure)?;

        rows.into_iter()
            .map(|(address, topic, sent_at)| {
                Ok(SendEvent {
                    address,
                    topic,
                    sent_at: decode(&sent_at)?,
                })
            })
            .collect()
    }
}

fn decode(value: &str) -> crate::Result<NaiveDateTime> {
    timestamp::decode(value).map_err(|source| SendLogError::InvalidTimestamp {
        value: value.to_string(),
        source,
    })
}
