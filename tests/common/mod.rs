//! Test utilities for Sentlog tests.
//!
//! Provides:
//! - Per-test temporary database fixtures
//! - Timestamp helpers
//! - Raw row access that bypasses `SendLog`

#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::Connection;
use std::path::PathBuf;
use tempfile::TempDir;

/// Test fixture that manages a temporary database directory.
///
/// The directory is automatically cleaned up when the fixture is dropped.
pub struct TestFixture {
    /// Temporary directory for test database
    pub temp_dir: TempDir,
    /// Path to the database file
    pub db_path: PathBuf,
}

impl TestFixture {
    /// Create a new test fixture with a temporary database directory.
    pub fn new() -> Self {
        sentlog::observability::tracing::init_test_tracing();
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let db_path = temp_dir.path().join("test.db");
        Self { temp_dir, db_path }
    }

    /// Get the database path as a string.
    pub fn db_path_str(&self) -> &str {
        self.db_path.to_str().expect("invalid path")
    }

    /// Read every row straight from SQLite, in insertion order.
    pub fn raw_rows(&self) -> Vec<(String, String, String)> {
        let conn = Connection::open(&self.db_path).expect("failed to open db");
        let mut stmt = conn
            .prepare("SELECT address, topic, sent_at FROM sent_emails ORDER BY rowid")
            .expect("failed to prepare");
        stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)))
            .expect("failed to query")
            .collect::<Result<Vec<_>, _>>()
            .expect("failed to read rows")
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Build a timestamp with microsecond precision.
pub fn datetime(
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
    min: u32,
    sec: u32,
    micro: u32,
) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .expect("invalid date")
        .and_hms_micro_opt(hour, min, sec, micro)
        .expect("invalid time")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_creates_temp_dir() {
        let fixture = TestFixture::new();
        assert!(fixture.temp_dir.path().exists());
        assert!(fixture.db_path_str().contains("test.db"));
    }
}
