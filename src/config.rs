//! Configuration parsing for the `sentlog` command.
//!
//! Supports:
//! - CLI arguments via clap
//! - Environment variable overrides
//! - Sensible defaults for quick start

use chrono::{NaiveDateTime, TimeDelta};
use clap::{Parser, Subcommand, ValueEnum};
use std::time::Duration;

use crate::storage::log::{StorageLocation, StorageOptions};
use crate::storage::schema::JournalMode;
use crate::storage::timestamp;

/// Sentlog: a durable ledger of sent notifications.
#[derive(Parser, Debug, Clone)]
#[command(name = "sentlog")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Config {
    /// SQLite database file (or ":memory:")
    #[arg(long, env = "SENTLOG_DB", default_value = "./sent_emails.db", global = true)]
    pub db: String,

    /// How long a write waits for a locked database, in milliseconds
    #[arg(long, env = "SENTLOG_BUSY_TIMEOUT_MS", default_value_t = 5000, global = true)]
    pub busy_timeout_ms: u64,

    /// Journal mode for the database file
    #[arg(long, env = "SENTLOG_JOURNAL_MODE", value_enum, default_value_t = JournalMode::Wal, global = true)]
    pub journal_mode: JournalMode,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "RUST_LOG", default_value = "warn", global = true)]
    pub log_level: String,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    pub output: OutputFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Record that a notification was sent
    Register {
        /// Recipient address
        address: String,
        /// Notification topic
        topic: String,
        /// When it was sent, "YYYY-MM-DD HH:MM:SS[.fraction]" (defaults to now)
        #[arg(long, value_parser = parse_timestamp)]
        at: Option<NaiveDateTime>,
    },
    /// List every send time for an address and topic, oldest first
    List {
        address: String,
        topic: String,
    },
    /// Show the most recent send time for an address and topic
    Last {
        address: String,
        topic: String,
    },
    /// Check whether the resend interval has elapsed
    Due {
        address: String,
        topic: String,
        /// Minimum time between sends, e.g. 90s, 30m, 12h, 7d
        #[arg(short, long, value_parser = parse_interval)]
        interval: TimeDelta,
    },
    /// Print every recorded event
    Dump,
}

impl Config {
    /// Parse configuration from CLI arguments and environment.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Storage location named by `--db`.
    pub fn location(&self) -> StorageLocation {
        StorageLocation::from(self.db.as_str())
    }

    /// Connection options named by the CLI flags.
    pub fn storage_options(&self) -> StorageOptions {
        StorageOptions {
            busy_timeout: Duration::from_millis(self.busy_timeout_ms),
            journal_mode: self.journal_mode,
        }
    }
}

/// Parse a timestamp argument using the storage decoder.
pub fn parse_timestamp(value: &str) -> Result<NaiveDateTime, String> {
    timestamp::decode(value).map_err(|e| format!("invalid timestamp {value:?}: {e}"))
}

/// Parse an interval such as `90s`, `30m`, `12h` or `7d`.
pub fn parse_interval(value: &str) -> Result<TimeDelta, String> {
    let value = value.trim();
    let split = value
        .find(|c: char| !c.is_ascii_digit())
        .ok_or_else(|| format!("missing unit in interval {value:?} (use s, m, h or d)"))?;
    let (amount, unit) = value.split_at(split);
    let amount: i64 = amount
        .parse()
        .map_err(|_| format!("invalid amount in interval {value:?}"))?;

    let delta = match unit {
        "s" => TimeDelta::try_seconds(amount),
        "m" => TimeDelta::try_minutes(amount),
        "h" => TimeDelta::try_hours(amount),
        "d" => TimeDelta::try_days(amount),
        _ => return Err(format!("unknown unit {unit:?} in interval {value:?}")),
    };
    delta.ok_or_else(|| format!("interval {value:?} is out of range"))
}
