//! sentlog: command-line access to a send ledger.
//!
//! # Usage
//!
//! ```bash
//! sentlog --db ./sent_emails.db register someone@example.com "Pay invoice 123"
//! sentlog --db ./sent_emails.db last someone@example.com "Pay invoice 123"
//! sentlog --db ./sent_emails.db due someone@example.com "Pay invoice 123" --interval 7d
//! ```
//!
//! Environment variables can also be used:
//! - `SENTLOG_DB`: Path to the SQLite database
//! - `SENTLOG_BUSY_TIMEOUT_MS`: Lock wait for writes
//! - `RUST_LOG`: Log level (trace, debug, info, warn, error)

mod commands;

use anyhow::{Context, Result};
use sentlog::config::{Command, Config};
use sentlog::observability::tracing::init_tracing;
use sentlog::SendLog;
use std::process::ExitCode;

fn main() -> Result<ExitCode> {
    // Parse configuration from CLI arguments and environment
    let config = Config::parse_args();

    // Initialize tracing/logging
    init_tracing(&config.log_level);

    let location = config.location();
    let mut log = SendLog::open_with(location.clone(), &config.storage_options())
        .with_context(|| format!("failed to open send log at {location}"))?;

    let format = config.output;
    match config.command {
        Command::Register { address, topic, at } => {
            commands::register::run(&mut log, &address, &topic, at, format)?;
        }
        Command::List { address, topic } => {
            commands::query::list(&log, &address, &topic, format)?;
        }
        Command::Last { address, topic } => {
            commands::query::last(&log, &address, &topic, format)?;
        }
        Command::Due {
            address,
            topic,
            interval,
        } => {
            return commands::due::run(&log, &address, &topic, interval, format);
        }
        Command::Dump => commands::query::dump(&log, format)?,
    }

    Ok(ExitCode::SUCCESS)
}
