//! Register command implementation.

use anyhow::{Context, Result};
use chrono::{Local, NaiveDateTime};
use serde::Serialize;
use sentlog::config::OutputFormat;
use sentlog::SendLog;

#[derive(Serialize)]
struct RegisterOutput<'a> {
    address: &'a str,
    topic: &'a str,
    sent_at: NaiveDateTime,
}

pub fn run(
    log: &mut SendLog,
    address: &str,
    topic: &str,
    at: Option<NaiveDateTime>,
    format: OutputFormat,
) -> Result<()> {
    let sent_at = at.unwrap_or_else(|| Local::now().naive_local());

    log.register(address, topic, sent_at)
        .context("failed to register send")?;

    match format {
        OutputFormat::Text => println!("Registered {address} / {topic} at {sent_at}"),
        OutputFormat::Json => {
            let output = RegisterOutput {
                address,
                topic,
                sent_at,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}
