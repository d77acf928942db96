//! List, last and dump command implementations.

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use serde::Serialize;
use sentlog::config::OutputFormat;
use sentlog::{SendEvent, SendLog};

#[derive(Serialize)]
struct ListOutput<'a> {
    address: &'a str,
    topic: &'a str,
    sent_at: Vec<NaiveDateTime>,
    total: usize,
}

#[derive(Serialize)]
struct LastOutput<'a> {
    address: &'a str,
    topic: &'a str,
    last_sent_at: Option<NaiveDateTime>,
}

#[derive(Serialize)]
struct DumpOutput {
    events: Vec<SendEvent>,
    total: usize,
}

pub fn list(log: &SendLog, address: &str, topic: &str, format: OutputFormat) -> Result<()> {
    let sent_at = log
        .sent_at_all(address, topic)
        .context("failed to query send times")?;

    match format {
        OutputFormat::Text => {
            for ts in &sent_at {
                println!("{ts}");
            }
        }
        OutputFormat::Json => {
            let output = ListOutput {
                address,
                topic,
                total: sent_at.len(),
                sent_at,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}

pub fn last(log: &SendLog, address: &str, topic: &str, format: OutputFormat) -> Result<()> {
    let last_sent_at = log
        .sent_at_last(address, topic)
        .context("failed to query last send time")?;

    match format {
        OutputFormat::Text => match last_sent_at {
            Some(ts) => println!("{ts}"),
            None => println!("never"),
        },
        OutputFormat::Json => {
            let output = LastOutput {
                address,
                topic,
                last_sent_at,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}

pub fn dump(log: &SendLog, format: OutputFormat) -> Result<()> {
    let events = log.events().context("failed to read send events")?;

    match format {
        OutputFormat::Text => {
            if events.is_empty() {
                println!("No send events recorded.");
            } else {
                println!("{:<32} {:<32} {:>29}", "ADDRESS", "TOPIC", "SENT AT");
                println!("{}", "-".repeat(95));
                for event in &events {
                    println!(
                        "{:<32} {:<32} {:>29}",
                        event.address,
                        event.topic,
                        event.sent_at.to_string()
                    );
                }
                println!();
                println!("Total: {} event(s)", events.len());
            }
        }
        OutputFormat::Json => {
            let output = DumpOutput {
                total: events.len(),
                events,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}
