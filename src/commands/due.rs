//! Due command implementation.
//!
//! Answers "may I send again?" from the last recorded send time. Exits with
//! status 0 when a send is due and 1 when the caller should wait.

use anyhow::{Context, Result};
use chrono::{Local, NaiveDateTime, TimeDelta};
use serde::Serialize;
use sentlog::config::OutputFormat;
use sentlog::SendLog;
use std::process::ExitCode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Verdict {
    Due,
    Wait(TimeDelta),
}

#[derive(Serialize)]
struct DueOutput<'a> {
    address: &'a str,
    topic: &'a str,
    due: bool,
    last_sent_at: Option<NaiveDateTime>,
    wait_seconds: i64,
}

fn evaluate(last: Option<NaiveDateTime>, now: NaiveDateTime, interval: TimeDelta) -> Verdict {
    let Some(last) = last else {
        return Verdict::Due;
    };
    let elapsed = now - last;
    if elapsed >= interval {
        Verdict::Due
    } else {
        // A send far in the future can push the remainder past TimeDelta's range.
        Verdict::Wait(
            interval
                .checked_sub(&elapsed)
                .unwrap_or_else(TimeDelta::max_value),
        )
    }
}

pub fn run(
    log: &SendLog,
    address: &str,
    topic: &str,
    interval: TimeDelta,
    format: OutputFormat,
) -> Result<ExitCode> {
    let last_sent_at = log
        .sent_at_last(address, topic)
        .context("failed to query last send time")?;
    let verdict = evaluate(last_sent_at, Local::now().naive_local(), interval);

    match format {
        OutputFormat::Text => match verdict {
            Verdict::Due => println!("due"),
            Verdict::Wait(remaining) => println!("wait {}s", remaining.num_seconds().max(1)),
        },
        OutputFormat::Json => {
            let output = DueOutput {
                address,
                topic,
                due: verdict == Verdict::Due,
                last_sent_at,
                wait_seconds: match verdict {
                    Verdict::Due => 0,
                    Verdict::Wait(remaining) => remaining.num_seconds().max(1),
                },
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(match verdict {
        Verdict::Due => ExitCode::SUCCESS,
        Verdict::Wait(_) => ExitCode::FAILURE,
    })
}
