//! Stream command
//!
//! Reads newline-delimited JSON events and pushes them through a spawned
//! formatter, one at a time and in order.

use colored::*;
use eyre::{Context, Result};
use serde_json::Value;
use std::borrow::Cow;
use std::path::Path;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

use goodlog::config::Config;
use goodlog::event::Event;
use goodlog::formatter::EventFormatter;

use crate::cli::Overrides;

#[derive(Debug, Default, PartialEq, Eq)]
struct StreamStats {
    delivered: usize,
    /// Lines that were not JSON, delivered as raw text
    raw: usize,
}

pub fn run(input: Option<&Path>, buffer: usize, overrides: &Overrides, quiet: bool, config: &Config) -> Result<()> {
    let config = super::apply_overrides(config, overrides);
    let formatter = super::build_formatter(&config, super::configured_sink(&config))?;

    let rt = tokio::runtime::Runtime::new().context("Failed to create tokio runtime")?;
    let stats = rt.block_on(async {
        let reader: Box<dyn AsyncBufRead + Unpin + Send> = match input {
            Some(path) => {
                let file = tokio::fs::File::open(path)
                    .await
                    .context(format!("Failed to open {}", path.display()))?;
                Box::new(BufReader::new(file))
            }
            None => Box::new(BufReader::new(tokio::io::stdin())),
        };
        stream_events(reader, buffer, formatter).await
    })?;

    log::info!("Delivered {} events ({} raw lines)", stats.delivered, stats.raw);
    if !quiet && stats.raw > 0 {
        eprintln!("{} {} lines were not JSON and were logged as raw text", "⚠".yellow(), stats.raw);
    }

    Ok(())
}

async fn stream_events<R>(mut reader: R, buffer: usize, formatter: EventFormatter) -> Result<StreamStats>
where
    R: AsyncBufRead + Unpin,
{
    let (sender, handle) = formatter.spawn(buffer);
    let mut buf = Vec::new();
    let mut stats = StreamStats::default();
    let mut line_no = 0;

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).await.context("Failed to read event stream")? == 0 {
            break;
        }
        line_no += 1;

        let line = String::from_utf8_lossy(&buf);
        if matches!(line, Cow::Owned(_)) {
            log::warn!("Line {} is not valid UTF-8", line_no);
        }
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let event = match Event::from_json(trimmed) {
            Ok(event) => event,
            Err(e) => {
                log::warn!("Line {} is not a JSON event: {:#}", line_no, e);
                stats.raw += 1;
                Event::from_value(Value::String(trimmed.to_string()))
            }
        };
        sender.send(event).await?;
    }

    drop(sender);
    stats.delivered = handle.await.context("Event formatter task failed")?;
    Ok(stats)
}
