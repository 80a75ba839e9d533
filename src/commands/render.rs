use colored::*;
use eyre::Result;
use std::sync::Arc;

use goodlog::config::Config;
use goodlog::event::Event;
use goodlog::sink::MemorySink;

use crate::cli::{OutputFormat, Overrides};

/// Format one event without delivering it anywhere
pub fn run(event: &str, format: OutputFormat, overrides: &Overrides, config: &Config) -> Result<()> {
    let config = super::apply_overrides(config, overrides);
    let sink = Arc::new(MemorySink::new(config.sink.level_set()));
    let formatter = super::build_formatter(&config, sink)?;

    let event = Event::from_json(event)?;
    let rendered = formatter.render(&event);

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&rendered)?);
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yaml::to_string(&rendered)?);
        }
        OutputFormat::Text => {
            println!("{}: {}", rendered.level.cyan(), rendered.line);
        }
    }

    Ok(())
}
