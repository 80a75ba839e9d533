use colored::*;
use eyre::Result;

use goodlog::config::Config;

use crate::cli::{ConfigAction, OutputFormat};

pub fn run(action: ConfigAction, config: &Config) -> Result<()> {
    match action {
        ConfigAction::Show { format } => show(OutputFormat::resolve(format), config),
    }
}

fn show(format: OutputFormat, config: &Config) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(config)?);
        }
        OutputFormat::Yaml => {
            println!("{}", serde_yaml::to_string(config)?);
        }
        OutputFormat::Text => {
            let formatter = &config.formatter;
            println!("{}", "goodlog Configuration".bold());
            println!();

            println!("{}:", "formatter".cyan());
            println!("  format: {}", formatter.format);
            println!("  utc: {}", formatter.utc);
            println!("  color: {}", formatter.color);
            println!("  level.error: {}", formatter.level.error);
            println!("  level.ops: {}", formatter.level.ops);
            println!(
                "  level.request: {}",
                formatter.level.request.as_deref().unwrap_or("(from tags)")
            );
            println!("  level.response: {}", formatter.level.response);
            println!("  level.other: {}", formatter.level.other);
            println!();

            println!("{}:", "sink".cyan());
            println!("  kind: {:?}", config.sink.kind);
            println!("  levels: {}", config.sink.levels);
            if !config.sink.custom_levels.is_empty() {
                println!("  custom_levels: {}", config.sink.custom_levels.join(", "));
            }
            println!();

            println!("log_level: {}", config.log_level.as_filter());
        }
    }

    Ok(())
}
