use colored::*;
use eyre::Result;

use goodlog::config::Config;
use goodlog::level::{LevelPreset, LevelSet};

use crate::cli::OutputFormat;

pub fn run(preset: Option<LevelPreset>, format: OutputFormat, config: &Config) -> Result<()> {
    let (source, levels) = match preset {
        Some(preset) => (preset.to_string(), preset.levels()),
        None if !config.sink.custom_levels.is_empty() => ("custom".to_string(), config.sink.level_set()),
        None => (config.sink.levels.to_string(), config.sink.level_set()),
    };

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&levels)?);
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yaml::to_string(&levels)?);
        }
        OutputFormat::Text => print_levels(&source, &levels),
    }

    Ok(())
}

fn print_levels(source: &str, levels: &LevelSet) {
    println!("{} ({} levels)", source.bold(), levels.len());
    for (name, priority) in levels.iter() {
        println!("  {} {}", priority.to_string().dimmed(), name.cyan());
    }
}
