use colored::*;
use eyre::Result;

use goodlog::config::Config;

use crate::cli::Overrides;

/// Validate the formatter configuration against the sink's levels
pub fn run(overrides: &Overrides, quiet: bool, config: &Config) -> Result<()> {
    let config = super::apply_overrides(config, overrides);
    let sink = super::configured_sink(&config);
    super::build_formatter(&config, sink.clone())?;

    if !quiet {
        println!(
            "{} Configuration valid against {} sink levels",
            "✓".green(),
            sink.levels().len()
        );
        for (option, level) in config.formatter.level.configured() {
            println!("  {}: {}", option.cyan(), level);
        }
        if config.formatter.level.request.is_none() {
            println!("  {}: {}", "request".cyan(), "derived from tags".dimmed());
        }
    }

    Ok(())
}
