pub mod check;
pub mod completions;
pub mod config;
pub mod levels;
pub mod render;
pub mod run;

use eyre::{Context, Result};
use std::sync::Arc;

use goodlog::config::Config;
use goodlog::formatter::EventFormatter;
use goodlog::sink::LevelSink;

use crate::cli::Overrides;

/// Keyword for `--request-level` that leaves the request level unset
const DERIVE_FROM_TAGS: &str = "derive";

/// Apply command-line overrides on top of the loaded config
pub fn apply_overrides(config: &Config, overrides: &Overrides) -> Config {
    let mut config = config.clone();

    if let Some(kind) = overrides.sink {
        config.sink.kind = kind;
    }
    if let Some(levels) = overrides.levels {
        config.sink.levels = levels;
        config.sink.custom_levels.clear();
    }
    if overrides.no_color {
        config.formatter.color = false;
    }
    if overrides.local_time {
        config.formatter.utc = false;
    }
    if let Some(format) = &overrides.timestamp_format {
        config.formatter.format = format.clone();
    }
    if let Some(level) = &overrides.request_level {
        config.formatter.level.request = if level == DERIVE_FROM_TAGS { None } else { Some(level.clone()) };
    }

    config
}

/// Sink described by the config
pub fn configured_sink(config: &Config) -> Arc<dyn LevelSink> {
    config.sink.kind.build(config.sink.level_set())
}

/// Build the formatter, failing on any level the sink does not know
pub fn build_formatter(config: &Config, sink: Arc<dyn LevelSink>) -> Result<EventFormatter> {
    EventFormatter::builder()
        .sink(sink)
        .settings(config.formatter.clone())
        .build()
        .context("Invalid formatter configuration")
}

#[cfg(test)]
mod tests {
    use super::*;
    use goodlog::level::LevelPreset;
    use goodlog::sink::SinkKind;

    #[test]
    fn test_apply_overrides() {
        let overrides = Overrides {
            sink: Some(SinkKind::Log),
            levels: Some(LevelPreset::Syslog),
            no_color: true,
            local_time: true,
            timestamp_format: Some("HH:mm".to_string()),
            request_level: Some("derive".to_string()),
        };

        let config = apply_overrides(&Config::default(), &overrides);
        assert_eq!(config.sink.kind, SinkKind::Log);
        assert_eq!(config.sink.levels, LevelPreset::Syslog);
        assert!(!config.formatter.color);
        assert!(!config.formatter.utc);
        assert_eq!(config.formatter.format, "HH:mm");
        assert!(config.formatter.level.request.is_none());
    }

    #[test]
    fn test_no_overrides_keeps_config() {
        let config = apply_overrides(&Config::default(), &Overrides::default());
        assert!(config.formatter.color);
        assert!(config.formatter.level.request.is_none());
    }

    #[test]
    fn test_request_level_override_opts_out_of_tags() {
        let overrides = Overrides {
            request_level: Some("info".to_string()),
            ..Overrides::default()
        };
        let config = apply_overrides(&Config::default(), &overrides);
        assert_eq!(config.formatter.level.request.as_deref(), Some("info"));
    }

    #[test]
    fn test_build_formatter_rejects_unknown_level() {
        let overrides = Overrides {
            levels: Some(LevelPreset::Syslog),
            request_level: Some("warn".to_string()),
            ..Overrides::default()
        };
        let config = apply_overrides(&Config::default(), &overrides);
        let result = build_formatter(&config, configured_sink(&config));
        assert!(result.is_err());
    }
}
