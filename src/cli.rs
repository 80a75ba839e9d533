use clap::{Args, Parser, Subcommand, ValueEnum};
use std::io::IsTerminal;
use std::path::PathBuf;

use goodlog::level::LevelPreset;
use goodlog::sink::SinkKind;

/// Output format for commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text
    Text,
    /// JSON format
    Json,
    /// YAML format
    Yaml,
}

impl OutputFormat {
    /// Resolve the effective output format.
    /// If user specified a format, use it.
    /// Otherwise: TTY → Text, non-TTY (pipe) → Json
    pub fn resolve(user_choice: Option<OutputFormat>) -> OutputFormat {
        match user_choice {
            Some(fmt) => fmt,
            None => {
                if std::io::stdout().is_terminal() {
                    OutputFormat::Text
                } else {
                    OutputFormat::Json
                }
            }
        }
    }
}

#[derive(Parser)]
#[command(
    name = "goodlog",
    about = "Reformat structured monitoring events into leveled log lines",
    version,
    after_help = "Diagnostics are written to: ~/.local/share/goodlog/logs/goodlog.log"
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to goodlog.yaml config file")]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true, help = "Suppress non-error output")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Format newline-delimited JSON events and deliver them to the sink
    Run {
        /// Read events from a file instead of stdin
        #[arg(long, short = 'i')]
        input: Option<PathBuf>,

        /// Events buffered between reader and formatter
        #[arg(long, default_value_t = 64)]
        buffer: usize,

        #[command(flatten)]
        overrides: Overrides,
    },

    /// Format a single JSON event and print the result
    Render {
        /// Event as a JSON object
        event: String,

        /// Output format (default: text for TTY, json for pipes)
        #[arg(long, short = 'o', value_enum)]
        format: Option<OutputFormat>,

        #[command(flatten)]
        overrides: Overrides,
    },

    /// List the levels a sink recognizes
    Levels {
        /// Level preset to list (defaults to the configured sink levels)
        #[arg(long, value_enum)]
        preset: Option<LevelPreset>,

        /// Output format (default: text for TTY, json for pipes)
        #[arg(long, short = 'o', value_enum)]
        format: Option<OutputFormat>,
    },

    /// Validate configured levels against the sink
    Check {
        #[command(flatten)]
        overrides: Overrides,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: clap_complete::Shell,
    },
}

/// Command-line overrides applied on top of the config file
#[derive(Args, Debug, Clone, Default)]
pub struct Overrides {
    /// Sink that receives event lines
    #[arg(long, value_enum)]
    pub sink: Option<SinkKind>,

    /// Level preset recognized by the sink
    #[arg(long, value_enum)]
    pub levels: Option<LevelPreset>,

    /// Disable ANSI colors for methods and status codes
    #[arg(long)]
    pub no_color: bool,

    /// Render timestamps in local time instead of UTC
    #[arg(long)]
    pub local_time: bool,

    /// Moment-style timestamp pattern, e.g. YYMMDD/HHmmss.SSS
    #[arg(long)]
    pub timestamp_format: Option<String>,

    /// Level for request/log events, or "derive" to take it from tags
    #[arg(long)]
    pub request_level: Option<String>,
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show {
        /// Output format (default: text for TTY, json for pipes)
        #[arg(long, short = 'o', value_enum)]
        format: Option<OutputFormat>,
    },
}
