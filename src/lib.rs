//! goodlog turns structured monitoring events (HTTP responses, ops
//! snapshots, errors, generic log entries) into single human-readable lines
//! and hands each one to a leveled sink logger.

pub mod config;
pub mod error;
pub mod event;
pub mod format;
pub mod formatter;
pub mod level;
pub mod settings;
pub mod sink;
pub mod timestamp;

pub use error::ConfigError;
pub use event::{Event, EventKind};
pub use formatter::{EventFormatter, EventSender, Rendered};
pub use level::{LevelPreset, LevelSet};
pub use settings::{LevelSettings, Settings};
pub use sink::{LevelSink, LogCrateSink, MemorySink, SinkKind, WriterSink};
