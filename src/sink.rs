//! Sink loggers
//!
//! A sink accepts `(level, message)` pairs and owns everything that happens
//! to a line afterwards. Sinks never fail outward: a broken writer is
//! reported through the `log` facade and the stream keeps flowing.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use crate::level::LevelSet;

/// Target used when forwarding event lines to the `log` crate
pub const EVENT_TARGET: &str = "goodlog::event";

/// The leveled logger that receives formatted lines
pub trait LevelSink: Send + Sync {
    /// Level names this sink recognizes
    fn levels(&self) -> &LevelSet;

    /// Deliver one formatted line at the given level
    fn log(&self, level: &str, message: &str);
}

/// Which sink the CLI builds
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SinkKind {
    #[default]
    Stdout,
    Stderr,
    /// Forward to the `log` facade (env_logger in the binary)
    Log,
}

impl SinkKind {
    pub fn build(&self, levels: LevelSet) -> Arc<dyn LevelSink> {
        match self {
            SinkKind::Stdout => Arc::new(WriterSink::stdout(levels)),
            SinkKind::Stderr => Arc::new(WriterSink::stderr(levels)),
            SinkKind::Log => Arc::new(LogCrateSink::new(levels)),
        }
    }
}

/// Writes `level: message` lines to any writer
pub struct WriterSink<W: Write + Send> {
    levels: LevelSet,
    writer: Mutex<W>,
}

impl<W: Write + Send> WriterSink<W> {
    pub fn new(levels: LevelSet, writer: W) -> Self {
        Self {
            levels,
            writer: Mutex::new(writer),
        }
    }

    /// Consume the sink and hand back the writer
    pub fn into_inner(self) -> W {
        match self.writer.into_inner() {
            Ok(writer) => writer,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl WriterSink<io::Stdout> {
    pub fn stdout(levels: LevelSet) -> Self {
        Self::new(levels, io::stdout())
    }
}

impl WriterSink<io::Stderr> {
    pub fn stderr(levels: LevelSet) -> Self {
        Self::new(levels, io::stderr())
    }
}

impl<W: Write + Send> LevelSink for WriterSink<W> {
    fn levels(&self) -> &LevelSet {
        &self.levels
    }

    fn log(&self, level: &str, message: &str) {
        let mut writer = match self.writer.lock() {
            Ok(writer) => writer,
            Err(poisoned) => poisoned.into_inner(),
        };

        if let Err(e) = writeln!(writer, "{}: {}", level, message).and_then(|_| writer.flush()) {
            log::warn!("Failed to write event line: {}", e);
        }
    }
}

/// Forwards lines to the `log` facade
pub struct LogCrateSink {
    levels: LevelSet,
}

impl LogCrateSink {
    pub fn new(levels: LevelSet) -> Self {
        Self { levels }
    }
}

impl LevelSink for LogCrateSink {
    fn levels(&self) -> &LevelSet {
        &self.levels
    }

    fn log(&self, level: &str, message: &str) {
        log::log!(target: EVENT_TARGET, self.levels.to_log_level(level), "{}", message);
    }
}

/// Keeps every delivered line in memory, in order
#[derive(Default)]
pub struct MemorySink {
    levels: LevelSet,
    lines: Mutex<Vec<(String, String)>>,
}

impl MemorySink {
    pub fn new(levels: LevelSet) -> Self {
        Self {
            levels,
            lines: Mutex::new(Vec::new()),
        }
    }

    /// Snapshot of `(level, message)` pairs delivered so far
    pub fn lines(&self) -> Vec<(String, String)> {
        match self.lines.lock() {
            Ok(lines) => lines.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl LevelSink for MemorySink {
    fn levels(&self) -> &LevelSet {
        &self.levels
    }

    fn log(&self, level: &str, message: &str) {
        let mut lines = match self.lines.lock() {
            Ok(lines) => lines,
            Err(poisoned) => poisoned.into_inner(),
        };
        lines.push((level.to_string(), message.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writer_sink_format() {
        let sink = WriterSink::new(LevelSet::default(), Vec::new());
        sink.log("info", "hello");
        sink.log("warn", "second");

        let out = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(out, "info: hello\nwarn: second\n");
    }

    #[test]
    fn test_memory_sink_keeps_order() {
        let sink = MemorySink::new(LevelSet::default());
        sink.log("error", "a");
        sink.log("info", "b");
        assert_eq!(
            sink.lines(),
            vec![("error".to_string(), "a".to_string()), ("info".to_string(), "b".to_string())]
        );
    }

    #[test]
    fn test_log_crate_sink_does_not_panic_without_logger() {
        let sink = LogCrateSink::new(LevelSet::default());
        sink.log("silly", "nobody listens");
        sink.log("not-a-level", "still fine");
    }

    #[test]
    fn test_sink_kind_build() {
        let sink = SinkKind::Stderr.build(LevelSet::default());
        assert!(sink.levels().contains("info"));
    }
}
