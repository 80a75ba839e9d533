//! Construction-time errors
//!
//! Misconfiguration is caught when the formatter is built, never while
//! events are flowing.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// No sink logger was supplied to the builder
    #[error("sink logger must not be missing")]
    MissingSink,

    /// A configured level is not recognized by the sink
    #[error("log level {level} ({option}) is not defined by the sink")]
    UnknownLevel { option: String, level: String },
}
