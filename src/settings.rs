//! Formatter settings
//!
//! Resolved once and handed to the formatter by value; nothing mutates
//! them afterwards.

use serde::{Deserialize, Serialize};

use crate::timestamp::DEFAULT_TIMESTAMP_FORMAT;

/// Target level per event kind
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct LevelSettings {
    pub error: String,
    pub ops: String,
    /// `None` derives the level from the event's tags
    pub request: Option<String>,
    pub response: String,
    pub other: String,
}

impl Default for LevelSettings {
    fn default() -> Self {
        Self {
            error: "error".to_string(),
            ops: "info".to_string(),
            request: None,
            response: "info".to_string(),
            other: "info".to_string(),
        }
    }
}

impl LevelSettings {
    /// `(option, level)` for every level that is set
    pub fn configured(&self) -> Vec<(&'static str, &str)> {
        let mut levels = vec![("error", self.error.as_str()), ("ops", self.ops.as_str())];
        if let Some(request) = &self.request {
            levels.push(("request", request.as_str()));
        }
        levels.push(("response", self.response.as_str()));
        levels.push(("other", self.other.as_str()));
        levels
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    pub level: LevelSettings,
    /// ANSI-color HTTP methods and status codes
    pub color: bool,
    /// Moment-style timestamp pattern
    pub format: String,
    /// Render timestamps in UTC instead of local time
    pub utc: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            level: LevelSettings::default(),
            color: true,
            format: DEFAULT_TIMESTAMP_FORMAT.to_string(),
            utc: true,
        }
    }
}
