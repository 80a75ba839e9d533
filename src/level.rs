//! Severity level sets
//!
//! A sink recognizes an ordered set of level names. Lower priority numbers
//! are more severe, the way leveled loggers conventionally number them.

use clap::ValueEnum;
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

static NPM_LEVELS: Lazy<LevelSet> =
    Lazy::new(|| LevelSet::from_names(["error", "warn", "info", "http", "verbose", "debug", "silly"]));

static SYSLOG_LEVELS: Lazy<LevelSet> = Lazy::new(|| {
    LevelSet::from_names(["emerg", "alert", "crit", "error", "warning", "notice", "info", "debug"])
});

/// Named level presets
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LevelPreset {
    #[default]
    Npm,
    Syslog,
}

impl LevelPreset {
    pub fn levels(&self) -> LevelSet {
        match self {
            LevelPreset::Npm => NPM_LEVELS.clone(),
            LevelPreset::Syslog => SYSLOG_LEVELS.clone(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            LevelPreset::Npm => "npm",
            LevelPreset::Syslog => "syslog",
        }
    }
}

impl std::fmt::Display for LevelPreset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Ordered mapping of level name to priority
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct LevelSet {
    levels: IndexMap<String, usize>,
}

impl LevelSet {
    /// Build a set whose priorities follow the iteration order
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut levels = IndexMap::new();
        for name in names {
            let next = levels.len();
            levels.entry(name.into()).or_insert(next);
        }
        Self { levels }
    }

    pub fn preset(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "npm" => Some(LevelPreset::Npm.levels()),
            "syslog" => Some(LevelPreset::Syslog.levels()),
            _ => None,
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.levels.contains_key(name)
    }

    pub fn priority(&self, name: &str) -> Option<usize> {
        self.levels.get(name).copied()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.levels.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.levels.iter().map(|(name, priority)| (name.as_str(), *priority))
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Map a level of this set onto the `log` crate's levels
    pub fn to_log_level(&self, name: &str) -> log::Level {
        if self.priority(name) == Some(0) {
            return log::Level::Error;
        }

        let lower = name.to_lowercase();
        if ["emerg", "alert", "crit", "error", "fatal"].iter().any(|l| lower.contains(l)) {
            log::Level::Error
        } else if lower.contains("warn") {
            log::Level::Warn
        } else if ["info", "notice", "http"].iter().any(|l| lower.contains(l)) {
            log::Level::Info
        } else if ["debug", "verbose"].iter().any(|l| lower.contains(l)) {
            log::Level::Debug
        } else if self.is_past_debug(name) {
            log::Level::Trace
        } else {
            log::Level::Info
        }
    }

    fn is_past_debug(&self, name: &str) -> bool {
        match (self.priority("debug"), self.priority(name)) {
            (Some(debug), Some(level)) => level > debug,
            _ => false,
        }
    }
}

impl Default for LevelSet {
    fn default() -> Self {
        LevelPreset::default().levels()
    }
}
