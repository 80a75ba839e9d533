//! Event formatter and dispatcher
//!
//! Classifies each event, renders its line with the matching template and
//! hands `(level, line)` to the sink. Exactly one sink call per event, in
//! arrival order.

use serde::Serialize;
use std::borrow::Cow;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::error::ConfigError;
use crate::event::{ErrorDetail, Event, EventDetail, EventKind, OpsDetail, ResponseDetail, error_like};
use crate::format::{self, RenderOptions};
use crate::settings::Settings;
use crate::sink::LevelSink;

/// Template chosen for an event, with the detail it renders
#[derive(Debug, Clone, PartialEq)]
pub enum Template<'a> {
    Default,
    Response(&'a ResponseDetail),
    Ops(&'a OpsDetail),
    Error(Cow<'a, ErrorDetail>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Classification<'a> {
    pub level: &'a str,
    pub template: Template<'a>,
}

/// A line as it was handed to the sink
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rendered {
    pub level: String,
    pub line: String,
}

#[derive(Default)]
pub struct EventFormatterBuilder {
    sink: Option<Arc<dyn LevelSink>>,
    settings: Settings,
}

impl EventFormatterBuilder {
    pub fn sink(mut self, sink: Arc<dyn LevelSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    /// Validate the configuration against the sink and build the formatter
    pub fn build(self) -> Result<EventFormatter, ConfigError> {
        let sink = self.sink.ok_or(ConfigError::MissingSink)?;

        for (option, level) in self.settings.level.configured() {
            if !sink.levels().contains(level) {
                return Err(ConfigError::UnknownLevel {
                    option: option.to_string(),
                    level: level.to_string(),
                });
            }
        }

        let options = RenderOptions::from_settings(&self.settings);
        log::debug!(
            "Event formatter ready: {} sink levels, timestamp format {:?}",
            sink.levels().len(),
            options.timestamp.pattern()
        );

        Ok(EventFormatter {
            sink,
            settings: self.settings,
            options,
        })
    }
}

pub struct EventFormatter {
    sink: Arc<dyn LevelSink>,
    settings: Settings,
    options: RenderOptions,
}

impl EventFormatter {
    pub fn builder() -> EventFormatterBuilder {
        EventFormatterBuilder::default()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn sink(&self) -> &Arc<dyn LevelSink> {
        &self.sink
    }

    /// Pick the level and template for an event; first rule that matches wins
    pub fn classify<'a>(&'a self, event: &'a Event) -> Classification<'a> {
        let levels = &self.settings.level;

        let resolved = match (&event.kind, &event.detail) {
            (EventKind::Error, EventDetail::Error(detail)) => {
                return Classification {
                    level: &levels.error,
                    template: Template::Error(Cow::Borrowed(detail)),
                };
            }
            (EventKind::Ops, EventDetail::Ops(detail)) => {
                return Classification {
                    level: &levels.ops,
                    template: Template::Ops(detail),
                };
            }
            (EventKind::Response, EventDetail::Response(detail)) => {
                return Classification {
                    level: &levels.response,
                    template: Template::Response(detail),
                };
            }
            (EventKind::Request | EventKind::Log, _) => Some(
                levels
                    .request
                    .as_deref()
                    .or_else(|| self.level_from_tags(&event.tags))
                    .unwrap_or(&levels.other),
            ),
            _ => None,
        };

        if let Some(level) = resolved {
            return Classification {
                level,
                template: Template::Default,
            };
        }

        if let Some(detail) = event.data.as_ref().and_then(error_like) {
            return Classification {
                level: &levels.error,
                template: Template::Error(Cow::Owned(detail)),
            };
        }

        Classification {
            level: &levels.other,
            template: Template::Default,
        }
    }

    /// First tag, in tag order, that names a sink level
    fn level_from_tags<'a>(&self, tags: &'a [String]) -> Option<&'a str> {
        tags.iter().map(String::as_str).find(|tag| self.sink.levels().contains(tag))
    }

    /// Format an event without touching the sink
    pub fn render(&self, event: &Event) -> Rendered {
        let Classification { level, template } = self.classify(event);

        let line = match &template {
            Template::Default => format::format_default(event, &self.options),
            Template::Response(detail) => format::format_response(event, detail, &self.options),
            Template::Ops(detail) => format::format_ops(event, detail, &self.options),
            Template::Error(detail) => format::format_error(event, detail, &self.options),
        };

        Rendered {
            level: level.to_string(),
            line,
        }
    }

    /// Render and deliver one event to the sink
    pub fn process(&self, event: &Event) -> Rendered {
        let rendered = self.render(event);
        self.sink.log(&rendered.level, &rendered.line);
        rendered
    }

    /// Deliver one event, then complete on a later scheduler tick
    pub async fn write(&self, event: &Event) -> Rendered {
        let rendered = self.process(event);
        tokio::task::yield_now().await;
        rendered
    }

    /// Process events one at a time until the channel closes
    pub async fn drain(&self, mut rx: mpsc::Receiver<Event>) -> usize {
        let mut count = 0;
        while let Some(event) = rx.recv().await {
            self.write(&event).await;
            count += 1;
        }
        log::debug!("Event stream closed after {} events", count);
        count
    }

    /// Run the formatter on its own task behind a bounded channel
    pub fn spawn(self, capacity: usize) -> (EventSender, JoinHandle<usize>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        let handle = tokio::spawn(async move { self.drain(rx).await });
        (EventSender { tx }, handle)
    }
}

/// Feeds a spawned formatter; `send` waits while the channel is full
#[derive(Clone)]
pub struct EventSender {
    tx: mpsc::Sender<Event>,
}

impl EventSender {
    pub async fn send(&self, event: Event) -> eyre::Result<()> {
        self.tx
            .send(event)
            .await
            .map_err(|_| eyre::eyre!("Event formatter has stopped"))
    }
}
