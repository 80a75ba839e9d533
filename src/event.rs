//! Event model
//!
//! Events arrive as loosely shaped JSON records. Each record is parsed once
//! into an explicit variant type. Fields that are missing or have the wrong
//! shape fall back to empty values instead of failing, so a malformed event
//! still produces a line.

use eyre::{Context, Result};
use serde_json::{Map, Number, Value};

/// Rendered in place of a missing payload
pub const NONE_PLACEHOLDER: &str = "(none)";

/// Event kind, taken from the record's `event` field
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EventKind {
    Request,
    Response,
    Ops,
    Error,
    Log,
    Other(String),
}

impl EventKind {
    pub fn from_name(name: &str) -> Self {
        match name {
            "request" => Self::Request,
            "response" => Self::Response,
            "ops" => Self::Ops,
            "error" => Self::Error,
            "log" => Self::Log,
            other => Self::Other(other.to_string()),
        }
    }

    /// Wire name of the kind
    pub fn name(&self) -> &str {
        match self {
            Self::Request => "request",
            Self::Response => "response",
            Self::Ops => "ops",
            Self::Error => "error",
            Self::Log => "log",
            Self::Other(name) => name,
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Fields carried by `response` events
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseDetail {
    pub instance: String,
    pub method: String,
    pub path: String,
    /// Query mapping, `None` when absent or null
    pub query: Option<Value>,
    pub status_code: Option<u16>,
    /// Milliseconds, kept as the JSON number it arrived as
    pub response_time: Number,
    pub response_payload: Option<Value>,
}

/// Process and OS stats carried by `ops` events
#[derive(Debug, Clone, PartialEq)]
pub struct OpsDetail {
    /// Resident set size in bytes
    pub rss: u64,
    /// Process uptime in seconds
    pub uptime: Number,
    pub load: Vec<Number>,
}

/// Message and stack of an error event or error-like payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorDetail {
    pub message: String,
    pub stack: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EventDetail {
    Response(ResponseDetail),
    Ops(OpsDetail),
    Error(ErrorDetail),
    None,
}

/// A single monitoring event
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub kind: EventKind,
    /// Epoch milliseconds
    pub timestamp: i64,
    /// Correlation id, typically set on request events
    pub id: Option<String>,
    pub tags: Vec<String>,
    pub data: Option<Value>,
    pub detail: EventDetail,
}

impl Event {
    /// Parse one JSON text into an event
    pub fn from_json(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text).context("Event is not valid JSON")?;
        Ok(Self::from_value(value))
    }

    /// Build an event from an arbitrary JSON value; never fails
    pub fn from_value(value: Value) -> Self {
        let mut record = match value {
            Value::Object(record) => record,
            // Not a record at all: keep the value as the payload
            other => {
                return Self {
                    kind: EventKind::Other(String::new()),
                    timestamp: 0,
                    id: None,
                    tags: Vec::new(),
                    data: non_null(Some(other)),
                    detail: EventDetail::None,
                };
            }
        };

        let kind = EventKind::from_name(record.get("event").and_then(Value::as_str).unwrap_or_default());
        let timestamp = parse_timestamp(record.get("timestamp"));
        let id = match record.get("id") {
            Some(Value::String(s)) => Some(s.clone()),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        };
        let tags = normalize_tags(record.get("tags"));
        let data = non_null(record.remove("data"));

        let detail = match &kind {
            EventKind::Response => EventDetail::Response(response_detail(&mut record)),
            EventKind::Ops => EventDetail::Ops(ops_detail(&record)),
            EventKind::Error => EventDetail::Error(error_detail(record.get("error"), data.as_ref())),
            _ => EventDetail::None,
        };

        Self {
            kind,
            timestamp,
            id,
            tags,
            data,
            detail,
        }
    }
}

/// Normalize the `tags` field to an ordered list of strings
pub fn normalize_tags(value: Option<&Value>) -> Vec<String> {
    match value {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items.iter().map(text_of).collect(),
        Some(single) => vec![text_of(single)],
    }
}

/// A value is error-like when it carries both `message` and `stack`
pub fn error_like(value: &Value) -> Option<ErrorDetail> {
    let object = value.as_object()?;
    match (object.get("message"), object.get("stack")) {
        (Some(message), Some(stack)) => Some(ErrorDetail {
            message: text_of(message),
            stack: text_of(stack),
        }),
        _ => None,
    }
}

/// Strings verbatim, null as empty, anything else as compact JSON
fn text_of(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn non_null(value: Option<Value>) -> Option<Value> {
    value.filter(|v| !v.is_null())
}

fn number_or_zero(value: Option<&Value>) -> Number {
    match value {
        Some(Value::Number(n)) => n.clone(),
        _ => Number::from(0),
    }
}

fn parse_timestamp(value: Option<&Value>) -> i64 {
    match value {
        Some(Value::Number(n)) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)).unwrap_or(0),
        Some(Value::String(s)) => {
            // Leading integer part only, so "1500000000000.5" still parses
            let trimmed = s.trim();
            let end = trimmed
                .char_indices()
                .find(|&(i, c)| !(c.is_ascii_digit() || (i == 0 && c == '-')))
                .map(|(i, _)| i)
                .unwrap_or(trimmed.len());
            trimmed[..end].parse().unwrap_or(0)
        }
        _ => 0,
    }
}

fn response_detail(record: &mut Map<String, Value>) -> ResponseDetail {
    let status_code = record
        .get("statusCode")
        .and_then(Value::as_u64)
        .and_then(|code| u16::try_from(code).ok());

    ResponseDetail {
        instance: record.get("instance").map(text_of).unwrap_or_default(),
        method: record.get("method").map(text_of).unwrap_or_default(),
        path: record.get("path").map(text_of).unwrap_or_default(),
        query: non_null(record.remove("query")),
        status_code,
        response_time: number_or_zero(record.get("responseTime")),
        response_payload: non_null(record.remove("responsePayload")),
    }
}

fn ops_detail(record: &Map<String, Value>) -> OpsDetail {
    let proc = record.get("proc");
    let rss = proc
        .and_then(|p| p.pointer("/mem/rss"))
        .and_then(|rss| rss.as_u64().or_else(|| rss.as_f64().map(|f| f.max(0.0) as u64)))
        .unwrap_or(0);
    let uptime = number_or_zero(proc.and_then(|p| p.get("uptime")));
    let load = record
        .get("os")
        .and_then(|os| os.get("load"))
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| match item {
                    Value::Number(n) => Some(n.clone()),
                    _ => None,
                })
                .collect()
        })
        .unwrap_or_default();

    OpsDetail { rss, uptime, load }
}

fn error_detail(error: Option<&Value>, data: Option<&Value>) -> ErrorDetail {
    match error {
        Some(Value::Object(fields)) => ErrorDetail {
            message: fields.get("message").map(text_of).unwrap_or_default(),
            stack: fields.get("stack").map(text_of).unwrap_or_default(),
        },
        Some(Value::String(message)) => ErrorDetail {
            message: message.clone(),
            stack: String::new(),
        },
        _ => data.and_then(error_like).unwrap_or_else(|| ErrorDetail {
            message: NONE_PLACEHOLDER.to_string(),
            stack: String::new(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_kind_from_name() {
        assert_eq!(EventKind::from_name("response"), EventKind::Response);
        assert_eq!(EventKind::from_name("log"), EventKind::Log);
        assert_eq!(EventKind::from_name("wat"), EventKind::Other("wat".to_string()));
        assert_eq!(EventKind::Other("wat".to_string()).name(), "wat");
    }

    #[test]
    fn test_tags_normalization() {
        assert_eq!(normalize_tags(Some(&json!(["a", "b"]))), vec!["a", "b"]);
        assert_eq!(normalize_tags(Some(&json!("single"))), vec!["single"]);
        assert_eq!(normalize_tags(Some(&json!([1, "x"]))), vec!["1", "x"]);
        assert!(normalize_tags(None).is_empty());
        assert!(normalize_tags(Some(&Value::Null)).is_empty());
    }

    #[test]
    fn test_timestamp_accepts_numeric_string() {
        let event = Event::from_value(json!({"event": "log", "timestamp": "1500000000123"}));
        assert_eq!(event.timestamp, 1_500_000_000_123);

        let event = Event::from_value(json!({"event": "log", "timestamp": {"bad": true}}));
        assert_eq!(event.timestamp, 0);
    }

    #[test]
    fn test_response_detail() {
        let event = Event::from_value(json!({
            "event": "response",
            "timestamp": 1,
            "id": "abc",
            "instance": "srv1",
            "method": "GET",
            "path": "/x",
            "query": {"q": "1"},
            "statusCode": 404,
            "responseTime": 12,
        }));

        assert_eq!(event.id.as_deref(), Some("abc"));
        match event.detail {
            EventDetail::Response(detail) => {
                assert_eq!(detail.instance, "srv1");
                assert_eq!(detail.method, "GET");
                assert_eq!(detail.query, Some(json!({"q": "1"})));
                assert_eq!(detail.status_code, Some(404));
                assert_eq!(detail.response_time, Number::from(12));
                assert!(detail.response_payload.is_none());
            }
            other => panic!("unexpected detail: {:?}", other),
        }
    }

    #[test]
    fn test_response_missing_fields_degrade() {
        let event = Event::from_value(json!({"event": "response"}));
        match event.detail {
            EventDetail::Response(detail) => {
                assert!(detail.method.is_empty());
                assert!(detail.status_code.is_none());
                assert_eq!(detail.response_time, Number::from(0));
            }
            other => panic!("unexpected detail: {:?}", other),
        }
    }

    #[test]
    fn test_ops_detail() {
        let event = Event::from_value(json!({
            "event": "ops",
            "proc": {"mem": {"rss": 52428800}, "uptime": 42.5},
            "os": {"load": [1.5, 0.25, 0]},
        }));
        match event.detail {
            EventDetail::Ops(detail) => {
                assert_eq!(detail.rss, 52_428_800);
                assert_eq!(detail.uptime.to_string(), "42.5");
                assert_eq!(detail.load.len(), 3);
            }
            other => panic!("unexpected detail: {:?}", other),
        }
    }

    #[test]
    fn test_error_detail_falls_back_to_data() {
        let event = Event::from_value(json!({
            "event": "error",
            "data": {"message": "boom", "stack": "at x\nat y"},
        }));
        assert_eq!(
            event.detail,
            EventDetail::Error(ErrorDetail {
                message: "boom".to_string(),
                stack: "at x\nat y".to_string(),
            })
        );

        let event = Event::from_value(json!({"event": "error"}));
        match event.detail {
            EventDetail::Error(detail) => assert_eq!(detail.message, NONE_PLACEHOLDER),
            other => panic!("unexpected detail: {:?}", other),
        }
    }

    #[test]
    fn test_error_like() {
        assert!(error_like(&json!({"message": "m", "stack": "s"})).is_some());
        assert!(error_like(&json!({"message": "m"})).is_none());
        assert!(error_like(&json!("m")).is_none());
    }

    #[test]
    fn test_non_object_record_becomes_payload() {
        let event = Event::from_value(json!("just text"));
        assert_eq!(event.kind, EventKind::Other(String::new()));
        assert_eq!(event.data, Some(json!("just text")));
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(Event::from_json("{not json").is_err());
        assert!(Event::from_json(r#"{"event":"log","data":"hi"}"#).is_ok());
    }
}
