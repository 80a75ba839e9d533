//! Line templates
//!
//! Every template produces `timestamp, [id] [tags] payload`. All functions
//! here are pure: the same event and settings always give the same line.

use colored::Color;
use serde_json::{Number, Value};

use crate::event::{ErrorDetail, Event, NONE_PLACEHOLDER, OpsDetail, ResponseDetail};
use crate::settings::Settings;
use crate::timestamp::TimestampFormat;

/// Substituted when a payload cannot be serialized. A `serde_json::Value`
/// has no cycles or non-string keys, so this only guards the contract.
const UNSERIALIZABLE: &str = "[unserializable]";

const MIB: f64 = 1024.0 * 1024.0;

/// Settings resolved for rendering
#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub timestamp: TimestampFormat,
    pub utc: bool,
    pub color: bool,
}

impl RenderOptions {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            timestamp: TimestampFormat::parse(&settings.format),
            utc: settings.utc,
            color: settings.color,
        }
    }
}

/// Compact JSON that never fails
pub fn safe_stringify(value: &Value) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| UNSERIALIZABLE.to_string())
}

/// Shared line shape for every template
pub fn format_output(epoch_ms: i64, id: Option<&str>, tags: &[String], data: &str, options: &RenderOptions) -> String {
    let timestamp = options.timestamp.render(epoch_ms, options.utc);
    let id = id.map(|id| format!(" ({})", id)).unwrap_or_default();
    format!("{},{} [{}] {}", timestamp, id, tags.join(","), data)
}

pub fn format_method(method: &str, color: bool) -> String {
    let method = method.to_lowercase();
    if !color {
        return method;
    }

    let code = match method.as_str() {
        "get" => Color::Green,
        "delete" => Color::Red,
        "put" => Color::Cyan,
        "post" => Color::Yellow,
        "patch" => Color::Magenta,
        _ => Color::Blue,
    };
    format!("\x1b[1;{}m{}\x1b[0m", code.to_fg_str(), method)
}

pub fn format_status_code(status_code: Option<u16>, color: bool) -> String {
    let code = match status_code {
        Some(code) if code > 0 => code,
        _ => return String::new(),
    };
    if !color {
        return code.to_string();
    }

    let tint = match code {
        500..=u16::MAX => Color::Red,
        400..=499 => Color::Yellow,
        300..=399 => Color::Cyan,
        _ => Color::Green,
    };
    format!("\x1b[{}m{}\x1b[0m", tint.to_fg_str(), code)
}

pub fn format_response(event: &Event, detail: &ResponseDetail, options: &RenderOptions) -> String {
    let query = detail.query.as_ref().map(safe_stringify).unwrap_or_default();
    let method = format_method(&detail.method, options.color);
    let status = format_status_code(detail.status_code, options.color);
    let payload = detail
        .response_payload
        .as_ref()
        .map(|payload| format!("response payload: {}", safe_stringify(payload)))
        .unwrap_or_default();

    let data = format!(
        "{}: {} {} {} {} ({}ms) {}",
        detail.instance, method, detail.path, query, status, format_number(&detail.response_time), payload
    );
    format_output(event.timestamp, None, &event.tags, &data, options)
}

pub fn format_ops(event: &Event, detail: &OpsDetail, options: &RenderOptions) -> String {
    let memory = (detail.rss as f64 / MIB).round() as u64;
    let data = format!(
        "memory: {}Mb, uptime (seconds): {}, load: [{}]",
        memory,
        format_number(&detail.uptime),
        join_numbers(&detail.load)
    );
    format_output(event.timestamp, None, &event.tags, &data, options)
}

pub fn format_error(event: &Event, detail: &ErrorDetail, options: &RenderOptions) -> String {
    let data = format!("message: {}, stack: {}", detail.message, detail.stack);
    format_output(event.timestamp, None, &event.tags, &data, options)
}

/// Payload verbatim (serialized if structured), kind name leading the tags
pub fn format_default(event: &Event, options: &RenderOptions) -> String {
    let payload = match &event.data {
        None | Some(Value::Null) => NONE_PLACEHOLDER.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => safe_stringify(other),
    };

    let mut tags = Vec::with_capacity(event.tags.len() + 1);
    tags.push(event.kind.name().to_string());
    tags.extend(event.tags.iter().cloned());

    let data = format!("data: {}", payload);
    format_output(event.timestamp, event.id.as_deref(), &tags, &data, options)
}

/// Whole floats print without a fraction (`12.0` as `12`)
fn format_number(number: &Number) -> String {
    match number.as_f64() {
        Some(value) if number.is_f64() => value.to_string(),
        _ => number.to_string(),
    }
}

fn join_numbers(numbers: &[Number]) -> String {
    numbers.iter().map(format_number).collect::<Vec<_>>().join(",")
}
