//! Moment-style timestamp patterns
//!
//! Patterns use the familiar `YYMMDD/HHmmss.SSS` token style. A pattern is
//! compiled once into pieces and rendered per event from epoch milliseconds.

use chrono::{DateTime, Datelike, FixedOffset, Local, Timelike, Utc};
use lazy_regex::regex;

pub const DEFAULT_TIMESTAMP_FORMAT: &str = "YYMMDD/HHmmss.SSS";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token {
    Year4,
    Year2,
    Month2,
    Month,
    Day2,
    Day,
    Hour2,
    Hour,
    Hour12Pad,
    Hour12,
    Minute2,
    Minute,
    Second2,
    Second,
    Millis,
    MeridiemUpper,
    MeridiemLower,
    OffsetColon,
    Offset,
    EpochSeconds,
    EpochMillis,
}

impl Token {
    fn from_str(s: &str) -> Option<Self> {
        let token = match s {
            "YYYY" => Token::Year4,
            "YY" => Token::Year2,
            "MM" => Token::Month2,
            "M" => Token::Month,
            "DD" => Token::Day2,
            "D" => Token::Day,
            "HH" => Token::Hour2,
            "H" => Token::Hour,
            "hh" => Token::Hour12Pad,
            "h" => Token::Hour12,
            "mm" => Token::Minute2,
            "m" => Token::Minute,
            "ss" => Token::Second2,
            "s" => Token::Second,
            "SSS" => Token::Millis,
            "A" => Token::MeridiemUpper,
            "a" => Token::MeridiemLower,
            "Z" => Token::OffsetColon,
            "ZZ" => Token::Offset,
            "X" => Token::EpochSeconds,
            "x" => Token::EpochMillis,
            _ => return None,
        };
        Some(token)
    }

    fn render(&self, at: &DateTime<FixedOffset>) -> String {
        let (pm, hour12) = at.hour12();
        let offset = at.offset().local_minus_utc();
        let sign = if offset < 0 { '-' } else { '+' };
        let (off_h, off_m) = (offset.abs() / 3600, (offset.abs() % 3600) / 60);

        match self {
            Token::Year4 => format!("{:04}", at.year()),
            Token::Year2 => format!("{:02}", at.year().rem_euclid(100)),
            Token::Month2 => format!("{:02}", at.month()),
            Token::Month => format!("{}", at.month()),
            Token::Day2 => format!("{:02}", at.day()),
            Token::Day => format!("{}", at.day()),
            Token::Hour2 => format!("{:02}", at.hour()),
            Token::Hour => format!("{}", at.hour()),
            Token::Hour12Pad => format!("{:02}", hour12),
            Token::Hour12 => format!("{}", hour12),
            Token::Minute2 => format!("{:02}", at.minute()),
            Token::Minute => format!("{}", at.minute()),
            Token::Second2 => format!("{:02}", at.second()),
            Token::Second => format!("{}", at.second()),
            Token::Millis => format!("{:03}", at.timestamp_subsec_millis().min(999)),
            Token::MeridiemUpper => (if pm { "PM" } else { "AM" }).to_string(),
            Token::MeridiemLower => (if pm { "pm" } else { "am" }).to_string(),
            Token::OffsetColon => format!("{}{:02}:{:02}", sign, off_h, off_m),
            Token::Offset => format!("{}{:02}{:02}", sign, off_h, off_m),
            Token::EpochSeconds => format!("{}", at.timestamp()),
            Token::EpochMillis => format!("{}", at.timestamp_millis()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Piece {
    Literal(String),
    Token(Token),
}

/// A compiled timestamp pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimestampFormat {
    pattern: String,
    pieces: Vec<Piece>,
}

impl TimestampFormat {
    pub fn parse(pattern: &str) -> Self {
        let tokens = regex!(r"\[[^\]]*\]|YYYY|YY|MM|M|DD|D|HH|H|hh|h|mm|m|ss|s|SSS|A|a|ZZ|Z|X|x");

        let mut pieces = Vec::new();
        let mut last = 0;
        for found in tokens.find_iter(pattern) {
            if found.start() > last {
                pieces.push(Piece::Literal(pattern[last..found.start()].to_string()));
            }

            let text = found.as_str();
            match Token::from_str(text) {
                Some(token) => pieces.push(Piece::Token(token)),
                // [escaped] text renders without its brackets
                None => pieces.push(Piece::Literal(text[1..text.len() - 1].to_string())),
            }
            last = found.end();
        }
        if last < pattern.len() {
            pieces.push(Piece::Literal(pattern[last..].to_string()));
        }

        Self {
            pattern: pattern.to_string(),
            pieces,
        }
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Render epoch milliseconds in UTC or local time
    pub fn render(&self, epoch_ms: i64, utc: bool) -> String {
        let at = DateTime::<Utc>::from_timestamp_millis(epoch_ms).unwrap_or_default();
        let at = if utc {
            at.fixed_offset()
        } else {
            at.with_timezone(&Local).fixed_offset()
        };
        self.render_at(&at)
    }

    fn render_at(&self, at: &DateTime<FixedOffset>) -> String {
        let mut out = String::with_capacity(self.pattern.len() + 8);
        for piece in &self.pieces {
            match piece {
                Piece::Literal(text) => out.push_str(text),
                Piece::Token(token) => out.push_str(&token.render(at)),
            }
        }
        out
    }
}

impl Default for TimestampFormat {
    fn default() -> Self {
        Self::parse(DEFAULT_TIMESTAMP_FORMAT)
    }
}
