//! Normalization of booking webhook payloads.
//!
//! The scheduling service has shipped several payload shapes over time: contact
//! details may sit on the booking or at the top level, the meeting link has had
//! half a dozen field names, and some of the data only ever arrives as free-form
//! answers to booking questions. Every field is resolved from an ordered list of
//! candidates; the first candidate that yields a usable value wins, and anything
//! unresolved falls back to [`FALLBACK`].

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Asia::Tokyo;
use log::*;
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;
use url::Url;

/// Shown for every field that could not be resolved from the payload.
pub const FALLBACK: &str = "不明";

/// Display format for start and end times, rendered in UTC+9.
const TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

const NAME_CANDIDATES: &[&str] = &["/booking/contact/name", "/contact/name"];

const EMAIL_CANDIDATES: &[&str] = &["/booking/contact/email", "/contact/email"];

const PHONE_CANDIDATES: &[&str] = &[
    "/booking/contact/phone",
    "/booking/contact/phone_number",
    "/contact/phone",
    "/contact/phone_number",
];

const START_CANDIDATES: &[&str] = &[
    "/booking/start_at",
    "/booking/start_time",
    "/booking/startAt",
];

const END_CANDIDATES: &[&str] = &["/booking/end_at", "/booking/end_time", "/booking/endAt"];

/// Direct link fields first, then the nested meeting object, then the nested location.
const MEETING_LINK_CANDIDATES: &[&str] = &[
    "/booking/meeting_url",
    "/booking/meetingUrl",
    "/booking/join_url",
    "/booking/online_meeting_url",
    "/booking/location_url",
    "/booking/meeting/url",
    "/booking/meeting/join_url",
    "/booking/meeting/joinUrl",
    "/booking/location/url",
    "/booking/location/join_url",
    "/booking/location/joinUrl",
];

/// Answer lists, concatenated in this order.
const ANSWER_LISTS: &[&str] = &["/booking/answers", "/answers"];

/// Questions asking for a phone number. ASCII keywords match whole words only,
/// so "Tell us about..." or "hotel" do not count.
static PHONE_QUESTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:phone|tel)\b|電話").unwrap());

/// Questions asking for a meeting link.
static MEETING_QUESTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:meet(?:ing)?s?|zoom|teams|video|url|link)\b|ミーティング|会議|リンク")
        .unwrap()
});

/// A guest's answer to one of the booking form's questions.
#[derive(Debug, Clone, PartialEq)]
pub struct Answer {
    pub question: String,
    pub content: String,
}

impl Answer {
    fn from_value(value: &Value) -> Option<Self> {
        let question = first_text(value, &["/question", "/label", "/title"])?;
        let content = ["/answer", "/value", "/content"]
            .iter()
            .find_map(|pointer| value.pointer(pointer).and_then(answer_content))?;
        Some(Answer { question, content })
    }

    fn asks_about(&self, pattern: &Regex) -> bool {
        pattern.is_match(&self.question)
    }
}

/// Booking details resolved from a payload, each field either a value or [`FALLBACK`].
#[derive(Debug, Clone, PartialEq)]
pub struct BookingDetails {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub start: String,
    pub end: String,
    pub meeting_url: String,
}

impl BookingDetails {
    pub fn from_payload(payload: &Value) -> Self {
        let answers = collect_answers(payload);
        debug!("Normalizing booking payload with {} answers", answers.len());

        BookingDetails {
            name: first_text(payload, NAME_CANDIDATES).unwrap_or_else(fallback),
            email: first_text(payload, EMAIL_CANDIDATES).unwrap_or_else(fallback),
            phone: first_text(payload, PHONE_CANDIDATES)
                .or_else(|| {
                    answers
                        .iter()
                        .find(|a| a.asks_about(&PHONE_QUESTION))
                        .map(|a| a.content.clone())
                })
                .unwrap_or_else(fallback),
            start: first_time(payload, START_CANDIDATES).unwrap_or_else(fallback),
            end: first_time(payload, END_CANDIDATES).unwrap_or_else(fallback),
            meeting_url: meeting_link(payload, &answers).unwrap_or_else(fallback),
        }
    }

    /// The six labeled fields in display order.
    pub fn labeled_fields(&self) -> [(&'static str, &str); 6] {
        [
            ("名前", self.name.as_str()),
            ("メール", self.email.as_str()),
            ("電話番号", self.phone.as_str()),
            ("開始", self.start.as_str()),
            ("終了", self.end.as_str()),
            ("ミーティングURL", self.meeting_url.as_str()),
        ]
    }
}

fn fallback() -> String {
    FALLBACK.to_string()
}

/// Answers from the booking and then the top level, in source order.
pub fn collect_answers(payload: &Value) -> Vec<Answer> {
    ANSWER_LISTS
        .iter()
        .filter_map(|pointer| payload.pointer(pointer).and_then(Value::as_array))
        .flatten()
        .filter_map(Answer::from_value)
        .collect()
}

fn first_text(value: &Value, candidates: &[&str]) -> Option<String> {
    candidates
        .iter()
        .find_map(|pointer| value.pointer(pointer).and_then(text))
}

fn first_time(payload: &Value, candidates: &[&str]) -> Option<String> {
    candidates
        .iter()
        .find_map(|pointer| payload.pointer(pointer).and_then(format_time))
}

fn meeting_link(payload: &Value, answers: &[Answer]) -> Option<String> {
    MEETING_LINK_CANDIDATES
        .iter()
        .filter_map(|pointer| payload.pointer(pointer).and_then(text))
        .find(|candidate| is_web_url(candidate))
        .or_else(|| {
            answers
                .iter()
                .filter(|a| a.asks_about(&MEETING_QUESTION))
                .map(|a| a.content.clone())
                .find(|content| is_web_url(content))
        })
}

/// Trimmed string content; blank strings and non-strings count as absent.
fn text(value: &Value) -> Option<String> {
    value
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Answer content as text. Multiple-choice answers arrive as arrays and are joined.
fn answer_content(value: &Value) -> Option<String> {
    let content = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Array(items) => items
            .iter()
            .filter_map(|item| match item {
                Value::Number(n) => Some(n.to_string()),
                other => text(other),
            })
            .collect::<Vec<_>>()
            .join(", "),
        Value::Null | Value::Object(_) => return None,
    };
    (!content.is_empty()).then_some(content)
}

/// True for absolute `http` or `https` URLs with a host.
pub fn is_web_url(candidate: &str) -> bool {
    match Url::parse(candidate.trim()) {
        Ok(url) => matches!(url.scheme(), "http" | "https") && url.host().is_some(),
        Err(_) => false,
    }
}

/// Renders a timestamp in UTC+9 as `YYYY-MM-DD HH:MM`.
///
/// Accepts RFC 3339 strings, offset-less ISO 8601 strings (taken as UTC) and
/// Unix timestamps in seconds or milliseconds.
pub fn format_time(value: &Value) -> Option<String> {
    let instant = match value {
        Value::String(s) => parse_time_text(s.trim()),
        Value::Number(n) => n.as_i64().and_then(from_unix),
        _ => None,
    };
    if instant.is_none() {
        debug!("Unparseable booking time: {value}");
    }
    instant.map(|t| t.with_timezone(&Tokyo).format(TIME_FORMAT).to_string())
}

fn parse_time_text(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(t) = DateTime::parse_from_rfc3339(s) {
        return Some(t.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(s, format).ok())
        .map(|naive| Utc.from_utc_datetime(&naive))
}

fn from_unix(raw: i64) -> Option<DateTime<Utc>> {
    // Anything past the year 5138 in seconds is really milliseconds.
    if raw.abs() > 100_000_000_000 {
        DateTime::from_timestamp_millis(raw)
    } else {
        DateTime::from_timestamp(raw, 0)
    }
}
