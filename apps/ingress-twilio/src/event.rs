//! Inbound Twilio messaging webhook parameters.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// The fields of a Twilio messaging webhook the receiver looks at.
///
/// Twilio sends many more parameters (`AccountSid`, `NumMedia`,
/// `ProfileName`, ...); they are ignored. Every field may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundEvent {
    #[serde(rename = "From", default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(rename = "To", default, skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    #[serde(rename = "Body", default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(rename = "MessageSid", default, skip_serializing_if = "Option::is_none")]
    pub message_sid: Option<String>,
}

impl InboundEvent {
    /// Build an event from webhook parameters; a repeated name keeps its last value.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut event = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_ref() {
                "From" => &mut event.from,
                "To" => &mut event.to,
                "Body" => &mut event.body,
                "MessageSid" => &mut event.message_sid,
                _ => continue,
            };
            *slot = Some(value.into());
        }
        event
    }

    /// Fields present in `other` replace the ones in `self`.
    pub fn overlay(self, other: InboundEvent) -> Self {
        Self {
            from: other.from.or(self.from),
            to: other.to.or(self.to),
            body: other.body.or(self.body),
            message_sid: other.message_sid.or(self.message_sid),
        }
    }

    pub fn log_record(&self) -> InboundLogRecord<'_> {
        InboundLogRecord {
            from: self.from.as_deref(),
            to: self.to.as_deref(),
            body: self.body.as_deref(),
            message_sid: self.message_sid.as_deref(),
        }
    }
}

/// The mapping written to the inbound log line. Absent fields are omitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct InboundLogRecord<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<&'a str>,
    #[serde(rename = "messageSid", skip_serializing_if = "Option::is_none")]
    pub message_sid: Option<&'a str>,
}

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("invalid form parameters: {0}")]
    Form(#[from] serde_urlencoded::de::Error),
    #[error("invalid json body: {0}")]
    Json(#[from] serde_json::Error),
}

pub fn decode_query(raw: &str) -> Result<InboundEvent, DecodeError> {
    decode_form(raw.as_bytes())
}

/// Decode a request body as JSON when `content_type` says so, otherwise as form data.
pub fn decode_body(content_type: Option<&str>, body: &[u8]) -> Result<InboundEvent, DecodeError> {
    if body.is_empty() {
        return Ok(InboundEvent::default());
    }
    if content_type.is_some_and(is_json) {
        decode_json(body)
    } else {
        decode_form(body)
    }
}

fn is_json(content_type: &str) -> bool {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    essence == "application/json" || essence.ends_with("+json")
}

fn decode_form(raw: &[u8]) -> Result<InboundEvent, DecodeError> {
    let pairs: Vec<(String, String)> = serde_urlencoded::from_bytes(raw)?;
    Ok(InboundEvent::from_pairs(pairs))
}

fn decode_json(raw: &[u8]) -> Result<InboundEvent, DecodeError> {
    let object: Map<String, Value> = serde_json::from_slice(raw)?;
    Ok(InboundEvent::from_pairs(
        object
            .into_iter()
            .filter_map(|(key, value)| opaque_string(value).map(|value| (key, value))),
    ))
}

// Fields are opaque strings; scalars are kept in their textual form.
fn opaque_string(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}
