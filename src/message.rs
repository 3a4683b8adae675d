//! Message schema
//!
//! The vocabulary exchanged between a top-level window and its embedded auth
//! frames: two message kinds, two content kinds and a three-field envelope.
//! Only one interpretation of `content` is meaningful per `type`; that pairing
//! is enforced where envelopes are handled, not here.

use crate::error::EnvelopeError;
use crate::host::WindowContext;
use crate::types::FrameRole;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Semantic purpose of an envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MessageKind {
    /// Embedded frame asks the top frame to navigate on its behalf.
    RedirectRequest,
    /// Envelope carries a URL; see [`ContentKind`] for which one.
    Url,
}

/// What the `data` of a [`MessageKind::Url`] envelope represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContentKind {
    /// The top frame's current location.
    UrlTopFrame,
    /// The URL the top frame should navigate to.
    UrlNavigate,
}

impl MessageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageKind::RedirectRequest => "REDIRECT_REQUEST",
            MessageKind::Url => "URL",
        }
    }
}

impl ContentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentKind::UrlTopFrame => "URL_TOP_FRAME",
            ContentKind::UrlNavigate => "URL_NAVIGATE",
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MessageKind {
    type Err = EnvelopeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "REDIRECT_REQUEST" => Ok(MessageKind::RedirectRequest),
            "URL" => Ok(MessageKind::Url),
            other => Err(EnvelopeError::UnknownMessageKind(other.to_string())),
        }
    }
}

impl FromStr for ContentKind {
    type Err = EnvelopeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "URL_TOP_FRAME" => Ok(ContentKind::UrlTopFrame),
            "URL_NAVIGATE" => Ok(ContentKind::UrlNavigate),
            other => Err(EnvelopeError::UnknownContentKind(other.to_string())),
        }
    }
}

/// Message envelope. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    #[serde(rename = "type")]
    kind: MessageKind,
    content: ContentKind,
    data: String,
}

impl Envelope {
    pub fn kind(&self) -> MessageKind {
        self.kind
    }

    pub fn content(&self) -> ContentKind {
        self.content
    }

    /// URL payload; its meaning depends on `(kind, content)`.
    pub fn data(&self) -> &str {
        &self.data
    }

    /// Structured wire form: `{ "type", "content", "data" }`.
    pub fn to_wire(&self) -> Value {
        serde_json::json!({
            "type": self.kind.as_str(),
            "content": self.content.as_str(),
            "data": self.data,
        })
    }
}

/// Construct an envelope. Callers are responsible for a consistent `(kind, content)` pair.
pub fn build_message(kind: MessageKind, content: ContentKind, data: impl Into<String>) -> Envelope {
    Envelope {
        kind,
        content,
        data: data.into(),
    }
}

/// Validate an untrusted structured payload into an [`Envelope`].
///
/// Fields other than `type`, `content` and `data` are ignored.
pub fn parse_envelope(payload: &Value) -> Result<Envelope, EnvelopeError> {
    let object = payload.as_object().ok_or(EnvelopeError::NotAnObject)?;

    let kind = string_field(object, "type")?.parse::<MessageKind>()?;
    let content = string_field(object, "content")?.parse::<ContentKind>()?;
    let data = string_field(object, "data")?;

    Ok(build_message(kind, content, data))
}

fn string_field<'a>(
    object: &'a Map<String, Value>,
    name: &'static str,
) -> Result<&'a str, EnvelopeError> {
    object
        .get(name)
        .ok_or(EnvelopeError::MissingField(name))?
        .as_str()
        .ok_or(EnvelopeError::InvalidField(name))
}

/// Parse envelope text, e.g. from the command line.
pub fn parse_envelope_str(text: &str) -> Result<Envelope, EnvelopeError> {
    let value: Value = serde_json::from_str(text)
        .map_err(|e| EnvelopeError::InvalidJson(e.to_string()))?;
    parse_envelope(&value)
}

/// Classify the executing context. Recomputed on every call, never cached.
pub fn current_window(context: &dyn WindowContext) -> FrameRole {
    if context.own_ref() == context.top_ref() {
        FrameRole::TopFrame
    } else {
        FrameRole::Iframe
    }
}
