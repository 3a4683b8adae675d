//! Core type definitions shared across the relay.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque reference to a browsing context (a window or an embedded frame).
///
/// Two references are equal exactly when they name the same context. The host
/// environment hands these out; the relay only compares and forwards them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WindowId(pub u64);

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "window#{}", self.0)
    }
}

/// Role of the executing context relative to its top-level ancestor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FrameRole {
    /// The context is its own top-level window.
    TopFrame,
    /// The context is embedded somewhere below a top-level window.
    Iframe,
}

impl fmt::Display for FrameRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameRole::TopFrame => write!(f, "TOP_FRAME"),
            FrameRole::Iframe => write!(f, "IFRAME"),
        }
    }
}

/// Origin restriction attached to an outbound message.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TargetOrigin {
    /// Deliver regardless of the receiver's origin (`"*"`).
    Any,
    /// Deliver only if the receiver's current origin matches exactly.
    Exact(String),
}

impl TargetOrigin {
    /// Build from an optional origin string; absent, empty and `"*"` all mean
    /// [`TargetOrigin::Any`].
    pub fn from_hint(origin: Option<&str>) -> Self {
        match origin {
            None | Some("") | Some("*") => TargetOrigin::Any,
            Some(origin) => TargetOrigin::Exact(origin.to_string()),
        }
    }

    /// Whether a receiver at `receiver_origin` may observe the message.
    pub fn admits(&self, receiver_origin: &str) -> bool {
        match self {
            TargetOrigin::Any => true,
            TargetOrigin::Exact(origin) => origin == receiver_origin,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            TargetOrigin::Any => "*",
            TargetOrigin::Exact(origin) => origin,
        }
    }
}

impl fmt::Display for TargetOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
