//! Host environment seams.
//!
//! The relay never touches a real window. Everything it needs from the
//! environment it reaches through these traits, so the protocol can run inside
//! a browser binding, an embedding shell, or the in-process [`memory`] host.

pub mod memory;

pub use memory::{HostWindow, MemoryHost, NavigationRecord};

use crate::types::{TargetOrigin, WindowId};
use serde_json::Value;
use std::sync::Arc;

/// One cross-context message as delivered to a listening window.
#[derive(Debug, Clone, PartialEq)]
pub struct InboundEvent {
    /// Structured payload exactly as the sender posted it.
    pub data: Value,
    /// The window that posted the message.
    pub source: WindowId,
    /// Serialized origin of the sender, when the host knows it.
    pub origin: Option<String>,
}

impl InboundEvent {
    pub fn new(data: Value, source: WindowId) -> Self {
        Self {
            data,
            source,
            origin: None,
        }
    }

    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = Some(origin.into());
        self
    }
}

/// Identity and location of the executing context.
pub trait WindowContext: Send + Sync {
    /// Reference to the executing context itself.
    fn own_ref(&self) -> WindowId;

    /// Reference to the executing context's top-level ancestor.
    fn top_ref(&self) -> WindowId;

    /// Current location of the executing context.
    fn location(&self) -> String;
}

/// Changes the executing window's location.
pub trait Navigator: Send + Sync {
    fn navigate(&self, url: &str);
}

/// The host's one-way cross-context posting primitive, bound to the sending window.
pub trait MessagePoster: Send + Sync {
    /// Queue `payload` for delivery to `target`. No acknowledgment, no retry.
    fn post_message(&self, target: WindowId, payload: Value, target_origin: &TargetOrigin);
}

/// Callback invoked once per inbound message.
pub type MessageHandler = Arc<dyn Fn(&InboundEvent) + Send + Sync>;

/// Handle returned by [`MessageSource::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

/// Inbound-message channel of the executing window.
pub trait MessageSource: Send + Sync {
    fn subscribe(&self, handler: MessageHandler) -> SubscriptionId;

    /// Remove a handler. Unknown ids are ignored.
    fn unsubscribe(&self, id: SubscriptionId);
}
