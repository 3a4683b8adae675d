//! In-process host environment.
//!
//! Models a handful of windows sharing one FIFO delivery queue. Posting only
//! enqueues; [`MemoryHost::run_until_idle`] delivers one message at a time,
//! each handler running to completion before the next message is taken, which
//! is the same scheduling a browser event loop gives cross-context messages.

use crate::error::RelayError;
use crate::host::{
    InboundEvent, MessageHandler, MessagePoster, MessageSource, Navigator, SubscriptionId,
    WindowContext,
};
use crate::types::{TargetOrigin, WindowId};
use parking_lot::Mutex;
use serde::Serialize;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::Arc;
use tracing::{debug, warn};
use url::Url;

/// Upper bound on deliveries per [`MemoryHost::run_until_idle`] call.
pub const MAX_DELIVERY_STEPS: usize = 1024;

/// A completed navigation of some window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavigationRecord {
    pub window: WindowId,
    pub from: String,
    pub to: String,
}

/// A message handed to the target window's subscribers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeliveryRecord {
    pub source: WindowId,
    pub target: WindowId,
    pub payload: Value,
}

struct WindowState {
    top: WindowId,
    location: String,
}

struct Pending {
    target: WindowId,
    target_origin: TargetOrigin,
    event: InboundEvent,
}

#[derive(Default)]
struct HostState {
    windows: BTreeMap<WindowId, WindowState>,
    subscribers: HashMap<WindowId, Vec<(SubscriptionId, MessageHandler)>>,
    queue: VecDeque<Pending>,
    delivered: Vec<DeliveryRecord>,
    navigations: Vec<NavigationRecord>,
    dropped: usize,
    next_window: u64,
    next_subscription: u64,
}

impl HostState {
    fn insert_window(&mut self, top: Option<WindowId>, location: String) -> WindowId {
        self.next_window += 1;
        let id = WindowId(self.next_window);
        self.windows.insert(
            id,
            WindowState {
                top: top.unwrap_or(id),
                location,
            },
        );
        id
    }
}

/// Serialized origin of `location`; `"null"` for anything without a tuple origin.
pub fn origin_of(location: &str) -> String {
    Url::parse(location)
        .map(|url| url.origin().ascii_serialization())
        .unwrap_or_else(|_| "null".to_string())
}

fn validate_url(location: &str) -> Result<(), RelayError> {
    Url::parse(location)
        .map(|_| ())
        .map_err(|e| RelayError::InvalidUrl {
            url: location.to_string(),
            reason: e.to_string(),
        })
}

#[derive(Clone, Default)]
pub struct MemoryHost {
    state: Arc<Mutex<HostState>>,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a new top-level window.
    pub fn open_top(&self, location: &str) -> Result<WindowId, RelayError> {
        validate_url(location)?;
        let id = self.state.lock().insert_window(None, location.to_string());
        debug!(window = %id, location, "Opened top-level window");
        Ok(id)
    }

    /// Open a frame embedded (possibly indirectly) in `parent`.
    pub fn open_embedded(&self, parent: WindowId, location: &str) -> Result<WindowId, RelayError> {
        validate_url(location)?;
        let mut state = self.state.lock();
        let top = state
            .windows
            .get(&parent)
            .map(|w| w.top)
            .ok_or(RelayError::UnknownWindow(parent))?;
        let id = state.insert_window(Some(top), location.to_string());
        debug!(window = %id, top = %top, location, "Opened embedded frame");
        Ok(id)
    }

    /// Collaborator handle for one window.
    pub fn window(&self, id: WindowId) -> Result<HostWindow, RelayError> {
        if !self.state.lock().windows.contains_key(&id) {
            return Err(RelayError::UnknownWindow(id));
        }
        Ok(HostWindow {
            host: self.clone(),
            id,
        })
    }

    pub fn location(&self, id: WindowId) -> Option<String> {
        self.state.lock().windows.get(&id).map(|w| w.location.clone())
    }

    /// Post on behalf of `source` without going through a window handle.
    pub fn post_from(
        &self,
        source: WindowId,
        target: WindowId,
        payload: Value,
        target_origin: &TargetOrigin,
    ) {
        let mut state = self.state.lock();
        let origin = state
            .windows
            .get(&source)
            .map(|w| origin_of(&w.location));
        state.queue.push_back(Pending {
            target,
            target_origin: target_origin.clone(),
            event: InboundEvent {
                data: payload,
                source,
                origin,
            },
        });
    }

    pub fn pending(&self) -> usize {
        self.state.lock().queue.len()
    }

    /// Deliver queued messages until the queue is empty or [`MAX_DELIVERY_STEPS`] is hit.
    ///
    /// Returns the number of messages handed to subscribers.
    pub fn run_until_idle(&self) -> usize {
        let mut delivered = 0;
        for _ in 0..MAX_DELIVERY_STEPS {
            let Some((event, handlers)) = self.next_delivery() else {
                return delivered;
            };
            delivered += 1;
            for handler in handlers {
                handler(&event);
            }
        }
        if self.pending() > 0 {
            warn!(pending = self.pending(), "Delivery step limit reached");
        }
        delivered
    }

    /// Pop the next deliverable message. Undeliverable ones are dropped along the way.
    fn next_delivery(&self) -> Option<(InboundEvent, Vec<MessageHandler>)> {
        let mut state = self.state.lock();
        while let Some(pending) = state.queue.pop_front() {
            let receiver_origin = state
                .windows
                .get(&pending.target)
                .map(|w| origin_of(&w.location));
            let Some(receiver_origin) = receiver_origin else {
                state.dropped += 1;
                debug!(target_window = %pending.target, "Dropping message for unknown window");
                continue;
            };
            if !pending.target_origin.admits(&receiver_origin) {
                state.dropped += 1;
                debug!(
                    target_window = %pending.target,
                    expected = %pending.target_origin,
                    actual = %receiver_origin,
                    "Dropping message: target origin mismatch"
                );
                continue;
            }

            state.delivered.push(DeliveryRecord {
                source: pending.event.source,
                target: pending.target,
                payload: pending.event.data.clone(),
            });
            let handlers: Vec<MessageHandler> = state
                .subscribers
                .get(&pending.target)
                .map(|subs| subs.iter().map(|(_, h)| h.clone()).collect())
                .unwrap_or_default();
            return Some((pending.event, handlers));
        }
        None
    }

    pub fn delivered(&self) -> Vec<DeliveryRecord> {
        self.state.lock().delivered.clone()
    }

    pub fn navigations(&self) -> Vec<NavigationRecord> {
        self.state.lock().navigations.clone()
    }

    /// Messages discarded for an unknown target or a target-origin mismatch.
    pub fn dropped(&self) -> usize {
        self.state.lock().dropped
    }
}

/// One window of a [`MemoryHost`]; implements every collaborator trait for it.
#[derive(Clone)]
pub struct HostWindow {
    host: MemoryHost,
    id: WindowId,
}

impl WindowContext for HostWindow {
    fn own_ref(&self) -> WindowId {
        self.id
    }

    fn top_ref(&self) -> WindowId {
        self.host
            .state
            .lock()
            .windows
            .get(&self.id)
            .map(|w| w.top)
            .unwrap_or(self.id)
    }

    fn location(&self) -> String {
        self.host.location(self.id).unwrap_or_default()
    }
}

impl Navigator for HostWindow {
    fn navigate(&self, url: &str) {
        let mut state = self.host.state.lock();
        let Some(window) = state.windows.get_mut(&self.id) else {
            return;
        };
        let from = std::mem::replace(&mut window.location, url.to_string());
        debug!(window = %self.id, from = %from, to = url, "Window navigated");
        state.navigations.push(NavigationRecord {
            window: self.id,
            from,
            to: url.to_string(),
        });
    }
}

impl MessagePoster for HostWindow {
    fn post_message(&self, target: WindowId, payload: Value, target_origin: &TargetOrigin) {
        self.host.post_from(self.id, target, payload, target_origin);
    }
}

impl MessageSource for HostWindow {
    fn subscribe(&self, handler: MessageHandler) -> SubscriptionId {
        let mut state = self.host.state.lock();
        state.next_subscription += 1;
        let id = SubscriptionId(state.next_subscription);
        state.subscribers.entry(self.id).or_default().push((id, handler));
        id
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        if let Some(subs) = self.host.state.lock().subscribers.get_mut(&self.id) {
            subs.retain(|(sub, _)| *sub != id);
        }
    }
}
