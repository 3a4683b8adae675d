//! Message cache
//!
//! Per-embedded-context memory for the handshake: at most one pending
//! navigation target and one acknowledged top-frame location. Lives as long
//! as the owning listener; a fresh context starts empty.

use crate::message::ContentKind;
use parking_lot::Mutex;
use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct MessageCache {
    entries: Mutex<HashMap<ContentKind, String>>,
}

impl MessageCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `value` under `key`, replacing any previous value.
    pub fn write(&self, key: ContentKind, value: impl Into<String>) {
        self.entries.lock().insert(key, value.into());
    }

    /// Last value written under `key`, or `None` if nothing was written yet.
    pub fn read(&self, key: ContentKind) -> Option<String> {
        self.entries.lock().get(&key).cloned()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Copy of all entries, for reports.
    pub fn snapshot(&self) -> HashMap<ContentKind, String> {
        self.entries.lock().clone()
    }
}
