//! Shared test utilities for integration tests
//!
//! Builds listeners on top of an in-memory host and serializes access to
//! process environment variables.

use frame_relay::diagnostics::RecordingDiagnostics;
use frame_relay::host::{HostWindow, MemoryHost};
use frame_relay::{ListenerParts, MessageDispatcher, MessageListener, ReplyOriginPolicy, WindowId};
use std::sync::{Arc, Mutex, MutexGuard};

/// Global mutex to serialize environment variable access across tests
static ENV_MUTEX: Mutex<()> = Mutex::new(());

pub fn lock_env() -> MutexGuard<'static, ()> {
    ENV_MUTEX.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// A listener bound to one host window, with its diagnostics.
pub struct Bound {
    pub window: WindowId,
    pub listener: Arc<MessageListener>,
    pub diagnostics: Arc<RecordingDiagnostics>,
}

pub fn bind(host: &MemoryHost, window: WindowId, policy: ReplyOriginPolicy) -> Bound {
    let handle: Arc<HostWindow> = Arc::new(host.window(window).unwrap());
    let diagnostics = Arc::new(RecordingDiagnostics::new());
    let listener = MessageListener::new(ListenerParts {
        context: handle.clone(),
        source: handle.clone(),
        dispatcher: MessageDispatcher::with_policy(handle.clone(), policy),
        navigator: handle,
        diagnostics: diagnostics.clone(),
    });
    listener.start();
    Bound {
        window,
        listener,
        diagnostics,
    }
}

/// Top window at `top_url` with one embedded frame at `frame_url`, both listening.
pub fn top_and_frame(top_url: &str, frame_url: &str) -> (MemoryHost, Bound, Bound) {
    let host = MemoryHost::new();
    let top = host.open_top(top_url).unwrap();
    let frame = host.open_embedded(top, frame_url).unwrap();
    let top = bind(&host, top, ReplyOriginPolicy::Echo);
    let frame = bind(&host, frame, ReplyOriginPolicy::Echo);
    (host, top, frame)
}
