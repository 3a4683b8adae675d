//! Scripted handshake runs over the in-memory host.
//!
//! Wires a top-level window and one embedded frame with real listeners, drives
//! a delegated navigation through the full message exchange, and reports what
//! happened. Backs the `simulate` command and the end-to-end tests.

use crate::diagnostics::RecordingDiagnostics;
use crate::dispatch::{MessageDispatcher, ReplyOriginPolicy};
use crate::error::RelayError;
use crate::host::memory::{DeliveryRecord, MemoryHost, NavigationRecord};
use crate::host::HostWindow;
use crate::listener::{ListenerParts, MessageListener};
use crate::message::{build_message, ContentKind, MessageKind};
use crate::types::{TargetOrigin, WindowId};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

/// Location of the untrusted window used for spoofed acknowledgments.
pub const SPOOF_LOCATION: &str = "https://attacker.invalid/";

/// One scripted run. Also the `[simulation]` section of the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HandshakeScenario {
    pub top_location: String,
    pub iframe_location: String,
    pub navigate_url: String,
    /// Have an unrelated window post a forged acknowledgment to the frame first.
    pub spoof_acknowledgment: bool,
    /// Send the redirect request without caching a navigation target.
    pub skip_navigate_target: bool,
}

impl Default for HandshakeScenario {
    fn default() -> Self {
        Self {
            top_location: "https://app.example/".to_string(),
            iframe_location: "https://login.example/frame".to_string(),
            navigate_url: "https://idp.example/authorize?client_id=demo".to_string(),
            spoof_acknowledgment: false,
            skip_navigate_target: false,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HandshakeReport {
    pub top_window: WindowId,
    pub iframe_window: WindowId,
    /// Whether the top window actually navigated to the requested URL.
    pub completed: bool,
    pub final_top_location: String,
    pub navigations: Vec<NavigationRecord>,
    pub deliveries: Vec<DeliveryRecord>,
    pub dropped: usize,
    pub warnings: Vec<String>,
    pub cached_top_frame: Option<String>,
    pub cached_navigate: Option<String>,
}

fn listener_for(
    window: HostWindow,
    policy: ReplyOriginPolicy,
    diagnostics: Arc<RecordingDiagnostics>,
) -> Arc<MessageListener> {
    let window = Arc::new(window);
    MessageListener::new(ListenerParts {
        context: window.clone(),
        source: window.clone(),
        dispatcher: MessageDispatcher::with_policy(window.clone(), policy),
        navigator: window,
        diagnostics,
    })
}

/// Run one delegated navigation end to end.
pub fn run_handshake(
    scenario: &HandshakeScenario,
    policy: ReplyOriginPolicy,
) -> Result<HandshakeReport, RelayError> {
    let host = MemoryHost::new();
    let top = host.open_top(&scenario.top_location)?;
    let frame = host.open_embedded(top, &scenario.iframe_location)?;
    let diagnostics = Arc::new(RecordingDiagnostics::new());

    let top_listener = listener_for(host.window(top)?, policy, diagnostics.clone());
    let frame_listener = listener_for(host.window(frame)?, policy, diagnostics.clone());
    top_listener.start();
    frame_listener.start();

    if scenario.spoof_acknowledgment {
        let attacker = host.open_top(SPOOF_LOCATION)?;
        let forged = build_message(MessageKind::Url, ContentKind::UrlTopFrame, SPOOF_LOCATION);
        host.post_from(attacker, frame, forged.to_wire(), &TargetOrigin::Any);
    }

    if scenario.skip_navigate_target {
        let request = build_message(
            MessageKind::RedirectRequest,
            ContentKind::UrlNavigate,
            scenario.iframe_location.as_str(),
        );
        host.post_from(frame, top, request.to_wire(), &TargetOrigin::Any);
    } else {
        frame_listener.request_top_navigation(&scenario.navigate_url)?;
    }

    let delivered = host.run_until_idle();
    top_listener.stop();
    frame_listener.stop();

    let final_top_location = host.location(top).unwrap_or_default();
    let navigations = host.navigations();
    let completed = navigations
        .iter()
        .any(|nav| nav.window == top && nav.to == scenario.navigate_url);
    info!(delivered, completed, "Handshake simulation finished");

    Ok(HandshakeReport {
        top_window: top,
        iframe_window: frame,
        completed,
        final_top_location,
        navigations,
        deliveries: host.delivered(),
        dropped: host.dropped(),
        warnings: diagnostics.warnings(),
        cached_top_frame: frame_listener.cache().read(ContentKind::UrlTopFrame),
        cached_navigate: frame_listener.cache().read(ContentKind::UrlNavigate),
    })
}
