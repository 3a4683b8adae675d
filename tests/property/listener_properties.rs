//! Property-based tests for listener guarantees under arbitrary traffic

use frame_relay::diagnostics::RecordingDiagnostics;
use frame_relay::host::{HostWindow, InboundEvent, MemoryHost};
use frame_relay::{
    parse_envelope, ContentKind, HandleOutcome, ListenerParts, MessageDispatcher, MessageKind,
    MessageListener, WindowId,
};
use proptest::prelude::*;
use serde_json::{json, Value};
use std::sync::Arc;

struct Fixture {
    host: MemoryHost,
    top: WindowId,
    frame: WindowId,
    stranger: WindowId,
}

impl Fixture {
    fn new() -> Self {
        let host = MemoryHost::new();
        let top = host.open_top("https://app.example/").unwrap();
        let frame = host.open_embedded(top, "https://login.example/").unwrap();
        let stranger = host.open_top("https://stranger.example/").unwrap();
        Self { host, top, frame, stranger }
    }

    /// Listener for `window`, not subscribed; events are fed by hand.
    fn listener(&self, window: WindowId) -> (Arc<MessageListener>, Arc<RecordingDiagnostics>) {
        let handle: Arc<HostWindow> = Arc::new(self.host.window(window).unwrap());
        let diagnostics = Arc::new(RecordingDiagnostics::new());
        let listener = MessageListener::new(ListenerParts {
            context: handle.clone(),
            source: handle.clone(),
            dispatcher: MessageDispatcher::new(handle.clone()),
            navigator: handle,
            diagnostics: diagnostics.clone(),
        });
        (listener, diagnostics)
    }
}

/// Well-formed envelopes, near misses, and junk.
fn payload() -> impl Strategy<Value = Value> {
    let kind = prop_oneof![
        Just("REDIRECT_REQUEST".to_string()),
        Just("URL".to_string()),
        "[A-Z_]{0,12}",
    ];
    let content = prop_oneof![
        Just("URL_TOP_FRAME".to_string()),
        Just("URL_NAVIGATE".to_string()),
        "[A-Z_]{0,12}",
    ];
    prop_oneof![
        4 => (kind, content, "https://[a-z]{1,8}\\.example/[a-z]{0,8}")
            .prop_map(|(k, c, d)| json!({"type": k, "content": c, "data": d})),
        1 => any::<i64>().prop_map(|n| json!(n)),
        1 => ".*".prop_map(|s| json!({"type": "URL", "data": s})),
    ]
}

proptest! {
    /// Messages from anyone but the top never touch an embedded frame's state
    #[test]
    fn unverified_sender_changes_nothing(
        data in payload(),
        pending in proptest::option::of("https://idp\\.example/[a-z]{1,8}"),
    ) {
        let fx = Fixture::new();
        let (listener, diagnostics) = fx.listener(fx.frame);
        if let Some(ref url) = pending {
            listener.cache().write(ContentKind::UrlNavigate, url.clone());
        }
        let before = listener.cache().snapshot();

        let outcome = listener.handle_event(&InboundEvent::new(data, fx.stranger));

        prop_assert_eq!(outcome, HandleOutcome::OriginRejected);
        prop_assert_eq!(listener.cache().snapshot(), before);
        prop_assert_eq!(fx.host.pending(), 0);
        prop_assert_eq!(diagnostics.warnings().len(), 1);
    }

    /// A top frame never writes its cache or warns, and only navigates on URL_NAVIGATE
    #[test]
    fn top_frame_never_runs_embedded_logic(data in payload(), from_frame in any::<bool>()) {
        let fx = Fixture::new();
        let (listener, diagnostics) = fx.listener(fx.top);
        let source = if from_frame { fx.frame } else { fx.stranger };

        let parsed = parse_envelope(&data).ok();
        let outcome = listener.handle_event(&InboundEvent::new(data, source));

        prop_assert!(listener.cache().is_empty());
        prop_assert!(diagnostics.warnings().is_empty());

        let expected = match parsed {
            None => HandleOutcome::Malformed,
            Some(env) => match (env.kind(), env.content()) {
                (MessageKind::RedirectRequest, _) => HandleOutcome::AcknowledgedRedirect,
                (MessageKind::Url, ContentKind::UrlNavigate) => {
                    HandleOutcome::Navigated(env.data().to_string())
                }
                (MessageKind::Url, ContentKind::UrlTopFrame) => HandleOutcome::Ignored,
            },
        };
        let dispatches = usize::from(expected == HandleOutcome::AcknowledgedRedirect);
        let navigations = usize::from(matches!(expected, HandleOutcome::Navigated(_)));
        prop_assert_eq!(outcome, expected);
        prop_assert_eq!(fx.host.pending(), dispatches);
        prop_assert_eq!(fx.host.navigations().len(), navigations);
    }

    /// Verified acks always land in the cache and trigger a reply iff a target is pending
    #[test]
    fn verified_ack_dispatches_iff_target_pending(
        ack in "https://[a-z]{1,8}\\.example/",
        pending in proptest::option::of("https://idp\\.example/[a-z]{1,8}"),
    ) {
        let fx = Fixture::new();
        let (listener, _) = fx.listener(fx.frame);
        if let Some(ref url) = pending {
            listener.cache().write(ContentKind::UrlNavigate, url.clone());
        }

        let event = InboundEvent::new(
            json!({"type": "URL", "content": "URL_TOP_FRAME", "data": ack.clone()}),
            fx.top,
        );
        listener.handle_event(&event);

        prop_assert_eq!(
            listener.cache().read(ContentKind::UrlTopFrame),
            Some(ack)
        );
        prop_assert_eq!(fx.host.pending(), usize::from(pending.is_some()));
    }
}
