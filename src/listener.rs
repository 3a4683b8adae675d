//! Message listener: the handshake protocol engine.
//!
//! A top-level window mediates navigation for its embedded auth frames:
//!
//! 1. the embedded frame caches the URL it needs and sends `REDIRECT_REQUEST` to the top;
//! 2. the top replies with `URL`/`URL_TOP_FRAME` carrying its own location;
//! 3. the embedded frame (after checking the sender really is its top) answers with
//!    `URL`/`URL_NAVIGATE` carrying the cached target;
//! 4. the top navigates itself there.
//!
//! Every inbound message is handled on its own, keyed by `(role, type, content)`.
//! The cache is the only memory carried between messages.

use crate::cache::MessageCache;
use crate::diagnostics::DiagnosticSink;
use crate::dispatch::MessageDispatcher;
use crate::error::RelayError;
use crate::host::{
    InboundEvent, MessageHandler, MessageSource, Navigator, SubscriptionId, WindowContext,
};
use crate::message::{
    build_message, current_window, parse_envelope, ContentKind, Envelope, MessageKind,
};
use crate::types::{FrameRole, WindowId};
use parking_lot::Mutex;
use std::sync::{Arc, Weak};
use tracing::{debug, trace};

pub const ORIGIN_NOT_VERIFIED: &str = "The message origin is not verified";
pub const NAVIGATING_ON_BEHALF: &str = "navigating to the Service on behalf of the iframed app";

/// What handling one inbound message amounted to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandleOutcome {
    /// Top frame answered a redirect request with its location.
    AcknowledgedRedirect,
    /// Top frame navigated to the carried URL.
    Navigated(String),
    /// Embedded frame recorded the ack and sent its pending target back.
    ForwardedNavigation(String),
    /// Embedded frame recorded the ack; no target was pending.
    RecordedTopFrame,
    /// Embedded frame dropped a message not sent by its top window.
    OriginRejected,
    /// Payload did not parse as an envelope.
    Malformed,
    /// Valid envelope with no branch for this role.
    Ignored,
}

/// Collaborators a listener is built from.
pub struct ListenerParts {
    pub context: Arc<dyn WindowContext>,
    pub source: Arc<dyn MessageSource>,
    pub dispatcher: MessageDispatcher,
    pub navigator: Arc<dyn Navigator>,
    pub diagnostics: Arc<dyn DiagnosticSink>,
}

pub struct MessageListener {
    context: Arc<dyn WindowContext>,
    source: Arc<dyn MessageSource>,
    dispatcher: MessageDispatcher,
    navigator: Arc<dyn Navigator>,
    diagnostics: Arc<dyn DiagnosticSink>,
    cache: MessageCache,
    subscription: Mutex<Option<SubscriptionId>>,
}

impl MessageListener {
    /// Build a listener with an empty cache. Nothing is received until [`start`](Self::start).
    pub fn new(parts: ListenerParts) -> Arc<Self> {
        Arc::new(Self {
            context: parts.context,
            source: parts.source,
            dispatcher: parts.dispatcher,
            navigator: parts.navigator,
            diagnostics: parts.diagnostics,
            cache: MessageCache::new(),
            subscription: Mutex::new(None),
        })
    }

    /// Register with the inbound-message source. Starting twice keeps one registration.
    pub fn start(self: &Arc<Self>) {
        let mut subscription = self.subscription.lock();
        if subscription.is_some() {
            return;
        }

        let weak: Weak<Self> = Arc::downgrade(self);
        let handler: MessageHandler = Arc::new(move |event: &InboundEvent| {
            if let Some(listener) = weak.upgrade() {
                listener.handle_event(event);
            }
        });
        let id = self.source.subscribe(handler);
        debug!(window = %self.window(), subscription = id.0, "Message listener started");
        *subscription = Some(id);
    }

    /// Drop the registration. No-op when not started.
    pub fn stop(&self) {
        if let Some(id) = self.subscription.lock().take() {
            self.source.unsubscribe(id);
            debug!(window = %self.window(), subscription = id.0, "Message listener stopped");
        }
    }

    pub fn is_listening(&self) -> bool {
        self.subscription.lock().is_some()
    }

    pub fn cache(&self) -> &MessageCache {
        &self.cache
    }

    pub fn window(&self) -> WindowId {
        self.context.own_ref()
    }

    /// Role of the hosting context, computed fresh.
    pub fn role(&self) -> FrameRole {
        current_window(self.context.as_ref())
    }

    /// Start a delegated navigation from an embedded frame.
    ///
    /// Caches `url` as the pending target (replacing any earlier one) and asks
    /// the top window for its location. The navigation completes when the
    /// top's acknowledgment reaches [`handle_event`](Self::handle_event).
    pub fn request_top_navigation(&self, url: &str) -> Result<(), RelayError> {
        if self.role() != FrameRole::Iframe {
            return Err(RelayError::NotEmbedded);
        }

        self.cache.write(ContentKind::UrlNavigate, url);
        let request = build_message(
            MessageKind::RedirectRequest,
            ContentKind::UrlNavigate,
            self.context.location(),
        );
        self.dispatcher
            .dispatch_message(self.context.top_ref(), &request, None);
        Ok(())
    }

    /// Handle one inbound message to completion. Never fails.
    pub fn handle_event(&self, event: &InboundEvent) -> HandleOutcome {
        let outcome = match self.role() {
            FrameRole::TopFrame => self.handle_as_top_frame(event),
            FrameRole::Iframe => self.handle_as_iframe(event),
        };
        trace!(source = %event.source, ?outcome, "Inbound message handled");
        outcome
    }

    fn handle_as_top_frame(&self, event: &InboundEvent) -> HandleOutcome {
        let Some(envelope) = self.parse(event) else {
            return HandleOutcome::Malformed;
        };

        match envelope.kind() {
            MessageKind::RedirectRequest => {
                let ack = build_message(
                    MessageKind::Url,
                    ContentKind::UrlTopFrame,
                    self.context.location(),
                );
                self.reply(event, &ack);
                HandleOutcome::AcknowledgedRedirect
            }
            MessageKind::Url if envelope.content() == ContentKind::UrlNavigate => {
                self.diagnostics.info(NAVIGATING_ON_BEHALF);
                self.navigator.navigate(envelope.data());
                HandleOutcome::Navigated(envelope.data().to_string())
            }
            MessageKind::Url => HandleOutcome::Ignored,
        }
    }

    fn handle_as_iframe(&self, event: &InboundEvent) -> HandleOutcome {
        // Only the top window may drive this frame's handshake.
        if event.source != self.context.top_ref() {
            self.diagnostics.warning(ORIGIN_NOT_VERIFIED);
            return HandleOutcome::OriginRejected;
        }

        let Some(envelope) = self.parse(event) else {
            return HandleOutcome::Malformed;
        };

        if envelope.kind() != MessageKind::Url || envelope.content() != ContentKind::UrlTopFrame {
            return HandleOutcome::Ignored;
        }

        self.cache.write(ContentKind::UrlTopFrame, envelope.data());

        match self.cache.read(ContentKind::UrlNavigate) {
            Some(target) => {
                let instruction =
                    build_message(MessageKind::Url, ContentKind::UrlNavigate, target.as_str());
                self.reply(event, &instruction);
                HandleOutcome::ForwardedNavigation(target)
            }
            None => {
                debug!("Top frame acknowledged with no navigation pending");
                HandleOutcome::RecordedTopFrame
            }
        }
    }

    fn parse(&self, event: &InboundEvent) -> Option<Envelope> {
        match parse_envelope(&event.data) {
            Ok(envelope) => Some(envelope),
            Err(e) => {
                debug!(source = %event.source, error = %e, "Dropping malformed message");
                None
            }
        }
    }

    fn reply(&self, event: &InboundEvent, message: &Envelope) {
        self.dispatcher
            .dispatch_message(event.source, message, event.origin.as_deref());
    }
}

impl Drop for MessageListener {
    fn drop(&mut self) {
        if let Some(id) = self.subscription.get_mut().take() {
            self.source.unsubscribe(id);
        }
    }
}
