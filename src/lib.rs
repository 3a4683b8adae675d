//! Frame Relay: cross-frame navigation handshake
//!
//! Lets an embedded authentication frame delegate a top-level navigation to
//! its top window by exchanging a small, strictly typed set of cross-context
//! messages, with the embedded side refusing traffic from anyone but its top.

pub mod cache;
pub mod cli;
pub mod config;
pub mod diagnostics;
pub mod dispatch;
pub mod error;
pub mod host;
pub mod listener;
pub mod logging;
pub mod message;
pub mod simulation;
pub mod types;

pub use cache::MessageCache;
pub use dispatch::{MessageDispatcher, ReplyOriginPolicy};
pub use error::{EnvelopeError, RelayError};
pub use listener::{HandleOutcome, ListenerParts, MessageListener};
pub use message::{
    build_message, current_window, parse_envelope, ContentKind, Envelope, MessageKind,
};
pub use types::{FrameRole, TargetOrigin, WindowId};
