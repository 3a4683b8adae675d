//! Message dispatcher: one-way posting of envelopes to a specific window.

use crate::host::MessagePoster;
use crate::message::Envelope;
use crate::types::{TargetOrigin, WindowId};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// How replies choose the origin they are restricted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReplyOriginPolicy {
    /// Restrict to the origin recorded on the inbound event; wildcard when it is unknown.
    #[default]
    Echo,
    /// Always post with `"*"`.
    Wildcard,
}

impl ReplyOriginPolicy {
    pub fn resolve(&self, origin_hint: Option<&str>) -> TargetOrigin {
        match self {
            ReplyOriginPolicy::Echo => TargetOrigin::from_hint(origin_hint),
            ReplyOriginPolicy::Wildcard => TargetOrigin::Any,
        }
    }
}

impl std::str::FromStr for ReplyOriginPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "echo" => Ok(ReplyOriginPolicy::Echo),
            "wildcard" => Ok(ReplyOriginPolicy::Wildcard),
            other => Err(format!(
                "Invalid reply origin policy: {} (must be 'echo' or 'wildcard')",
                other
            )),
        }
    }
}

/// Stateless wrapper around the host's posting primitive.
#[derive(Clone)]
pub struct MessageDispatcher {
    poster: Arc<dyn MessagePoster>,
    policy: ReplyOriginPolicy,
}

impl MessageDispatcher {
    pub fn new(poster: Arc<dyn MessagePoster>) -> Self {
        Self::with_policy(poster, ReplyOriginPolicy::default())
    }

    pub fn with_policy(poster: Arc<dyn MessagePoster>, policy: ReplyOriginPolicy) -> Self {
        Self { poster, policy }
    }

    pub fn policy(&self) -> ReplyOriginPolicy {
        self.policy
    }

    /// Post `message` to `target`. Fire-and-forget: no acknowledgment, no retry.
    pub fn dispatch_message(
        &self,
        target: WindowId,
        message: &Envelope,
        origin_hint: Option<&str>,
    ) {
        let target_origin = self.policy.resolve(origin_hint);
        debug!(
            target_window = %target,
            target_origin = %target_origin,
            message_type = %message.kind(),
            content = %message.content(),
            "Dispatching message"
        );
        self.poster
            .post_message(target, message.to_wire(), &target_origin);
    }
}
