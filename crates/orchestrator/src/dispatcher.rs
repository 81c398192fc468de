//! Transport entry point: one inbound event in, at most one reply out.

use std::sync::Arc;

use brain_core::InboundMessage;
use tracing::{debug, error, info, warn};

use crate::error::OrchestratorError;
use crate::orchestrator::Orchestrator;
use crate::sender::MessageSender;

/// An event as delivered by the messaging transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundEvent {
    /// Sender id, e.g. "5215512345678", "+5215512345678" or "5215512345678@s.whatsapp.net"
    pub sender: String,
    pub text: String,
}

impl InboundEvent {
    pub fn new(sender: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            sender: sender.into(),
            text: text.into(),
        }
    }
}

/// What happened to one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// A reply was sent.
    Replied(String),
    /// Bad transport input; nothing processed.
    Dropped,
    /// Processed without reply (unrecognized category).
    Skipped,
    /// Processing or sending failed; no reply.
    Failed,
}

/// Parse a transport sender id into a user id.
///
/// Accepts an optional leading `+` and a trailing `@server` part. The
/// number must be positive.
pub fn parse_sender_id(sender: &str) -> Result<i64, OrchestratorError> {
    let number = sender.split('@').next().unwrap_or_default().trim();
    let number = number.strip_prefix('+').unwrap_or(number);

    match number.parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(OrchestratorError::InvalidSender(sender.to_string())),
    }
}

/// Runs inbound events through the orchestrator and sends the replies.
///
/// Cheap to clone; the transport spawns one task per event.
pub struct Dispatcher<S: MessageSender> {
    orchestrator: Arc<Orchestrator>,
    sender: Arc<S>,
}

impl<S: MessageSender> Clone for Dispatcher<S> {
    fn clone(&self) -> Self {
        Self {
            orchestrator: self.orchestrator.clone(),
            sender: self.sender.clone(),
        }
    }
}

impl<S: MessageSender> Dispatcher<S> {
    pub fn new(orchestrator: Arc<Orchestrator>, sender: Arc<S>) -> Self {
        Self { orchestrator, sender }
    }

    /// Get the sender.
    pub fn sender(&self) -> &S {
        &self.sender
    }

    /// Handle one event. Never panics and never returns an error: every
    /// failure is logged and ends the turn without a reply.
    pub async fn dispatch(&self, event: InboundEvent) -> DispatchOutcome {
        let user_id = match parse_sender_id(&event.sender) {
            Ok(id) => id,
            Err(e) => {
                warn!(error = %e, "Dropping event");
                return DispatchOutcome::Dropped;
            }
        };

        if event.text.trim().is_empty() {
            let e = OrchestratorError::EmptyMessage(event.sender.clone());
            debug!(user_id, error = %e, "Dropping event");
            return DispatchOutcome::Dropped;
        }

        if let Err(e) = self.sender.set_typing(&event.sender, true).await {
            warn!("Failed to start typing indicator: {}", e);
        }

        let result = self
            .orchestrator
            .process(InboundMessage::new(user_id, event.text))
            .await;

        if let Err(e) = self.sender.set_typing(&event.sender, false).await {
            warn!("Failed to stop typing indicator: {}", e);
        }

        let reply = match result {
            Ok(reply) => reply,
            Err(OrchestratorError::Skipped(reason)) => {
                debug!(user_id, reason = %reason, "No reply for message");
                return DispatchOutcome::Skipped;
            }
            Err(e) => {
                error!(user_id, error = %e, "Message processing failed, no reply sent");
                return DispatchOutcome::Failed;
            }
        };

        match self.sender.send_message(&event.sender, &reply.text).await {
            Ok(()) => {
                info!(user_id, "Reply sent");
                DispatchOutcome::Replied(reply.text)
            }
            Err(e) => {
                error!(user_id, error = %e, "Failed to send reply");
                DispatchOutcome::Failed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sender_id() {
        assert_eq!(parse_sender_id("5215512345678").unwrap(), 5215512345678);
        assert_eq!(parse_sender_id("+5215512345678").unwrap(), 5215512345678);
        assert_eq!(parse_sender_id("5215512345678@s.whatsapp.net").unwrap(), 5215512345678);

        for bad in ["", "abc", "0", "-5", "12a", "@s.whatsapp.net", "99999999999999999999"] {
            assert!(
                matches!(parse_sender_id(bad), Err(OrchestratorError::InvalidSender(_))),
                "expected {:?} to be rejected",
                bad
            );
        }
    }
}
