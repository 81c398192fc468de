//! Message sender trait and implementations.

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::error::OrchestratorError;

/// Trait for sending replies and typing indicators.
///
/// Abstracted to support different transports (WhatsApp, console, tests, etc.)
#[async_trait]
pub trait MessageSender: Send + Sync {
    /// Send a text message.
    ///
    /// # Arguments
    /// * `recipient` - Sender id as delivered by the transport
    /// * `text` - Message content
    async fn send_message(&self, recipient: &str, text: &str) -> Result<(), OrchestratorError>;

    /// Set typing indicator state.
    ///
    /// Default implementation does nothing.
    async fn set_typing(&self, recipient: &str, started: bool) -> Result<(), OrchestratorError> {
        let _ = (recipient, started);
        Ok(())
    }
}

/// A no-op message sender for testing that discards all messages.
#[derive(Debug, Clone, Default)]
pub struct NoOpSender;

#[async_trait]
impl MessageSender for NoOpSender {
    async fn send_message(&self, _recipient: &str, _text: &str) -> Result<(), OrchestratorError> {
        Ok(())
    }
}

/// A logging message sender for debugging that logs all operations.
#[derive(Debug, Clone, Default)]
pub struct LoggingSender;

#[async_trait]
impl MessageSender for LoggingSender {
    async fn send_message(&self, recipient: &str, text: &str) -> Result<(), OrchestratorError> {
        tracing::info!("Sending message to {}: {}", recipient, text);
        Ok(())
    }

    async fn set_typing(&self, recipient: &str, started: bool) -> Result<(), OrchestratorError> {
        let state = if started { "started" } else { "stopped" };
        tracing::info!("Typing {} for {}", state, recipient);
        Ok(())
    }
}

/// A sender that keeps every message it is asked to send.
#[derive(Debug, Default)]
pub struct RecordingSender {
    sent: Mutex<Vec<(String, String)>>,
}

impl RecordingSender {
    pub fn new() -> Self {
        Self::default()
    }

    /// `(recipient, text)` pairs in send order.
    pub async fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().await.clone()
    }
}

#[async_trait]
impl MessageSender for RecordingSender {
    async fn send_message(&self, recipient: &str, text: &str) -> Result<(), OrchestratorError> {
        self.sent
            .lock()
            .await
            .push((recipient.to_string(), text.to_string()));
        Ok(())
    }
}
