//! Line-oriented stdin/stdout transport.

use async_trait::async_trait;
use orchestrator::{InboundEvent, MessageSender, OrchestratorError};
use tokio::io::{AsyncWriteExt, Stdout};
use tokio::sync::Mutex;

/// Parse `<sender_id> <text>` into an event.
///
/// Returns `None` for blank lines. Sender validation is left to the
/// dispatcher, which drops bad ids.
pub fn parse_line(line: &str) -> Option<InboundEvent> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let (sender, text) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    Some(InboundEvent::new(sender, text.trim()))
}

/// Writes replies to stdout, one line each.
pub struct ConsoleSender {
    out: Mutex<Stdout>,
}

impl ConsoleSender {
    pub fn new() -> Self {
        Self {
            out: Mutex::new(tokio::io::stdout()),
        }
    }
}

impl Default for ConsoleSender {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MessageSender for ConsoleSender {
    async fn send_message(&self, recipient: &str, text: &str) -> Result<(), OrchestratorError> {
        let line = format!("[{}] {}\n", recipient, text);
        let mut out = self.out.lock().await;
        out.write_all(line.as_bytes())
            .await
            .map_err(|e| OrchestratorError::SendFailed(e.to_string()))?;
        out.flush()
            .await
            .map_err(|e| OrchestratorError::SendFailed(e.to_string()))
    }
}
