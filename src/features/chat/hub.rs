use tokio::sync::broadcast;
use uuid::Uuid;

use crate::features::chat::models::ChatMessage;

const CHANNEL_CAPACITY: usize = 256;

/// In-process fan-out of stored chat messages to websocket subscribers.
#[derive(Clone)]
pub struct ChatHub {
    sender: broadcast::Sender<ChatMessage>,
}

impl Default for ChatHub {
    fn default() -> Self {
        ChatHub::new()
    }
}

impl ChatHub {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        ChatHub { sender }
    }

    /// Returns how many subscribers were listening.
    pub fn publish(&self, message: ChatMessage) -> usize {
        self.sender.send(message).unwrap_or(0)
    }

    pub fn subscribe(&self, session_id: Uuid) -> SessionSubscription {
        SessionSubscription {
            session_id,
            receiver: self.sender.subscribe(),
        }
    }
}

pub struct SessionSubscription {
    session_id: Uuid,
    receiver: broadcast::Receiver<ChatMessage>,
}

impl SessionSubscription {
    /// Next message of this session, or `None` once the hub is gone.
    /// Messages dropped while lagging behind are skipped.
    pub async fn next(&mut self) -> Option<ChatMessage> {
        loop {
            match self.receiver.recv().await {
                Ok(message) if message.session_id == self.session_id => return Some(message),
                Ok(_) => continue,
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!("chat subscriber for {} lagged by {skipped}", self.session_id);
                    continue;
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}
