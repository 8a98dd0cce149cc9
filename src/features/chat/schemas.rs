use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::features::chat::models::ChatMessage;

#[derive(Deserialize, Validate, Debug)]
pub struct MessageIn {
    #[validate(length(min = 1, max = 2000))]
    pub body: String,
}

/// Frames pushed over the chat websocket.
#[derive(Serialize, Debug)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ChatEvent {
    Message { message: ChatMessage },
}
