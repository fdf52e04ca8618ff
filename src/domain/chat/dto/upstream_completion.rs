use serde::{Deserialize, Serialize};

use super::chat_request::ChatMessage;

/// Body posted to the upstream `chat/completions` endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct UpstreamChatPayload {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

/// The subset of an OpenAI-style completion the relay reads back.
#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamCompletion {
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub choices: Vec<UpstreamChoice>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamChoice {
    pub message: UpstreamMessage,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamMessage {
    #[serde(default)]
    pub content: Option<String>,
}

impl UpstreamCompletion {
    /// First non-blank choice as an assistant message.
    pub fn into_reply(self) -> Option<ChatMessage> {
        self.choices
            .into_iter()
            .filter_map(|c| c.message.content)
            .find(|text| !text.trim().is_empty())
            .map(ChatMessage::assistant_text)
    }
}
