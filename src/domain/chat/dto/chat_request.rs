use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidateUrl, ValidationError};

/// Upper bound on image parts in a single message; the chat widget caps a turn at five.
pub const MAX_IMAGES_PER_MESSAGE: usize = 5;

/// Chat completion payload accepted from the chat widget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct ChatRequest {
    /// Overrides the configured upstream model when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[validate(nested)]
    pub messages: Vec<ChatMessage>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_message_content"))]
pub struct ChatMessage {
    pub role: Role,
    pub content: Vec<ContentPart>,
}

/// One fragment of a message, tagged by `type` on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageUrl {
    pub url: String,
}

impl ChatMessage {
    pub fn new(role: Role, content: Vec<ContentPart>) -> Self {
        Self { role, content }
    }

    pub fn assistant_text(text: impl Into<String>) -> Self {
        Self::new(Role::Assistant, vec![ContentPart::text(text)])
    }

    pub fn image_count(&self) -> usize {
        self.content.iter().filter(|p| p.is_image()).count()
    }
}

#[cfg(test)]
impl ChatMessage {
    /// Concatenated text of all text parts.
    pub(crate) fn text(&self) -> String {
        self.content
            .iter()
            .filter_map(|p| match p {
                ContentPart::Text { text } => Some(text.as_str()),
                ContentPart::ImageUrl { .. } => None,
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl ContentPart {
    pub fn text(text: impl Into<String>) -> Self {
        ContentPart::Text { text: text.into() }
    }

    pub fn image_url(url: impl Into<String>) -> Self {
        ContentPart::ImageUrl {
            image_url: ImageUrl { url: url.into() },
        }
    }

    pub fn is_image(&self) -> bool {
        matches!(self, ContentPart::ImageUrl { .. })
    }
}

fn validate_message_content(message: &ChatMessage) -> Result<(), ValidationError> {
    let images = message.image_count();
    if images > MAX_IMAGES_PER_MESSAGE {
        return Err(ValidationError::new("too_many_images").with_message(Cow::Owned(format!(
            "message carries {} images, at most {} are allowed",
            images, MAX_IMAGES_PER_MESSAGE
        ))));
    }

    for part in &message.content {
        if let ContentPart::ImageUrl { image_url } = part {
            if !image_url.url.validate_url() {
                return Err(ValidationError::new("image_url")
                    .with_message(Cow::Borrowed("image url is not a well-formed URL")));
            }
        }
    }

    Ok(())
}
