use serde::de::Error as _;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;
use validator::{Validate, ValidationErrors};

use crate::domain::chat::dto::chat_request::ChatRequest;

#[derive(Debug, Error)]
pub enum ChatValidationError {
    /// Body does not deserialize into the chat request shape.
    #[error("request does not match the chat schema: {0}")]
    Shape(#[from] serde_json::Error),

    /// Body deserialized but breaks a field rule (url format, image count).
    #[error("request violates chat rules: {0}")]
    Rules(#[from] ValidationErrors),
}

/// Check an arbitrary JSON body against the chat request shape.
pub fn validate_chat_request(body: Value) -> Result<ChatRequest, ChatValidationError> {
    require_objects(&body).inspect_err(|e| {
        debug!(error = %e, "chat request has a non-object where an object is expected");
    })?;

    let request: ChatRequest = serde_json::from_value(body).inspect_err(|e| {
        debug!(error = %e, "chat request failed to deserialize");
    })?;

    request.validate().inspect_err(|e| {
        debug!(error = %e, "chat request failed validation");
    })?;

    Ok(request)
}

/// Derived structs also deserialize from positional arrays; only JSON objects are accepted here.
fn require_objects(body: &Value) -> Result<(), serde_json::Error> {
    let request = expect_object(body, "request body")?;

    let Some(Value::Array(messages)) = request.get("messages") else {
        return Ok(());
    };
    for (i, message) in messages.iter().enumerate() {
        let message = expect_object(message, &format!("messages[{i}]"))?;

        let Some(Value::Array(parts)) = message.get("content") else {
            continue;
        };
        for (j, part) in parts.iter().enumerate() {
            let part = expect_object(part, &format!("messages[{i}].content[{j}]"))?;
            if let Some(image_url) = part.get("image_url") {
                expect_object(image_url, &format!("messages[{i}].content[{j}].image_url"))?;
            }
        }
    }

    Ok(())
}

fn expect_object<'a>(
    value: &'a Value,
    at: &str,
) -> Result<&'a serde_json::Map<String, Value>, serde_json::Error> {
    value
        .as_object()
        .ok_or_else(|| serde_json::Error::custom(format!("{at} must be a JSON object")))
}
