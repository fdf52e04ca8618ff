// src/domain/chat/service/chat_relay_service.rs
use std::sync::Arc;

use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::core::client::completion_client::{CompletionClient, HttpCompletionClient};
use crate::core::config::relay_settings::RelaySettings;
use crate::domain::chat::dto::chat_request::{ChatMessage, ChatRequest, ContentPart, ImageUrl};
use crate::domain::chat::dto::upstream_completion::UpstreamChatPayload;

use super::relay_error::RelayError;

/// Canned assistant reply used in stub mode and, when enabled, on upstream failure.
pub const FALLBACK_REPLY: &str = "This image features a beautiful natural landscape under a blue sky with scattered clouds. In the foreground, there is a wooden boardwalk or path that stretches straight ahead into the distance. The boardwalk is surrounded by lush, green grass and various vegetation on either side. In the background, you can see a line of trees and shrubs. The scenery suggests a peaceful, outdoor setting, likely a park, nature reserve, or a wetland area where the boardwalk is provided to allow people to walk through without disturbing the natural environment. The lighting and conditions suggest it is a sunny day with good weather.";

/// Replace every image URL in the request with `placeholder`.
pub fn sanitize_image_urls(request: ChatRequest, placeholder: &str) -> ChatRequest {
    let messages = request
        .messages
        .into_iter()
        .map(|message| ChatMessage {
            role: message.role,
            content: message
                .content
                .into_iter()
                .map(|part| match part {
                    ContentPart::ImageUrl { .. } => ContentPart::ImageUrl {
                        image_url: ImageUrl {
                            url: placeholder.to_string(),
                        },
                    },
                    text => text,
                })
                .collect(),
        })
        .collect();

    ChatRequest {
        model: request.model,
        messages,
    }
}

pub struct ChatRelayService {
    settings: RelaySettings,
    client: Arc<dyn CompletionClient>,
}

impl ChatRelayService {
    pub fn new(settings: RelaySettings, client: Arc<dyn CompletionClient>) -> Self {
        Self { settings, client }
    }

    pub fn from_settings(settings: RelaySettings) -> Result<Self, RelayError> {
        let client = HttpCompletionClient::new(&settings)?;
        Ok(Self::new(settings, Arc::new(client)))
    }

    /// No credential configured: answer with the canned reply, never call upstream.
    pub fn is_stub(&self) -> bool {
        !self.settings.has_credential()
    }

    /// Forward a validated request upstream and return the assistant reply.
    pub async fn relay(&self, request: ChatRequest) -> Result<ChatMessage, RelayError> {
        let span = info_span!("chat_relay", request_id = %Uuid::new_v4());
        self.relay_inner(request).instrument(span).await
    }

    async fn relay_inner(&self, request: ChatRequest) -> Result<ChatMessage, RelayError> {
        let payload = self.build_payload(request);
        let images: usize = payload.messages.iter().map(ChatMessage::image_count).sum();

        if self.is_stub() {
            warn!(
                model = %payload.model,
                images,
                "no upstream credential configured; answering with fallback reply"
            );
            return Ok(ChatMessage::assistant_text(FALLBACK_REPLY));
        }

        info!(
            model = %payload.model,
            messages = payload.messages.len(),
            images,
            "relaying chat request"
        );

        let outcome = self
            .client
            .complete(&payload)
            .await
            .and_then(|completion| completion.into_reply().ok_or(RelayError::EmptyCompletion));

        match outcome {
            Ok(reply) => Ok(reply),
            Err(e) if self.settings.fallback_on_upstream_error => {
                warn!(error = %e, "upstream call failed; answering with fallback reply");
                Ok(ChatMessage::assistant_text(FALLBACK_REPLY))
            }
            Err(e) => {
                warn!(error = %e, "upstream call failed");
                Err(e)
            }
        }
    }

    fn build_payload(&self, request: ChatRequest) -> UpstreamChatPayload {
        let sanitized = sanitize_image_urls(request, &self.settings.image_placeholder_url);
        UpstreamChatPayload {
            model: sanitized
                .model
                .unwrap_or_else(|| self.settings.model.clone()),
            messages: sanitized.messages,
            max_tokens: self.settings.max_tokens,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::chat::dto::chat_request::Role;
    use crate::domain::chat::dto::upstream_completion::UpstreamCompletion;
    use async_trait::async_trait;
    use reqwest::StatusCode;
    use serde_json::json;
    use std::sync::Mutex;

    enum MockOutcome {
        Reply(&'static str),
        Status(StatusCode),
        Empty,
    }

    struct MockCompletionClient {
        outcome: MockOutcome,
        seen: Mutex<Vec<UpstreamChatPayload>>,
    }

    impl MockCompletionClient {
        fn new(outcome: MockOutcome) -> Arc<Self> {
            Arc::new(Self {
                outcome,
                seen: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> Vec<UpstreamChatPayload> {
            self.seen.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl CompletionClient for MockCompletionClient {
        async fn complete(
            &self,
            payload: &UpstreamChatPayload,
        ) -> Result<UpstreamCompletion, RelayError> {
            self.seen.lock().unwrap().push(payload.clone());
            match self.outcome {
                MockOutcome::Reply(text) => Ok(serde_json::from_value(json!({
                    "choices": [{ "message": { "role": "assistant", "content": text } }]
                }))
                .unwrap()),
                MockOutcome::Status(status) => Err(RelayError::Status {
                    status,
                    body: "boom".into(),
                }),
                MockOutcome::Empty => Ok(serde_json::from_value(json!({ "choices": [] })).unwrap()),
            }
        }
    }

    fn live_settings() -> RelaySettings {
        RelaySettings {
            api_key: Some("sk-test-0000000000".into()),
            image_placeholder_url: "https://placeholder.example/img.jpg".into(),
            ..RelaySettings::default()
        }
    }

    fn turn_with_images() -> ChatRequest {
        ChatRequest {
            model: None,
            messages: vec![ChatMessage::new(
                Role::User,
                vec![
                    ContentPart::text("What is in these pictures?"),
                    ContentPart::image_url("https://private.example/a.png"),
                    ContentPart::image_url("data:image/png;base64,iVBORw0KGgo="),
                ],
            )],
        }
    }

    #[test]
    fn sanitize_replaces_every_image_and_keeps_text() {
        let sanitized = sanitize_image_urls(turn_with_images(), "https://placeholder.example/x.jpg");
        let content = &sanitized.messages[0].content;

        assert_eq!(content[0], ContentPart::text("What is in these pictures?"));
        assert_eq!(content[1], ContentPart::image_url("https://placeholder.example/x.jpg"));
        assert_eq!(content[2], ContentPart::image_url("https://placeholder.example/x.jpg"));
        assert_eq!(sanitized.messages[0].role, Role::User);
    }

    #[tokio::test]
    async fn relay_forwards_placeholder_urls_only() {
        let mock = MockCompletionClient::new(MockOutcome::Reply("A boardwalk."));
        let service = ChatRelayService::new(live_settings(), mock.clone());

        let reply = service.relay(turn_with_images()).await.unwrap();
        assert_eq!(reply.role, Role::Assistant);
        assert_eq!(reply.text(), "A boardwalk.");

        let calls = mock.calls();
        assert_eq!(calls.len(), 1);
        let body = serde_json::to_string(&calls[0]).unwrap();
        assert!(!body.contains("private.example"));
        assert!(!body.contains("base64"));
        assert!(body.contains("https://placeholder.example/img.jpg"));
        assert_eq!(calls[0].model, "gpt-4-vision-preview");
        assert_eq!(calls[0].max_tokens, Some(300));
    }

    #[tokio::test]
    async fn request_model_overrides_configured_model() {
        let mock = MockCompletionClient::new(MockOutcome::Reply("ok"));
        let service = ChatRelayService::new(live_settings(), mock.clone());

        let mut request = turn_with_images();
        request.model = Some("gpt-4o".into());
        service.relay(request).await.unwrap();

        assert_eq!(mock.calls()[0].model, "gpt-4o");
    }

    #[tokio::test]
    async fn stub_mode_never_calls_upstream() {
        let mock = MockCompletionClient::new(MockOutcome::Reply("unused"));
        let service = ChatRelayService::new(RelaySettings::default(), mock.clone());
        assert!(service.is_stub());

        let reply = service.relay(turn_with_images()).await.unwrap();
        assert_eq!(reply.text(), FALLBACK_REPLY);
        assert!(mock.calls().is_empty());
    }

    #[tokio::test]
    async fn upstream_failure_propagates_by_default() {
        let mock = MockCompletionClient::new(MockOutcome::Status(StatusCode::TOO_MANY_REQUESTS));
        let service = ChatRelayService::new(live_settings(), mock);

        let err = service.relay(turn_with_images()).await.unwrap_err();
        assert!(matches!(
            err,
            RelayError::Status { status, .. } if status == StatusCode::TOO_MANY_REQUESTS
        ));
    }

    #[tokio::test]
    async fn empty_completion_is_an_error() {
        let mock = MockCompletionClient::new(MockOutcome::Empty);
        let service = ChatRelayService::new(live_settings(), mock);

        let err = service.relay(turn_with_images()).await.unwrap_err();
        assert!(matches!(err, RelayError::EmptyCompletion));
    }

    #[tokio::test]
    async fn fallback_switch_masks_upstream_failure() {
        let mock = MockCompletionClient::new(MockOutcome::Status(StatusCode::BAD_GATEWAY));
        let settings = RelaySettings {
            fallback_on_upstream_error: true,
            ..live_settings()
        };
        let service = ChatRelayService::new(settings, mock.clone());

        let reply = service.relay(turn_with_images()).await.unwrap();
        assert_eq!(reply.text(), FALLBACK_REPLY);
        assert_eq!(mock.calls().len(), 1);
    }
}
