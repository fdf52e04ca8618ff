use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::core::config::relay_settings::RelaySettings;
use crate::domain::chat::dto::upstream_completion::{UpstreamChatPayload, UpstreamCompletion};
use crate::domain::chat::service::relay_error::RelayError;

/// Outbound seam for the chat-completion call.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, payload: &UpstreamChatPayload) -> Result<UpstreamCompletion, RelayError>;
}

/// OpenAI-compatible `chat/completions` client. One attempt per call.
pub struct HttpCompletionClient {
    client: Client,
    url: String,
    token: Option<String>,
}

impl HttpCompletionClient {
    pub fn new(settings: &RelaySettings) -> Result<Self, RelayError> {
        let mut builder = Client::builder();
        if let Some(ms) = settings.timeout_ms {
            builder = builder.timeout(Duration::from_millis(ms));
        }
        let client = builder.build().map_err(RelayError::ClientBuild)?;

        Ok(Self {
            client,
            url: settings.completions_url(),
            token: settings.api_key.clone(),
        })
    }
}

#[async_trait]
impl CompletionClient for HttpCompletionClient {
    async fn complete(&self, payload: &UpstreamChatPayload) -> Result<UpstreamCompletion, RelayError> {
        let mut req = self.client.post(&self.url).json(payload);
        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }

        let resp = req.send().await.map_err(|source| RelayError::Transport {
            url: self.url.clone(),
            source,
        })?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(RelayError::Status {
                status,
                body: trim_str(&text, 512),
            });
        }

        let completion: UpstreamCompletion = resp.json().await.map_err(RelayError::Decode)?;
        debug!(
            model = completion.model.as_deref().unwrap_or("<unknown>"),
            choices = completion.choices.len(),
            "upstream completion received"
        );
        Ok(completion)
    }
}

fn trim_str(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        None => s.to_string(),
        Some((idx, _)) => format!("{}...<truncated>", &s[..idx]),
    }
}
