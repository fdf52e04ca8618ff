use anyhow::{Context, Result};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4-vision-preview";
pub const DEFAULT_MAX_TOKENS: u32 = 300;
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;
pub const DEFAULT_IMAGE_PLACEHOLDER_URL: &str = "https://upload.wikimedia.org/wikipedia/commons/thumb/d/dd/Gfp-wisconsin-madison-the-nature-boardwalk.jpg/2560px-Gfp-wisconsin-madison-the-nature-boardwalk.jpg";

/// Configuration for the outbound completion call.
#[derive(Debug, Clone)]
pub struct RelaySettings {
    /// Bearer credential; `None` puts the relay in stub mode.
    pub api_key: Option<String>,
    /// Base URL or full `chat/completions` URL of the upstream API.
    pub base_url: String,
    /// Model used when the request does not name one.
    pub model: String,
    /// Hard limit on response tokens.
    pub max_tokens: Option<u32>,
    /// Request timeout in milliseconds.
    pub timeout_ms: Option<u64>,
    /// Every client image URL is replaced with this before relay.
    pub image_placeholder_url: String,
    /// Answer with the canned reply instead of failing when upstream errors.
    pub fallback_on_upstream_error: bool,
}

impl Default for RelaySettings {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.into(),
            model: DEFAULT_MODEL.into(),
            max_tokens: Some(DEFAULT_MAX_TOKENS),
            timeout_ms: Some(DEFAULT_TIMEOUT_MS),
            image_placeholder_url: DEFAULT_IMAGE_PLACEHOLDER_URL.into(),
            fallback_on_upstream_error: false,
        }
    }
}

impl RelaySettings {
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut s = Self::default();
        let get = |key: &str| lookup(key).and_then(normalize_string);

        s.api_key = get("OPENAI_API_KEY");

        if let Some(v) = get("CHAT_RELAY_BASE_URL") {
            s.base_url = v;
        }
        if let Some(v) = get("CHAT_RELAY_MODEL") {
            s.model = v;
        }
        if let Some(v) = get("CHAT_RELAY_MAX_TOKENS") {
            s.max_tokens = Some(v.parse::<u32>().context("CHAT_RELAY_MAX_TOKENS must be an integer")?);
        }
        if let Some(v) = get("CHAT_RELAY_TIMEOUT_MS") {
            let ms: u64 = v.parse().context("CHAT_RELAY_TIMEOUT_MS must be an integer")?;
            // 0 disables the timeout
            s.timeout_ms = if ms == 0 { None } else { Some(ms) };
        }
        if let Some(v) = get("CHAT_RELAY_IMAGE_PLACEHOLDER_URL") {
            s.image_placeholder_url = v;
        }
        if let Some(v) = get("CHAT_RELAY_FALLBACK_ON_ERROR") {
            s.fallback_on_upstream_error = parse_bool(&v)
                .context("CHAT_RELAY_FALLBACK_ON_ERROR must be true or false")?;
        }

        Ok(s)
    }

    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }

    /// Resolve the `chat/completions` endpoint from the configured base URL.
    pub fn completions_url(&self) -> String {
        let trimmed = self.base_url.trim_end_matches('/');
        if trimmed.ends_with("/chat/completions") {
            trimmed.to_string()
        } else {
            format!("{}/chat/completions", trimmed)
        }
    }

    /// Mask the credential for safe display (keeps last 4 chars).
    pub fn masked_api_key(&self) -> Option<String> {
        self.api_key.as_ref().map(|t| {
            let chars: Vec<char> = t.chars().collect();
            if chars.len() <= 8 {
                "***".into()
            } else {
                let tail: String = chars[chars.len() - 4..].iter().collect();
                format!("***{}", tail)
            }
        })
    }
}

pub(crate) fn normalize_string(v: String) -> Option<String> {
    let s = v.trim();
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

pub(crate) fn parse_bool(v: &str) -> Option<bool> {
    match v.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
