use std::path::PathBuf;

use anyhow::{Context, Result};

use super::relay_settings::normalize_string;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
/// Five base64-encoded photos do not fit in axum's 2 MiB default.
pub const DEFAULT_MAX_BODY_BYTES: usize = 20 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub bind_addr: String,
    pub max_body_bytes: usize,
    /// Enables the daily rolling log file when set.
    pub log_dir: Option<PathBuf>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.into(),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            log_dir: None,
        }
    }
}

impl ServerSettings {
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut s = Self::default();
        let get = |key: &str| lookup(key).and_then(normalize_string);

        if let Some(v) = get("CHAT_RELAY_BIND_ADDR") {
            s.bind_addr = v;
        }
        if let Some(v) = get("CHAT_RELAY_MAX_BODY_BYTES") {
            s.max_body_bytes = v
                .parse::<usize>()
                .context("CHAT_RELAY_MAX_BODY_BYTES must be an integer")?;
        }
        s.log_dir = get("CHAT_RELAY_LOG_DIR").map(PathBuf::from);

        Ok(s)
    }
}
