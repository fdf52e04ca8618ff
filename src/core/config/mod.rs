//! Process configuration, read from the environment (and `.env` via dotenvy).

pub mod relay_settings;
pub mod server_settings;

use anyhow::Result;

use relay_settings::RelaySettings;
use server_settings::ServerSettings;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerSettings,
    pub relay: RelaySettings,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            server: ServerSettings::from_lookup(&lookup)?,
            relay: RelaySettings::from_lookup(&lookup)?,
        })
    }
}
