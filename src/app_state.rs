use std::sync::Arc;

use crate::core::config::relay_settings::RelaySettings;
use crate::domain::chat::service::chat_relay_service::ChatRelayService;
use crate::domain::chat::service::relay_error::RelayError;

#[derive(Clone)]
pub struct AppState {
    pub chat_service: Arc<ChatRelayService>,
}

pub fn build_app_state(settings: RelaySettings) -> Result<AppState, RelayError> {
    Ok(AppState {
        chat_service: Arc::new(ChatRelayService::from_settings(settings)?),
    })
}
