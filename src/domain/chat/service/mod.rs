pub mod chat_relay_service;
pub mod relay_error;
