//! Chat routes (e.g., /api/v1/chat/*)

use axum::{routing::post, Router};

use crate::api::controller::chat::ChatController;
use crate::app_state::AppState;

pub fn chat_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(ChatController::chat))
        .route("/validate", post(ChatController::validate))
}
