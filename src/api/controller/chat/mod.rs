use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde_json::Value;

use crate::api::dto::ApiResponse;
use crate::api::util::json::{json_body, to_json};
use crate::app_state::AppState;
use crate::domain::chat::dto::chat_request::ChatMessage;
use crate::domain::chat::request_validator::validate_chat_request;
use crate::errors::AppError;

pub struct ChatController;

impl ChatController {
    pub async fn chat(
        State(state): State<AppState>,
        payload: Result<Json<Value>, JsonRejection>,
    ) -> Result<Json<ApiResponse<ChatMessage>>, AppError> {
        let request = validate_chat_request(json_body(payload)?)?;
        to_json(state.chat_service.relay(request).await)
    }

    /// Shape check only; upstream is never contacted.
    pub async fn validate(
        payload: Result<Json<Value>, JsonRejection>,
    ) -> Result<Json<ApiResponse<()>>, AppError> {
        validate_chat_request(json_body(payload)?)?;
        Ok(Json(ApiResponse::accepted()))
    }
}
