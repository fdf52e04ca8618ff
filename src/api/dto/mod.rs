//! API response envelope
use serde::Serialize;

/// `{ success, message?, error? }` returned by every chat endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(message: T) -> Self {
        Self {
            success: true,
            message: Some(message),
            error: None,
        }
    }

    pub fn err(error: impl Into<String>) -> Self {
        Self {
            success: false,
            message: None,
            error: Some(error.into()),
        }
    }
}

impl ApiResponse<()> {
    /// Success without a payload.
    pub fn accepted() -> Self {
        Self {
            success: true,
            message: None,
            error: None,
        }
    }
}
