use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::services::dialogue::DialogueError;

pub const APOLOGY: &str = "Sorry, I encountered an error processing your request.";

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("dialogue error: {0}")]
    Dialogue(#[from] DialogueError),

    #[error("malformed request: {0}")]
    MalformedRequest(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "chat request failed");

        // Every failure surfaces to the client as the same apology.
        let body = serde_json::json!({ "message": APOLOGY, "error": self.to_string() });
        (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(body)).into_response()
    }
}
