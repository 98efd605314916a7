use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::{Appointment, Turn};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct ChatRequest {
    pub messages: Vec<Turn>,
    #[serde(default)]
    pub appointment: Option<Appointment>,
}

#[derive(Serialize)]
pub struct ChatResponse {
    pub message: String,
    pub appointment: Appointment,
}

pub async fn chat(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, AppError> {
    let Json(request) = payload.map_err(|e| AppError::MalformedRequest(e.body_text()))?;

    tracing::info!(turns = request.messages.len(), "incoming chat turn");

    let advance = state
        .planner
        .advance(&request.messages, request.appointment.unwrap_or_default())?;

    Ok(Json(ChatResponse {
        message: advance.reply,
        appointment: advance.appointment,
    }))
}

pub async fn opening(State(state): State<Arc<AppState>>) -> Json<ChatResponse> {
    Json(ChatResponse {
        message: state.planner.opening_message(),
        appointment: Appointment::default(),
    })
}
