//! Conversation endpoints.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::store::models::Message;
use crate::sync;
use crate::AppState;

use super::error::ApiError;

/// Messages of one conversation, in send order.
pub async fn list(
    State(state): State<Arc<AppState>>,
    Path(conversation_id): Path<String>,
) -> Result<Json<Vec<Message>>, ApiError> {
    sync::conversation_messages(&state, &conversation_id)
        .await
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Conversation not found"))
}

#[derive(Debug, Deserialize)]
pub struct SendRequest {
    pub sender_id: String,
    pub body: String,
}

pub async fn send(
    State(state): State<Arc<AppState>>,
    Path(conversation_id): Path<String>,
    Json(req): Json<SendRequest>,
) -> Result<Json<Message>, ApiError> {
    if req.body.trim().is_empty() {
        return Err(ApiError::validation("message body must not be empty"));
    }
    sync::send_message(&state, &conversation_id, &req.sender_id, &req.body)
        .await
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Conversation not found"))
}
