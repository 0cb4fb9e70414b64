//! Shortlist endpoints.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::store::models::ShortlistEntry;
use crate::AppState;

use super::error::ApiError;

pub async fn list(State(state): State<Arc<AppState>>) -> Json<Vec<ShortlistEntry>> {
    Json(state.store.read().shortlist.clone())
}

#[derive(Debug, Deserialize)]
pub struct AddRequest {
    pub listing_id: String,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Add a listing to the shortlist. Idempotent per listing; a repeat call
/// replaces the notes.
pub async fn add(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AddRequest>,
) -> Result<Json<ShortlistEntry>, ApiError> {
    if req.listing_id.is_empty() {
        return Err(ApiError::validation("listing_id is required"));
    }
    let entry = state
        .store
        .write()
        .add_to_shortlist(&req.listing_id, req.notes);
    Ok(Json(entry))
}

/// Remove a shortlist entry by its id; removing a missing entry succeeds.
pub async fn remove(
    State(state): State<Arc<AppState>>,
    Path(entry_id): Path<String>,
) -> axum::http::StatusCode {
    state.store.write().remove_from_shortlist(&entry_id);
    axum::http::StatusCode::NO_CONTENT
}
