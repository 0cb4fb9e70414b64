//! Swipe feed endpoints.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use std::sync::Arc;

use crate::scoring::{self, ScoreBreakdown};
use crate::store::models::Listing;
use crate::store::LikeOutcome;
use crate::sync;
use crate::AppState;

use super::error::ApiError;

/// One feed card: the listing plus its live score against the active
/// contract. `score` is absent when no contract is selected.
#[derive(Debug, Serialize)]
pub struct FeedItem {
    pub listing: Listing,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<ScoreBreakdown>,
}

#[derive(Debug, Serialize)]
pub struct FeedResponse {
    pub items: Vec<FeedItem>,
}

/// Listings awaiting a swipe decision, scored on the way out.
pub async fn get_feed(State(state): State<Arc<AppState>>) -> Json<FeedResponse> {
    let store = state.store.read();
    let contract = store.active_contract();
    let prefs = store.scoring_preferences();

    let items = store
        .feed_listings()
        .into_iter()
        .map(|listing| FeedItem {
            score: contract.map(|c| scoring::score_listing(c, listing, &prefs)),
            listing: listing.clone(),
        })
        .collect();

    Json(FeedResponse { items })
}

/// Reset the queue to every listing, forgetting prior decisions.
pub async fn refresh_feed(State(state): State<Arc<AppState>>) -> Json<FeedResponse> {
    state.store.write().refresh_swipe_queue();
    get_feed(State(state)).await
}

/// Like a listing: match, hold, and seeded conversation in one step.
pub async fn like(
    State(state): State<Arc<AppState>>,
    Path(listing_id): Path<String>,
) -> Result<Json<LikeOutcome>, ApiError> {
    let outcome = sync::like_listing(&state, &listing_id).await?;
    Ok(Json(outcome))
}

#[derive(Debug, Serialize)]
pub struct PassResponse {
    pub listing_id: String,
}

/// Pass on a listing. Passing an unknown id is a quiet no-op.
pub async fn pass(
    State(state): State<Arc<AppState>>,
    Path(listing_id): Path<String>,
) -> Json<PassResponse> {
    sync::pass_listing(&state, &listing_id).await;
    Json(PassResponse { listing_id })
}
