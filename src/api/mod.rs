mod env;
pub mod error;
mod feed;
mod holds;
mod listings;
mod messages;
mod profile;
mod shortlist;

use axum::{
    routing::{delete, get, patch, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    let api_routes = Router::new()
        // Runtime environment for browser clients
        .route("/public-env", get(env::public_env))
        // Swipe feed
        .route("/feed", get(feed::get_feed))
        .route("/feed/refresh", post(feed::refresh_feed))
        .route("/feed/:id/like", post(feed::like))
        .route("/feed/:id/pass", post(feed::pass))
        // Listings
        .route("/listings", post(listings::create))
        .route("/listings/:id", patch(listings::update))
        .route("/listings/:id/filter-match", post(listings::filter_match))
        // Shortlist
        .route("/shortlist", get(shortlist::list))
        .route("/shortlist", post(shortlist::add))
        .route("/shortlist/:id", delete(shortlist::remove))
        // Holds
        .route("/holds/create-intent", post(holds::create_intent))
        .route("/holds/expire", post(holds::expire))
        // Conversations
        .route("/conversations/:id/messages", get(messages::list))
        .route("/conversations/:id/messages", post(messages::send))
        // Persona, contracts, onboarding
        .route("/profile/role", post(profile::set_role))
        .route("/contracts", put(profile::put_contract))
        .route("/onboarding", get(profile::get_onboarding))
        .route("/onboarding", put(profile::put_onboarding))
        // Remote reconciliation
        .route("/sync", post(profile::trigger_sync));

    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}
