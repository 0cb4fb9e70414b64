//! Listing management endpoints (owner surface).

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::scoring::{self, FilterSelections};
use crate::store::models::{Listing, ListingPatch, ListingStatus, Parking, PetPolicy};
use crate::sync;
use crate::AppState;

use super::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct CreateListingRequest {
    pub owner_id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub city: String,
    #[serde(default)]
    pub neighborhood: Option<String>,
    pub price_weekly: f64,
    pub commute_minutes_peak: f64,
    pub commute_minutes_night: f64,
    pub stipend_fit_score: f64,
    pub safety_score: f64,
    pub quality_score: f64,
    pub bedrooms: u32,
    pub bathrooms: f64,
    pub pet_policy: PetPolicy,
    pub parking: Parking,
    #[serde(default)]
    pub photos: Vec<String>,
    #[serde(default)]
    pub amenities: Vec<String>,
    #[serde(default)]
    pub safety_features: Vec<String>,
    #[serde(default = "default_status")]
    pub status: ListingStatus,
    pub available_from: NaiveDate,
    pub available_to: NaiveDate,
    pub min_stay_weeks: u32,
    pub max_stay_weeks: u32,
}

fn default_status() -> ListingStatus {
    ListingStatus::Active
}

fn validate(req: &CreateListingRequest) -> Result<(), ApiError> {
    if req.title.trim().is_empty() {
        return Err(ApiError::validation("title must not be empty"));
    }
    if req.price_weekly <= 0.0 {
        return Err(ApiError::validation("price_weekly must be positive"));
    }
    for (name, score) in [
        ("stipend_fit_score", req.stipend_fit_score),
        ("safety_score", req.safety_score),
        ("quality_score", req.quality_score),
    ] {
        if !(0.0..=100.0).contains(&score) {
            return Err(ApiError::validation(format!("{name} must be 0-100")));
        }
    }
    if req.available_to < req.available_from {
        return Err(ApiError::validation(
            "available_to must not precede available_from",
        ));
    }
    Ok(())
}

/// Create a listing. The total score is derived server-side; it joins the
/// swipe queue immediately.
pub async fn create(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateListingRequest>,
) -> Result<Json<Listing>, ApiError> {
    validate(&req)?;

    let now = Utc::now();
    let listing = Listing {
        id: Uuid::new_v4().to_string(),
        owner_id: req.owner_id,
        title: req.title,
        description: req.description,
        city: req.city,
        neighborhood: req.neighborhood,
        price_weekly: req.price_weekly,
        commute_minutes_peak: req.commute_minutes_peak,
        commute_minutes_night: req.commute_minutes_night,
        stipend_fit_score: req.stipend_fit_score,
        safety_score: req.safety_score,
        quality_score: req.quality_score,
        total_score: 0.0,
        bedrooms: req.bedrooms,
        bathrooms: req.bathrooms,
        pet_policy: req.pet_policy,
        parking: req.parking,
        photos: req.photos,
        amenities: req.amenities,
        safety_features: req.safety_features,
        status: req.status,
        available_from: req.available_from,
        available_to: req.available_to,
        min_stay_weeks: req.min_stay_weeks,
        max_stay_weeks: req.max_stay_weeks,
        created_at: now,
        updated_at: now,
    };

    let created = sync::create_listing(&state, listing).await;
    Ok(Json(created))
}

/// Merge-patch a listing; absent fields are left alone. Patched fields
/// are held to the same rules as on create.
pub async fn update(
    State(state): State<Arc<AppState>>,
    Path(listing_id): Path<String>,
    Json(patch): Json<ListingPatch>,
) -> Result<Json<Listing>, ApiError> {
    if let Some(price) = patch.price_weekly {
        if price <= 0.0 {
            return Err(ApiError::validation("price_weekly must be positive"));
        }
    }
    for (name, score) in [
        ("stipend_fit_score", patch.stipend_fit_score),
        ("safety_score", patch.safety_score),
        ("quality_score", patch.quality_score),
    ] {
        if let Some(score) = score {
            if !(0.0..=100.0).contains(&score) {
                return Err(ApiError::validation(format!("{name} must be 0-100")));
            }
        }
    }

    let mut store = state.store.write();
    // Date ordering is checked against the effective window, so patching
    // one end cannot cross the other.
    if patch.available_from.is_some() || patch.available_to.is_some() {
        let listing = store
            .listing(&listing_id)
            .ok_or_else(|| ApiError::not_found("Listing not found"))?;
        let from = patch.available_from.unwrap_or(listing.available_from);
        let to = patch.available_to.unwrap_or(listing.available_to);
        if to < from {
            return Err(ApiError::validation(
                "available_to must not precede available_from",
            ));
        }
    }

    let updated = store.update_listing(&listing_id, patch)?;
    Ok(Json(updated))
}

#[derive(Debug, Serialize)]
pub struct FilterMatchResponse {
    pub score: i64,
}

/// Score a listing against explicit filter selections (the browse-page
/// percentage badge). Pure and side-effect free.
pub async fn filter_match(
    State(state): State<Arc<AppState>>,
    Path(listing_id): Path<String>,
    Json(filters): Json<FilterSelections>,
) -> Result<Json<FilterMatchResponse>, ApiError> {
    let store = state.store.read();
    let listing = store
        .listing(&listing_id)
        .ok_or_else(|| ApiError::not_found("Listing not found"))?;
    Ok(Json(FilterMatchResponse {
        score: scoring::compute_filter_match(listing, &filters),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::create_router;
    use crate::store::{seed, Store};
    use crate::test_support::test_state;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    fn seeded_state() -> Arc<AppState> {
        let mut store = Store::new();
        seed::seed_demo_data(&mut store);
        Arc::new(test_state(store))
    }

    fn request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn valid_body() -> serde_json::Value {
        serde_json::json!({
            "owner_id": "u-owner-1",
            "title": "Sunny studio near the hospital",
            "city": "San Francisco",
            "price_weekly": 900.0,
            "commute_minutes_peak": 15.0,
            "commute_minutes_night": 10.0,
            "stipend_fit_score": 80.0,
            "safety_score": 80.0,
            "quality_score": 80.0,
            "bedrooms": 1,
            "bathrooms": 1.0,
            "pet_policy": "cats",
            "parking": "street",
            "available_from": "2026-09-01",
            "available_to": "2027-03-01",
            "min_stay_weeks": 4,
            "max_stay_weeks": 26
        })
    }

    #[tokio::test]
    async fn create_derives_the_total_and_enqueues() {
        let state = seeded_state();
        let app = create_router(state.clone());
        let response = app
            .oneshot(request("POST", "/api/listings", valid_body()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["total_score"], 80.0);
        let id = json["id"].as_str().unwrap().to_string();
        assert!(state.store.read().swipe_queue.contains(&id));
    }

    #[tokio::test]
    async fn create_rejects_bad_input() {
        let app = create_router(seeded_state());

        let mut body = valid_body();
        body["title"] = serde_json::json!("   ");
        let response = app
            .clone()
            .oneshot(request("POST", "/api/listings", body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let mut body = valid_body();
        body["safety_score"] = serde_json::json!(120.0);
        let response = app
            .oneshot(request("POST", "/api/listings", body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn patch_rejects_bad_input_like_create_does() {
        let state = seeded_state();
        let listing_id = state.store.read().listings[0].id.clone();
        let before = state.store.read().listings[0].clone();
        let app = create_router(state.clone());
        let uri = format!("/api/listings/{listing_id}");

        let response = app
            .clone()
            .oneshot(request(
                "PATCH",
                &uri,
                serde_json::json!({ "safety_score": 400.0 }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = app
            .clone()
            .oneshot(request(
                "PATCH",
                &uri,
                serde_json::json!({ "stipend_fit_score": -5.0 }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        // Moving one end of the window past the other is rejected too.
        let response = app
            .oneshot(request(
                "PATCH",
                &uri,
                serde_json::json!({ "available_to": "2020-01-01" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        // Nothing was written, and the derived total never saw bad input.
        assert_eq!(state.store.read().listings[0], before);
    }

    #[tokio::test]
    async fn patch_updates_in_place_and_404s_on_unknown_ids() {
        let state = seeded_state();
        let listing_id = state.store.read().listings[0].id.clone();
        let app = create_router(state.clone());

        let response = app
            .clone()
            .oneshot(request(
                "PATCH",
                &format!("/api/listings/{listing_id}"),
                serde_json::json!({ "quality_score": 95.0 }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["quality_score"], 95.0);

        let response = app
            .oneshot(request(
                "PATCH",
                "/api/listings/ghost",
                serde_json::json!({}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn filter_match_scores_without_side_effects() {
        let state = seeded_state();
        let listing_id = state.store.read().listings[0].id.clone();
        let before = state.store.read().listings.clone();

        let app = create_router(state.clone());
        let response = app
            .oneshot(request(
                "POST",
                &format!("/api/listings/{listing_id}/filter-match"),
                serde_json::json!({ "safe": true, "parking": true }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        let score = json["score"].as_i64().unwrap();
        assert!((0..=100).contains(&score));
        assert_eq!(state.store.read().listings, before);
    }
}
