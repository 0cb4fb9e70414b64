//! Persona, contract, onboarding, and sync endpoints.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::store::models::{Contract, NursePreferences, OnboardingState, Role};
use crate::sync::{self, SyncReport};
use crate::AppState;

use super::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct SetRoleRequest {
    pub role: Role,
}

#[derive(Debug, Serialize)]
pub struct SetRoleResponse {
    pub role: Role,
    pub current_user_id: Option<String>,
}

/// Demo persona switch between the nurse and owner surfaces.
pub async fn set_role(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SetRoleRequest>,
) -> Json<SetRoleResponse> {
    let mut store = state.store.write();
    store.set_role(req.role);
    Json(SetRoleResponse {
        role: store.role,
        current_user_id: store.current_user_id.clone(),
    })
}

/// Replace a contract by id and make it the active one.
pub async fn put_contract(
    State(state): State<Arc<AppState>>,
    Json(contract): Json<Contract>,
) -> Result<Json<Contract>, ApiError> {
    if contract.id.is_empty() {
        return Err(ApiError::validation("contract id is required"));
    }
    if contract.end_date < contract.start_date {
        return Err(ApiError::validation(
            "end_date must not precede start_date",
        ));
    }
    state.store.write().update_contract(contract.clone());
    Ok(Json(contract))
}

/// Onboarding progress, preferring the backend's copy when reachable.
pub async fn get_onboarding(State(state): State<Arc<AppState>>) -> Json<OnboardingState> {
    Json(sync::get_onboarding(&state).await)
}

/// Save onboarding preferences; completes locally even when the remote
/// save fails.
pub async fn put_onboarding(
    State(state): State<Arc<AppState>>,
    Json(preferences): Json<NursePreferences>,
) -> Json<OnboardingState> {
    Json(sync::set_onboarding(&state, preferences).await)
}

/// Trigger one remote reconciliation cycle and report what changed.
pub async fn trigger_sync(State(state): State<Arc<AppState>>) -> Json<SyncReport> {
    Json(sync::sync_from_remote(&state).await)
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

    fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn put_json(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("PUT")
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

    #[tokio::test]
    async fn role_switch_changes_the_current_user() {
        let state = seeded_state();
        let app = create_router(state.clone());
        let response = app
            .oneshot(post_json(
                "/api/profile/role",
                serde_json::json!({ "role": "owner" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["role"], "owner");
        assert_eq!(json["current_user_id"], "u-owner-1");
    }

    #[tokio::test]
    async fn put_contract_activates_it() {
        let state = seeded_state();
        let mut contract = seed::demo_contract("c-via-api", "n-1");
        contract.hospital = "Stanford".to_string();

        let app = create_router(state.clone());
        let response = app
            .oneshot(put_json(
                "/api/contracts",
                serde_json::to_value(&contract).unwrap(),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            state.store.read().active_contract_id.as_deref(),
            Some("c-via-api")
        );
    }

    #[tokio::test]
    async fn onboarding_round_trips_through_the_api() {
        let state = seeded_state();
        let app = create_router(state.clone());

        let preferences = NursePreferences {
            max_commute_minutes: 20.0,
            wants_private_entrance: true,
            ..NursePreferences::default()
        };
        let response = app
            .clone()
            .oneshot(put_json(
                "/api/onboarding",
                serde_json::to_value(&preferences).unwrap(),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/onboarding")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let json = body_json(response).await;
        assert_eq!(json["completed"], true);
        assert_eq!(json["preferences"]["max_commute_minutes"], 20.0);
    }

    #[tokio::test]
    async fn manual_sync_reports_merge_stats() {
        let app = create_router(seeded_state());
        let response = app
            .oneshot(post_json("/api/sync", serde_json::json!({})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["errors"], 0);
    }
}
