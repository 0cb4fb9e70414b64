//! Public runtime environment for browser clients.

use axum::{extract::State, http::header, response::IntoResponse, Json};
use serde::Serialize;
use std::sync::Arc;

use crate::AppState;

/// Keys the browser client reads at boot. Only the anon (publishable)
/// key ever goes over this endpoint.
#[derive(Debug, Serialize)]
pub struct PublicEnv {
    #[serde(rename = "VITE_SUPABASE_URL")]
    pub supabase_url: String,
    #[serde(rename = "VITE_SUPABASE_ANON_KEY")]
    pub supabase_anon_key: String,
}

pub async fn public_env(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let remote = &state.config.remote;
    let body = PublicEnv {
        supabase_url: remote.supabase_url.clone().unwrap_or_default(),
        supabase_anon_key: remote.supabase_anon_key.clone().unwrap_or_default(),
    };
    ([(header::CACHE_CONTROL, "no-store")], Json(body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::create_router;
    use crate::store::Store;
    use crate::test_support::test_state;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    #[tokio::test]
    async fn env_is_served_uncached_with_empty_defaults() {
        let app = create_router(Arc::new(test_state(Store::new())));
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/public-env")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CACHE_CONTROL).unwrap(),
            "no-store"
        );

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["VITE_SUPABASE_URL"], "");
        assert_eq!(json["VITE_SUPABASE_ANON_KEY"], "");
    }
}
