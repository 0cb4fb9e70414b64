//! Hold endpoints: payment-intent creation and expiry.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::sync;
use crate::AppState;

use super::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct CreateIntentRequest {
    #[serde(default)]
    pub match_id: Option<String>,
    /// Intent amount in cents; the configured default applies when absent.
    #[serde(default)]
    pub amount_cents: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateIntentResponse {
    pub hold_id: String,
    /// Present only when a payments provider is configured and the intent
    /// was created.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,
}

/// Create a hold for a match, optionally backed by a manual-capture
/// payment intent.
///
/// The payment step is skipped without complaint when no payments key is
/// configured; the hold itself is still created.
pub async fn create_intent(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateIntentRequest>,
) -> Result<Json<CreateIntentResponse>, ApiError> {
    let match_id = match req.match_id.as_deref() {
        Some(id) if !id.is_empty() => id.to_string(),
        _ => return Err(ApiError::validation("match_id is required")),
    };

    let amount_cents = req
        .amount_cents
        .unwrap_or(state.config.payments.default_intent_amount_cents);
    if amount_cents <= 0 {
        return Err(ApiError::validation("amount_cents must be positive"));
    }

    let hold_id = state
        .backend
        .create_hold(&match_id, amount_cents)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, match_id = %match_id, "Hold creation failed");
            ApiError::upstream("Failed to create hold")
        })?;

    state
        .store
        .write()
        .create_hold_for_match(&hold_id, &match_id, amount_cents)?;

    let mut client_secret = None;
    if let Some(payments) = &state.payments {
        let intent = payments
            .create_hold_intent(&hold_id, amount_cents)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, hold_id = %hold_id, "Payment intent creation failed");
                ApiError::upstream("Failed to create payment intent")
            })?;
        state
            .store
            .write()
            .set_hold_client_secret(&hold_id, &intent.client_secret);
        client_secret = Some(intent.client_secret);
    }

    Ok(Json(CreateIntentResponse {
        hold_id,
        client_secret,
    }))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ExpireResponse {
    pub expired: u64,
}

/// Release overdue holds, locally and on the backend. Best-effort.
pub async fn expire(State(state): State<Arc<AppState>>) -> Json<ExpireResponse> {
    let expired = sync::expire_holds(&state).await;
    Json(ExpireResponse { expired })
}
