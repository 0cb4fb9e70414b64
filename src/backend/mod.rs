//! Remote data service capability.
//!
//! The hosted backend (database, auth, row-level security) sits behind this
//! trait. Which implementation backs the store is decided exactly once at
//! startup by [`select_backend`] and injected at construction time; nothing
//! swaps actions out afterwards.

mod local;
mod supabase;

pub use local::LocalBackend;
pub use supabase::SupabaseBackend;

use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

use crate::config::RemoteConfig;
use crate::store::models::{
    Contract, Listing, MatchRecord, Message, NursePreferences,
};

#[async_trait]
pub trait Backend: Send + Sync {
    /// Human-readable implementation name for logs.
    fn name(&self) -> &'static str;

    /// Whether calls leave the process. The local backend answers false.
    fn is_remote(&self) -> bool;

    async fn fetch_feed(&self) -> Result<Vec<Listing>>;
    async fn fetch_contracts(&self) -> Result<Vec<Contract>>;
    async fn fetch_matches(&self) -> Result<Vec<MatchRecord>>;

    /// Register a like; the backend may answer with a match when the like
    /// turned out to be mutual.
    async fn like(&self, nurse_id: &str, listing_id: &str) -> Result<Option<MatchRecord>>;
    async fn pass(&self, nurse_id: &str, listing_id: &str) -> Result<()>;
    async fn create_listing(&self, listing: &Listing) -> Result<()>;

    /// Create a hold for a match and return its id.
    async fn create_hold(&self, match_id: &str, amount_cents: i64) -> Result<String>;
    /// Expire overdue holds; returns how many were released.
    async fn expire_holds(&self) -> Result<u64>;

    async fn get_onboarding(&self, nurse_id: &str) -> Result<Option<NursePreferences>>;
    async fn set_onboarding(&self, nurse_id: &str, prefs: &NursePreferences) -> Result<()>;

    async fn send_message(&self, conversation_id: &str, message: &Message) -> Result<()>;
    async fn fetch_messages(&self, conversation_id: &str) -> Result<Vec<Message>>;
}

/// Pick the backend for this process: remote when both the URL and the anon
/// key are configured, local-only otherwise.
pub fn select_backend(config: &RemoteConfig) -> Arc<dyn Backend> {
    match (&config.supabase_url, &config.supabase_anon_key) {
        (Some(url), Some(key)) if !url.is_empty() && !key.is_empty() => {
            tracing::info!(url = %url, "Using remote backend");
            Arc::new(SupabaseBackend::new(url.clone(), key.clone()))
        }
        _ => {
            tracing::info!("No remote backend configured, running local-only");
            Arc::new(LocalBackend::new())
        }
    }
}
