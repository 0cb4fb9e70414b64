//! Local-only backend for offline and demo use.
//!
//! Answers fetches with nothing (the seeded store already holds the demo
//! catalog), mints hold ids locally, and keeps onboarding answers in
//! memory so the onboarding flow round-trips without a network.

use anyhow::Result;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use uuid::Uuid;

use super::Backend;
use crate::store::models::{Contract, Listing, MatchRecord, Message, NursePreferences};

#[derive(Default)]
pub struct LocalBackend {
    onboarding: Mutex<HashMap<String, NursePreferences>>,
}

impl LocalBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Backend for LocalBackend {
    fn name(&self) -> &'static str {
        "local"
    }

    fn is_remote(&self) -> bool {
        false
    }

    async fn fetch_feed(&self) -> Result<Vec<Listing>> {
        Ok(vec![])
    }

    async fn fetch_contracts(&self) -> Result<Vec<Contract>> {
        Ok(vec![])
    }

    async fn fetch_matches(&self) -> Result<Vec<MatchRecord>> {
        Ok(vec![])
    }

    async fn like(&self, _nurse_id: &str, _listing_id: &str) -> Result<Option<MatchRecord>> {
        Ok(None)
    }

    async fn pass(&self, _nurse_id: &str, _listing_id: &str) -> Result<()> {
        Ok(())
    }

    async fn create_listing(&self, _listing: &Listing) -> Result<()> {
        Ok(())
    }

    async fn create_hold(&self, _match_id: &str, _amount_cents: i64) -> Result<String> {
        Ok(Uuid::new_v4().to_string())
    }

    async fn expire_holds(&self) -> Result<u64> {
        Ok(0)
    }

    async fn get_onboarding(&self, nurse_id: &str) -> Result<Option<NursePreferences>> {
        Ok(self.onboarding.lock().get(nurse_id).cloned())
    }

    async fn set_onboarding(&self, nurse_id: &str, prefs: &NursePreferences) -> Result<()> {
        self.onboarding
            .lock()
            .insert(nurse_id.to_string(), prefs.clone());
        Ok(())
    }

    async fn send_message(&self, _conversation_id: &str, _message: &Message) -> Result<()> {
        Ok(())
    }

    async fn fetch_messages(&self, _conversation_id: &str) -> Result<Vec<Message>> {
        Ok(vec![])
    }
}
