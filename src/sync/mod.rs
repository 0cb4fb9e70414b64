//! Remote synchronization actions and background tasks.
//!
//! Everything here follows the same rule: the remote backend is consulted
//! first and its failures degrade the action to local-only with a log
//! line, never an error to the caller. Fetches are independent; a failing
//! slice is left untouched while the others still merge (partial success
//! is accepted). Nothing is retried.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::store::models::{Listing, Message, NursePreferences, OnboardingState};
use crate::store::{snapshot, LikeError, LikeOutcome, MergeStats};
use crate::AppState;

/// Outcome of one remote sync cycle.
#[derive(Debug, Default, Clone, Copy, Serialize)]
pub struct SyncReport {
    pub listings: MergeStats,
    pub contracts: MergeStats,
    pub matches: MergeStats,
    /// Number of fetches that failed and left their slice untouched.
    pub errors: usize,
}

/// Fetch listings, contracts, and matches and merge each slice by id.
pub async fn sync_from_remote(state: &AppState) -> SyncReport {
    let (listings, contracts, matches) = tokio::join!(
        state.backend.fetch_feed(),
        state.backend.fetch_contracts(),
        state.backend.fetch_matches(),
    );

    let mut report = SyncReport::default();
    let mut store = state.store.write();

    match listings {
        Ok(remote) => report.listings = store.merge_listings(remote),
        Err(e) => {
            warn!(error = %e, "Listing fetch failed, keeping local slice");
            report.errors += 1;
        }
    }
    match contracts {
        Ok(remote) => report.contracts = store.merge_contracts(remote),
        Err(e) => {
            warn!(error = %e, "Contract fetch failed, keeping local slice");
            report.errors += 1;
        }
    }
    match matches {
        Ok(remote) => report.matches = store.merge_matches(remote),
        Err(e) => {
            warn!(error = %e, "Match fetch failed, keeping local slice");
            report.errors += 1;
        }
    }

    report
}

fn active_nurse_id(state: &AppState) -> Option<String> {
    let store = state.store.read();
    store
        .active_contract()
        .map(|c| c.nurse_id.clone())
        .or_else(|| store.nurse_profiles.first().map(|p| p.id.clone()))
}

/// Register a like: forward to the backend, then apply the local action.
///
/// A remote failure degrades to local-only; a mutual-like match answered
/// by the backend is merged in alongside the locally created one.
pub async fn like_listing(state: &AppState, listing_id: &str) -> Result<LikeOutcome, LikeError> {
    if let Some(nurse_id) = active_nurse_id(state) {
        match state.backend.like(&nurse_id, listing_id).await {
            Ok(Some(mutual)) => {
                state.store.write().merge_matches(vec![mutual]);
            }
            Ok(None) => {}
            Err(e) => warn!(error = %e, listing_id, "Remote like failed, applying locally only"),
        }
    }

    state.store.write().like_listing(listing_id)
}

/// Register a pass. The remote call is best-effort; the queue update is
/// unconditional.
pub async fn pass_listing(state: &AppState, listing_id: &str) {
    if let Some(nurse_id) = active_nurse_id(state) {
        if let Err(e) = state.backend.pass(&nurse_id, listing_id).await {
            debug!(error = %e, listing_id, "Remote pass failed");
        }
    }
    state.store.write().pass_listing(listing_id);
}

/// Create a listing locally (deriving its total score) and forward it.
pub async fn create_listing(state: &AppState, listing: Listing) -> Listing {
    let created = state.store.write().create_listing(listing);
    if let Err(e) = state.backend.create_listing(&created).await {
        warn!(error = %e, listing_id = %created.id, "Remote listing create failed");
    }
    created
}

/// Append a message locally and forward it; `None` when the conversation
/// does not exist.
pub async fn send_message(
    state: &AppState,
    conversation_id: &str,
    sender_id: &str,
    body: &str,
) -> Option<Message> {
    let message = state
        .store
        .write()
        .append_message(conversation_id, sender_id, body)?;
    if let Err(e) = state.backend.send_message(conversation_id, &message).await {
        debug!(error = %e, conversation_id, "Remote message send failed");
    }
    Some(message)
}

/// Messages of a conversation, freshened from the backend when one is
/// reachable; `None` when the conversation does not exist locally.
pub async fn conversation_messages(state: &AppState, conversation_id: &str) -> Option<Vec<Message>> {
    if state.backend.is_remote() {
        match state.backend.fetch_messages(conversation_id).await {
            Ok(remote) => {
                let mut store = state.store.write();
                let conversation = store
                    .conversations
                    .iter_mut()
                    .find(|c| c.id == conversation_id)?;
                for incoming in remote {
                    if !conversation.messages.iter().any(|m| m.id == incoming.id) {
                        conversation.messages.push(incoming);
                    }
                }
                conversation.messages.sort_by_key(|m| m.sent_at);
                return Some(conversation.messages.clone());
            }
            Err(e) => debug!(error = %e, conversation_id, "Remote message fetch failed"),
        }
    }

    let store = state.store.read();
    store
        .conversations
        .iter()
        .find(|c| c.id == conversation_id)
        .map(|c| c.messages.clone())
}

/// Release overdue holds locally and remotely. Remote failures are
/// swallowed; this endpoint has always been best-effort.
pub async fn expire_holds(state: &AppState) -> u64 {
    let local = state.store.write().expire_due_holds(Utc::now()) as u64;
    let remote = match state.backend.expire_holds().await {
        Ok(n) => n,
        Err(e) => {
            debug!(error = %e, "Remote hold expiry failed");
            0
        }
    };
    local + remote
}

/// Load onboarding preferences, preferring the backend's copy.
pub async fn get_onboarding(state: &AppState) -> OnboardingState {
    if let Some(nurse_id) = active_nurse_id(state) {
        match state.backend.get_onboarding(&nurse_id).await {
            Ok(Some(preferences)) => {
                return OnboardingState {
                    completed: true,
                    preferences,
                }
            }
            Ok(None) => {}
            Err(e) => warn!(error = %e, "Onboarding fetch failed, using local copy"),
        }
    }
    state.store.read().onboarding.clone()
}

/// Store onboarding preferences and push them to the backend. The flow
/// completes locally even when the remote save fails.
pub async fn set_onboarding(state: &AppState, preferences: NursePreferences) -> OnboardingState {
    let onboarding = OnboardingState {
        completed: true,
        preferences: preferences.clone(),
    };
    state.store.write().onboarding = onboarding.clone();

    if let Some(nurse_id) = active_nurse_id(state) {
        if let Err(e) = state.backend.set_onboarding(&nurse_id, &preferences).await {
            warn!(error = %e, "Onboarding save failed, continuing with local copy");
        }
    }
    onboarding
}

/// Write the session snapshot for the current store state.
pub fn save_snapshot(state: &AppState) -> anyhow::Result<()> {
    let snap = state.store.read().snapshot();
    snapshot::save(&state.config.server.data_dir, &snap)
}

/// Spawn the periodic hold-expiry sweep.
pub fn spawn_hold_expiry_task(state: Arc<AppState>) {
    let every = state.config.sync.hold_expiry_interval;
    info!(interval_secs = every, "Starting hold expiry task");

    tokio::spawn(async move {
        let mut tick = interval(Duration::from_secs(every));
        tick.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            tick.tick().await;
            let expired = expire_holds(&state).await;
            if expired > 0 {
                info!(expired, "Released overdue holds");
            }
        }
    });
}

/// Spawn the periodic session snapshot writer.
pub fn spawn_snapshot_task(state: Arc<AppState>) {
    let every = state.config.sync.snapshot_interval;
    info!(interval_secs = every, "Starting snapshot task");

    tokio::spawn(async move {
        let mut tick = interval(Duration::from_secs(every));
        tick.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            tick.tick().await;
            if let Err(e) = save_snapshot(&state) {
                warn!(error = %e, "Snapshot write failed");
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::Backend;
    use crate::store::models::{Contract, MatchRecord};
    use crate::store::{seed, Store};
    use crate::test_support::test_state;
    use anyhow::Result;
    use async_trait::async_trait;

    /// Backend whose every call fails, for exercising degraded paths.
    struct DownBackend;

    #[async_trait]
    impl Backend for DownBackend {
        fn name(&self) -> &'static str {
            "down"
        }
        fn is_remote(&self) -> bool {
            true
        }
        async fn fetch_feed(&self) -> Result<Vec<Listing>> {
            anyhow::bail!("backend down")
        }
        async fn fetch_contracts(&self) -> Result<Vec<Contract>> {
            anyhow::bail!("backend down")
        }
        async fn fetch_matches(&self) -> Result<Vec<MatchRecord>> {
            anyhow::bail!("backend down")
        }
        async fn like(&self, _: &str, _: &str) -> Result<Option<MatchRecord>> {
            anyhow::bail!("backend down")
        }
        async fn pass(&self, _: &str, _: &str) -> Result<()> {
            anyhow::bail!("backend down")
        }
        async fn create_listing(&self, _: &Listing) -> Result<()> {
            anyhow::bail!("backend down")
        }
        async fn create_hold(&self, _: &str, _: i64) -> Result<String> {
            anyhow::bail!("backend down")
        }
        async fn expire_holds(&self) -> Result<u64> {
            anyhow::bail!("backend down")
        }
        async fn get_onboarding(&self, _: &str) -> Result<Option<NursePreferences>> {
            anyhow::bail!("backend down")
        }
        async fn set_onboarding(&self, _: &str, _: &NursePreferences) -> Result<()> {
            anyhow::bail!("backend down")
        }
        async fn send_message(&self, _: &str, _: &Message) -> Result<()> {
            anyhow::bail!("backend down")
        }
        async fn fetch_messages(&self, _: &str) -> Result<Vec<Message>> {
            anyhow::bail!("backend down")
        }
    }

    fn seeded() -> Store {
        let mut store = Store::new();
        seed::seed_demo_data(&mut store);
        store
    }

    #[tokio::test]
    async fn sync_against_local_backend_is_a_clean_no_op() {
        let state = test_state(seeded());
        let report = sync_from_remote(&state).await;
        assert_eq!(report.errors, 0);
        assert_eq!(report.listings.added, 0);
        assert_eq!(report.listings.updated, 0);
    }

    #[tokio::test]
    async fn failed_fetches_leave_every_slice_untouched() {
        let state = test_state(seeded()).with_backend(Arc::new(DownBackend));
        let listings_before = state.store.read().listings.clone();

        let report = sync_from_remote(&state).await;
        assert_eq!(report.errors, 3);
        assert_eq!(state.store.read().listings, listings_before);
    }

    #[tokio::test]
    async fn likes_degrade_to_local_when_the_backend_is_down() {
        let state = test_state(seeded()).with_backend(Arc::new(DownBackend));
        let listing_id = state.store.read().swipe_queue[0].clone();

        let outcome = like_listing(&state, &listing_id).await.expect("local apply");
        assert_eq!(outcome.hold.intent_fee_cents, crate::store::HOLD_INTENT_FEE_CENTS);
        assert!(!state.store.read().swipe_queue.contains(&listing_id));
    }

    #[tokio::test]
    async fn message_listing_falls_back_to_the_local_thread() {
        let state = test_state(seeded()).with_backend(Arc::new(DownBackend));
        let listing_id = state.store.read().swipe_queue[0].clone();
        let outcome = state.store.write().like_listing(&listing_id).unwrap();

        let messages = conversation_messages(&state, &outcome.conversation_id)
            .await
            .expect("local conversation");
        assert_eq!(messages.len(), 1);
        assert!(conversation_messages(&state, "ghost").await.is_none());
    }

    #[tokio::test]
    async fn expire_holds_swallows_remote_failures() {
        let state = test_state(seeded()).with_backend(Arc::new(DownBackend));
        assert_eq!(expire_holds(&state).await, 0);
    }

    #[tokio::test]
    async fn onboarding_completes_locally_despite_a_failed_save() {
        let state = test_state(seeded()).with_backend(Arc::new(DownBackend));
        let preferences = NursePreferences {
            max_commute_minutes: 30.0,
            ..NursePreferences::default()
        };

        let onboarding = set_onboarding(&state, preferences.clone()).await;
        assert!(onboarding.completed);
        assert_eq!(state.store.read().onboarding.preferences, preferences);

        // The fetch falls back to the local copy as well.
        let loaded = get_onboarding(&state).await;
        assert_eq!(loaded.preferences, preferences);
    }
}
