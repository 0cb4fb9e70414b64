//! In-memory working set of marketplace entities.
//!
//! The store holds everything the client surface works against: users,
//! listings, contracts, matches, holds, conversations, the shortlist, and
//! the derived swipe queue. All mutations are synchronous and last-write
//! wins; the remote backend stays the long-lived source of truth and is
//! reconciled in via per-id merges rather than wholesale replacement, so
//! entities created locally while offline survive a later sync.

pub mod models;
pub mod seed;
pub mod snapshot;

use chrono::{DateTime, Duration, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::scoring;
use models::{
    Contract, Conversation, Hold, HoldStatus, Listing, ListingPatch, MatchRecord, MatchStatus,
    Message, NursePreferences, NurseProfile, OnboardingState, Role, ShortlistEntry, User,
};
use snapshot::Snapshot;

/// How long a like-path hold stays active before it is released.
pub const HOLD_TTL_HOURS: i64 = 24;
/// Intent fee attached to a like-path hold, in cents.
pub const HOLD_INTENT_FEE_CENTS: i64 = 10_000;

/// Sender id used for seeded system messages.
pub const SYSTEM_SENDER_ID: &str = "system";

/// Why a like could not be applied. The store is left untouched in every
/// error case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LikeError {
    #[error("no active contract selected")]
    NoActiveContract,
    #[error("listing not found")]
    ListingNotFound,
    #[error("nurse profile not found")]
    NurseProfileNotFound,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("listing {0} not found")]
    ListingNotFound(String),
    #[error("match {0} not found")]
    MatchNotFound(String),
}

/// Everything a successful like produced.
#[derive(Debug, Clone, serde::Serialize)]
pub struct LikeOutcome {
    pub match_record: MatchRecord,
    pub hold: Hold,
    pub conversation_id: String,
}

/// What a remote merge changed, per slice.
#[derive(Debug, Default, Clone, Copy, serde::Serialize)]
pub struct MergeStats {
    pub updated: usize,
    pub added: usize,
}

#[derive(Debug)]
pub struct Store {
    pub users: Vec<User>,
    pub current_user_id: Option<String>,
    pub role: Role,
    pub nurse_profiles: Vec<NurseProfile>,
    pub listings: Vec<Listing>,
    pub contracts: Vec<Contract>,
    pub active_contract_id: Option<String>,
    pub matches: Vec<MatchRecord>,
    pub holds: Vec<Hold>,
    pub conversations: Vec<Conversation>,
    pub shortlist: Vec<ShortlistEntry>,
    /// Listing ids still awaiting a swipe decision, in feed order.
    pub swipe_queue: Vec<String>,
    pub onboarding: OnboardingState,
}

impl Default for Store {
    fn default() -> Self {
        Self {
            users: Vec::new(),
            current_user_id: None,
            role: Role::Nurse,
            nurse_profiles: Vec::new(),
            listings: Vec::new(),
            contracts: Vec::new(),
            active_contract_id: None,
            matches: Vec::new(),
            holds: Vec::new(),
            conversations: Vec::new(),
            shortlist: Vec::new(),
            swipe_queue: Vec::new(),
            onboarding: OnboardingState::default(),
        }
    }
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    // ---------------------------------------------------------------------
    // Lookups
    // ---------------------------------------------------------------------

    pub fn listing(&self, id: &str) -> Option<&Listing> {
        self.listings.iter().find(|l| l.id == id)
    }

    pub fn active_contract(&self) -> Option<&Contract> {
        let id = self.active_contract_id.as_deref()?;
        self.contracts.iter().find(|c| c.id == id)
    }

    pub fn profile_for_nurse(&self, nurse_id: &str) -> Option<&NurseProfile> {
        self.nurse_profiles.iter().find(|p| p.id == nurse_id)
    }

    /// Preferences used for feed scoring: the active nurse's profile when
    /// resolvable, otherwise whatever onboarding has collected so far.
    pub fn scoring_preferences(&self) -> NursePreferences {
        self.active_contract()
            .and_then(|c| self.profile_for_nurse(&c.nurse_id))
            .map(|p| p.preferences.clone())
            .unwrap_or_else(|| self.onboarding.preferences.clone())
    }

    /// Listings still in the swipe queue, in queue order.
    pub fn feed_listings(&self) -> Vec<&Listing> {
        self.swipe_queue
            .iter()
            .filter_map(|id| self.listing(id))
            .collect()
    }

    // ---------------------------------------------------------------------
    // Swipe actions
    // ---------------------------------------------------------------------

    /// Register a like on a listing.
    ///
    /// Creates a pending match, an active 24-hour hold with the fixed
    /// intent fee, and a conversation seeded with one system message
    /// carrying the rounded match score, then drops the listing from the
    /// swipe queue. Liking the same listing twice creates a second
    /// match/hold pair; likes are not deduplicated here.
    pub fn like_listing(&mut self, listing_id: &str) -> Result<LikeOutcome, LikeError> {
        let contract = self.active_contract().ok_or(LikeError::NoActiveContract)?;
        let listing = self
            .listing(listing_id)
            .ok_or(LikeError::ListingNotFound)?;
        let profile = self
            .profile_for_nurse(&contract.nurse_id)
            .ok_or(LikeError::NurseProfileNotFound)?;

        let breakdown = scoring::score_listing(contract, listing, &profile.preferences);
        let now = Utc::now();

        let hold = Hold {
            id: Uuid::new_v4().to_string(),
            listing_id: listing.id.clone(),
            nurse_id: contract.nurse_id.clone(),
            contract_id: contract.id.clone(),
            match_id: None,
            status: HoldStatus::Active,
            expires_at: now + Duration::hours(HOLD_TTL_HOURS),
            intent_fee_cents: HOLD_INTENT_FEE_CENTS,
            client_secret: None,
            created_at: now,
        };

        let match_record = MatchRecord {
            id: Uuid::new_v4().to_string(),
            listing_id: listing.id.clone(),
            nurse_id: contract.nurse_id.clone(),
            contract_id: contract.id.clone(),
            status: MatchStatus::Pending,
            score: breakdown.total,
            hold_id: Some(hold.id.clone()),
            created_at: now,
        };

        let conversation = Conversation {
            id: Uuid::new_v4().to_string(),
            match_id: match_record.id.clone(),
            participant_ids: vec![profile.user_id.clone(), listing.owner_id.clone()],
            messages: vec![Message {
                id: Uuid::new_v4().to_string(),
                sender_id: SYSTEM_SENDER_ID.to_string(),
                body: format!(
                    "You matched with this place at a {} score. Say hello and confirm your dates.",
                    breakdown.total.round() as i64
                ),
                sent_at: now,
            }],
            created_at: now,
        };

        let mut hold = hold;
        hold.match_id = Some(match_record.id.clone());

        let outcome = LikeOutcome {
            match_record: match_record.clone(),
            hold: hold.clone(),
            conversation_id: conversation.id.clone(),
        };

        self.matches.push(match_record);
        self.holds.push(hold);
        self.conversations.push(conversation);
        self.swipe_queue.retain(|id| id != listing_id);

        Ok(outcome)
    }

    /// Drop a listing from the swipe queue. No other side effects.
    pub fn pass_listing(&mut self, listing_id: &str) {
        self.swipe_queue.retain(|id| id != listing_id);
    }

    /// Reset the queue to all current listing ids.
    ///
    /// This intentionally forgets prior like/pass decisions; it is a
    /// "start over" reset, so previously passed listings come back.
    pub fn refresh_swipe_queue(&mut self) {
        self.swipe_queue = self.listings.iter().map(|l| l.id.clone()).collect();
    }

    // ---------------------------------------------------------------------
    // Shortlist
    // ---------------------------------------------------------------------

    /// Upsert a shortlist entry. At most one entry exists per listing; a
    /// second call replaces the notes of the first.
    pub fn add_to_shortlist(&mut self, listing_id: &str, notes: Option<String>) -> ShortlistEntry {
        let now = Utc::now();
        if let Some(entry) = self
            .shortlist
            .iter_mut()
            .find(|e| e.listing_id == listing_id)
        {
            entry.notes = notes;
            entry.added_at = now;
            return entry.clone();
        }

        let entry = ShortlistEntry {
            id: Uuid::new_v4().to_string(),
            listing_id: listing_id.to_string(),
            notes,
            added_at: now,
        };
        self.shortlist.push(entry.clone());
        entry
    }

    /// Remove a shortlist entry by its id; no-op when absent.
    pub fn remove_from_shortlist(&mut self, entry_id: &str) {
        self.shortlist.retain(|e| e.id != entry_id);
    }

    // ---------------------------------------------------------------------
    // Contracts and listings
    // ---------------------------------------------------------------------

    /// Full replace-by-id (append when new); the contract becomes active.
    pub fn update_contract(&mut self, contract: Contract) {
        self.active_contract_id = Some(contract.id.clone());
        if let Some(existing) = self.contracts.iter_mut().find(|c| c.id == contract.id) {
            *existing = contract;
        } else {
            self.contracts.push(contract);
        }
    }

    /// Append a listing and enqueue it for swiping. The stored total score
    /// is recomputed from the three base scores regardless of input.
    pub fn create_listing(&mut self, mut listing: Listing) -> Listing {
        listing.total_score = scoring::derived_total_score(
            listing.stipend_fit_score,
            listing.safety_score,
            listing.quality_score,
        );
        self.swipe_queue.push(listing.id.clone());
        self.listings.push(listing.clone());
        listing
    }

    /// Merge-patch a listing; recomputes the derived total.
    pub fn update_listing(
        &mut self,
        listing_id: &str,
        patch: ListingPatch,
    ) -> Result<Listing, StoreError> {
        let listing = self
            .listings
            .iter_mut()
            .find(|l| l.id == listing_id)
            .ok_or_else(|| StoreError::ListingNotFound(listing_id.to_string()))?;

        macro_rules! apply {
            ($($field:ident),* $(,)?) => {
                $(if let Some(value) = patch.$field {
                    listing.$field = value;
                })*
            };
        }
        apply!(
            title,
            description,
            price_weekly,
            commute_minutes_peak,
            commute_minutes_night,
            stipend_fit_score,
            safety_score,
            quality_score,
            bedrooms,
            bathrooms,
            pet_policy,
            parking,
            photos,
            amenities,
            safety_features,
            status,
            available_from,
            available_to,
            min_stay_weeks,
            max_stay_weeks,
        );

        listing.total_score = scoring::derived_total_score(
            listing.stipend_fit_score,
            listing.safety_score,
            listing.quality_score,
        );
        listing.updated_at = Utc::now();
        Ok(listing.clone())
    }

    // ---------------------------------------------------------------------
    // Conversations
    // ---------------------------------------------------------------------

    /// Append a timestamped message; no-op when the conversation is absent.
    pub fn append_message(
        &mut self,
        conversation_id: &str,
        sender_id: &str,
        body: &str,
    ) -> Option<Message> {
        let conversation = self
            .conversations
            .iter_mut()
            .find(|c| c.id == conversation_id)?;
        let message = Message {
            id: Uuid::new_v4().to_string(),
            sender_id: sender_id.to_string(),
            body: body.to_string(),
            sent_at: Utc::now(),
        };
        conversation.messages.push(message.clone());
        Some(message)
    }

    // ---------------------------------------------------------------------
    // Holds
    // ---------------------------------------------------------------------

    /// Record a hold created for an existing match (the payment-intent
    /// path). The hold id comes from the backend that minted it.
    pub fn create_hold_for_match(
        &mut self,
        hold_id: &str,
        match_id: &str,
        amount_cents: i64,
    ) -> Result<Hold, StoreError> {
        let record = self
            .matches
            .iter()
            .find(|m| m.id == match_id)
            .cloned()
            .ok_or_else(|| StoreError::MatchNotFound(match_id.to_string()))?;

        let now = Utc::now();
        let hold = Hold {
            id: hold_id.to_string(),
            listing_id: record.listing_id,
            nurse_id: record.nurse_id,
            contract_id: record.contract_id,
            match_id: Some(match_id.to_string()),
            status: HoldStatus::Pending,
            expires_at: now + Duration::hours(HOLD_TTL_HOURS),
            intent_fee_cents: amount_cents,
            client_secret: None,
            created_at: now,
        };
        self.holds.push(hold.clone());

        if let Some(record) = self.matches.iter_mut().find(|m| m.id == match_id) {
            record.hold_id = Some(hold_id.to_string());
        }
        Ok(hold)
    }

    pub fn set_hold_client_secret(&mut self, hold_id: &str, secret: &str) {
        if let Some(hold) = self.holds.iter_mut().find(|h| h.id == hold_id) {
            hold.client_secret = Some(secret.to_string());
        }
    }

    /// Release every pending/active hold past its expiry and expire the
    /// match it was backing. Returns how many holds flipped.
    pub fn expire_due_holds(&mut self, now: DateTime<Utc>) -> usize {
        let mut expired_matches = Vec::new();
        let mut count = 0;

        for hold in &mut self.holds {
            let due = matches!(hold.status, HoldStatus::Pending | HoldStatus::Active)
                && hold.expires_at <= now;
            if due {
                hold.status = HoldStatus::Released;
                count += 1;
                if let Some(match_id) = &hold.match_id {
                    expired_matches.push(match_id.clone());
                }
            }
        }

        for record in &mut self.matches {
            if expired_matches.contains(&record.id) {
                record.status = MatchStatus::Expired;
            }
        }

        count
    }

    // ---------------------------------------------------------------------
    // Persona
    // ---------------------------------------------------------------------

    /// Demo persona switch: the current user becomes the first user with
    /// the requested role. Not authentication.
    pub fn set_role(&mut self, role: Role) {
        self.role = role;
        self.current_user_id = self
            .users
            .iter()
            .find(|u| u.role == role)
            .map(|u| u.id.clone());
    }

    // ---------------------------------------------------------------------
    // Remote reconciliation
    // ---------------------------------------------------------------------

    /// Merge remote listings by id: the remote copy wins per id, local-only
    /// provisional listings survive, and newly arrived listings join the
    /// swipe queue.
    pub fn merge_listings(&mut self, remote: Vec<Listing>) -> MergeStats {
        let mut stats = MergeStats::default();
        for incoming in remote {
            if let Some(existing) = self.listings.iter_mut().find(|l| l.id == incoming.id) {
                *existing = incoming;
                stats.updated += 1;
            } else {
                self.swipe_queue.push(incoming.id.clone());
                self.listings.push(incoming);
                stats.added += 1;
            }
        }
        stats
    }

    pub fn merge_contracts(&mut self, remote: Vec<Contract>) -> MergeStats {
        let mut stats = MergeStats::default();
        for incoming in remote {
            if let Some(existing) = self.contracts.iter_mut().find(|c| c.id == incoming.id) {
                *existing = incoming;
                stats.updated += 1;
            } else {
                self.contracts.push(incoming);
                stats.added += 1;
            }
        }
        stats
    }

    pub fn merge_matches(&mut self, remote: Vec<MatchRecord>) -> MergeStats {
        let mut stats = MergeStats::default();
        for incoming in remote {
            if let Some(existing) = self.matches.iter_mut().find(|m| m.id == incoming.id) {
                *existing = incoming;
                stats.updated += 1;
            } else {
                self.matches.push(incoming);
                stats.added += 1;
            }
        }
        stats
    }

    // ---------------------------------------------------------------------
    // Snapshot
    // ---------------------------------------------------------------------

    /// Capture the persisted subset of the store. Listings, contracts, and
    /// users are considered re-fetchable and stay out of the snapshot.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            current_user_id: self.current_user_id.clone(),
            role: self.role,
            active_contract_id: self.active_contract_id.clone(),
            shortlist: self.shortlist.clone(),
            matches: self.matches.clone(),
            holds: self.holds.clone(),
            conversations: self.conversations.clone(),
            onboarding: self.onboarding.clone(),
        }
    }

    /// Restore a snapshot verbatim over the persisted slices.
    pub fn apply_snapshot(&mut self, snapshot: Snapshot) {
        self.current_user_id = snapshot.current_user_id;
        self.role = snapshot.role;
        self.active_contract_id = snapshot.active_contract_id;
        self.shortlist = snapshot.shortlist;
        self.matches = snapshot.matches;
        self.holds = snapshot.holds;
        self.conversations = snapshot.conversations;
        self.onboarding = snapshot.onboarding;
    }
}
