//! Partial store snapshot persisted across sessions.
//!
//! Only session-owned state is written out: identity/role, the active
//! contract id, the shortlist, matches, holds, conversations, and
//! onboarding answers. Listings, contracts, and users are re-fetchable
//! from the backend and never persisted.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::models::{Conversation, Hold, MatchRecord, OnboardingState, Role, ShortlistEntry};

/// File name of the snapshot inside the data directory.
pub const SNAPSHOT_FILE: &str = "snapshot.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub current_user_id: Option<String>,
    pub role: Role,
    pub active_contract_id: Option<String>,
    pub shortlist: Vec<ShortlistEntry>,
    pub matches: Vec<MatchRecord>,
    pub holds: Vec<Hold>,
    pub conversations: Vec<Conversation>,
    pub onboarding: OnboardingState,
}

/// Load the snapshot from the data directory, if one exists.
pub fn load(data_dir: &Path) -> Result<Option<Snapshot>> {
    let path = data_dir.join(SNAPSHOT_FILE);
    if !path.exists() {
        return Ok(None);
    }

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read snapshot file: {}", path.display()))?;
    let snapshot: Snapshot =
        serde_json::from_str(&content).context("Failed to parse snapshot file")?;
    info!("Restored session snapshot from {}", path.display());
    Ok(Some(snapshot))
}

/// Write the snapshot atomically (temp file + rename) so a crash mid-write
/// never truncates the previous snapshot.
pub fn save(data_dir: &Path, snapshot: &Snapshot) -> Result<()> {
    let path = data_dir.join(SNAPSHOT_FILE);
    let tmp = data_dir.join(format!("{SNAPSHOT_FILE}.tmp"));

    let json = serde_json::to_string_pretty(snapshot).context("Failed to serialize snapshot")?;
    std::fs::write(&tmp, json)
        .with_context(|| format!("Failed to write snapshot file: {}", tmp.display()))?;
    std::fs::rename(&tmp, &path)
        .with_context(|| format!("Failed to replace snapshot file: {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{seed, Store};

    #[test]
    fn snapshot_survives_a_disk_round_trip() {
        let dir = std::env::temp_dir().join(format!("shiftstay-snap-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();

        assert!(load(&dir).unwrap().is_none());

        let mut store = Store::new();
        seed::seed_demo_data(&mut store);
        let listing_id = store.swipe_queue[0].clone();
        store.like_listing(&listing_id).unwrap();
        store.add_to_shortlist(&listing_id, Some("top pick".into()));

        save(&dir, &store.snapshot()).unwrap();
        let restored = load(&dir).unwrap().expect("snapshot present");

        let mut fresh = Store::new();
        fresh.apply_snapshot(restored);
        assert_eq!(fresh.matches, store.matches);
        assert_eq!(fresh.holds, store.holds);
        assert_eq!(fresh.shortlist, store.shortlist);
        assert!(fresh.listings.is_empty());

        std::fs::remove_dir_all(&dir).ok();
    }
}
