//! Marketplace entity models and DTOs.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Acting role of the current user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Nurse,
    Owner,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub role: Role,
    pub email: Option<String>,
}

/// Pet policy of a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PetPolicy {
    Allowed,
    Cats,
    Dogs,
    None,
}

/// Parking situation of a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Parking {
    Street,
    Garage,
    Driveway,
    None,
}

/// Lifecycle status of a listing. Listings are never hard-deleted; owners
/// move them between these states instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListingStatus {
    Active,
    Draft,
    Snoozed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    pub id: String,
    pub owner_id: String,
    pub title: String,
    pub description: String,
    pub city: String,
    pub neighborhood: Option<String>,
    pub price_weekly: f64,
    pub commute_minutes_peak: f64,
    pub commute_minutes_night: f64,
    // Scores, all 0-100. `total_score` is derived from the other three and
    // recomputed on every create/patch; client-supplied values are ignored.
    pub stipend_fit_score: f64,
    pub safety_score: f64,
    pub quality_score: f64,
    pub total_score: f64,
    pub bedrooms: u32,
    pub bathrooms: f64,
    pub pet_policy: PetPolicy,
    pub parking: Parking,
    pub photos: Vec<String>,
    pub amenities: Vec<String>,
    pub safety_features: Vec<String>,
    pub status: ListingStatus,
    pub available_from: NaiveDate,
    pub available_to: NaiveDate,
    pub min_stay_weeks: u32,
    pub max_stay_weeks: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Listing {
    pub fn has_amenity(&self, tag: &str) -> bool {
        self.amenities.iter().any(|a| a == tag)
    }

    pub fn has_safety_feature(&self, tag: &str) -> bool {
        self.safety_features.iter().any(|f| f == tag)
    }

    pub fn allows_pets(&self) -> bool {
        self.pet_policy != PetPolicy::None
    }

    pub fn has_parking(&self) -> bool {
        self.parking != Parking::None
    }

    /// Whether an oversized vehicle (truck, RV) can park on the premises.
    pub fn fits_large_vehicle(&self) -> bool {
        matches!(self.parking, Parking::Driveway | Parking::Garage)
    }
}

/// Fields an owner may change on an existing listing. `None` leaves the
/// current value in place.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListingPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price_weekly: Option<f64>,
    pub commute_minutes_peak: Option<f64>,
    pub commute_minutes_night: Option<f64>,
    pub stipend_fit_score: Option<f64>,
    pub safety_score: Option<f64>,
    pub quality_score: Option<f64>,
    pub bedrooms: Option<u32>,
    pub bathrooms: Option<f64>,
    pub pet_policy: Option<PetPolicy>,
    pub parking: Option<Parking>,
    pub photos: Option<Vec<String>>,
    pub amenities: Option<Vec<String>>,
    pub safety_features: Option<Vec<String>>,
    pub status: Option<ListingStatus>,
    pub available_from: Option<NaiveDate>,
    pub available_to: Option<NaiveDate>,
    pub min_stay_weeks: Option<u32>,
    pub max_stay_weeks: Option<u32>,
}

/// Shift type of a travel assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShiftType {
    Day,
    Night,
    Swing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContractStatus {
    Draft,
    Active,
    Completed,
}

/// A nurse's travel assignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contract {
    pub id: String,
    pub nurse_id: String,
    pub hospital: String,
    pub unit: String,
    pub shift: ShiftType,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub weekly_stipend: f64,
    pub total_budget: f64,
    pub needs_pet_friendly: bool,
    pub needs_parking: bool,
    pub notes: String,
    pub status: ContractStatus,
}

/// Preference bundle collected during onboarding. Read-only input to
/// scoring; only the onboarding flow writes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NursePreferences {
    pub budget_ceiling_weekly: f64,
    pub min_safety_score: f64,
    pub max_commute_minutes: f64,
    pub avoid_bridges: bool,
    pub avoid_tolls: bool,
    pub needs_overnight_parking: bool,
    pub has_pets: bool,
    pub wants_private_entrance: bool,
    pub roommates_ok: bool,
    pub prefers_female_only: bool,
    pub amenity_wishlist: Vec<String>,
}

impl Default for NursePreferences {
    fn default() -> Self {
        Self {
            budget_ceiling_weekly: 0.0,
            min_safety_score: 0.0,
            max_commute_minutes: 45.0,
            avoid_bridges: false,
            avoid_tolls: false,
            needs_overnight_parking: false,
            has_pets: false,
            wants_private_entrance: false,
            roommates_ok: true,
            prefers_female_only: false,
            amenity_wishlist: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationKind {
    Employer,
    GovernmentId,
    Address,
    Background,
    SafetyFeature,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationStatus {
    Pending,
    Verified,
    Rejected,
}

/// Trust record shown on a profile; display data only in this core.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Verification {
    pub id: String,
    pub kind: VerificationKind,
    pub status: VerificationStatus,
    pub verified_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NurseProfile {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub preferences: NursePreferences,
    pub verifications: Vec<Verification>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    Pending,
    Active,
    Expired,
}

/// Result of a nurse liking a listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub id: String,
    pub listing_id: String,
    pub nurse_id: String,
    pub contract_id: String,
    pub status: MatchStatus,
    pub score: f64,
    pub hold_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HoldStatus {
    Pending,
    Active,
    Released,
    Converted,
}

/// A refundable reservation intent on a listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hold {
    pub id: String,
    pub listing_id: String,
    pub nurse_id: String,
    pub contract_id: String,
    /// Set when the hold was created alongside a match; holds created via
    /// the payment-intent endpoint reference the match that requested them.
    pub match_id: Option<String>,
    pub status: HoldStatus,
    pub expires_at: DateTime<Utc>,
    pub intent_fee_cents: i64,
    /// Client secret of the manual-capture payment intent, when one exists.
    pub client_secret: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub sender_id: String,
    pub body: String,
    pub sent_at: DateTime<Utc>,
}

/// Chat thread tied to a match. Messages are append-only, ordered by send
/// time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: String,
    pub match_id: String,
    pub participant_ids: Vec<String>,
    pub messages: Vec<Message>,
    pub created_at: DateTime<Utc>,
}

/// User-curated bookmark on a listing, independent of match/hold state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShortlistEntry {
    pub id: String,
    pub listing_id: String,
    pub notes: Option<String>,
    pub added_at: DateTime<Utc>,
}

/// Onboarding progress persisted across sessions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OnboardingState {
    pub completed: bool,
    pub preferences: NursePreferences,
}
