//! Built-in demo data for the local (offline) backend.
//!
//! When no remote backend is configured the store starts from this small
//! catalog so the swipe feed, scoring, and hold flows are exercisable out
//! of the box.

use chrono::{NaiveDate, Utc};
use tracing::info;

use super::models::{
    Contract, ContractStatus, Listing, ListingStatus, NurseProfile, NursePreferences, Parking,
    PetPolicy, Role, ShiftType, User, Verification, VerificationKind, VerificationStatus,
};
use super::Store;

/// A plain demo listing; callers override the fields they care about.
pub fn demo_listing(id: &str, owner_id: &str) -> Listing {
    let now = Utc::now();
    Listing {
        id: id.to_string(),
        owner_id: owner_id.to_string(),
        title: "Furnished 1BR near the hospital".to_string(),
        description: "Bright, furnished one-bedroom close to the medical center.".to_string(),
        city: "San Francisco".to_string(),
        neighborhood: Some("Inner Sunset".to_string()),
        price_weekly: 1150.0,
        commute_minutes_peak: 18.0,
        commute_minutes_night: 12.0,
        stipend_fit_score: 85.0,
        safety_score: 90.0,
        quality_score: 85.0,
        total_score: 0.0,
        bedrooms: 1,
        bathrooms: 1.0,
        pet_policy: PetPolicy::Cats,
        parking: Parking::Street,
        photos: vec![],
        amenities: vec!["Wifi".to_string(), "In-Unit Laundry".to_string()],
        safety_features: vec!["Deadbolt".to_string()],
        status: ListingStatus::Active,
        available_from: NaiveDate::from_ymd_opt(2026, 1, 5).unwrap(),
        available_to: NaiveDate::from_ymd_opt(2026, 12, 20).unwrap(),
        min_stay_weeks: 4,
        max_stay_weeks: 26,
        created_at: now,
        updated_at: now,
    }
}

/// A plain demo contract; callers override the fields they care about.
pub fn demo_contract(id: &str, nurse_id: &str) -> Contract {
    Contract {
        id: id.to_string(),
        nurse_id: nurse_id.to_string(),
        hospital: "Zuckerberg San Francisco General".to_string(),
        unit: "ICU".to_string(),
        shift: ShiftType::Day,
        start_date: NaiveDate::from_ymd_opt(2026, 2, 2).unwrap(),
        end_date: NaiveDate::from_ymd_opt(2026, 5, 8).unwrap(),
        weekly_stipend: 1650.0,
        total_budget: 21_450.0,
        needs_pet_friendly: false,
        needs_parking: true,
        notes: String::new(),
        status: ContractStatus::Active,
    }
}

/// Seed the demo users, profile, contract, and listing catalog into an
/// empty store and build the initial swipe queue.
pub fn seed_demo_data(store: &mut Store) {
    info!("Seeding demo marketplace data");

    store.users = vec![
        User {
            id: "u-nurse-1".to_string(),
            name: "Maya Okafor".to_string(),
            role: Role::Nurse,
            email: Some("maya@example.com".to_string()),
        },
        User {
            id: "u-owner-1".to_string(),
            name: "Dan Whitfield".to_string(),
            role: Role::Owner,
            email: Some("dan@example.com".to_string()),
        },
    ];
    store.current_user_id = Some("u-nurse-1".to_string());
    store.role = Role::Nurse;

    store.nurse_profiles = vec![NurseProfile {
        id: "n-1".to_string(),
        user_id: "u-nurse-1".to_string(),
        name: "Maya Okafor".to_string(),
        preferences: NursePreferences {
            budget_ceiling_weekly: 1400.0,
            min_safety_score: 80.0,
            max_commute_minutes: 25.0,
            needs_overnight_parking: true,
            wants_private_entrance: true,
            ..NursePreferences::default()
        },
        verifications: vec![
            Verification {
                id: "v-1".to_string(),
                kind: VerificationKind::Employer,
                status: VerificationStatus::Verified,
                verified_at: Some(Utc::now()),
            },
            Verification {
                id: "v-2".to_string(),
                kind: VerificationKind::Background,
                status: VerificationStatus::Pending,
                verified_at: None,
            },
        ],
    }];

    let contract = demo_contract("c-1", "n-1");
    store.active_contract_id = Some(contract.id.clone());
    store.contracts = vec![contract];

    let mut garden = demo_listing("l-1", "u-owner-1");
    garden.title = "Garden studio with private entry".to_string();
    garden.description =
        "Quiet garden studio with a private entrance, ten minutes from the hospital.".to_string();
    garden.amenities.push("Private Entry".to_string());
    garden.safety_features.push("Gated Parking".to_string());
    garden.parking = Parking::Driveway;
    garden.price_weekly = 1250.0;

    let mut tower = demo_listing("l-2", "u-owner-1");
    tower.title = "High-rise 1BR, skyline views".to_string();
    tower.neighborhood = Some("SoMa".to_string());
    tower.price_weekly = 1600.0;
    tower.commute_minutes_peak = 32.0;
    tower.commute_minutes_night = 20.0;
    tower.parking = Parking::Garage;
    tower.amenities.push("EV Charging".to_string());
    tower.safety_score = 84.0;

    let mut inlaw = demo_listing("l-3", "u-owner-1");
    inlaw.title = "Sunset in-law unit, female-only household".to_string();
    inlaw.description =
        "Cozy in-law unit in a female-only household on a quiet street.".to_string();
    inlaw.amenities.push("Quiet Street".to_string());
    inlaw.price_weekly = 980.0;
    inlaw.pet_policy = PetPolicy::None;
    inlaw.quality_score = 78.0;

    for listing in [garden, tower, inlaw] {
        store.create_listing(listing);
    }
}
