//! Match scoring.
//!
//! This module computes how well a listing fits a nurse's contract and
//! preferences. It is the single source of truth for all score arithmetic:
//! the live swipe-feed scoring, the derived per-listing total stored on the
//! listing itself, and the legacy filter scorer kept for the static catalog
//! browse path.
//!
//! All scores land in [0, 100]. Every function here is pure.

use chrono::NaiveDate;

use crate::store::models::{Contract, Listing, NursePreferences, ShiftType};

/// Weight of the stipend-fit component in the total score.
const WEIGHT_STIPEND_FIT: f64 = 0.30;
/// Weight of the commute component in the total score.
const WEIGHT_COMMUTE: f64 = 0.20;
/// Weight of the safety component in the total score.
const WEIGHT_SAFETY: f64 = 0.30;
/// Weight of the quality component in the total score.
const WEIGHT_QUALITY: f64 = 0.20;

/// Amenity tag that earns the private-entrance safety bonus.
const AMENITY_PRIVATE_ENTRY: &str = "Private Entry";
/// Safety-feature tag that earns the overnight-parking safety bonus.
const SAFETY_FEATURE_GATED_PARKING: &str = "Gated Parking";

/// Per-component breakdown of a listing score.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct ScoreBreakdown {
    pub stipend_fit: f64,
    pub commute: f64,
    pub safety: f64,
    pub quality: f64,
    pub total: f64,
}

fn clamp_score(value: f64) -> f64 {
    value.clamp(0.0, 100.0)
}

/// Score a listing against a contract and the nurse's preferences.
pub fn score_listing(
    contract: &Contract,
    listing: &Listing,
    prefs: &NursePreferences,
) -> ScoreBreakdown {
    let stipend_fit = stipend_fit_score(contract.weekly_stipend, listing.price_weekly);
    let commute = commute_score(
        commute_minutes_for_shift(listing, contract.shift),
        prefs.max_commute_minutes,
    );
    let safety = safety_score(listing, prefs);
    let quality = listing.quality_score;

    let total = clamp_score(
        stipend_fit * WEIGHT_STIPEND_FIT
            + commute * WEIGHT_COMMUTE
            + safety * WEIGHT_SAFETY
            + quality * WEIGHT_QUALITY,
    );

    ScoreBreakdown {
        stipend_fit,
        commute,
        safety,
        quality,
        total,
    }
}

/// Pick the commute figure matching the contract's shift.
///
/// Night contracts commute against off-peak traffic; everything else is
/// scored on the peak figure.
fn commute_minutes_for_shift(listing: &Listing, shift: ShiftType) -> f64 {
    match shift {
        ShiftType::Night => listing.commute_minutes_night,
        ShiftType::Day | ShiftType::Swing => listing.commute_minutes_peak,
    }
}

/// Bucketed stipend-to-price fit.
///
/// The ratio maps onto exactly five buckets; a non-positive stipend has no
/// defined ratio and scores the neutral 50.
fn stipend_fit_score(weekly_stipend: f64, price_weekly: f64) -> f64 {
    if weekly_stipend <= 0.0 {
        return 50.0;
    }

    let ratio = weekly_stipend / price_weekly;
    if ratio >= 1.2 {
        95.0
    } else if ratio >= 1.0 {
        85.0
    } else if ratio >= 0.8 {
        70.0
    } else if ratio >= 0.6 {
        50.0
    } else {
        35.0
    }
}

/// Commute score.
///
/// Within the budget the score is inversely proportional to the absolute
/// minutes, not to the headroom under the budget; past the budget a steeper
/// 2x-per-minute penalty applies from a 70-point base. The discontinuity at
/// the boundary is intentional and callers depend on the exact values.
fn commute_score(minutes: f64, max_minutes: f64) -> f64 {
    if minutes <= max_minutes {
        clamp_score(100.0 - minutes)
    } else {
        clamp_score(70.0 - 2.0 * (minutes - max_minutes))
    }
}

/// Safety score: the listing's base plus fixed preference bonuses.
fn safety_score(listing: &Listing, prefs: &NursePreferences) -> f64 {
    let mut score = listing.safety_score;

    if prefs.wants_private_entrance && listing.has_amenity(AMENITY_PRIVATE_ENTRY) {
        score += 5.0;
    }
    if prefs.needs_overnight_parking && listing.has_safety_feature(SAFETY_FEATURE_GATED_PARKING) {
        score += 4.0;
    }
    if prefs.prefers_female_only && listing.description.to_lowercase().contains("female") {
        score += 5.0;
    }

    clamp_score(score)
}

/// Total score stored on a listing, derived from its three base scores.
///
/// The commute term is contract-dependent and cannot contribute to a score
/// stored on the listing itself, so the live weights are renormalized over
/// the remaining three components. Clients never set this field directly.
pub fn derived_total_score(stipend_fit: f64, safety: f64, quality: f64) -> f64 {
    let span = WEIGHT_STIPEND_FIT + WEIGHT_SAFETY + WEIGHT_QUALITY;
    clamp_score(
        stipend_fit * (WEIGHT_STIPEND_FIT / span)
            + safety * (WEIGHT_SAFETY / span)
            + quality * (WEIGHT_QUALITY / span),
    )
}

/// Ad-hoc filter selections from the catalog browse page.
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct FilterSelections {
    #[serde(default)]
    pub pets: bool,
    #[serde(default)]
    pub parking: bool,
    #[serde(default)]
    pub ev_charging: bool,
    #[serde(default)]
    pub large_vehicle: bool,
    #[serde(default)]
    pub quiet: bool,
    #[serde(default)]
    pub safe: bool,
    /// Requested stay window, inclusive on both ends.
    #[serde(default)]
    pub date_range: Option<(NaiveDate, NaiveDate)>,
}

/// Baseline for the legacy filter scorer.
const FILTER_BASELINE: f64 = 50.0;
/// (bonus, penalty) per boolean filter, in declaration order of
/// [`FilterSelections`]: pets, parking, ev, large vehicle, quiet, safe.
const FILTER_WEIGHTS: [(f64, f64); 6] = [
    (10.0, 15.0),
    (6.0, 8.0),
    (6.0, 6.0),
    (6.0, 6.0),
    (8.0, 10.0),
    (8.0, 10.0),
];
/// Bonus when the listing's availability fully covers the requested range.
const FILTER_DATE_BONUS: f64 = 12.0;
/// Penalty when it does not.
const FILTER_DATE_PENALTY: f64 = 25.0;

/// Legacy filter scorer for the static catalog path.
///
/// Kept as a compatibility shim over the unified listing shape; the swipe
/// feed uses [`score_listing`] instead. Starts at a 50-point baseline and
/// applies asymmetric fixed bonuses/penalties per requested filter.
pub fn compute_filter_match(listing: &Listing, filters: &FilterSelections) -> i64 {
    let mut score = FILTER_BASELINE;

    let checks = [
        (filters.pets, listing.allows_pets()),
        (filters.parking, listing.has_parking()),
        (filters.ev_charging, listing.has_amenity("EV Charging")),
        (filters.large_vehicle, listing.fits_large_vehicle()),
        (filters.quiet, listing.has_amenity("Quiet Street")),
        (filters.safe, listing.has_safety_feature("Deadbolt")),
    ];
    for ((requested, satisfied), (bonus, penalty)) in checks.into_iter().zip(FILTER_WEIGHTS) {
        if requested {
            if satisfied {
                score += bonus;
            } else {
                score -= penalty;
            }
        }
    }

    if let Some((from, to)) = filters.date_range {
        if listing.available_from <= from && listing.available_to >= to {
            score += FILTER_DATE_BONUS;
        } else {
            score -= FILTER_DATE_PENALTY;
        }
    }

    clamp_score(score.round()) as i64
}
