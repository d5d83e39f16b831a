use crate::models::{AdopterProfile, PetRecord, ScoreBreakdown, ScoringWeights};
use crate::core::filters::is_space_suitable;

/// Apartment size (square metres) from which any pet is considered to fit
pub const DEFAULT_APARTMENT_SIZE_THRESHOLD: f64 = 50.0;

/// Calculate the compatibility score (0-1) of a pet for an adopter
///
/// Scoring formula:
/// score = (
///     species_match * 0.3 +        # pref_species == species
///     gender_match * 0.1 +         # pref_gender == gender, or Any
///     activity_match * 0.2 +       # adopter activity >= pet activity
///     allergy_match * 0.2 +        # both allergy friendly
///     space_match * 0.2            # space suitable and no special needs
/// )
///
/// Every signal is evaluated; none short-circuits another.
pub fn calculate_match_score(
    adopter: &AdopterProfile,
    pet: &PetRecord,
    weights: &ScoringWeights,
    apartment_size_threshold: f64,
) -> ScoreBreakdown {
    let species = if adopter.pref_species == pet.species {
        weights.species
    } else {
        0.0
    };

    let gender = if adopter.pref_gender.accepts(pet.gender) {
        weights.gender
    } else {
        0.0
    };

    let activity = if adopter.activity_level.ordinal() >= pet.activity_level.ordinal() {
        weights.activity
    } else {
        0.0
    };

    let allergy = if adopter.allergy_friendly && pet.allergy_friendly {
        weights.allergy
    } else {
        0.0
    };

    let space = if is_space_suitable(adopter, pet, apartment_size_threshold)
        && !pet.has_special_needs()
    {
        weights.space
    } else {
        0.0
    };

    ScoreBreakdown {
        species,
        gender,
        activity,
        allergy,
        space,
    }
}

/// Score with the default weights and threshold
#[inline]
pub fn score(adopter: &AdopterProfile, pet: &PetRecord) -> f64 {
    calculate_match_score(
        adopter,
        pet,
        &ScoringWeights::default(),
        DEFAULT_APARTMENT_SIZE_THRESHOLD,
    )
    .total()
}
