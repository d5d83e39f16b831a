use crate::models::{ActivityLevel, AdopterProfile, PetRecord};

/// Check whether the adopter's home suits the pet
///
/// True when the pet is low energy, or the adopter has a house, a garden, or
/// an apartment at least `apartment_size_threshold` square metres large.
/// Reads the candidate pet, so it has to be evaluated per pet.
#[inline]
pub fn is_space_suitable(
    adopter: &AdopterProfile,
    pet: &PetRecord,
    apartment_size_threshold: f64,
) -> bool {
    pet.activity_level == ActivityLevel::Low
        || adopter.has_house
        || adopter.has_garden
        || adopter.apartment_size >= apartment_size_threshold
}

/// Check if a pet is still a candidate for the adopter
///
/// Liked and skipped pets are never recommended again.
#[inline]
pub fn is_candidate(adopter: &AdopterProfile, pet: &PetRecord) -> bool {
    !adopter.has_decided(&pet.pet_id)
}
