//! Account and catalog management on top of the store traits.

use thiserror::Error;

use crate::models::{
    AddPetRequest, AdopterProfile, LoginRequest, PetIdSet, PetRecord, RegisterAdopterRequest,
    RegisterShelterRequest, ShelterProfile, UpdatePetRequest,
};
use crate::services::codec::{generate_id, normalize_phone, normalize_username, CodecError};
use crate::services::store::{AdopterStore, PetCatalog, ShelterStore, StoreError};

/// Species offered when no pet has been listed yet
pub const DEFAULT_SPECIES: [&str; 5] = ["Dog", "Cat", "Rabbit", "Turtle", "Hamster"];

#[derive(Debug, Error)]
pub enum AccountError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error(transparent)]
    InvalidField(#[from] CodecError),

    #[error("Shelter not found: {0}")]
    ShelterNotFound(String),

    #[error("Pet not found: {0}")]
    PetNotFound(String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Create an adopter account with empty liked and skipped lists
pub fn register_adopter<S>(
    store: &S,
    request: RegisterAdopterRequest,
) -> Result<AdopterProfile, AccountError>
where
    S: AdopterStore + ?Sized,
{
    let adopter = AdopterProfile {
        adopter_id: generate_id("ADOP"),
        name: request.name,
        country: request.country,
        age: request.age,
        username: normalize_username(&request.username),
        password: request.password,
        pref_species: request.pref_species,
        pref_gender: request.pref_gender,
        activity_level: request.activity_level,
        allergy_friendly: request.allergy_friendly,
        has_house: request.has_house,
        has_garden: request.has_garden,
        apartment_size: request
            .apartment_size
            .filter(|size| size.is_finite() && *size >= 0.0)
            .unwrap_or(0.0),
        liked_pets: PetIdSet::new(),
        skipped_pets: PetIdSet::new(),
    };

    let adopter = store.create_adopter(adopter)?;
    tracing::info!("Registered adopter {} ({})", adopter.adopter_id, adopter.username);
    Ok(adopter)
}

/// Create a shelter account. The phone number is stored digits only.
pub fn register_shelter<S>(
    store: &S,
    request: RegisterShelterRequest,
) -> Result<ShelterProfile, AccountError>
where
    S: ShelterStore + ?Sized,
{
    let phone = normalize_phone(&request.phone)?;

    let shelter = ShelterProfile {
        shelter_id: generate_id("SHEL"),
        name: request.name,
        address: request.address,
        phone,
        email: request.email,
        username: normalize_username(&request.username),
        password: request.password,
    };

    let shelter = store.create_shelter(shelter)?;
    tracing::info!("Registered shelter {} ({})", shelter.shelter_id, shelter.name);
    Ok(shelter)
}

pub fn login_adopter<S>(store: &S, request: &LoginRequest) -> Result<AdopterProfile, AccountError>
where
    S: AdopterStore + ?Sized,
{
    store
        .authenticate_adopter(&normalize_username(&request.username), &request.password)?
        .ok_or(AccountError::InvalidCredentials)
}

pub fn login_shelter<S>(store: &S, request: &LoginRequest) -> Result<ShelterProfile, AccountError>
where
    S: ShelterStore + ?Sized,
{
    store
        .authenticate_shelter(&normalize_username(&request.username), &request.password)?
        .ok_or(AccountError::InvalidCredentials)
}

/// List a new pet under the shelter's name
pub fn add_pet<S>(store: &S, shelter_id: &str, request: AddPetRequest) -> Result<PetRecord, AccountError>
where
    S: PetCatalog + ShelterStore + ?Sized,
{
    let shelter = store
        .shelter(shelter_id)?
        .ok_or_else(|| AccountError::ShelterNotFound(shelter_id.to_string()))?;

    let pet = PetRecord {
        pet_id: generate_id("PET"),
        name: request.name,
        species: request.species,
        breed: request.breed,
        gender: request.gender,
        age: request.age,
        activity_level: request.activity_level,
        allergy_friendly: request.allergy_friendly,
        time_in_shelter: request.time_in_shelter,
        disability_current: request.disability_current,
        disability_past: request.disability_past,
        special_needs: request.special_needs,
        shelter_name: shelter.name,
        image_path: request.image_path.filter(|path| !path.trim().is_empty()),
    };

    let pet = store.create_pet(pet)?;
    tracing::info!("Shelter {} listed pet {}", shelter_id, pet.pet_id);
    Ok(pet)
}

/// Apply a partial edit to a listed pet
pub fn edit_pet<S>(store: &S, pet_id: &str, update: UpdatePetRequest) -> Result<PetRecord, AccountError>
where
    S: PetCatalog + ?Sized,
{
    let mut pet = store
        .pet(pet_id)?
        .ok_or_else(|| AccountError::PetNotFound(pet_id.to_string()))?;

    if let Some(name) = update.name {
        pet.name = name;
    }
    if let Some(breed) = update.breed {
        pet.breed = breed;
    }
    if let Some(age) = update.age {
        pet.age = age;
    }
    if let Some(activity_level) = update.activity_level {
        pet.activity_level = activity_level;
    }
    if let Some(allergy_friendly) = update.allergy_friendly {
        pet.allergy_friendly = allergy_friendly;
    }
    if let Some(time_in_shelter) = update.time_in_shelter {
        pet.time_in_shelter = time_in_shelter;
    }
    if let Some(special_needs) = update.special_needs {
        pet.special_needs = special_needs;
    }
    if let Some(image_path) = update.image_path {
        pet.image_path = Some(image_path).filter(|path| !path.trim().is_empty());
    }

    store.update_pet(&pet)?;
    tracing::debug!("Updated pet {}", pet_id);
    Ok(pet)
}

/// Distinct species in the catalog, in listing order
pub fn species_offered<S>(store: &S) -> Result<Vec<String>, AccountError>
where
    S: PetCatalog + ?Sized,
{
    let mut species: Vec<String> = Vec::new();
    for pet in store.list_pets()? {
        if !species.contains(&pet.species) {
            species.push(pet.species);
        }
    }

    if species.is_empty() {
        species = DEFAULT_SPECIES.iter().map(|s| s.to_string()).collect();
    }
    Ok(species)
}
