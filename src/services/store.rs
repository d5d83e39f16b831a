use crate::models::{AdopterProfile, PetRecord, ShelterProfile};
use thiserror::Error;

/// Errors that can occur when reading or writing the adoption store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Invalid input: {0}")]
    Invalid(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Pet listings
pub trait PetCatalog: Send + Sync {
    /// Every listed pet, in listing order
    fn list_pets(&self) -> Result<Vec<PetRecord>, StoreError>;

    fn pet(&self, pet_id: &str) -> Result<Option<PetRecord>, StoreError>;

    fn pets_by_shelter(&self, shelter_name: &str) -> Result<Vec<PetRecord>, StoreError> {
        Ok(self
            .list_pets()?
            .into_iter()
            .filter(|pet| pet.shelter_name == shelter_name)
            .collect())
    }

    fn create_pet(&self, pet: PetRecord) -> Result<PetRecord, StoreError>;

    /// Replace the stored pet with the same id
    fn update_pet(&self, pet: &PetRecord) -> Result<(), StoreError>;
}

/// Adopter accounts
pub trait AdopterStore: Send + Sync {
    fn adopter(&self, adopter_id: &str) -> Result<Option<AdopterProfile>, StoreError>;

    /// `username` is expected lower-cased
    fn adopter_by_username(&self, username: &str) -> Result<Option<AdopterProfile>, StoreError>;

    /// Fails with `Conflict` when the username is taken
    fn create_adopter(&self, adopter: AdopterProfile) -> Result<AdopterProfile, StoreError>;

    /// Persist an existing adopter, including liked and skipped pets
    fn update_adopter(&self, adopter: &AdopterProfile) -> Result<(), StoreError>;

    /// Returns `false` when there was nothing to delete
    fn delete_adopter(&self, adopter_id: &str) -> Result<bool, StoreError>;

    fn authenticate_adopter(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<AdopterProfile>, StoreError> {
        Ok(self
            .adopter_by_username(username)?
            .filter(|adopter| adopter.password == password))
    }
}

/// Shelter accounts
pub trait ShelterStore: Send + Sync {
    fn shelter(&self, shelter_id: &str) -> Result<Option<ShelterProfile>, StoreError>;

    fn shelter_by_name(&self, name: &str) -> Result<Option<ShelterProfile>, StoreError>;

    /// `username` is expected lower-cased
    fn shelter_by_username(&self, username: &str) -> Result<Option<ShelterProfile>, StoreError>;

    /// Fails with `Conflict` when the username is taken
    fn create_shelter(&self, shelter: ShelterProfile) -> Result<ShelterProfile, StoreError>;

    /// Delete the shelter and every pet listed under its name.
    /// Returns the number of pets removed.
    fn delete_shelter(&self, shelter_id: &str) -> Result<usize, StoreError>;

    fn authenticate_shelter(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<ShelterProfile>, StoreError> {
        Ok(self
            .shelter_by_username(username)?
            .filter(|shelter| shelter.password == password))
    }
}

/// Everything the service needs from persistence
pub trait AdoptionStore: PetCatalog + AdopterStore + ShelterStore {
    fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

/// Find the shelter that listed a pet.
///
/// Pets refer to their shelter by display name. All lookups go through here.
pub fn resolve_shelter<S>(store: &S, pet: &PetRecord) -> Result<Option<ShelterProfile>, StoreError>
where
    S: ShelterStore + ?Sized,
{
    store.shelter_by_name(&pet.shelter_name)
}
