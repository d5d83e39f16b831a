use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::models::{AdopterProfile, PetRecord, ShelterProfile};
use crate::services::store::{AdopterStore, AdoptionStore, PetCatalog, ShelterStore, StoreError};

#[derive(Debug, Default)]
struct Tables {
    adopters: Vec<AdopterProfile>,
    shelters: Vec<ShelterProfile>,
    pets: Vec<PetRecord>,
}

/// Store that keeps every table in memory.
///
/// Rows keep insertion order, so the catalog lists pets in the order they
/// were added.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store pre-populated with rows, bypassing uniqueness checks
    pub fn with_data(
        adopters: Vec<AdopterProfile>,
        shelters: Vec<ShelterProfile>,
        pets: Vec<PetRecord>,
    ) -> Self {
        Self {
            tables: RwLock::new(Tables {
                adopters,
                shelters,
                pets,
            }),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>, StoreError> {
        self.tables
            .read()
            .map_err(|_| StoreError::Unavailable("in-memory tables poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>, StoreError> {
        self.tables
            .write()
            .map_err(|_| StoreError::Unavailable("in-memory tables poisoned".to_string()))
    }
}

impl PetCatalog for InMemoryStore {
    fn list_pets(&self) -> Result<Vec<PetRecord>, StoreError> {
        Ok(self.read()?.pets.clone())
    }

    fn pet(&self, pet_id: &str) -> Result<Option<PetRecord>, StoreError> {
        Ok(self.read()?.pets.iter().find(|p| p.pet_id == pet_id).cloned())
    }

    fn create_pet(&self, pet: PetRecord) -> Result<PetRecord, StoreError> {
        let mut tables = self.write()?;
        if tables.pets.iter().any(|p| p.pet_id == pet.pet_id) {
            return Err(StoreError::Conflict(format!("pet {} already exists", pet.pet_id)));
        }
        tables.pets.push(pet.clone());
        Ok(pet)
    }

    fn update_pet(&self, pet: &PetRecord) -> Result<(), StoreError> {
        let mut tables = self.write()?;
        let slot = tables
            .pets
            .iter_mut()
            .find(|p| p.pet_id == pet.pet_id)
            .ok_or_else(|| StoreError::NotFound(format!("pet {}", pet.pet_id)))?;
        *slot = pet.clone();
        Ok(())
    }
}

impl AdopterStore for InMemoryStore {
    fn adopter(&self, adopter_id: &str) -> Result<Option<AdopterProfile>, StoreError> {
        Ok(self
            .read()?
            .adopters
            .iter()
            .find(|a| a.adopter_id == adopter_id)
            .cloned())
    }

    fn adopter_by_username(&self, username: &str) -> Result<Option<AdopterProfile>, StoreError> {
        Ok(self
            .read()?
            .adopters
            .iter()
            .find(|a| a.username == username)
            .cloned())
    }

    fn create_adopter(&self, adopter: AdopterProfile) -> Result<AdopterProfile, StoreError> {
        let mut tables = self.write()?;
        if tables.adopters.iter().any(|a| a.username == adopter.username) {
            return Err(StoreError::Conflict("Username already exists".to_string()));
        }
        tables.adopters.push(adopter.clone());
        Ok(adopter)
    }

    fn update_adopter(&self, adopter: &AdopterProfile) -> Result<(), StoreError> {
        let mut tables = self.write()?;
        let slot = tables
            .adopters
            .iter_mut()
            .find(|a| a.adopter_id == adopter.adopter_id)
            .ok_or_else(|| StoreError::NotFound(format!("adopter {}", adopter.adopter_id)))?;
        *slot = adopter.clone();
        Ok(())
    }

    fn delete_adopter(&self, adopter_id: &str) -> Result<bool, StoreError> {
        let mut tables = self.write()?;
        let before = tables.adopters.len();
        tables.adopters.retain(|a| a.adopter_id != adopter_id);
        Ok(tables.adopters.len() < before)
    }
}

impl ShelterStore for InMemoryStore {
    fn shelter(&self, shelter_id: &str) -> Result<Option<ShelterProfile>, StoreError> {
        Ok(self
            .read()?
            .shelters
            .iter()
            .find(|s| s.shelter_id == shelter_id)
            .cloned())
    }

    fn shelter_by_name(&self, name: &str) -> Result<Option<ShelterProfile>, StoreError> {
        Ok(self.read()?.shelters.iter().find(|s| s.name == name).cloned())
    }

    fn shelter_by_username(&self, username: &str) -> Result<Option<ShelterProfile>, StoreError> {
        Ok(self
            .read()?
            .shelters
            .iter()
            .find(|s| s.username == username)
            .cloned())
    }

    fn create_shelter(&self, shelter: ShelterProfile) -> Result<ShelterProfile, StoreError> {
        let mut tables = self.write()?;
        if tables.shelters.iter().any(|s| s.username == shelter.username) {
            return Err(StoreError::Conflict("Username already exists".to_string()));
        }
        tables.shelters.push(shelter.clone());
        Ok(shelter)
    }

    fn delete_shelter(&self, shelter_id: &str) -> Result<usize, StoreError> {
        let mut tables = self.write()?;
        let position = tables
            .shelters
            .iter()
            .position(|s| s.shelter_id == shelter_id)
            .ok_or_else(|| StoreError::NotFound(format!("shelter {}", shelter_id)))?;
        let shelter = tables.shelters.remove(position);

        let before = tables.pets.len();
        tables.pets.retain(|p| p.shelter_name != shelter.name);
        Ok(before - tables.pets.len())
    }
}

impl AdoptionStore for InMemoryStore {}
