use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::models::{AdopterProfile, PetRecord, PreferredGender, ShelterProfile};
use crate::services::codec::{
    decode_id_list_lossy, encode_id_list, format_flag, parse_activity_level, parse_flag,
    parse_gender, parse_non_negative, parse_preferred_gender,
};
use crate::services::store::{AdopterStore, AdoptionStore, PetCatalog, ShelterStore, StoreError};

pub const PETS_FILE: &str = "pets.csv";
pub const ADOPTERS_FILE: &str = "adopters.csv";
pub const SHELTERS_FILE: &str = "shelters.csv";

/// Store backed by three CSV sheets in a data directory.
///
/// Every call re-reads the sheet it needs and every write rewrites the whole
/// sheet, the way a spreadsheet export behaves. A single mutex serializes
/// access so one write is applied at a time. A missing sheet reads as empty.
pub struct CsvStore {
    data_dir: PathBuf,
    lock: Mutex<()>,
}

impl CsvStore {
    /// Open (and create if needed) a data directory
    pub fn open<P: AsRef<Path>>(data_dir: P) -> Result<Self, StoreError> {
        let data_dir = data_dir.as_ref().to_path_buf();
        fs::create_dir_all(&data_dir)?;
        tracing::info!("Using CSV store at {}", data_dir.display());

        Ok(Self {
            data_dir,
            lock: Mutex::new(()),
        })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn guard(&self) -> Result<MutexGuard<'_, ()>, StoreError> {
        self.lock
            .lock()
            .map_err(|_| StoreError::Unavailable("CSV store lock poisoned".to_string()))
    }

    fn read_rows<T: DeserializeOwned>(&self, file: &str) -> Result<Vec<T>, StoreError> {
        let path = self.data_dir.join(file);
        if !path.exists() {
            return Ok(Vec::new());
        }

        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_path(&path)?;

        let mut rows = Vec::new();
        for record in reader.deserialize::<T>() {
            rows.push(record?);
        }

        tracing::debug!("Loaded {} rows from {}", rows.len(), file);
        Ok(rows)
    }

    fn write_rows<T: Serialize>(&self, file: &str, rows: &[T]) -> Result<(), StoreError> {
        let path = self.data_dir.join(file);
        let tmp = self.data_dir.join(format!("{}.tmp", file));

        let mut writer = csv::Writer::from_path(&tmp)?;
        for row in rows {
            writer.serialize(row)?;
        }
        writer.flush()?;
        drop(writer);

        fs::rename(&tmp, &path)?;
        tracing::debug!("Wrote {} rows to {}", rows.len(), file);
        Ok(())
    }

    fn load_pets(&self) -> Result<Vec<PetRecord>, StoreError> {
        Ok(self
            .read_rows::<PetRow>(PETS_FILE)?
            .into_iter()
            .map(PetRecord::from)
            .collect())
    }

    fn save_pets(&self, pets: &[PetRecord]) -> Result<(), StoreError> {
        let rows: Vec<PetRow> = pets.iter().map(PetRow::from).collect();
        self.write_rows(PETS_FILE, &rows)
    }

    fn load_adopters(&self) -> Result<Vec<AdopterProfile>, StoreError> {
        Ok(self
            .read_rows::<AdopterRow>(ADOPTERS_FILE)?
            .into_iter()
            .map(AdopterProfile::from)
            .collect())
    }

    fn save_adopters(&self, adopters: &[AdopterProfile]) -> Result<(), StoreError> {
        let rows: Vec<AdopterRow> = adopters.iter().map(AdopterRow::from).collect();
        self.write_rows(ADOPTERS_FILE, &rows)
    }

    fn load_shelters(&self) -> Result<Vec<ShelterProfile>, StoreError> {
        Ok(self
            .read_rows::<ShelterRow>(SHELTERS_FILE)?
            .into_iter()
            .map(ShelterProfile::from)
            .collect())
    }

    fn save_shelters(&self, shelters: &[ShelterProfile]) -> Result<(), StoreError> {
        let rows: Vec<ShelterRow> = shelters.iter().map(ShelterRow::from).collect();
        self.write_rows(SHELTERS_FILE, &rows)
    }
}

impl PetCatalog for CsvStore {
    fn list_pets(&self) -> Result<Vec<PetRecord>, StoreError> {
        let _guard = self.guard()?;
        self.load_pets()
    }

    fn pet(&self, pet_id: &str) -> Result<Option<PetRecord>, StoreError> {
        let _guard = self.guard()?;
        Ok(self.load_pets()?.into_iter().find(|p| p.pet_id == pet_id))
    }

    fn create_pet(&self, pet: PetRecord) -> Result<PetRecord, StoreError> {
        let _guard = self.guard()?;
        let mut pets = self.load_pets()?;
        if pets.iter().any(|p| p.pet_id == pet.pet_id) {
            return Err(StoreError::Conflict(format!("pet {} already exists", pet.pet_id)));
        }
        pets.push(pet.clone());
        self.save_pets(&pets)?;
        Ok(pet)
    }

    fn update_pet(&self, pet: &PetRecord) -> Result<(), StoreError> {
        let _guard = self.guard()?;
        let mut pets = self.load_pets()?;
        let slot = pets
            .iter_mut()
            .find(|p| p.pet_id == pet.pet_id)
            .ok_or_else(|| StoreError::NotFound(format!("pet {}", pet.pet_id)))?;
        *slot = pet.clone();
        self.save_pets(&pets)
    }
}

impl AdopterStore for CsvStore {
    fn adopter(&self, adopter_id: &str) -> Result<Option<AdopterProfile>, StoreError> {
        let _guard = self.guard()?;
        Ok(self
            .load_adopters()?
            .into_iter()
            .find(|a| a.adopter_id == adopter_id))
    }

    fn adopter_by_username(&self, username: &str) -> Result<Option<AdopterProfile>, StoreError> {
        let _guard = self.guard()?;
        Ok(self.load_adopters()?.into_iter().find(|a| a.username == username))
    }

    fn create_adopter(&self, adopter: AdopterProfile) -> Result<AdopterProfile, StoreError> {
        let _guard = self.guard()?;
        let mut adopters = self.load_adopters()?;
        if adopters.iter().any(|a| a.username == adopter.username) {
            return Err(StoreError::Conflict("Username already exists".to_string()));
        }
        adopters.push(adopter.clone());
        self.save_adopters(&adopters)?;
        Ok(adopter)
    }

    fn update_adopter(&self, adopter: &AdopterProfile) -> Result<(), StoreError> {
        let _guard = self.guard()?;
        let mut adopters = self.load_adopters()?;
        let slot = adopters
            .iter_mut()
            .find(|a| a.adopter_id == adopter.adopter_id)
            .ok_or_else(|| StoreError::NotFound(format!("adopter {}", adopter.adopter_id)))?;
        *slot = adopter.clone();
        self.save_adopters(&adopters)
    }

    fn delete_adopter(&self, adopter_id: &str) -> Result<bool, StoreError> {
        let _guard = self.guard()?;
        let mut adopters = self.load_adopters()?;
        let before = adopters.len();
        adopters.retain(|a| a.adopter_id != adopter_id);
        if adopters.len() == before {
            return Ok(false);
        }
        self.save_adopters(&adopters)?;
        Ok(true)
    }
}

impl ShelterStore for CsvStore {
    fn shelter(&self, shelter_id: &str) -> Result<Option<ShelterProfile>, StoreError> {
        let _guard = self.guard()?;
        Ok(self
            .load_shelters()?
            .into_iter()
            .find(|s| s.shelter_id == shelter_id))
    }

    fn shelter_by_name(&self, name: &str) -> Result<Option<ShelterProfile>, StoreError> {
        let _guard = self.guard()?;
        Ok(self.load_shelters()?.into_iter().find(|s| s.name == name))
    }

    fn shelter_by_username(&self, username: &str) -> Result<Option<ShelterProfile>, StoreError> {
        let _guard = self.guard()?;
        Ok(self.load_shelters()?.into_iter().find(|s| s.username == username))
    }

    fn create_shelter(&self, shelter: ShelterProfile) -> Result<ShelterProfile, StoreError> {
        let _guard = self.guard()?;
        let mut shelters = self.load_shelters()?;
        if shelters.iter().any(|s| s.username == shelter.username) {
            return Err(StoreError::Conflict("Username already exists".to_string()));
        }
        shelters.push(shelter.clone());
        self.save_shelters(&shelters)?;
        Ok(shelter)
    }

    fn delete_shelter(&self, shelter_id: &str) -> Result<usize, StoreError> {
        let _guard = self.guard()?;
        let mut shelters = self.load_shelters()?;
        let position = shelters
            .iter()
            .position(|s| s.shelter_id == shelter_id)
            .ok_or_else(|| StoreError::NotFound(format!("shelter {}", shelter_id)))?;
        let shelter = shelters.remove(position);

        let mut pets = self.load_pets()?;
        let before = pets.len();
        pets.retain(|p| p.shelter_name != shelter.name);
        let removed = before - pets.len();

        self.save_pets(&pets)?;
        self.save_shelters(&shelters)?;

        tracing::info!(
            "Deleted shelter {} and {} of its pets",
            shelter.shelter_id,
            removed
        );
        Ok(removed)
    }
}

impl AdoptionStore for CsvStore {
    fn health_check(&self) -> Result<(), StoreError> {
        if self.data_dir.is_dir() {
            Ok(())
        } else {
            Err(StoreError::Unavailable(format!(
                "data directory {} is missing",
                self.data_dir.display()
            )))
        }
    }
}

/// Row of `pets.csv`
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct PetRow {
    pet_id: String,
    species: String,
    breed: String,
    gender: String,
    name: String,
    activity_level: String,
    age: String,
    allergy_friendly: String,
    time_in_shelter: String,
    disability_current: String,
    disability_past: String,
    special_needs: String,
    sheltername: String,
    image_path: String,
}

impl From<PetRow> for PetRecord {
    fn from(row: PetRow) -> Self {
        PetRecord {
            gender: parse_gender(&row.gender),
            age: parse_non_negative(&row.age),
            activity_level: parse_activity_level(&row.activity_level),
            allergy_friendly: parse_flag(&row.allergy_friendly),
            image_path: Some(row.image_path).filter(|path| !path.is_empty()),
            pet_id: row.pet_id,
            name: row.name,
            species: row.species,
            breed: row.breed,
            time_in_shelter: row.time_in_shelter,
            disability_current: row.disability_current,
            disability_past: row.disability_past,
            special_needs: row.special_needs,
            shelter_name: row.sheltername,
        }
    }
}

impl From<&PetRecord> for PetRow {
    fn from(pet: &PetRecord) -> Self {
        PetRow {
            pet_id: pet.pet_id.clone(),
            species: pet.species.clone(),
            breed: pet.breed.clone(),
            gender: pet.gender.label().to_string(),
            name: pet.name.clone(),
            activity_level: pet.activity_level.label().to_string(),
            age: pet.age.to_string(),
            allergy_friendly: format_flag(pet.allergy_friendly).to_string(),
            time_in_shelter: pet.time_in_shelter.clone(),
            disability_current: pet.disability_current.clone(),
            disability_past: pet.disability_past.clone(),
            special_needs: pet.special_needs.clone(),
            sheltername: pet.shelter_name.clone(),
            image_path: pet.image_path.clone().unwrap_or_default(),
        }
    }
}

/// Row of `adopters.csv`
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct AdopterRow {
    adopter_id: String,
    name: String,
    country: String,
    age: String,
    pref_species: String,
    pref_gender: String,
    house: String,
    garden: String,
    activity_level: String,
    allergy_friendly: String,
    apartment_size: String,
    username: String,
    password: String,
    liked_pets: String,
    skipped_pets: String,
}

impl From<AdopterRow> for AdopterProfile {
    fn from(row: AdopterRow) -> Self {
        let pref_gender = parse_preferred_gender(&row.pref_gender).unwrap_or_else(|| {
            tracing::warn!(
                "Unknown preferred gender {:?} for {}, treating as unspecified",
                row.pref_gender,
                row.adopter_id
            );
            PreferredGender::Unspecified
        });
        let liked_pets = decode_id_list_lossy(&row.liked_pets, "liked_pets", &row.adopter_id);
        let skipped_pets = decode_id_list_lossy(&row.skipped_pets, "skipped_pets", &row.adopter_id);

        AdopterProfile {
            age: row.age.trim().parse().unwrap_or(0),
            pref_gender,
            activity_level: parse_activity_level(&row.activity_level),
            allergy_friendly: parse_flag(&row.allergy_friendly),
            has_house: parse_flag(&row.house),
            has_garden: parse_flag(&row.garden),
            apartment_size: parse_non_negative(&row.apartment_size),
            liked_pets,
            skipped_pets,
            adopter_id: row.adopter_id,
            name: row.name,
            country: row.country,
            username: row.username,
            password: row.password,
            pref_species: row.pref_species,
        }
    }
}

impl From<&AdopterProfile> for AdopterRow {
    fn from(adopter: &AdopterProfile) -> Self {
        AdopterRow {
            adopter_id: adopter.adopter_id.clone(),
            name: adopter.name.clone(),
            country: adopter.country.clone(),
            age: adopter.age.to_string(),
            pref_species: adopter.pref_species.clone(),
            pref_gender: adopter.pref_gender.label().to_string(),
            house: format_flag(adopter.has_house).to_string(),
            garden: format_flag(adopter.has_garden).to_string(),
            activity_level: adopter.activity_level.label().to_string(),
            allergy_friendly: format_flag(adopter.allergy_friendly).to_string(),
            apartment_size: adopter.apartment_size.to_string(),
            username: adopter.username.clone(),
            password: adopter.password.clone(),
            liked_pets: encode_id_list(&adopter.liked_pets),
            skipped_pets: encode_id_list(&adopter.skipped_pets),
        }
    }
}

/// Row of `shelters.csv`
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct ShelterRow {
    shelter_id: String,
    name: String,
    address: String,
    email: String,
    phone: String,
    username: String,
    password: String,
}

impl From<ShelterRow> for ShelterProfile {
    fn from(row: ShelterRow) -> Self {
        ShelterProfile {
            shelter_id: row.shelter_id,
            name: row.name,
            address: row.address,
            phone: row.phone,
            email: row.email,
            username: row.username,
            password: row.password,
        }
    }
}

impl From<&ShelterProfile> for ShelterRow {
    fn from(shelter: &ShelterProfile) -> Self {
        ShelterRow {
            shelter_id: shelter.shelter_id.clone(),
            name: shelter.name.clone(),
            address: shelter.address.clone(),
            email: shelter.email.clone(),
            phone: shelter.phone.clone(),
            username: shelter.username.clone(),
            password: shelter.password.clone(),
        }
    }
}
