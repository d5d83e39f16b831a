use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

/// Activity level shared by adopters (what they can keep up with) and pets
/// (what they need).
///
/// `Unspecified` is what a blank or unrecognised stored value decodes to. It
/// ranks below `Low`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActivityLevel {
    Unspecified,
    Low,
    Medium,
    High,
}

impl ActivityLevel {
    /// Ordinal used by the activity signal: Low=1, Medium=2, High=3.
    #[inline]
    pub fn ordinal(self) -> u8 {
        match self {
            ActivityLevel::Unspecified => 0,
            ActivityLevel::Low => 1,
            ActivityLevel::Medium => 2,
            ActivityLevel::High => 3,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ActivityLevel::Unspecified => "",
            ActivityLevel::Low => "Low",
            ActivityLevel::Medium => "Medium",
            ActivityLevel::High => "High",
        }
    }
}

impl Default for ActivityLevel {
    fn default() -> Self {
        ActivityLevel::Unspecified
    }
}

/// A pet's gender
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    Unspecified,
}

impl Gender {
    pub fn label(self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Unspecified => "",
        }
    }
}

/// Gender an adopter is looking for
///
/// `Unspecified` is what a blank or unrecognised stored preference reads as.
/// It only matches pets whose gender is unspecified too.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PreferredGender {
    Male,
    Female,
    Any,
    Unspecified,
}

impl PreferredGender {
    #[inline]
    pub fn accepts(self, gender: Gender) -> bool {
        match self {
            PreferredGender::Any => true,
            PreferredGender::Male => gender == Gender::Male,
            PreferredGender::Female => gender == Gender::Female,
            PreferredGender::Unspecified => gender == Gender::Unspecified,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PreferredGender::Male => "Male",
            PreferredGender::Female => "Female",
            PreferredGender::Any => "Any",
            PreferredGender::Unspecified => "",
        }
    }
}

/// Insertion-ordered set of pet ids.
///
/// Backs the liked and skipped lists. Order is kept so the stored
/// comma-joined field re-encodes in the order decisions were made.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PetIdSet(IndexSet<String>);

impl PetIdSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the id was not already present
    pub fn insert(&mut self, pet_id: impl Into<String>) -> bool {
        self.0.insert(pet_id.into())
    }

    pub fn contains(&self, pet_id: &str) -> bool {
        self.0.contains(pet_id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for PetIdSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// Adopter account with matching preferences and decision history
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdopterProfile {
    #[serde(rename = "adopterId")]
    pub adopter_id: String,
    pub name: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub age: u8,
    pub username: String,
    #[serde(skip_serializing, default)]
    pub password: String,
    #[serde(rename = "prefSpecies")]
    pub pref_species: String,
    #[serde(rename = "prefGender")]
    pub pref_gender: PreferredGender,
    #[serde(rename = "activityLevel")]
    pub activity_level: ActivityLevel,
    #[serde(rename = "allergyFriendly")]
    pub allergy_friendly: bool,
    #[serde(rename = "hasHouse")]
    pub has_house: bool,
    #[serde(rename = "hasGarden")]
    pub has_garden: bool,
    /// Square metres; zero when unknown
    #[serde(rename = "apartmentSize", default)]
    pub apartment_size: f64,
    #[serde(rename = "likedPets", default)]
    pub liked_pets: PetIdSet,
    #[serde(rename = "skippedPets", default)]
    pub skipped_pets: PetIdSet,
}

impl AdopterProfile {
    /// Whether the pet was already liked or skipped
    #[inline]
    pub fn has_decided(&self, pet_id: &str) -> bool {
        self.liked_pets.contains(pet_id) || self.skipped_pets.contains(pet_id)
    }
}

/// An adoptable animal listed by a shelter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PetRecord {
    #[serde(rename = "petId")]
    pub pet_id: String,
    pub name: String,
    pub species: String,
    #[serde(default)]
    pub breed: String,
    pub gender: Gender,
    #[serde(default)]
    pub age: f64,
    #[serde(rename = "activityLevel")]
    pub activity_level: ActivityLevel,
    #[serde(rename = "allergyFriendly")]
    pub allergy_friendly: bool,
    #[serde(rename = "timeInShelter", default)]
    pub time_in_shelter: String,
    #[serde(rename = "disabilityCurrent", default)]
    pub disability_current: String,
    #[serde(rename = "disabilityPast", default)]
    pub disability_past: String,
    #[serde(rename = "specialNeeds", default)]
    pub special_needs: String,
    /// Name of the listing shelter, not its id
    #[serde(rename = "shelterName")]
    pub shelter_name: String,
    #[serde(rename = "imagePath", default)]
    pub image_path: Option<String>,
}

impl PetRecord {
    #[inline]
    pub fn has_special_needs(&self) -> bool {
        !self.special_needs.trim().is_empty()
    }
}

/// Shelter account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShelterProfile {
    #[serde(rename = "shelterId")]
    pub shelter_id: String,
    pub name: String,
    pub address: String,
    pub phone: String,
    pub email: String,
    pub username: String,
    #[serde(skip_serializing, default)]
    pub password: String,
}

/// Adopter reaction to a recommended pet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Like,
    Skip,
}

/// Per-signal contributions to a compatibility score
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub species: f64,
    pub gender: f64,
    pub activity: f64,
    pub allergy: f64,
    pub space: f64,
}

impl ScoreBreakdown {
    #[inline]
    pub fn total(&self) -> f64 {
        (self.species + self.gender + self.activity + self.allergy + self.space).clamp(0.0, 1.0)
    }
}

/// Ranked recommendation entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredPet {
    pub pet: PetRecord,
    #[serde(rename = "matchScore")]
    pub match_score: f64,
    pub breakdown: ScoreBreakdown,
}

/// Scoring weights
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub species: f64,
    pub gender: f64,
    pub activity: f64,
    pub allergy: f64,
    pub space: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            species: 0.3,
            gender: 0.1,
            activity: 0.2,
            allergy: 0.2,
            space: 0.2,
        }
    }
}
