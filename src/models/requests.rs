use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::domain::{ActivityLevel, Decision, Gender, PreferredGender};

/// Adopter sign-up form
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterAdopterRequest {
    #[validate(length(min = 1))]
    pub name: String,
    #[serde(default)]
    pub country: String,
    #[validate(range(min = 18, max = 99))]
    pub age: u8,
    #[validate(length(min = 1))]
    pub username: String,
    #[validate(length(min = 1))]
    pub password: String,
    #[validate(length(min = 1))]
    #[serde(alias = "pref_species", rename = "prefSpecies")]
    pub pref_species: String,
    #[serde(alias = "pref_gender", rename = "prefGender")]
    pub pref_gender: PreferredGender,
    #[serde(alias = "activity_level", rename = "activityLevel")]
    pub activity_level: ActivityLevel,
    #[serde(alias = "allergy_friendly", rename = "allergyFriendly", default)]
    pub allergy_friendly: bool,
    #[serde(alias = "has_house", rename = "hasHouse", default)]
    pub has_house: bool,
    #[serde(alias = "has_garden", rename = "hasGarden", default)]
    pub has_garden: bool,
    #[serde(alias = "apartment_size", rename = "apartmentSize", default)]
    pub apartment_size: Option<f64>,
}

/// Shelter sign-up form
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterShelterRequest {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(length(min = 1))]
    pub address: String,
    #[validate(email)]
    pub email: String,
    pub phone: String,
    #[validate(length(min = 1))]
    pub username: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// Login form for either account type
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1))]
    pub username: String,
    pub password: String,
}

/// New pet listing
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AddPetRequest {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(length(min = 1))]
    pub species: String,
    #[serde(default)]
    pub breed: String,
    pub gender: Gender,
    #[validate(range(min = 0.0))]
    #[serde(default)]
    pub age: f64,
    #[serde(alias = "activity_level", rename = "activityLevel")]
    pub activity_level: ActivityLevel,
    #[serde(alias = "allergy_friendly", rename = "allergyFriendly", default)]
    pub allergy_friendly: bool,
    #[serde(alias = "time_in_shelter", rename = "timeInShelter", default)]
    pub time_in_shelter: String,
    #[serde(alias = "disability_current", rename = "disabilityCurrent", default)]
    pub disability_current: String,
    #[serde(alias = "disability_past", rename = "disabilityPast", default)]
    pub disability_past: String,
    #[serde(alias = "special_needs", rename = "specialNeeds", default)]
    pub special_needs: String,
    #[serde(alias = "image_path", rename = "imagePath", default)]
    pub image_path: Option<String>,
}

/// Partial edit of a pet listing; absent fields are left unchanged
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdatePetRequest {
    #[validate(length(min = 1))]
    pub name: Option<String>,
    pub breed: Option<String>,
    #[validate(range(min = 0.0))]
    pub age: Option<f64>,
    #[serde(alias = "activity_level", rename = "activityLevel", default)]
    pub activity_level: Option<ActivityLevel>,
    #[serde(alias = "allergy_friendly", rename = "allergyFriendly", default)]
    pub allergy_friendly: Option<bool>,
    #[serde(alias = "time_in_shelter", rename = "timeInShelter", default)]
    pub time_in_shelter: Option<String>,
    #[serde(alias = "special_needs", rename = "specialNeeds", default)]
    pub special_needs: Option<String>,
    #[serde(alias = "image_path", rename = "imagePath", default)]
    pub image_path: Option<String>,
}

/// Query string for the recommendations endpoint
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecommendationQuery {
    pub limit: Option<usize>,
}

/// Like or skip the pet currently shown
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DecisionRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "pet_id", rename = "petId")]
    pub pet_id: String,
    pub decision: Decision,
}
