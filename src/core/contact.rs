use serde::{Deserialize, Serialize};

use crate::models::{PetRecord, ShelterProfile};

/// Placeholder shown when a shelter has no phone number on file
pub const PHONE_NOT_PROVIDED: &str = "Not provided";

/// Shelter contact details handed to an adopter after a like
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
    #[serde(rename = "petId")]
    pub pet_id: String,
    #[serde(rename = "petName")]
    pub pet_name: String,
    #[serde(rename = "shelterName")]
    pub shelter_name: String,
    pub address: String,
    pub phone: String,
    pub email: String,
}

impl ContactInfo {
    pub fn new(pet: &PetRecord, shelter: &ShelterProfile) -> Self {
        Self {
            pet_id: pet.pet_id.clone(),
            pet_name: pet.name.clone(),
            shelter_name: shelter.name.clone(),
            address: shelter.address.clone(),
            phone: format_phone(&shelter.phone),
            email: shelter.email.clone(),
        }
    }

    pub fn message(&self) -> String {
        format!(
            "{} was liked by you. The contact information of the shelter located in {} is phone number {} and email {}. Please don't hesitate to contact them!",
            self.pet_name, self.address, self.phone, self.email
        )
    }
}

/// Format a stored phone number for display
///
/// `4915112345678` becomes `+491 5112345678`. Anything that is not purely
/// digits is shown as stored; a blank value becomes "Not provided".
pub fn format_phone(raw: &str) -> String {
    let phone = raw.trim();
    if phone.is_empty() {
        return PHONE_NOT_PROVIDED.to_string();
    }

    if phone.len() >= 3 && phone.chars().all(|c| c.is_ascii_digit()) {
        let (prefix, rest) = phone.split_at(3);
        format!("+{} {}", prefix, rest)
    } else {
        phone.to_string()
    }
}
