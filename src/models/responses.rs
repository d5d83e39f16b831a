use serde::{Deserialize, Serialize};

use crate::core::{ContactInfo, DecisionOutcome, SessionState};
use crate::models::domain::{PetRecord, ScoreBreakdown};

/// Pet as shown to clients, with its photo resolved
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PetCard {
    #[serde(flatten)]
    pub pet: PetRecord,
    #[serde(rename = "imageUrl")]
    pub image_url: Option<String>,
}

/// Ranked entry in a recommendation list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendedPet {
    #[serde(flatten)]
    pub card: PetCard,
    #[serde(rename = "matchScore")]
    pub match_score: f64,
    pub breakdown: ScoreBreakdown,
}

/// Position in the adopter's browsing pass
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionView {
    pub state: SessionState,
    pub cursor: usize,
    pub total: usize,
    pub remaining: usize,
    #[serde(rename = "currentPet")]
    pub current_pet: Option<PetCard>,
}

/// Response for the recommendations endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationsResponse {
    #[serde(rename = "adopterId")]
    pub adopter_id: String,
    pub recommendations: Vec<RecommendedPet>,
    pub session: SessionView,
    /// Set when there is nothing to recommend
    pub message: Option<String>,
}

/// Response for a like or skip
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionResponse {
    pub outcome: DecisionOutcome,
    pub message: String,
    pub session: SessionView,
}

/// One entry of the liked pets page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LikedPetCard {
    #[serde(rename = "petId")]
    pub pet_id: String,
    /// False when the pet has been removed from the catalog
    pub available: bool,
    pub pet: Option<PetCard>,
    pub contact: Option<ContactInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LikedPetsResponse {
    #[serde(rename = "adopterId")]
    pub adopter_id: String,
    #[serde(rename = "likedPets")]
    pub liked_pets: Vec<LikedPetCard>,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PetListResponse {
    pub pets: Vec<PetCard>,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeciesResponse {
    pub species: Vec<String>,
}

/// Account deletion result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub success: bool,
    pub message: String,
    #[serde(rename = "removedPets", skip_serializing_if = "Option::is_none")]
    pub removed_pets: Option<usize>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    #[serde(rename = "activeSessions")]
    pub active_sessions: u64,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
