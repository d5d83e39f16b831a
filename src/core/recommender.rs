use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::{
    contact::ContactInfo,
    filters::is_candidate,
    scoring::{calculate_match_score, DEFAULT_APARTMENT_SIZE_THRESHOLD},
    session::RecommendationSession,
};
use crate::models::{AdopterProfile, Decision, PetRecord, ScoreBreakdown, ScoredPet, ScoringWeights};
use crate::services::store::{resolve_shelter, AdopterStore, PetCatalog, ShelterStore, StoreError};

/// Errors raised by the recommendation engine
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("No pets are listed yet")]
    EmptyCatalog,

    #[error("No more pets to recommend")]
    NoCandidatesRemaining,

    #[error("Pet not found: {0}")]
    PetNotFound(String),

    #[error("Shelter not found: {0}")]
    ShelterNotFound(String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl EngineError {
    /// Whether this is the "nothing left to show" end state rather than a
    /// failure
    pub fn is_terminal(&self) -> bool {
        matches!(self, EngineError::EmptyCatalog | EngineError::NoCandidatesRemaining)
    }
}

/// What a decision hands back to the adopter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum DecisionOutcome {
    /// Liked: how to reach the shelter
    Contact(ContactInfo),
    /// Skipped
    Acknowledgement {
        #[serde(rename = "petId")]
        pet_id: String,
        #[serde(rename = "petName")]
        pet_name: String,
    },
}

impl DecisionOutcome {
    pub fn message(&self) -> String {
        match self {
            DecisionOutcome::Contact(contact) => contact.message(),
            DecisionOutcome::Acknowledgement { pet_name, .. } => {
                format!("{} has been skipped.", pet_name)
            }
        }
    }
}

/// Entry of an adopter's liked list
#[derive(Debug, Clone)]
pub enum LikedPet {
    /// Still listed. `contact` is `None` when its shelter can no longer be found.
    Available {
        pet: PetRecord,
        contact: Option<ContactInfo>,
    },
    /// Removed from the catalog since it was liked
    Unavailable { pet_id: String },
}

/// Recommendation engine
///
/// # Pipeline
/// 1. Drop pets the adopter already liked or skipped
/// 2. Score every remaining pet
/// 3. Stable sort by score, descending; ties keep catalog order
/// 4. Optionally keep the top N
#[derive(Debug, Clone)]
pub struct Recommender {
    weights: ScoringWeights,
    apartment_size_threshold: f64,
}

impl Recommender {
    pub fn new(weights: ScoringWeights, apartment_size_threshold: f64) -> Self {
        Self {
            weights,
            apartment_size_threshold,
        }
    }

    pub fn with_default_weights() -> Self {
        Self::new(ScoringWeights::default(), DEFAULT_APARTMENT_SIZE_THRESHOLD)
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    /// Score one pet for one adopter with this engine's weights
    pub fn score(&self, adopter: &AdopterProfile, pet: &PetRecord) -> ScoreBreakdown {
        calculate_match_score(adopter, pet, &self.weights, self.apartment_size_threshold)
    }

    /// Rank the catalog for an adopter
    ///
    /// # Arguments
    /// * `adopter` - The adopter, including liked and skipped pets
    /// * `catalog` - Every listed pet; its order breaks score ties
    /// * `limit` - Keep only the top N, or everything when `None`
    ///
    /// # Returns
    /// The ranked pets, or `EmptyCatalog` / `NoCandidatesRemaining` when
    /// there is nothing to show
    pub fn recommend(
        &self,
        adopter: &AdopterProfile,
        catalog: Vec<PetRecord>,
        limit: Option<usize>,
    ) -> Result<Vec<ScoredPet>, EngineError> {
        if catalog.is_empty() {
            return Err(EngineError::EmptyCatalog);
        }
        let catalog_size = catalog.len();

        let mut ranked: Vec<ScoredPet> = catalog
            .into_iter()
            .filter(|pet| is_candidate(adopter, pet))
            .map(|pet| {
                let breakdown = self.score(adopter, &pet);
                ScoredPet {
                    match_score: breakdown.total(),
                    breakdown,
                    pet,
                }
            })
            .collect();

        if ranked.is_empty() {
            return Err(EngineError::NoCandidatesRemaining);
        }

        // sort_by is stable
        ranked.sort_by(|a, b| {
            b.match_score
                .partial_cmp(&a.match_score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        if let Some(limit) = limit {
            ranked.truncate(limit);
        }

        tracing::debug!(
            "Ranked {} of {} pets for adopter {}",
            ranked.len(),
            catalog_size,
            adopter.adopter_id
        );

        Ok(ranked)
    }

    /// Rank the catalog and open a fresh browsing session over the result.
    ///
    /// When there is nothing to recommend the session starts out exhausted.
    pub fn start_session(
        &self,
        adopter: &AdopterProfile,
        catalog: Vec<PetRecord>,
        limit: Option<usize>,
    ) -> Result<(Vec<ScoredPet>, RecommendationSession), EngineError> {
        match self.recommend(adopter, catalog, limit) {
            Ok(ranked) => {
                let session =
                    RecommendationSession::start(ranked.iter().map(|entry| entry.pet.pet_id.clone()));
                Ok((ranked, session))
            }
            Err(e) if e.is_terminal() => Ok((Vec::new(), RecommendationSession::start(Vec::<String>::new()))),
            Err(e) => Err(e),
        }
    }

    /// Record a like or skip and advance the session
    ///
    /// The updated adopter is persisted exactly once before returning. On
    /// any error nothing is recorded: `adopter` and `session` are left as
    /// they were so the decision can be retried.
    ///
    /// A like needs the pet's shelter for the contact details and fails with
    /// `ShelterNotFound` when it is gone. A skip of a pet that has since been
    /// removed is still recorded and acknowledged by id.
    pub fn decide<S>(
        &self,
        adopter: &mut AdopterProfile,
        session: &mut RecommendationSession,
        pet_id: &str,
        decision: Decision,
        store: &S,
    ) -> Result<DecisionOutcome, EngineError>
    where
        S: PetCatalog + AdopterStore + ShelterStore + ?Sized,
    {
        let pet = store.pet(pet_id)?;
        let mut updated = adopter.clone();

        let outcome = match decision {
            Decision::Like => {
                let pet = pet.ok_or_else(|| EngineError::PetNotFound(pet_id.to_string()))?;
                let shelter = resolve_shelter(store, &pet)?
                    .ok_or_else(|| EngineError::ShelterNotFound(pet.shelter_name.clone()))?;

                updated.liked_pets.insert(pet_id);
                DecisionOutcome::Contact(ContactInfo::new(&pet, &shelter))
            }
            Decision::Skip => {
                let pet_name = match pet {
                    Some(pet) => pet.name,
                    None => {
                        tracing::warn!("Skipping pet {} which is no longer listed", pet_id);
                        pet_id.to_string()
                    }
                };

                updated.skipped_pets.insert(pet_id);
                DecisionOutcome::Acknowledgement {
                    pet_id: pet_id.to_string(),
                    pet_name,
                }
            }
        };

        store.update_adopter(&updated)?;
        *adopter = updated;
        session.advance();

        tracing::info!(
            "Adopter {} decided {:?} on pet {}",
            adopter.adopter_id,
            decision,
            pet_id
        );

        Ok(outcome)
    }

    /// The adopter's liked pets, in the order they were liked
    pub fn liked_pets<S>(
        &self,
        adopter: &AdopterProfile,
        store: &S,
    ) -> Result<Vec<LikedPet>, EngineError>
    where
        S: PetCatalog + ShelterStore + ?Sized,
    {
        let mut liked = Vec::with_capacity(adopter.liked_pets.len());

        for pet_id in adopter.liked_pets.iter() {
            match store.pet(pet_id)? {
                Some(pet) => {
                    let contact = resolve_shelter(store, &pet)?
                        .map(|shelter| ContactInfo::new(&pet, &shelter));
                    liked.push(LikedPet::Available { pet, contact });
                }
                None => liked.push(LikedPet::Unavailable {
                    pet_id: pet_id.to_string(),
                }),
            }
        }

        Ok(liked)
    }
}

impl Default for Recommender {
    fn default() -> Self {
        Self::with_default_weights()
    }
}
