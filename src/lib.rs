//! PawMatch - Pet adoption matching service
//!
//! This library scores how well a pet suits an adopter, ranks the catalog
//! into a recommendation list and records the adopter's like/skip decisions
//! while they browse it one pet at a time.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use core::{DecisionOutcome, EngineError, RecommendationSession, Recommender, SessionState};
pub use models::{AdopterProfile, Decision, PetRecord, ScoredPet, ScoringWeights, ShelterProfile};
pub use services::{AdoptionStore, CsvStore, InMemoryStore};
