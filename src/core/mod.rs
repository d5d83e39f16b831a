// Core algorithm exports
pub mod contact;
pub mod filters;
pub mod recommender;
pub mod scoring;
pub mod session;

pub use contact::{format_phone, ContactInfo};
pub use filters::{is_candidate, is_space_suitable};
pub use recommender::{DecisionOutcome, EngineError, LikedPet, Recommender};
pub use scoring::{calculate_match_score, score};
pub use session::{RecommendationSession, SessionState};
