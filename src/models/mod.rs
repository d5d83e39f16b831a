// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    ActivityLevel, AdopterProfile, Decision, Gender, PetIdSet, PetRecord, PreferredGender,
    ScoreBreakdown, ScoredPet, ScoringWeights, ShelterProfile,
};
pub use requests::{
    AddPetRequest, DecisionRequest, LoginRequest, RecommendationQuery, RegisterAdopterRequest,
    RegisterShelterRequest, UpdatePetRequest,
};
pub use responses::{
    DecisionResponse, DeleteResponse, ErrorResponse, HealthResponse, LikedPetCard,
    LikedPetsResponse, PetCard, PetListResponse, RecommendationsResponse, RecommendedPet,
    SessionView, SpeciesResponse,
};
