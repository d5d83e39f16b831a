// Route exports
pub mod accounts;
pub mod pets;
pub mod recommendations;

use actix_web::{http::StatusCode, web, HttpResponse};
use std::sync::Arc;

use crate::config::MatchingSettings;
use crate::core::{EngineError, Recommender};
use crate::models::{ErrorResponse, PetCard, PetRecord};
use crate::services::{AccountError, AdoptionStore, MediaResolver, SessionCache, StoreError};

/// Message shown once there is nothing left to browse
pub const NO_MORE_PETS: &str = "No more pets to recommend.";

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn AdoptionStore>,
    pub sessions: SessionCache,
    pub media: MediaResolver,
    pub recommender: Recommender,
    pub matching: MatchingSettings,
}

impl AppState {
    pub fn pet_card(&self, pet: PetRecord) -> PetCard {
        let image_url = self.media.resolve(pet.image_path.as_deref());
        PetCard { pet, image_url }
    }

    /// Run store work on the blocking thread pool.
    ///
    /// The CSV store does synchronous file I/O, so handlers never call the
    /// store on an async worker directly.
    pub async fn blocking<T, F>(&self, work: F) -> Result<T, HttpResponse>
    where
        F: FnOnce(&dyn AdoptionStore) -> T + Send + 'static,
        T: Send + 'static,
    {
        let store = Arc::clone(&self.store);
        web::block(move || work(store.as_ref())).await.map_err(|e| {
            tracing::error!("Store task failed: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Store failure", e.to_string())
        })
    }
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(recommendations::configure)
            .configure(accounts::configure)
            .configure(pets::configure),
    );
}

pub(crate) fn error_response(status: StatusCode, error: &str, message: impl Into<String>) -> HttpResponse {
    HttpResponse::build(status).json(ErrorResponse {
        error: error.to_string(),
        message: message.into(),
        status_code: status.as_u16(),
    })
}

pub(crate) fn validation_error(errors: validator::ValidationErrors) -> HttpResponse {
    tracing::info!("Validation failed: {}", errors);
    error_response(StatusCode::BAD_REQUEST, "Validation failed", errors.to_string())
}

pub(crate) fn not_found(what: &str, id: &str) -> HttpResponse {
    error_response(StatusCode::NOT_FOUND, &format!("{} not found", what), id)
}

pub(crate) fn store_error_response(e: &StoreError) -> HttpResponse {
    match e {
        StoreError::NotFound(id) => error_response(StatusCode::NOT_FOUND, "Not found", id.clone()),
        StoreError::Conflict(msg) => error_response(StatusCode::CONFLICT, "Conflict", msg.clone()),
        StoreError::Invalid(msg) => error_response(StatusCode::BAD_REQUEST, "Invalid input", msg.clone()),
        StoreError::Unavailable(msg) => {
            tracing::error!("Store unavailable: {}", msg);
            error_response(StatusCode::SERVICE_UNAVAILABLE, "Store unavailable", msg.clone())
        }
        StoreError::Io(_) | StoreError::Csv(_) => {
            tracing::error!("Store failure: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Store failure", e.to_string())
        }
    }
}

pub(crate) fn engine_error_response(e: &EngineError) -> HttpResponse {
    match e {
        EngineError::PetNotFound(id) => not_found("Pet", id),
        EngineError::ShelterNotFound(name) => not_found("Shelter", name),
        EngineError::Store(store_error) => store_error_response(store_error),
        EngineError::EmptyCatalog | EngineError::NoCandidatesRemaining => {
            error_response(StatusCode::OK, "No recommendations", NO_MORE_PETS)
        }
    }
}

pub(crate) fn account_error_response(e: &AccountError) -> HttpResponse {
    match e {
        AccountError::InvalidCredentials => {
            error_response(StatusCode::UNAUTHORIZED, "Invalid credentials", "Invalid username or password")
        }
        AccountError::InvalidField(codec_error) => {
            error_response(StatusCode::BAD_REQUEST, "Validation failed", codec_error.to_string())
        }
        AccountError::ShelterNotFound(id) => not_found("Shelter", id),
        AccountError::PetNotFound(id) => not_found("Pet", id),
        AccountError::Store(store_error) => store_error_response(store_error),
    }
}
