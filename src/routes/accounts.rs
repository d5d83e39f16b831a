use actix_web::{web, HttpResponse, Responder};
use validator::Validate;

use crate::models::{DeleteResponse, LoginRequest, RegisterAdopterRequest, RegisterShelterRequest};
use crate::routes::{account_error_response, not_found, store_error_response, validation_error, AppState};
use crate::services::{accounts, StoreError};

/// Configure adopter and shelter account routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/adopters", web::post().to(register_adopter))
        .route("/adopters/login", web::post().to(login_adopter))
        .route("/adopters/{id}", web::delete().to(delete_adopter))
        .route("/shelters", web::post().to(register_shelter))
        .route("/shelters/login", web::post().to(login_shelter))
        .route("/shelters/{id}", web::delete().to(delete_shelter));
}

/// POST /api/v1/adopters
async fn register_adopter(
    state: web::Data<AppState>,
    req: web::Json<RegisterAdopterRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_error(errors);
    }

    let req = req.into_inner();
    match state.blocking(move |store| accounts::register_adopter(store, req)).await {
        Ok(Ok(adopter)) => HttpResponse::Created().json(adopter),
        Ok(Err(e)) => account_error_response(&e),
        Err(response) => response,
    }
}

/// POST /api/v1/adopters/login
async fn login_adopter(state: web::Data<AppState>, req: web::Json<LoginRequest>) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_error(errors);
    }

    let req = req.into_inner();
    match state.blocking(move |store| accounts::login_adopter(store, &req)).await {
        Ok(Ok(adopter)) => {
            tracing::info!("Adopter {} logged in", adopter.adopter_id);
            HttpResponse::Ok().json(adopter)
        }
        Ok(Err(e)) => account_error_response(&e),
        Err(response) => response,
    }
}

/// Delete an adopter account and drop its browsing session
///
/// DELETE /api/v1/adopters/{id}
async fn delete_adopter(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let adopter_id = path.into_inner();

    let id = adopter_id.clone();
    match state.blocking(move |store| store.delete_adopter(&id)).await {
        Ok(Ok(true)) => {
            state.sessions.invalidate(&adopter_id).await;
            tracing::info!("Deleted adopter {}", adopter_id);
            HttpResponse::Ok().json(DeleteResponse {
                success: true,
                message: format!("Adopter {} deleted", adopter_id),
                removed_pets: None,
            })
        }
        Ok(Ok(false)) => not_found("Adopter", &adopter_id),
        Ok(Err(e)) => store_error_response(&e),
        Err(response) => response,
    }
}

/// POST /api/v1/shelters
async fn register_shelter(
    state: web::Data<AppState>,
    req: web::Json<RegisterShelterRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_error(errors);
    }

    let req = req.into_inner();
    match state.blocking(move |store| accounts::register_shelter(store, req)).await {
        Ok(Ok(shelter)) => HttpResponse::Created().json(shelter),
        Ok(Err(e)) => account_error_response(&e),
        Err(response) => response,
    }
}

/// POST /api/v1/shelters/login
async fn login_shelter(state: web::Data<AppState>, req: web::Json<LoginRequest>) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_error(errors);
    }

    let req = req.into_inner();
    match state.blocking(move |store| accounts::login_shelter(store, &req)).await {
        Ok(Ok(shelter)) => {
            tracing::info!("Shelter {} logged in", shelter.shelter_id);
            HttpResponse::Ok().json(shelter)
        }
        Ok(Err(e)) => account_error_response(&e),
        Err(response) => response,
    }
}

/// Delete a shelter together with every pet it listed
///
/// DELETE /api/v1/shelters/{id}
async fn delete_shelter(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let shelter_id = path.into_inner();

    let id = shelter_id.clone();
    match state.blocking(move |store| store.delete_shelter(&id)).await {
        Ok(Ok(removed_pets)) => {
            tracing::info!("Deleted shelter {} and {} pets", shelter_id, removed_pets);
            HttpResponse::Ok().json(DeleteResponse {
                success: true,
                message: format!("Shelter {} deleted", shelter_id),
                removed_pets: Some(removed_pets),
            })
        }
        Ok(Err(StoreError::NotFound(_))) => not_found("Shelter", &shelter_id),
        Ok(Err(e)) => store_error_response(&e),
        Err(response) => response,
    }
}
