use actix_web::{web, HttpResponse, Responder};
use validator::Validate;

use crate::models::{AddPetRequest, PetCard, PetListResponse, PetRecord, SpeciesResponse, UpdatePetRequest};
use crate::routes::{account_error_response, not_found, store_error_response, validation_error, AppState};
use crate::services::{accounts, StoreError};

/// Configure catalog routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/pets", web::get().to(list_pets))
        .route("/pets/{id}", web::patch().to(update_pet))
        .route("/shelters/{id}/pets", web::get().to(list_shelter_pets))
        .route("/shelters/{id}/pets", web::post().to(add_pet))
        .route("/species", web::get().to(list_species));
}

fn pet_list(state: &AppState, pets: Vec<PetRecord>) -> PetListResponse {
    let pets: Vec<PetCard> = pets.into_iter().map(|pet| state.pet_card(pet)).collect();
    PetListResponse {
        count: pets.len(),
        pets,
    }
}

/// GET /api/v1/pets
async fn list_pets(state: web::Data<AppState>) -> impl Responder {
    match state.blocking(|store| store.list_pets()).await {
        Ok(Ok(pets)) => HttpResponse::Ok().json(pet_list(&state, pets)),
        Ok(Err(e)) => store_error_response(&e),
        Err(response) => response,
    }
}

/// GET /api/v1/shelters/{id}/pets
async fn list_shelter_pets(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let shelter_id = path.into_inner();

    let id = shelter_id.clone();
    let listed = state
        .blocking(move |store| -> Result<Option<Vec<PetRecord>>, StoreError> {
            match store.shelter(&id)? {
                Some(shelter) => store.pets_by_shelter(&shelter.name).map(Some),
                None => Ok(None),
            }
        })
        .await;

    match listed {
        Ok(Ok(Some(pets))) => HttpResponse::Ok().json(pet_list(&state, pets)),
        Ok(Ok(None)) => not_found("Shelter", &shelter_id),
        Ok(Err(e)) => store_error_response(&e),
        Err(response) => response,
    }
}

/// List a new pet under a shelter
///
/// POST /api/v1/shelters/{id}/pets
async fn add_pet(
    state: web::Data<AppState>,
    path: web::Path<String>,
    req: web::Json<AddPetRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_error(errors);
    }

    let shelter_id = path.into_inner();
    let req = req.into_inner();
    match state.blocking(move |store| accounts::add_pet(store, &shelter_id, req)).await {
        Ok(Ok(pet)) => HttpResponse::Created().json(state.pet_card(pet)),
        Ok(Err(e)) => account_error_response(&e),
        Err(response) => response,
    }
}

/// Edit a listed pet; absent fields keep their value
///
/// PATCH /api/v1/pets/{id}
async fn update_pet(
    state: web::Data<AppState>,
    path: web::Path<String>,
    req: web::Json<UpdatePetRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_error(errors);
    }

    let pet_id = path.into_inner();
    let req = req.into_inner();
    match state.blocking(move |store| accounts::edit_pet(store, &pet_id, req)).await {
        Ok(Ok(pet)) => HttpResponse::Ok().json(state.pet_card(pet)),
        Ok(Err(e)) => account_error_response(&e),
        Err(response) => response,
    }
}

/// GET /api/v1/species
async fn list_species(state: web::Data<AppState>) -> impl Responder {
    match state.blocking(|store| accounts::species_offered(store)).await {
        Ok(Ok(species)) => HttpResponse::Ok().json(SpeciesResponse { species }),
        Ok(Err(e)) => account_error_response(&e),
        Err(response) => response,
    }
}
