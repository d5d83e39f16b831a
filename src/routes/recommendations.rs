use actix_web::{http::StatusCode, web, HttpResponse, Responder};
use validator::Validate;

use crate::core::{LikedPet, RecommendationSession, SessionState};
use crate::models::{
    AdopterProfile, DecisionRequest, DecisionResponse, HealthResponse, LikedPetCard,
    LikedPetsResponse, RecommendationQuery, RecommendationsResponse, RecommendedPet, SessionView,
};
use crate::routes::{
    engine_error_response, error_response, not_found, store_error_response, validation_error,
    AppState, NO_MORE_PETS,
};

/// Configure recommendation and browsing routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/adopters/{id}/recommendations", web::get().to(get_recommendations))
        .route("/adopters/{id}/session", web::get().to(get_session))
        .route("/adopters/{id}/decisions", web::post().to(record_decision))
        .route("/adopters/{id}/liked", web::get().to(get_liked_pets));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let status = match state.blocking(|store| store.health_check()).await {
        Ok(Ok(())) => "healthy",
        Ok(Err(e)) => {
            tracing::warn!("Store health check failed: {}", e);
            "degraded"
        }
        Err(_) => "degraded",
    };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
        active_sessions: state.sessions.stats().active_sessions,
    })
}

async fn load_adopter(state: &AppState, adopter_id: &str) -> Result<AdopterProfile, HttpResponse> {
    let id = adopter_id.to_string();
    match state.blocking(move |store| store.adopter(&id)).await? {
        Ok(Some(adopter)) => Ok(adopter),
        Ok(None) => Err(not_found("Adopter", adopter_id)),
        Err(e) => Err(store_error_response(&e)),
    }
}

async fn session_view(state: &AppState, session: &RecommendationSession) -> SessionView {
    let current_pet = match session.current() {
        Some(pet_id) => {
            let id = pet_id.to_string();
            match state.blocking(move |store| store.pet(&id)).await {
                Ok(Ok(pet)) => pet.map(|pet| state.pet_card(pet)),
                Ok(Err(e)) => {
                    tracing::warn!("Failed to load current pet {}: {}", pet_id, e);
                    None
                }
                Err(_) => None,
            }
        }
        None => None,
    };

    SessionView {
        state: session.state(),
        cursor: session.cursor(),
        total: session.len(),
        remaining: session.remaining(),
        current_pet,
    }
}

/// Rank the catalog for an adopter and start a fresh browsing session
///
/// GET /api/v1/adopters/{id}/recommendations?limit=5
async fn get_recommendations(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<RecommendationQuery>,
) -> impl Responder {
    let adopter_id = path.into_inner();

    if query.limit == Some(0) {
        return error_response(StatusCode::BAD_REQUEST, "Validation failed", "limit must be at least 1");
    }

    let adopter = match load_adopter(&state, &adopter_id).await {
        Ok(adopter) => adopter,
        Err(response) => return response,
    };

    let catalog = match state.blocking(|store| store.list_pets()).await {
        Ok(Ok(pets)) => pets,
        Ok(Err(e)) => return store_error_response(&e),
        Err(response) => return response,
    };

    let limit = state.matching.effective_limit(query.limit);
    tracing::info!("Recommending pets for adopter: {}, limit: {:?}", adopter_id, limit);

    let (ranked, session) = match state.recommender.start_session(&adopter, catalog, limit) {
        Ok(result) => result,
        Err(e) => {
            tracing::error!("Failed to rank pets for {}: {}", adopter_id, e);
            return engine_error_response(&e);
        }
    };

    let view = session_view(&state, &session).await;
    state.sessions.put(&adopter_id, session).await;

    let message = ranked.is_empty().then(|| NO_MORE_PETS.to_string());
    let recommendations: Vec<RecommendedPet> = ranked
        .into_iter()
        .map(|entry| RecommendedPet {
            card: state.pet_card(entry.pet),
            match_score: entry.match_score,
            breakdown: entry.breakdown,
        })
        .collect();

    tracing::info!(
        "Returning {} recommendations for adopter {}",
        recommendations.len(),
        adopter_id
    );

    HttpResponse::Ok().json(RecommendationsResponse {
        adopter_id,
        recommendations,
        session: view,
        message,
    })
}

/// Where the adopter is in their current browsing pass
///
/// GET /api/v1/adopters/{id}/session
async fn get_session(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let adopter_id = path.into_inner();

    if let Err(response) = load_adopter(&state, &adopter_id).await {
        return response;
    }

    let session = state.sessions.get(&adopter_id).await;
    HttpResponse::Ok().json(session_view(&state, &session).await)
}

/// Like or skip the pet currently shown
///
/// POST /api/v1/adopters/{id}/decisions
///
/// Request body:
/// ```json
/// {
///   "petId": "PET1A2B3C",
///   "decision": "like|skip"
/// }
/// ```
async fn record_decision(
    state: web::Data<AppState>,
    path: web::Path<String>,
    req: web::Json<DecisionRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_error(errors);
    }

    let adopter_id = path.into_inner();
    let adopter = match load_adopter(&state, &adopter_id).await {
        Ok(adopter) => adopter,
        Err(response) => return response,
    };

    let session = state.sessions.get(&adopter_id).await;
    if session.state() == SessionState::Browsing && session.current() != Some(req.pet_id.as_str()) {
        tracing::info!(
            "Stale decision from {}: {} is not the current pet ({:?})",
            adopter_id,
            req.pet_id,
            session.current()
        );
        return error_response(
            StatusCode::CONFLICT,
            "Stale decision",
            format!("{} is not the pet currently shown", req.pet_id),
        );
    }

    let recommender = state.recommender.clone();
    let DecisionRequest { pet_id, decision } = req.into_inner();
    let decided = state
        .blocking(move |store| {
            let (mut adopter, mut session) = (adopter, session);
            recommender
                .decide(&mut adopter, &mut session, &pet_id, decision, store)
                .map(|outcome| (outcome, session))
                .map_err(|e| (e, pet_id))
        })
        .await;

    let (outcome, session) = match decided {
        Ok(Ok(decided)) => decided,
        Ok(Err((e, pet_id))) => {
            tracing::warn!("Decision on {} by {} failed: {}", pet_id, adopter_id, e);
            return engine_error_response(&e);
        }
        Err(response) => return response,
    };

    let view = session_view(&state, &session).await;
    state.sessions.put(&adopter_id, session).await;

    HttpResponse::Ok().json(DecisionResponse {
        message: outcome.message(),
        outcome,
        session: view,
    })
}

/// Liked pets with their shelter's contact details
///
/// GET /api/v1/adopters/{id}/liked
async fn get_liked_pets(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let adopter_id = path.into_inner();
    let adopter = match load_adopter(&state, &adopter_id).await {
        Ok(adopter) => adopter,
        Err(response) => return response,
    };

    let recommender = state.recommender.clone();
    let liked = match state.blocking(move |store| recommender.liked_pets(&adopter, store)).await {
        Ok(Ok(liked)) => liked,
        Ok(Err(e)) => return engine_error_response(&e),
        Err(response) => return response,
    };

    let liked_pets: Vec<LikedPetCard> = liked
        .into_iter()
        .map(|entry| match entry {
            LikedPet::Available { pet, contact } => LikedPetCard {
                pet_id: pet.pet_id.clone(),
                available: true,
                pet: Some(state.pet_card(pet)),
                contact,
            },
            LikedPet::Unavailable { pet_id } => LikedPetCard {
                pet_id,
                available: false,
                pet: None,
                contact: None,
            },
        })
        .collect();

    HttpResponse::Ok().json(LikedPetsResponse {
        adopter_id,
        count: liked_pets.len(),
        liked_pets,
    })
}
