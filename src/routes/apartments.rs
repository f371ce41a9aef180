use actix_web::{web, HttpResponse, Responder};
use std::sync::Arc;
use thiserror::Error;
use validator::Validate;

use crate::core::Ranker;
use crate::models::{
    ApartmentsResponse, CategoryWeights, ErrorResponse, GeocodeQuery, GeocodeResponse,
    HealthResponse, IngestRequest, IngestResponse, PreferenceProfile, ProfileError, RankRequest,
    RankResponse,
};
use crate::services::ListingStore;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<ListingStore>,
    pub ranker: Ranker,
    pub default_weights: CategoryWeights,
    pub inactive_after_days: i64,
}

/// Reasons a rank request is rejected
#[derive(Debug, Error)]
pub enum RankFailure {
    #[error("Could not geocode work address: {0}")]
    WorkAddressUnresolved(String),

    #[error(transparent)]
    InvalidProfile(#[from] ProfileError),
}

/// Configure all apartment routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/apartments", web::get().to(list_apartments))
        .route("/apartments", web::post().to(ingest_apartments))
        .route("/apartments/expire", web::post().to(expire_apartments))
        .route("/rank", web::post().to(rank_apartments))
        .route("/geocode", web::get().to(geocode));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        listings: state.store.len(),
        timestamp: chrono::Utc::now(),
    })
}

/// Active listings, cheapest first
///
/// GET /api/v1/apartments
async fn list_apartments(state: web::Data<AppState>) -> impl Responder {
    let apartments = state.store.listings(true);

    HttpResponse::Ok().json(ApartmentsResponse {
        success: true,
        count: apartments.len(),
        apartments,
    })
}

/// Upsert scraped listings by URL
///
/// POST /api/v1/apartments
///
/// Request body:
/// ```json
/// { "listings": [ { "address": "...", "listing_url": "...", "price": 1200 } ] }
/// ```
async fn ingest_apartments(
    state: web::Data<AppState>,
    req: web::Json<IngestRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse::new(
            "Validation failed",
            errors.to_string(),
            400,
        ));
    }

    let today = chrono::Local::now().date_naive();
    let (new, updated) = state.store.upsert_many(req.into_inner().listings, today);

    tracing::info!("Ingested listings: {} new, {} updated", new, updated);

    HttpResponse::Ok().json(IngestResponse {
        success: true,
        new,
        updated,
    })
}

/// Deactivate listings that have not been seen recently
///
/// POST /api/v1/apartments/expire
async fn expire_apartments(state: web::Data<AppState>) -> impl Responder {
    let today = chrono::Local::now().date_naive();
    let deactivated = state.store.mark_inactive(state.inactive_after_days, today);

    HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "deactivated": deactivated,
    }))
}

/// Rank apartments against the caller's preferences
///
/// POST /api/v1/rank
///
/// Request body:
/// ```json
/// {
///   "max_rent": 1500,
///   "min_bedrooms": 1,
///   "work_address": "400 Locust St, Des Moines, IA",
///   "weights": { "commute": 40, "price_value": 30, "space": 20, "location": 10 }
/// }
/// ```
async fn rank_apartments(
    state: web::Data<AppState>,
    req: web::Json<RankRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for rank request: {:?}", errors);
        return HttpResponse::BadRequest().json(ErrorResponse::new(
            "Validation failed",
            errors.to_string(),
            400,
        ));
    }

    let state = state.into_inner();
    let req = req.into_inner();

    // Geocoding blocks on the network and the rate limiter
    let outcome = web::block(move || run_ranking(&state, &req)).await;

    match outcome {
        Ok(Ok(response)) => HttpResponse::Ok().json(response),
        Ok(Err(failure)) => {
            let error = match &failure {
                RankFailure::WorkAddressUnresolved(_) => "Unresolvable work address",
                RankFailure::InvalidProfile(_) => "Invalid preferences",
            };
            HttpResponse::BadRequest().json(ErrorResponse::new(error, failure.to_string(), 400))
        }
        Err(e) => {
            tracing::error!("Ranking task failed: {}", e);
            HttpResponse::InternalServerError().json(ErrorResponse::new(
                "Ranking failed",
                e.to_string(),
                500,
            ))
        }
    }
}

/// Build the profile and rank active listings
pub fn run_ranking(state: &AppState, req: &RankRequest) -> Result<RankResponse, RankFailure> {
    let mut builder = req.profile_builder(state.default_weights);

    match (req.work_address(), req.work_coordinates()) {
        (Some(address), Some(coords)) => {
            builder = builder.work_location(address, Some(coords));
        }
        (Some(address), None) => {
            tracing::info!("Geocoding work address: {}", address);
            let coords = state
                .ranker
                .geo()
                .resolve_address(address)
                .ok_or_else(|| RankFailure::WorkAddressUnresolved(address.to_string()))?;
            builder = builder.work_location(address, Some(coords));
        }
        (None, Some(coords)) => {
            builder = builder.work_coordinates(coords);
        }
        (None, None) => {
            tracing::debug!("No work address provided, commute scoring is neutral");
        }
    }

    let profile: PreferenceProfile = builder.build()?;

    let listings = state.store.listings(true);
    let mut result = state.ranker.rank(listings, &profile);

    if result.no_matches() {
        return Ok(RankResponse {
            success: true,
            message: Some("No apartments match your criteria".to_string()),
            apartments: Vec::new(),
            count: 0,
            total_listings: result.total_listings,
            preferences: None,
        });
    }

    let count = result.results.len();
    if let Some(limit) = req.limit {
        result.results.truncate(limit);
    }

    tracing::info!(
        "Returning {} ranked apartments (from {} listings)",
        result.results.len(),
        result.total_listings
    );

    Ok(RankResponse {
        success: true,
        message: None,
        apartments: result.results,
        count,
        total_listings: result.total_listings,
        preferences: Some(profile),
    })
}

/// Geocode a free-text address
///
/// GET /api/v1/geocode?address={address}
async fn geocode(
    state: web::Data<AppState>,
    query: web::Query<GeocodeQuery>,
) -> impl Responder {
    let address = query.address.trim().to_string();
    if address.is_empty() {
        return HttpResponse::BadRequest().json(ErrorResponse::new(
            "Missing address parameter",
            "address query parameter is required",
            400,
        ));
    }

    let geo = state.ranker.geo().clone();
    let lookup = address.clone();
    let resolved = web::block(move || geo.resolve_address(&lookup)).await;

    match resolved {
        Ok(Some(coords)) => HttpResponse::Ok().json(GeocodeResponse {
            success: true,
            latitude: coords.latitude,
            longitude: coords.longitude,
            address,
        }),
        Ok(None) => HttpResponse::NotFound().json(ErrorResponse::new(
            "Not found",
            "Could not geocode address",
            404,
        )),
        Err(e) => {
            tracing::error!("Geocoding task failed: {}", e);
            HttpResponse::InternalServerError().json(ErrorResponse::new(
                "Geocoding failed",
                e.to_string(),
                500,
            ))
        }
    }
}
