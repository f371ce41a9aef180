use actix_cors::Cors;
use actix_web::{web, App, HttpServer, HttpResponse, middleware, error, http::StatusCode};
use apt_rank::config::Settings;
use apt_rank::core::{GeoCalculator, Ranker};
use apt_rank::models::CategoryWeights;
use apt_rank::routes::{self, AppState};
use apt_rank::services::{CachedResolver, ListingStore, NominatimGeocoder};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, error, warn};
use tracing_subscriber::EnvFilter;

/// JSON error response for JSON payload errors
#[derive(Debug, serde::Serialize)]
pub struct JsonError {
    pub success: bool,
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

impl std::fmt::Display for JsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

impl std::error::Error for JsonError {}

impl error::ResponseError for JsonError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::BAD_REQUEST))
            .json(self)
    }
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(err: error::JsonPayloadError, req: &actix_web::HttpRequest) -> actix_web::Error {
    info!("JSON payload error on {}: {}", req.path(), err);
    JsonError {
        success: false,
        error: "invalid_json".to_string(),
        message: format!("Invalid JSON: {}", err),
        status_code: 400,
    }
    .into()
}

/// Handle query payload errors
pub fn handle_query_payload_error(err: error::QueryPayloadError, _req: &actix_web::HttpRequest) -> actix_web::Error {
    JsonError {
        success: false,
        error: "invalid_query".to_string(),
        message: format!("Invalid query: {}", err),
        status_code: 400,
    }
    .into()
}

fn init_logging(level: &str, format: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.compact().init();
    }
}

fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()));
        }
    };

    init_logging(&settings.logging.level, &settings.logging.format);

    info!("Starting apartment ranking service...");

    let default_weights = CategoryWeights::from(&settings.scoring.weights);
    if default_weights.sum() != apt_rank::models::WEIGHT_TOTAL {
        error!("Configured default weights sum to {}, expected 100", default_weights.sum());
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "scoring.weights must sum to 100",
        ));
    }

    // The blocking HTTP client has to be built outside the async runtime
    let geocoder = NominatimGeocoder::new(
        settings.geocoder.base_url.clone(),
        settings.geocoder.user_agent.clone(),
        Duration::from_secs(settings.geocoder.timeout_secs),
        Duration::from_millis(settings.geocoder.min_interval_ms),
    )
    .map_err(|e| {
        error!("Failed to create geocoder: {}", e);
        std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
    })?;

    let resolver = CachedResolver::new(
        geocoder,
        settings.geocoder.cache_size,
        settings.geocoder.cache_ttl_secs,
    );

    info!(
        "Geocoder initialized ({}, min interval {}ms, cache {} entries)",
        settings.geocoder.base_url, settings.geocoder.min_interval_ms, settings.geocoder.cache_size
    );

    let store = Arc::new(ListingStore::new());
    if let Some(path) = &settings.store.seed_path {
        let today = chrono::Local::now().date_naive();
        match store.load_seed(path, today) {
            Ok((new, updated)) => info!("Loaded {} listings from {} ({} duplicates)", new, path, updated),
            Err(e) => warn!("Failed to load seed listings from {}: {}", path, e),
        }
    }

    let ranker = Ranker::new(
        GeoCalculator::new(Arc::new(resolver)),
        settings.scoring.city_center(),
    );

    info!("Ranker initialized with default weights: {:?}", default_weights);

    let app_state = AppState {
        store,
        ranker,
        default_weights,
        inactive_after_days: settings.store.inactive_after_days,
    };

    actix_web::rt::System::new().block_on(serve(settings, app_state))
}

async fn serve(settings: Settings, app_state: AppState) -> std::io::Result<()> {
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
