use crate::core::AddressResolver;
use crate::models::Coordinates;
use reqwest::blocking::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};
use thiserror::Error;

/// Errors that can occur when talking to the geocoding service
#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// Enforces a minimum gap between calls
///
/// One limiter is shared by every clone of the geocoder, so the gap holds
/// across all requests in the process. Callers queue on the lock while the
/// current holder waits out the interval.
#[derive(Debug)]
pub struct RateLimiter {
    min_interval: Duration,
    last_call: Mutex<Option<Instant>>,
}

impl RateLimiter {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_call: Mutex::new(None),
        }
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Block until a call is allowed, then record it
    pub fn acquire(&self) {
        let mut last_call = self.last_call.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(previous) = *last_call {
            let elapsed = previous.elapsed();
            if elapsed < self.min_interval {
                std::thread::sleep(self.min_interval - elapsed);
            }
        }

        *last_call = Some(Instant::now());
    }
}

/// One search hit; Nominatim returns coordinates as strings
#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
}

/// OpenStreetMap Nominatim client
///
/// Uses a blocking HTTP client: resolution happens inside the synchronous
/// ranking pipeline, which the HTTP layer runs on the blocking thread pool.
#[derive(Clone)]
pub struct NominatimGeocoder {
    base_url: String,
    user_agent: String,
    client: Client,
    limiter: Arc<RateLimiter>,
}

impl NominatimGeocoder {
    /// Create a new geocoder
    pub fn new(
        base_url: impl Into<String>,
        user_agent: impl Into<String>,
        timeout: Duration,
        min_interval: Duration,
    ) -> Result<Self, GeocodeError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            base_url: base_url.into(),
            user_agent: user_agent.into(),
            client,
            limiter: Arc::new(RateLimiter::new(min_interval)),
        })
    }

    pub fn limiter(&self) -> &Arc<RateLimiter> {
        &self.limiter
    }

    /// Look up the first match for an address
    ///
    /// `Ok(None)` means the service answered but found nothing.
    pub fn geocode(&self, address: &str) -> Result<Option<Coordinates>, GeocodeError> {
        let url = format!(
            "{}?q={}&format=json&limit=1",
            self.base_url.trim_end_matches('/'),
            urlencoding::encode(address)
        );

        self.limiter.acquire();

        tracing::debug!("Geocoding address: {}", address);

        let response = self
            .client
            .get(&url)
            .header(reqwest::header::USER_AGENT, &self.user_agent)
            .send()?;

        if !response.status().is_success() {
            return Err(GeocodeError::ApiError(format!(
                "Geocoding failed: {}",
                response.status()
            )));
        }

        let places: Vec<NominatimPlace> = response
            .json()
            .map_err(|e| GeocodeError::InvalidResponse(format!("Failed to parse results: {}", e)))?;

        let Some(place) = places.first() else {
            return Ok(None);
        };

        let latitude = parse_degrees(&place.lat)?;
        let longitude = parse_degrees(&place.lon)?;

        Ok(Some(Coordinates::new(latitude, longitude)))
    }
}

fn parse_degrees(value: &str) -> Result<f64, GeocodeError> {
    value
        .trim()
        .parse::<f64>()
        .map_err(|_| GeocodeError::InvalidResponse(format!("Invalid coordinate: {}", value)))
}

/// Address lookup that reports service failures separately from misses
///
/// `Ok(None)` is an answer (the address is unknown); `Err` means no answer was
/// obtained and the lookup may succeed later.
pub trait Geocode: Send + Sync {
    fn geocode(&self, address: &str) -> Result<Option<Coordinates>, GeocodeError>;
}

impl Geocode for NominatimGeocoder {
    fn geocode(&self, address: &str) -> Result<Option<Coordinates>, GeocodeError> {
        NominatimGeocoder::geocode(self, address)
    }
}

impl AddressResolver for NominatimGeocoder {
    fn resolve(&self, address: &str) -> Option<Coordinates> {
        match NominatimGeocoder::geocode(self, address) {
            Ok(coords) => coords,
            Err(e) => {
                tracing::warn!("Geocoding error for '{}': {}", address, e);
                None
            }
        }
    }
}

impl std::fmt::Debug for NominatimGeocoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NominatimGeocoder")
            .field("base_url", &self.base_url)
            .field("user_agent", &self.user_agent)
            .field("min_interval", &self.limiter.min_interval())
            .finish()
    }
}

/// Resolver backed by a fixed address table
#[derive(Debug, Clone, Default)]
pub struct StaticResolver {
    entries: HashMap<String, Coordinates>,
}

impl StaticResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, address: &str, coords: Coordinates) -> Self {
        self.entries.insert(normalize_address(address), coords);
        self
    }
}

impl AddressResolver for StaticResolver {
    fn resolve(&self, address: &str) -> Option<Coordinates> {
        self.entries.get(&normalize_address(address)).copied()
    }
}

impl Geocode for StaticResolver {
    fn geocode(&self, address: &str) -> Result<Option<Coordinates>, GeocodeError> {
        Ok(self.resolve(address))
    }
}

/// Lookup key for an address: trimmed and lowercased
pub fn normalize_address(address: &str) -> String {
    address.trim().to_lowercase()
}
