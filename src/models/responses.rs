use serde::{Deserialize, Serialize};

use crate::models::domain::{Listing, RankedResult};
use crate::models::preferences::PreferenceProfile;

/// Response for the rank endpoint
#[derive(Debug, Clone, Serialize)]
pub struct RankResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub apartments: Vec<RankedResult>,
    pub count: usize,
    pub total_listings: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferences: Option<PreferenceProfile>,
}

/// Response listing stored apartments
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApartmentsResponse {
    pub success: bool,
    pub count: usize,
    pub apartments: Vec<Listing>,
}

/// Result of an ingest batch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestResponse {
    pub success: bool,
    pub new: usize,
    pub updated: usize,
}

/// Response for the geocode endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocodeResponse {
    pub success: bool,
    pub latitude: f64,
    pub longitude: f64,
    pub address: String,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub listings: usize,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>, status_code: u16) -> Self {
        Self {
            success: false,
            error: error.into(),
            message: message.into(),
            status_code,
        }
    }
}
