use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::domain::{Coordinates, Listing};
use crate::models::preferences::{CategoryWeights, PreferenceProfile, PreferenceProfileBuilder};

/// Request to rank apartments
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RankRequest {
    #[serde(default)]
    #[validate(range(min = 0))]
    pub min_rent: i64,
    #[serde(default = "default_max_rent")]
    #[validate(range(min = 0))]
    pub max_rent: i64,
    #[serde(default = "default_min_rooms")]
    #[validate(range(min = 0.0))]
    pub min_bedrooms: f64,
    #[serde(default = "default_min_rooms")]
    #[validate(range(min = 0.0))]
    pub min_bathrooms: f64,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub min_sqft: i64,
    #[serde(default)]
    pub work_address: Option<String>,
    #[serde(default)]
    pub work_lat: Option<f64>,
    #[serde(default)]
    pub work_lng: Option<f64>,
    #[serde(default)]
    pub weights: Option<CategoryWeights>,
    #[serde(default)]
    #[validate(range(min = 1, max = 500))]
    pub limit: Option<usize>,
}

fn default_max_rent() -> i64 {
    2000
}

fn default_min_rooms() -> f64 {
    1.0
}

impl RankRequest {
    /// Trimmed work address, or `None` when blank
    pub fn work_address(&self) -> Option<&str> {
        self.work_address
            .as_deref()
            .map(str::trim)
            .filter(|a| !a.is_empty())
    }

    /// Coordinates supplied directly by the caller
    pub fn work_coordinates(&self) -> Option<Coordinates> {
        match (self.work_lat, self.work_lng) {
            (Some(lat), Some(lng)) => Some(Coordinates::new(lat, lng)),
            _ => None,
        }
    }

    /// Builder seeded from the request; the caller attaches the work location
    pub fn profile_builder(&self, default_weights: CategoryWeights) -> PreferenceProfileBuilder {
        PreferenceProfile::builder()
            .budget(self.min_rent, self.max_rent)
            .space_requirements(self.min_bedrooms, self.min_bathrooms, self.min_sqft)
            .weights(self.weights.unwrap_or(default_weights))
    }
}

/// Batch of scraped listings to upsert
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct IngestRequest {
    #[validate(length(min = 1))]
    pub listings: Vec<Listing>,
}

/// Query string for the geocode endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocodeQuery {
    #[serde(default)]
    pub address: String,
}
