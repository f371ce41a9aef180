use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::domain::{Category, Coordinates};

/// Total that the four category weights must add up to
pub const WEIGHT_TOTAL: u32 = 100;

/// Errors raised while building a preference profile
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProfileError {
    #[error("Weights must sum to 100, got {sum}")]
    InvalidWeights { sum: u32 },
}

/// Point budget per scoring category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryWeights {
    pub commute: u32,
    pub price_value: u32,
    pub space: u32,
    pub location: u32,
}

impl CategoryWeights {
    pub fn sum(&self) -> u32 {
        self.commute
            .saturating_add(self.price_value)
            .saturating_add(self.space)
            .saturating_add(self.location)
    }

    pub fn get(&self, category: Category) -> u32 {
        match category {
            Category::Commute => self.commute,
            Category::PriceValue => self.price_value,
            Category::Space => self.space,
            Category::Location => self.location,
        }
    }
}

impl Default for CategoryWeights {
    fn default() -> Self {
        Self {
            commute: 40,
            price_value: 30,
            space: 20,
            location: 10,
        }
    }
}

/// Validated ranking criteria for one request
///
/// Built through [`PreferenceProfile::builder`]; there are no setters, so a
/// profile cannot change while a ranking run is using it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreferenceProfile {
    min_rent: i64,
    max_rent: i64,
    min_bedrooms: f64,
    min_bathrooms: f64,
    min_sqft: i64,
    work_address: Option<String>,
    work_location: Option<Coordinates>,
    weights: CategoryWeights,
}

impl PreferenceProfile {
    pub fn builder() -> PreferenceProfileBuilder {
        PreferenceProfileBuilder::default()
    }

    pub fn min_rent(&self) -> i64 {
        self.min_rent
    }

    pub fn max_rent(&self) -> i64 {
        self.max_rent
    }

    pub fn min_bedrooms(&self) -> f64 {
        self.min_bedrooms
    }

    pub fn min_bathrooms(&self) -> f64 {
        self.min_bathrooms
    }

    pub fn min_sqft(&self) -> i64 {
        self.min_sqft
    }

    pub fn work_address(&self) -> Option<&str> {
        self.work_address.as_deref()
    }

    /// Resolved work coordinates, if any
    pub fn work_location(&self) -> Option<Coordinates> {
        self.work_location
    }

    pub fn weights(&self) -> &CategoryWeights {
        &self.weights
    }

    pub fn weight(&self, category: Category) -> u32 {
        self.weights.get(category)
    }
}

/// Builder for [`PreferenceProfile`]
#[derive(Debug, Clone)]
pub struct PreferenceProfileBuilder {
    min_rent: i64,
    max_rent: i64,
    min_bedrooms: f64,
    min_bathrooms: f64,
    min_sqft: i64,
    work_address: Option<String>,
    work_location: Option<Coordinates>,
    weights: CategoryWeights,
}

impl Default for PreferenceProfileBuilder {
    fn default() -> Self {
        Self {
            min_rent: 0,
            max_rent: 2000,
            min_bedrooms: 1.0,
            min_bathrooms: 1.0,
            min_sqft: 0,
            work_address: None,
            work_location: None,
            weights: CategoryWeights::default(),
        }
    }
}

impl PreferenceProfileBuilder {
    pub fn budget(mut self, min_rent: i64, max_rent: i64) -> Self {
        self.min_rent = min_rent;
        self.max_rent = max_rent;
        self
    }

    pub fn space_requirements(mut self, bedrooms: f64, bathrooms: f64, sqft: i64) -> Self {
        self.min_bedrooms = bedrooms;
        self.min_bathrooms = bathrooms;
        self.min_sqft = sqft;
        self
    }

    pub fn work_location(mut self, address: impl Into<String>, location: Option<Coordinates>) -> Self {
        self.work_address = Some(address.into());
        self.work_location = location;
        self
    }

    /// Work coordinates without an address, e.g. when the caller geocoded upstream
    pub fn work_coordinates(mut self, location: Coordinates) -> Self {
        self.work_location = Some(location);
        self
    }

    pub fn weights(mut self, weights: CategoryWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Validate and freeze the profile
    pub fn build(self) -> Result<PreferenceProfile, ProfileError> {
        let sum = self.weights.sum();
        if sum != WEIGHT_TOTAL {
            return Err(ProfileError::InvalidWeights { sum });
        }

        if self.min_rent > self.max_rent {
            tracing::warn!(
                "min_rent {} exceeds max_rent {}; every priced listing will be filtered out",
                self.min_rent,
                self.max_rent
            );
        }

        Ok(PreferenceProfile {
            min_rent: self.min_rent,
            max_rent: self.max_rent,
            min_bedrooms: self.min_bedrooms,
            min_bathrooms: self.min_bathrooms,
            min_sqft: self.min_sqft,
            work_address: self.work_address,
            work_location: self.work_location,
            weights: self.weights,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_profile() {
        let profile = PreferenceProfile::builder().build().unwrap();

        assert_eq!(profile.min_rent(), 0);
        assert_eq!(profile.max_rent(), 2000);
        assert_eq!(profile.min_bedrooms(), 1.0);
        assert_eq!(profile.min_bathrooms(), 1.0);
        assert_eq!(profile.min_sqft(), 0);
        assert!(profile.work_location().is_none());
        assert_eq!(profile.weights().sum(), 100);
    }

    #[test]
    fn test_weights_must_sum_to_100() {
        let result = PreferenceProfile::builder()
            .weights(CategoryWeights {
                commute: 50,
                price_value: 30,
                space: 20,
                location: 10,
            })
            .build();

        assert_eq!(result, Err(ProfileError::InvalidWeights { sum: 110 }));
    }

    #[test]
    fn test_zero_weight_category_allowed() {
        let profile = PreferenceProfile::builder()
            .weights(CategoryWeights {
                commute: 0,
                price_value: 50,
                space: 50,
                location: 0,
            })
            .build()
            .unwrap();

        assert_eq!(profile.weight(Category::Commute), 0);
        assert_eq!(profile.weight(Category::Space), 50);
    }

    #[test]
    fn test_work_location() {
        let profile = PreferenceProfile::builder()
            .work_location("400 Locust St, Des Moines", Some(Coordinates::new(41.587, -93.624)))
            .build()
            .unwrap();

        assert_eq!(profile.work_address(), Some("400 Locust St, Des Moines"));
        assert_eq!(profile.work_location(), Some(Coordinates::new(41.587, -93.624)));
    }

    #[test]
    fn test_error_message() {
        let err = ProfileError::InvalidWeights { sum: 90 };
        assert_eq!(err.to_string(), "Weights must sum to 100, got 90");
    }
}
