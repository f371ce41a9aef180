//! Apt Rank - preference-driven apartment ranking
//!
//! This library filters rental listings against a user's hard requirements
//! and ranks the survivors with a four-category weighted score (commute,
//! price/value, space, location), keeping a per-category breakdown for every
//! result.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use core::{Ranker, RankResult, GeoCalculator, AddressResolver, distance::{haversine_miles, estimate_commute_minutes}};
pub use models::{Listing, Coordinates, PreferenceProfile, CategoryWeights, RankedResult, ProfileError};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        // Verify that the library exports work correctly
        let distance = haversine_miles(41.5868, -93.6250, 41.6, -93.6);
        assert!(distance > 0.0);
        assert!(PreferenceProfile::builder().build().is_ok());
    }
}
