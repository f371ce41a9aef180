use std::cmp::Ordering;

use crate::core::{
    distance::GeoCalculator,
    filters::filter_listings,
    scoring::score_listing,
};
use crate::models::{Coordinates, Listing, PreferenceProfile, RankedResult};

/// Downtown Des Moines, the default location reference point
pub const DEFAULT_CITY_CENTER: Coordinates = Coordinates::new(41.5868, -93.6250);

/// Result of a ranking run
#[derive(Debug, Clone)]
pub struct RankResult {
    pub results: Vec<RankedResult>,
    /// Listings considered before filtering
    pub total_listings: usize,
}

impl RankResult {
    /// True when no listing survived the hard requirements
    pub fn no_matches(&self) -> bool {
        self.results.is_empty()
    }
}

/// Ranking orchestrator - filters, scores and sorts listings
///
/// # Pipeline Stages
/// 1. Hard-requirement filter
/// 2. Coordinate resolution (stored, then geocoded)
/// 3. Category scoring and aggregation
/// 4. Sort by total score
#[derive(Debug, Clone)]
pub struct Ranker {
    geo: GeoCalculator,
    city_center: Coordinates,
}

impl Ranker {
    pub fn new(geo: GeoCalculator, city_center: Coordinates) -> Self {
        Self { geo, city_center }
    }

    /// Ranker that never geocodes and measures location from downtown Des Moines
    pub fn offline() -> Self {
        Self::new(GeoCalculator::offline(), DEFAULT_CITY_CENTER)
    }

    pub fn geo(&self) -> &GeoCalculator {
        &self.geo
    }

    pub fn city_center(&self) -> Coordinates {
        self.city_center
    }

    /// Rank listings against a preference profile
    ///
    /// # Arguments
    /// * `listings` - Candidate listings, typically from the store
    /// * `profile` - The validated preferences for this request
    ///
    /// # Returns
    /// RankResult with results ordered best first. Equal totals are ordered
    /// by ascending price (unpriced last), then by listing URL.
    pub fn rank(&self, listings: Vec<Listing>, profile: &PreferenceProfile) -> RankResult {
        let total_listings = listings.len();

        let filtered = filter_listings(listings, profile);
        tracing::info!(
            "{} of {} listings match the requirements",
            filtered.len(),
            total_listings
        );

        if filtered.is_empty() {
            return RankResult {
                results: Vec::new(),
                total_listings,
            };
        }

        let mut results: Vec<RankedResult> = filtered
            .into_iter()
            .map(|listing| {
                let coords = self.geo.resolve_coordinates(&listing);
                let scored = score_listing(&listing, coords, profile, self.city_center);

                tracing::debug!(
                    "Scored {}: {:.1} (commute {:.1}, price {:.1}, space {:.1}, location {:.1})",
                    listing.listing_url,
                    scored.total_score,
                    scored.breakdown.commute.score,
                    scored.breakdown.price_value.score,
                    scored.breakdown.space.score,
                    scored.breakdown.location.score
                );

                RankedResult {
                    listing,
                    total_score: scored.total_score,
                    breakdown: scored.breakdown,
                    commute_info: scored.commute_info,
                }
            })
            .collect();

        results.sort_by(compare_ranked);

        RankResult {
            results,
            total_listings,
        }
    }
}

impl Default for Ranker {
    fn default() -> Self {
        Self::offline()
    }
}

/// Score descending, then price ascending (unpriced last), then URL
fn compare_ranked(a: &RankedResult, b: &RankedResult) -> Ordering {
    b.total_score
        .total_cmp(&a.total_score)
        .then_with(|| match (a.listing.price, b.listing.price) {
            (Some(pa), Some(pb)) => pa.cmp(&pb),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        })
        .then_with(|| a.listing.listing_url.cmp(&b.listing.listing_url))
}
