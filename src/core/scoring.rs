use crate::core::distance::{distance_between, estimate_commute_minutes, CommuteMode};
use crate::models::{CategoryScore, CommuteInfo, Coordinates, Listing, PreferenceProfile, ScoreBreakdown};

/// Score for every category of one listing
#[derive(Debug, Clone, PartialEq)]
pub struct ListingScore {
    /// Sum of the category scores, rounded to one decimal
    pub total_score: f64,
    pub breakdown: ScoreBreakdown,
    pub commute_info: Option<CommuteInfo>,
}

/// Score a listing across all four categories
///
/// `coords` is the listing's resolved position, shared by the commute and
/// location scorers so that an address is only looked up once.
///
/// Scoring formula:
/// total = commute       # drive time to work, tiered
///       + price_value   # cheapness vs. max rent (60%) and $/sqft (40%)
///       + space         # bedrooms (40%), bathrooms (30%), sqft (30%)
///       + location      # distance to the city center, tiered
pub fn score_listing(
    listing: &Listing,
    coords: Option<Coordinates>,
    profile: &PreferenceProfile,
    city_center: Coordinates,
) -> ListingScore {
    let (commute, commute_info) = score_commute(coords, profile);
    let price_value = score_price_value(listing, profile);
    let space = score_space(listing, profile);
    let location = score_location(coords, city_center, profile.weights().location);

    let breakdown = ScoreBreakdown {
        commute,
        price_value,
        space,
        location,
    };

    ListingScore {
        total_score: round_one_decimal(breakdown.total()),
        breakdown,
        commute_info,
    }
}

/// Commute score from the driving time to the work location
///
/// Without work coordinates the category is neutral (half the weight); a
/// listing that cannot be located gets 30% of the weight.
pub fn score_commute(
    coords: Option<Coordinates>,
    profile: &PreferenceProfile,
) -> (CategoryScore, Option<CommuteInfo>) {
    let weight = profile.weights().commute;
    let max_points = weight as f64;

    let Some(work) = profile.work_location() else {
        return (category(max_points / 2.0, weight, "No work location set".to_string()), None);
    };

    let Some(home) = coords else {
        return (
            category(max_points * 0.3, weight, "Could not determine location".to_string()),
            None,
        );
    };

    let distance = distance_between(home, work);
    let minutes = estimate_commute_minutes(distance, CommuteMode::Driving);

    let info = CommuteInfo {
        distance_miles: round_one_decimal(distance),
        estimated_minutes: minutes,
    };

    let description = format!("{:.1} mi (~{} min)", info.distance_miles, minutes);
    (
        category(max_points * commute_tier(minutes), weight, description),
        Some(info),
    )
}

/// Fraction of the commute weight earned for a drive of `minutes`
///
/// Tier limits are inclusive: exactly 10 minutes still earns the full weight.
#[inline]
pub fn commute_tier(minutes: u32) -> f64 {
    match minutes {
        0..=10 => 1.0,
        11..=20 => 0.75,
        21..=30 => 0.5,
        31..=45 => 0.25,
        _ => 0.0,
    }
}

/// Price/value score: cheapness relative to the budget ceiling plus $/sqft
pub fn score_price_value(listing: &Listing, profile: &PreferenceProfile) -> CategoryScore {
    let weight = profile.weights().price_value;
    let max_points = weight as f64;

    let price = match listing.price {
        Some(price) if price > 0 => price,
        _ => return category(0.0, weight, "Price unavailable".to_string()),
    };

    // Factor 1: price relative to max budget (60%)
    let max_rent = profile.max_rent();
    let budget_score = if max_rent <= 0 || price > max_rent {
        0.0
    } else {
        let price_ratio = price as f64 / max_rent as f64;
        (1.0 - price_ratio) * max_points * 0.6
    };

    // Factor 2: price per sqft (40%)
    let (value_score, description) = match listing.sqft.filter(|s| *s > 0) {
        Some(sqft) => {
            let price_per_sqft = price as f64 / sqft as f64;
            (
                max_points * 0.4 * price_per_sqft_tier(price_per_sqft),
                format!("${}/mo (${:.2}/sqft)", price, price_per_sqft),
            )
        }
        None => (max_points * 0.4 * 0.5, format!("${}/mo", price)),
    };

    category(budget_score + value_score, weight, description)
}

/// Fraction of the $/sqft share; cheaper space scores higher
#[inline]
pub fn price_per_sqft_tier(price_per_sqft: f64) -> f64 {
    if price_per_sqft <= 0.75 {
        1.0
    } else if price_per_sqft <= 1.00 {
        0.75
    } else if price_per_sqft <= 1.50 {
        0.5
    } else {
        0.25
    }
}

/// Space score from bedrooms, bathrooms and square footage
///
/// Each part only counts once its minimum is met, and extra room beyond the
/// minimum has diminishing value capped at the full share.
pub fn score_space(listing: &Listing, profile: &PreferenceProfile) -> CategoryScore {
    let weight = profile.weights().space;
    let max_points = weight as f64;
    let mut score = 0.0;

    // Bedrooms (40%)
    let bedrooms = listing.bedrooms.unwrap_or(0.0);
    if bedrooms >= profile.min_bedrooms() {
        score += capped_ratio(bedrooms, profile.min_bedrooms() + 1.0) * max_points * 0.4;
    }

    // Bathrooms (30%)
    if let Some(bathrooms) = listing.bathrooms.filter(|b| *b != 0.0) {
        if bathrooms >= profile.min_bathrooms() {
            score += capped_ratio(bathrooms, profile.min_bathrooms() + 0.5) * max_points * 0.3;
        }
    }

    // Square footage (30%), measured against a typical one-bedroom
    let description = match listing.sqft.filter(|s| *s != 0) {
        Some(sqft) => {
            if sqft >= profile.min_sqft() {
                let target_sqft = profile.min_sqft().max(600) as f64;
                score += capped_ratio(sqft as f64, target_sqft) * max_points * 0.3;
            }
            format!("{} sqft", sqft)
        }
        None => "N/A sqft".to_string(),
    };

    category(score, weight, description)
}

/// Location score from distance to the city center
pub fn score_location(coords: Option<Coordinates>, city_center: Coordinates, weight: u32) -> CategoryScore {
    let max_points = weight as f64;

    match coords {
        Some(coords) => {
            let distance = distance_between(coords, city_center);
            category(
                max_points * location_tier(distance),
                weight,
                format!("{:.1} mi to city center", distance),
            )
        }
        None => category(max_points * 0.5, weight, "Location unknown".to_string()),
    }
}

/// Fraction of the location weight for a given distance from the center
#[inline]
pub fn location_tier(distance_miles: f64) -> f64 {
    if distance_miles <= 2.0 {
        1.0
    } else if distance_miles <= 5.0 {
        0.75
    } else if distance_miles <= 10.0 {
        0.5
    } else {
        0.25
    }
}

#[inline]
pub fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// `value / target` capped at 1; a non-positive target is always met
#[inline]
fn capped_ratio(value: f64, target: f64) -> f64 {
    if target <= 0.0 {
        return 1.0;
    }
    (value / target).clamp(0.0, 1.0)
}

fn category(score: f64, weight: u32, info: String) -> CategoryScore {
    let max = weight as f64;
    let score = if score.is_nan() { 0.0 } else { score.clamp(0.0, max) };
    CategoryScore { score, weight, info }
}
