use std::sync::Arc;

use crate::models::{Coordinates, Listing};

/// Earth's radius in miles
const EARTH_RADIUS_MILES: f64 = 3959.0;

/// Calculate the Haversine distance between two points in miles
///
/// # Arguments
/// * `lat1` - Latitude of first point in degrees
/// * `lon1` - Longitude of first point in degrees
/// * `lat2` - Latitude of second point in degrees
/// * `lon2` - Longitude of second point in degrees
///
/// # Returns
/// Distance in miles
#[inline]
pub fn haversine_miles(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    // Rounding can push `a` a hair past 1 for antipodal points
    let c = 2.0 * a.sqrt().min(1.0).asin();

    EARTH_RADIUS_MILES * c
}

/// Haversine distance between two coordinate pairs in miles
#[inline]
pub fn distance_between(from: Coordinates, to: Coordinates) -> f64 {
    haversine_miles(from.latitude, from.longitude, to.latitude, to.longitude)
}

/// Travel mode used for commute estimates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CommuteMode {
    #[default]
    Driving,
    Transit,
    Walking,
}

impl CommuteMode {
    /// Average door-to-door speed in miles per hour
    pub fn speed_mph(&self) -> f64 {
        match self {
            CommuteMode::Driving => 30.0,
            CommuteMode::Transit => 20.0,
            CommuteMode::Walking => 3.0,
        }
    }

    /// Parse a mode name; anything unrecognised falls back to driving
    pub fn parse(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "transit" => CommuteMode::Transit,
            "walking" => CommuteMode::Walking,
            _ => CommuteMode::Driving,
        }
    }
}

impl From<&str> for CommuteMode {
    fn from(name: &str) -> Self {
        Self::parse(name)
    }
}

/// Estimate commute time in whole minutes, truncated toward zero
#[inline]
pub fn estimate_commute_minutes(distance_miles: f64, mode: CommuteMode) -> u32 {
    let minutes = distance_miles / mode.speed_mph() * 60.0;
    // `as` saturates: NaN and negatives become 0
    minutes.trunc() as u32
}

/// Looks up coordinates for a free-text address
///
/// Implementations absorb their own failures: a transport error or an
/// unknown address both come back as `None`.
pub trait AddressResolver: Send + Sync {
    fn resolve(&self, address: &str) -> Option<Coordinates>;
}

/// Resolver that never finds anything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopResolver;

impl AddressResolver for NoopResolver {
    fn resolve(&self, _address: &str) -> Option<Coordinates> {
        None
    }
}

/// Distance and coordinate lookups used by the scorers
#[derive(Clone)]
pub struct GeoCalculator {
    resolver: Arc<dyn AddressResolver>,
}

impl GeoCalculator {
    pub fn new(resolver: Arc<dyn AddressResolver>) -> Self {
        Self { resolver }
    }

    /// Calculator that only trusts coordinates stored on the listing
    pub fn offline() -> Self {
        Self::new(Arc::new(NoopResolver))
    }

    pub fn distance(&self, from: Coordinates, to: Coordinates) -> f64 {
        distance_between(from, to)
    }

    pub fn resolve_address(&self, address: &str) -> Option<Coordinates> {
        let address = address.trim();
        if address.is_empty() {
            return None;
        }
        self.resolver.resolve(address)
    }

    /// Coordinates for a listing: stored values first, then the address resolver
    pub fn resolve_coordinates(&self, listing: &Listing) -> Option<Coordinates> {
        if let Some(coords) = listing.coordinates() {
            return Some(coords);
        }

        let resolved = self.resolve_address(&listing.address);
        if resolved.is_none() {
            tracing::debug!("No coordinates for listing {}", listing.listing_url);
        }
        resolved
    }
}

impl std::fmt::Debug for GeoCalculator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeoCalculator").finish_non_exhaustive()
    }
}

impl Default for GeoCalculator {
    fn default() -> Self {
        Self::offline()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingResolver {
        calls: AtomicUsize,
        answer: Option<Coordinates>,
    }

    impl AddressResolver for CountingResolver {
        fn resolve(&self, _address: &str) -> Option<Coordinates> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.answer
        }
    }

    fn listing(address: &str, lat: Option<f64>, lon: Option<f64>) -> Listing {
        Listing {
            address: address.to_string(),
            city: "Des Moines".to_string(),
            state: "IA".to_string(),
            zip_code: None,
            price: Some(1000),
            bedrooms: Some(1.0),
            bathrooms: Some(1.0),
            sqft: None,
            listing_url: "https://example.com/1".to_string(),
            latitude: lat,
            longitude: lon,
            source: None,
            amenities: None,
            description: None,
        }
    }

    #[test]
    fn test_haversine_distance() {
        // Des Moines to Ames is roughly 30 miles
        let distance = haversine_miles(41.5868, -93.6250, 42.0308, -93.6319);
        assert!((distance - 30.7).abs() < 1.0, "Distance should be ~30.7mi, got {}", distance);
    }

    #[test]
    fn test_haversine_zero_and_symmetric() {
        assert_eq!(haversine_miles(41.5868, -93.6250, 41.5868, -93.6250), 0.0);

        let ab = haversine_miles(41.5868, -93.6250, 40.7128, -74.0060);
        let ba = haversine_miles(40.7128, -74.0060, 41.5868, -93.6250);
        assert!((ab - ba).abs() < 1e-9);
    }

    #[test]
    fn test_antipodal_distance_is_finite() {
        let distance = haversine_miles(0.0, 0.0, 0.0, 180.0);
        assert!(distance.is_finite());
        assert!((distance - std::f64::consts::PI * EARTH_RADIUS_MILES).abs() < 1e-6);
    }

    #[test]
    fn test_commute_minutes_by_mode() {
        assert_eq!(estimate_commute_minutes(10.0, CommuteMode::Driving), 20);
        assert_eq!(estimate_commute_minutes(10.0, CommuteMode::Transit), 30);
        assert_eq!(estimate_commute_minutes(1.0, CommuteMode::Walking), 20);
        // 5.4 miles at 30 mph is 10.8 minutes, truncated
        assert_eq!(estimate_commute_minutes(5.4, CommuteMode::Driving), 10);
        assert_eq!(estimate_commute_minutes(0.0, CommuteMode::Driving), 0);
    }

    #[test]
    fn test_unknown_mode_defaults_to_driving() {
        assert_eq!(CommuteMode::parse("teleport"), CommuteMode::Driving);
        assert_eq!(CommuteMode::parse(" Transit "), CommuteMode::Transit);
        assert_eq!(CommuteMode::from("walking"), CommuteMode::Walking);
    }

    #[test]
    fn test_stored_coordinates_preferred() {
        let resolver = Arc::new(CountingResolver {
            calls: AtomicUsize::new(0),
            answer: Some(Coordinates::new(1.0, 1.0)),
        });
        let geo = GeoCalculator::new(resolver.clone());

        let coords = geo.resolve_coordinates(&listing("123 Main St", Some(41.6), Some(-93.6)));

        assert_eq!(coords, Some(Coordinates::new(41.6, -93.6)));
        assert_eq!(resolver.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_half_coordinates_fall_back_to_resolver() {
        let resolver = Arc::new(CountingResolver {
            calls: AtomicUsize::new(0),
            answer: Some(Coordinates::new(41.0, -93.0)),
        });
        let geo = GeoCalculator::new(resolver.clone());

        let coords = geo.resolve_coordinates(&listing("123 Main St", Some(41.6), None));

        assert_eq!(coords, Some(Coordinates::new(41.0, -93.0)));
        assert_eq!(resolver.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_empty_address_not_resolved() {
        let resolver = Arc::new(CountingResolver {
            calls: AtomicUsize::new(0),
            answer: Some(Coordinates::new(41.0, -93.0)),
        });
        let geo = GeoCalculator::new(resolver.clone());

        assert!(geo.resolve_coordinates(&listing("  ", None, None)).is_none());
        assert_eq!(resolver.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_offline_calculator() {
        let geo = GeoCalculator::offline();
        assert!(geo.resolve_coordinates(&listing("123 Main St", None, None)).is_none());
    }
}
