// Service exports
pub mod cache;
pub mod geocoder;
pub mod store;

pub use cache::{CachedResolver, CacheStats};
pub use geocoder::{Geocode, NominatimGeocoder, RateLimiter, StaticResolver, GeocodeError, normalize_address};
pub use store::{ListingStore, StoredListing, StoreStats, StoreError};
