// Core algorithm exports
pub mod distance;
pub mod filters;
pub mod ranker;
pub mod scoring;

pub use distance::{haversine_miles, distance_between, estimate_commute_minutes, CommuteMode, AddressResolver, NoopResolver, GeoCalculator};
pub use filters::{passes_filter, filter_listings};
pub use ranker::{Ranker, RankResult, DEFAULT_CITY_CENTER};
pub use scoring::{score_listing, score_commute, score_price_value, score_space, score_location, ListingScore};
