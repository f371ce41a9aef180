// Model exports
pub mod domain;
pub mod preferences;
pub mod requests;
pub mod responses;

pub use domain::{Listing, Coordinates, Category, CategoryScore, ScoreBreakdown, CommuteInfo, RankedResult};
pub use preferences::{PreferenceProfile, PreferenceProfileBuilder, CategoryWeights, ProfileError, WEIGHT_TOTAL};
pub use requests::{RankRequest, IngestRequest, GeocodeQuery};
pub use responses::{RankResponse, ApartmentsResponse, IngestResponse, GeocodeResponse, HealthResponse, ErrorResponse};
