use serde::{Deserialize, Serialize};

/// A single rental listing as supplied by the scraper
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    pub address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub zip_code: Option<String>,
    /// Monthly rent
    #[serde(default)]
    pub price: Option<i64>,
    #[serde(default)]
    pub bedrooms: Option<f64>,
    #[serde(default)]
    pub bathrooms: Option<f64>,
    #[serde(default)]
    pub sqft: Option<i64>,
    pub listing_url: String,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub amenities: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl Listing {
    /// Stored coordinates, only when both halves are present
    pub fn coordinates(&self) -> Option<Coordinates> {
        match (self.latitude, self.longitude) {
            (Some(latitude), Some(longitude)) => Some(Coordinates::new(latitude, longitude)),
            _ => None,
        }
    }
}

/// Latitude/longitude pair in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

/// The four fixed scoring categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Commute,
    PriceValue,
    Space,
    Location,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Commute,
        Category::PriceValue,
        Category::Space,
        Category::Location,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Commute => "commute",
            Category::PriceValue => "price_value",
            Category::Space => "space",
            Category::Location => "location",
        }
    }
}

/// Score awarded to one category, bounded by its weight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryScore {
    pub score: f64,
    pub weight: u32,
    pub info: String,
}

/// Per-category scores for one listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub commute: CategoryScore,
    pub price_value: CategoryScore,
    pub space: CategoryScore,
    pub location: CategoryScore,
}

impl ScoreBreakdown {
    pub fn get(&self, category: Category) -> &CategoryScore {
        match category {
            Category::Commute => &self.commute,
            Category::PriceValue => &self.price_value,
            Category::Space => &self.space,
            Category::Location => &self.location,
        }
    }

    /// Unrounded sum of the four category scores
    pub fn total(&self) -> f64 {
        Category::ALL.iter().map(|c| self.get(*c).score).sum()
    }
}

/// Estimated commute from a listing to the work location
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CommuteInfo {
    pub distance_miles: f64,
    pub estimated_minutes: u32,
}

/// A listing with its aggregate score and breakdown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedResult {
    pub listing: Listing,
    pub total_score: f64,
    pub breakdown: ScoreBreakdown,
    pub commute_info: Option<CommuteInfo>,
}
