use crate::models::{Listing, PreferenceProfile};

/// Check if a listing satisfies the profile's hard requirements
///
/// Missing values never exclude a listing. Bathrooms and square footage also
/// treat zero as missing, but a listing that reports zero bedrooms (a studio)
/// is held to the bedroom minimum.
#[inline]
pub fn passes_filter(listing: &Listing, profile: &PreferenceProfile) -> bool {
    // Check budget
    if let Some(price) = listing.price {
        if price < profile.min_rent() || price > profile.max_rent() {
            return false;
        }
    }

    // Check bedrooms
    if let Some(bedrooms) = listing.bedrooms {
        if bedrooms < profile.min_bedrooms() {
            return false;
        }
    }

    // Check bathrooms
    if let Some(bathrooms) = listing.bathrooms.filter(|b| *b != 0.0) {
        if bathrooms < profile.min_bathrooms() {
            return false;
        }
    }

    // Check sqft
    if let Some(sqft) = listing.sqft.filter(|s| *s != 0) {
        if sqft < profile.min_sqft() {
            return false;
        }
    }

    true
}

/// Keep the listings that pass [`passes_filter`], preserving input order
pub fn filter_listings(listings: Vec<Listing>, profile: &PreferenceProfile) -> Vec<Listing> {
    listings
        .into_iter()
        .filter(|listing| passes_filter(listing, profile))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_listing(
        price: Option<i64>,
        bedrooms: Option<f64>,
        bathrooms: Option<f64>,
        sqft: Option<i64>,
    ) -> Listing {
        Listing {
            address: "123 Main St".to_string(),
            city: "Des Moines".to_string(),
            state: "IA".to_string(),
            zip_code: Some("50309".to_string()),
            price,
            bedrooms,
            bathrooms,
            sqft,
            listing_url: "https://example.com/123".to_string(),
            latitude: None,
            longitude: None,
            source: None,
            amenities: None,
            description: None,
        }
    }

    fn create_test_profile() -> PreferenceProfile {
        PreferenceProfile::builder()
            .budget(800, 1500)
            .space_requirements(1.0, 1.0, 500)
            .build()
            .unwrap()
    }

    #[test]
    fn test_listing_passes() {
        let listing = create_test_listing(Some(1200), Some(2.0), Some(1.0), Some(800));
        assert!(passes_filter(&listing, &create_test_profile()));
    }

    #[test]
    fn test_budget_bounds() {
        let profile = create_test_profile();

        assert!(!passes_filter(&create_test_listing(Some(1600), Some(1.0), Some(1.0), None), &profile));
        assert!(!passes_filter(&create_test_listing(Some(700), Some(1.0), Some(1.0), None), &profile));
        assert!(passes_filter(&create_test_listing(Some(1500), Some(1.0), Some(1.0), None), &profile));
        assert!(passes_filter(&create_test_listing(Some(800), Some(1.0), Some(1.0), None), &profile));
    }

    #[test]
    fn test_missing_values_never_exclude() {
        let listing = create_test_listing(None, None, None, None);
        assert!(passes_filter(&listing, &create_test_profile()));
    }

    #[test]
    fn test_zero_bedrooms_is_checked() {
        let studio = create_test_listing(Some(900), Some(0.0), Some(1.0), None);
        assert!(!passes_filter(&studio, &create_test_profile()));
    }

    #[test]
    fn test_zero_bathrooms_and_sqft_are_lenient() {
        let listing = create_test_listing(Some(900), Some(1.0), Some(0.0), Some(0));
        assert!(passes_filter(&listing, &create_test_profile()));
    }

    #[test]
    fn test_small_sqft_excluded() {
        let listing = create_test_listing(Some(900), Some(1.0), Some(1.0), Some(450));
        assert!(!passes_filter(&listing, &create_test_profile()));
    }

    #[test]
    fn test_half_bath_excluded() {
        let listing = create_test_listing(Some(900), Some(1.0), Some(0.5), None);
        assert!(!passes_filter(&listing, &create_test_profile()));
    }

    #[test]
    fn test_filter_preserves_order() {
        let mut a = create_test_listing(Some(1000), Some(1.0), Some(1.0), None);
        a.listing_url = "a".to_string();
        let mut b = create_test_listing(Some(2000), Some(1.0), Some(1.0), None);
        b.listing_url = "b".to_string();
        let mut c = create_test_listing(Some(900), Some(1.0), Some(1.0), None);
        c.listing_url = "c".to_string();

        let kept = filter_listings(vec![a, b, c], &create_test_profile());
        let urls: Vec<&str> = kept.iter().map(|l| l.listing_url.as_str()).collect();
        assert_eq!(urls, vec!["a", "c"]);
    }
}
