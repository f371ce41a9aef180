use crate::models::Listing;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::{PoisonError, RwLock};
use thiserror::Error;

/// Errors that can occur in the listing store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to read seed file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse listings: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid listing: {0}")]
    InvalidListing(String),
}

/// A listing plus the bookkeeping the store keeps for it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredListing {
    pub listing: Listing,
    pub first_seen: NaiveDate,
    pub last_seen: NaiveDate,
    pub is_active: bool,
}

/// Store counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreStats {
    pub total: usize,
    pub active: usize,
}

/// In-memory listing store keyed by listing URL
#[derive(Debug, Default)]
pub struct ListingStore {
    records: RwLock<HashMap<String, StoredListing>>,
}

impl ListingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a listing, or refresh the existing record with the same URL
    ///
    /// Returns `true` for a new listing. A refresh marks the record active,
    /// bumps `last_seen` and takes the new price, sqft, amenities and
    /// description; the address fields keep their first-seen values, and
    /// coordinates are only taken when the record had none.
    pub fn upsert(&self, listing: Listing, today: NaiveDate) -> Result<bool, StoreError> {
        let url = listing.listing_url.trim().to_string();
        if url.is_empty() {
            return Err(StoreError::InvalidListing(format!(
                "missing listing_url for '{}'",
                listing.address
            )));
        }

        let mut records = self.records.write().unwrap_or_else(PoisonError::into_inner);

        match records.get_mut(&url) {
            Some(existing) => {
                let incoming_has_coordinates = listing.coordinates().is_some();
                existing.last_seen = today;
                existing.is_active = true;
                existing.listing.price = listing.price;
                existing.listing.sqft = listing.sqft;
                existing.listing.amenities = listing.amenities;
                existing.listing.description = listing.description;
                // Coordinates are only filled in, never replaced
                if existing.listing.coordinates().is_none() && incoming_has_coordinates {
                    existing.listing.latitude = listing.latitude;
                    existing.listing.longitude = listing.longitude;
                }
                Ok(false)
            }
            None => {
                let listing = Listing {
                    listing_url: url.clone(),
                    ..listing
                };
                records.insert(
                    url,
                    StoredListing {
                        listing,
                        first_seen: today,
                        last_seen: today,
                        is_active: true,
                    },
                );
                Ok(true)
            }
        }
    }

    /// Listings ordered by price ascending (unpriced last), then URL
    pub fn listings(&self, active_only: bool) -> Vec<Listing> {
        let records = self.records.read().unwrap_or_else(PoisonError::into_inner);

        let mut listings: Vec<Listing> = records
            .values()
            .filter(|record| !active_only || record.is_active)
            .map(|record| record.listing.clone())
            .collect();

        listings.sort_by(|a, b| {
            match (a.price, b.price) {
                (Some(pa), Some(pb)) => pa.cmp(&pb),
                (Some(_), None) => std::cmp::Ordering::Less,
                (None, Some(_)) => std::cmp::Ordering::Greater,
                (None, None) => std::cmp::Ordering::Equal,
            }
            .then_with(|| a.listing_url.cmp(&b.listing_url))
        });

        listings
    }

    pub fn get(&self, listing_url: &str) -> Option<StoredListing> {
        let records = self.records.read().unwrap_or_else(PoisonError::into_inner);
        records.get(listing_url).cloned()
    }

    /// Deactivate listings not seen for at least `days_old` days
    ///
    /// Returns the number of listings deactivated.
    pub fn mark_inactive(&self, days_old: i64, today: NaiveDate) -> usize {
        let mut records = self.records.write().unwrap_or_else(PoisonError::into_inner);

        let mut affected = 0;
        for record in records.values_mut() {
            if record.is_active && (today - record.last_seen).num_days() >= days_old {
                record.is_active = false;
                affected += 1;
            }
        }

        if affected > 0 {
            tracing::info!("Marked {} listing(s) as inactive", affected);
        }
        affected
    }

    /// Upsert every listing from a JSON array file
    ///
    /// Returns `(new, updated)` counts. Listings without a URL are skipped.
    pub fn load_seed<P: AsRef<Path>>(&self, path: P, today: NaiveDate) -> Result<(usize, usize), StoreError> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        let listings: Vec<Listing> = serde_json::from_str(&contents)?;

        Ok(self.upsert_many(listings, today))
    }

    /// Upsert a batch, skipping invalid listings; returns `(new, updated)`
    pub fn upsert_many(&self, listings: Vec<Listing>, today: NaiveDate) -> (usize, usize) {
        let mut new_count = 0;
        let mut updated_count = 0;

        for listing in listings {
            match self.upsert(listing, today) {
                Ok(true) => new_count += 1,
                Ok(false) => updated_count += 1,
                Err(e) => tracing::warn!("Skipping listing: {}", e),
            }
        }

        (new_count, updated_count)
    }

    pub fn len(&self) -> usize {
        self.records.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> StoreStats {
        let records = self.records.read().unwrap_or_else(PoisonError::into_inner);
        StoreStats {
            total: records.len(),
            active: records.values().filter(|r| r.is_active).count(),
        }
    }
}
