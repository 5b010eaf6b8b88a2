use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{CuisineId, RestaurantId, RestrictionId};

/// Cheapest price tier ("$")
pub const MIN_PRICE_RANGE: u8 = 1;
/// Most expensive price tier ("$$$$")
pub const MAX_PRICE_RANGE: u8 = 4;
/// Upper bound of the rating scale
pub const MAX_RATING: f64 = 5.0;

/// A restaurant in the shared directory
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Restaurant {
    pub id: RestaurantId,
    pub name: String,
    /// Cuisine categories this restaurant serves; may be empty
    pub cuisines: HashSet<CuisineId>,
    /// Dietary restrictions this restaurant claims it can accommodate
    pub dietary_accommodations: HashSet<RestrictionId>,
    /// Price tier in [1, 4], when known
    pub price_range: Option<u8>,
    /// Average rating in [0, 5], when known
    pub rating: Option<f64>,
    pub created_at: DateTime<Utc>,
}

impl Restaurant {
    /// Creates a new restaurant with no cuisines or accommodations
    pub fn new(name: String) -> Self {
        Self {
            id: RestaurantId::generate(),
            name,
            cuisines: HashSet::new(),
            dietary_accommodations: HashSet::new(),
            price_range: None,
            rating: None,
            created_at: Utc::now(),
        }
    }

    /// Whether this restaurant serves at least one of the given cuisines
    pub fn serves_any_of(&self, cuisine_ids: &HashSet<CuisineId>) -> bool {
        self.cuisines.iter().any(|c| cuisine_ids.contains(c))
    }
}
