use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::{CuisineId, RestrictionId};

/// Placeholder name for a cuisine id with no catalog entry
pub const UNKNOWN_CUISINE: &str = "Unknown Cuisine";
/// Placeholder name for a restriction id with no catalog entry
pub const UNKNOWN_RESTRICTION: &str = "Unknown Restriction";

/// Reference catalogs used for display-name resolution.
///
/// Scoring compares ids directly and never consults these; only reasons and
/// summaries need names. A missing entry resolves to a placeholder rather
/// than failing the request.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Catalogs {
    pub cuisines: HashMap<CuisineId, String>,
    pub restrictions: HashMap<RestrictionId, String>,
}

impl Catalogs {
    pub fn cuisine_name(&self, id: &CuisineId) -> String {
        self.cuisines
            .get(id)
            .cloned()
            .unwrap_or_else(|| UNKNOWN_CUISINE.to_string())
    }

    pub fn restriction_name(&self, id: &RestrictionId) -> String {
        self.restrictions
            .get(id)
            .cloned()
            .unwrap_or_else(|| UNKNOWN_RESTRICTION.to_string())
    }
}
