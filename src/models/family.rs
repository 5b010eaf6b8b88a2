use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{CuisineId, FamilyId, MemberId, RestrictionId};

/// Lowest expressible cuisine preference (strong dislike)
pub const MIN_PREFERENCE_LEVEL: u8 = 1;
/// Highest expressible cuisine preference (love)
pub const MAX_PREFERENCE_LEVEL: u8 = 5;

/// A member of a family, with their dietary needs and tastes
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FamilyMember {
    pub id: MemberId,
    pub family_id: FamilyId,
    pub name: String,
    /// Restriction ids this member requires accommodated
    pub dietary_restrictions: HashSet<RestrictionId>,
    /// Cuisine id mapped to a preference level in [1, 5].
    /// A cuisine absent from the map is neutral, not disliked.
    pub cuisine_preferences: HashMap<CuisineId, u8>,
    pub created_at: DateTime<Utc>,
}

impl FamilyMember {
    /// Creates a new member with no restrictions or preferences
    pub fn new(family_id: FamilyId, name: String) -> Self {
        Self {
            id: MemberId::generate(),
            family_id,
            name,
            dietary_restrictions: HashSet::new(),
            cuisine_preferences: HashMap::new(),
            created_at: Utc::now(),
        }
    }

    /// Highest preference level this member expressed among the given
    /// cuisines, or `None` when they expressed none of them.
    pub fn best_preference_among(&self, cuisines: &HashSet<CuisineId>) -> Option<u8> {
        cuisines
            .iter()
            .filter_map(|cuisine| self.cuisine_preferences.get(cuisine).copied())
            .max()
    }
}
