use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::{CuisineId, MemberId, RestaurantId, RestrictionId};

/// Optional hard filters applied to the candidate set.
///
/// Each field is independent; an absent field constrains nothing.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Filters {
    /// Restaurants priced above this tier are excluded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_price_range: Option<u8>,
    /// Restaurants rated below this (or unrated) are excluded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_rating: Option<f64>,
    /// When non-empty, a restaurant must serve at least one of these
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cuisine_ids: Option<HashSet<CuisineId>>,
}

impl Filters {
    /// Whether no filter field constrains anything
    pub fn is_empty(&self) -> bool {
        self.max_price_range.is_none()
            && self.min_rating.is_none()
            && self.cuisine_ids.as_ref().is_none_or(HashSet::is_empty)
    }
}

/// A scored, explained restaurant candidate
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub restaurant_id: RestaurantId,
    pub name: String,
    /// Raw points awarded across all scoring components
    pub score: f64,
    /// `score` over the maximum this restaurant could have earned for this
    /// group, as a rounded percentage in [0, 100]
    pub percentage: u8,
    /// Human-readable highlights, most important first, at most four
    pub reasons: Vec<String>,
    /// Members whose dietary and cuisine needs this restaurant meets
    pub accommodated_member_ids: Vec<MemberId>,
    /// Restrictions the group requires that this restaurant does not cover
    pub missed_restriction_ids: Vec<RestrictionId>,
}

/// How many selected members require a given restriction
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RestrictionCount {
    pub id: RestrictionId,
    pub name: String,
    pub member_count: usize,
}

/// Mean preference level for a cuisine across members who expressed one
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CuisineAffinity {
    pub cuisine_id: CuisineId,
    pub cuisine_name: String,
    pub average_preference: f64,
}

/// Group-level digest of the selected members, independent of any restaurant
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GroupSummary {
    pub total_members: usize,
    pub common_dietary_restrictions: Vec<RestrictionCount>,
    pub top_cuisine_preferences: Vec<CuisineAffinity>,
}

/// Which relaxation stage produced the returned recommendations
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FallbackMode {
    AllFiltersRemoved,
    MemberRemoved,
}

/// The member dropped by the `member_removed` fallback stage
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RemovedMember {
    pub id: MemberId,
    pub name: String,
    pub restriction_count: usize,
}

/// Full engine output for one request.
///
/// An empty `recommendations` list with no `fallback_mode` means nothing was
/// found even after relaxing; callers can tell that apart from a relaxed but
/// non-empty outcome.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationOutcome {
    pub recommendations: Vec<Recommendation>,
    pub summary: GroupSummary,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_mode: Option<FallbackMode>,
    /// Filters that were in effect before the ladder dropped them
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_filters: Option<Filters>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub removed_member: Option<RemovedMember>,
    /// Selection as requested, before any member was dropped
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_member_ids: Option<Vec<MemberId>>,
}
