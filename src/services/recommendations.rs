use std::cmp::Ordering;
use std::collections::HashSet;

use thiserror::Error;

use crate::models::{
    Catalogs, FallbackMode, FamilyMember, Filters, MemberId, Recommendation,
    RecommendationOutcome, RemovedMember, Restaurant, RestaurantId, RestrictionId,
};
use crate::services::{scoring, summary};

/// Flat percentage-point bonus for restaurants the family favorited
const FAVORITE_BOOST: u8 = 10;

/// Error types for the recommendation engine
#[derive(Debug, Error)]
pub enum RecommendationError {
    #[error("no valid family members found")]
    NoMembersSelected,
}

/// Scores, ranks, and explains every restaurant in the catalog for the
/// selected group of members.
///
/// Pure and stateless: three bounded passes over the catalog at most (strict,
/// filters removed, member removed), no I/O, inputs never mutated. The
/// fallback ladder only ever loosens constraints; when even the loosest pass
/// is empty the outcome carries an empty list and no fallback tag so the
/// caller can tell "nothing even after relaxing" apart from a relaxed hit.
///
/// `favorites` is applied after scoring as a flat percentage boost and
/// re-sort; raw scores are left untouched.
pub fn recommend(
    restaurants: &[Restaurant],
    members: &[FamilyMember],
    selected_member_ids: &[MemberId],
    filters: Option<&Filters>,
    favorites: &HashSet<RestaurantId>,
    catalogs: &Catalogs,
) -> Result<RecommendationOutcome, RecommendationError> {
    let selected: Vec<&FamilyMember> = selected_member_ids
        .iter()
        .filter_map(|id| members.iter().find(|member| &member.id == id))
        .collect();
    if selected.is_empty() {
        return Err(RecommendationError::NoMembersSelected);
    }

    let summary = summary::summarize_group(&selected, catalogs);
    let filters = filters.cloned().unwrap_or_default();

    let strict = rank_pass(restaurants, &selected, &filters, catalogs);
    tracing::debug!(
        candidates = restaurants.len(),
        members = selected.len(),
        results = strict.len(),
        "Strict recommendation pass"
    );
    if !strict.is_empty() {
        return Ok(RecommendationOutcome {
            recommendations: boosted(strict, favorites),
            summary,
            fallback_mode: None,
            original_filters: None,
            removed_member: None,
            original_member_ids: None,
        });
    }

    // Stage 1: drop every filter, keep the full selection
    if !filters.is_empty() {
        let relaxed = rank_pass(restaurants, &selected, &Filters::default(), catalogs);
        if !relaxed.is_empty() {
            tracing::info!(
                results = relaxed.len(),
                "Strict pass empty, returning results with all filters removed"
            );
            return Ok(RecommendationOutcome {
                recommendations: boosted(relaxed, favorites),
                summary,
                fallback_mode: Some(FallbackMode::AllFiltersRemoved),
                original_filters: Some(filters),
                removed_member: None,
                original_member_ids: None,
            });
        }
    }

    // Stage 2: drop the most constrained member; filters stay removed so the
    // ladder never re-tightens
    if selected.len() > 1 {
        if let Some(dropped) = most_constrained_member(&selected) {
            let remaining: Vec<&FamilyMember> = selected
                .iter()
                .copied()
                .filter(|member| member.id != dropped.id)
                .collect();
            let relaxed = rank_pass(restaurants, &remaining, &Filters::default(), catalogs);
            if !relaxed.is_empty() {
                tracing::info!(
                    removed_member = %dropped.id,
                    restriction_count = dropped.dietary_restrictions.len(),
                    results = relaxed.len(),
                    "Returning results with the most constrained member removed"
                );
                return Ok(RecommendationOutcome {
                    recommendations: boosted(relaxed, favorites),
                    summary,
                    fallback_mode: Some(FallbackMode::MemberRemoved),
                    original_filters: if filters.is_empty() {
                        None
                    } else {
                        Some(filters)
                    },
                    removed_member: Some(RemovedMember {
                        id: dropped.id.clone(),
                        name: dropped.name.clone(),
                        restriction_count: dropped.dietary_restrictions.len(),
                    }),
                    original_member_ids: Some(selected_member_ids.to_vec()),
                });
            }
        }
    }

    tracing::info!("No recommendations found even after relaxing");
    Ok(RecommendationOutcome {
        recommendations: Vec::new(),
        summary,
        fallback_mode: None,
        original_filters: None,
        removed_member: None,
        original_member_ids: None,
    })
}

/// One full scoring pass: filter, score, sort. Sorting falls back to the
/// restaurant id so equal scores rank the same way every call.
fn rank_pass(
    restaurants: &[Restaurant],
    members: &[&FamilyMember],
    filters: &Filters,
    catalogs: &Catalogs,
) -> Vec<Recommendation> {
    let required: HashSet<RestrictionId> = members
        .iter()
        .flat_map(|member| member.dietary_restrictions.iter().cloned())
        .collect();

    let mut ranked: Vec<Recommendation> = restaurants
        .iter()
        .filter(|restaurant| passes_filters(restaurant, filters))
        .map(|restaurant| {
            let scored = scoring::score_restaurant(restaurant, members, &required, catalogs);
            Recommendation {
                restaurant_id: restaurant.id.clone(),
                name: restaurant.name.clone(),
                score: scored.score,
                percentage: scored.percentage,
                reasons: scored.reasons,
                accommodated_member_ids: scored.accommodated_member_ids,
                missed_restriction_ids: scored.missed_restriction_ids,
            }
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.restaurant_id.cmp(&b.restaurant_id))
    });
    ranked
}

/// Hard filters. A restaurant with no price passes the price ceiling, but a
/// restaurant with no rating fails the rating floor.
fn passes_filters(restaurant: &Restaurant, filters: &Filters) -> bool {
    if let Some(max_price) = filters.max_price_range {
        if restaurant.price_range.map_or(false, |price| price > max_price) {
            return false;
        }
    }

    if let Some(min_rating) = filters.min_rating {
        if !restaurant.rating.map_or(false, |rating| rating >= min_rating) {
            return false;
        }
    }

    if let Some(cuisine_ids) = &filters.cuisine_ids {
        if !cuisine_ids.is_empty() && !restaurant.serves_any_of(cuisine_ids) {
            return false;
        }
    }

    true
}

/// The selected member carrying the most dietary restrictions, earliest id
/// on ties
fn most_constrained_member<'a>(selected: &[&'a FamilyMember]) -> Option<&'a FamilyMember> {
    selected.iter().copied().max_by(|a, b| {
        a.dietary_restrictions
            .len()
            .cmp(&b.dietary_restrictions.len())
            .then_with(|| b.id.cmp(&a.id))
    })
}

/// Applies the favorite boost to percentages and re-sorts. Scores and
/// maximums stay as computed, so the boost is visible but never silently
/// folded into the scoring model.
fn boosted(
    mut recommendations: Vec<Recommendation>,
    favorites: &HashSet<RestaurantId>,
) -> Vec<Recommendation> {
    let mut boosted_any = false;
    for recommendation in &mut recommendations {
        if favorites.contains(&recommendation.restaurant_id) {
            recommendation.percentage = recommendation
                .percentage
                .saturating_add(FAVORITE_BOOST)
                .min(100);
            boosted_any = true;
        }
    }
    if !boosted_any {
        return recommendations;
    }
    recommendations.sort_by(|a, b| {
        b.percentage
            .cmp(&a.percentage)
            .then_with(|| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal))
            .then_with(|| a.restaurant_id.cmp(&b.restaurant_id))
    });
    recommendations
}
