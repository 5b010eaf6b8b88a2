use std::collections::HashSet;

use crate::models::{
    Catalogs, CuisineId, FamilyMember, MemberId, Restaurant, RestrictionId, MAX_PREFERENCE_LEVEL,
    MAX_PRICE_RANGE, MAX_RATING,
};

/// Points available to the rating component
pub const RATING_WEIGHT: f64 = 20.0;
/// Points available to the price component (cheaper scores higher)
pub const PRICE_WEIGHT: f64 = 10.0;
/// Points available per member who expressed a preference for one of the
/// restaurant's cuisines
pub const CUISINE_WEIGHT_PER_MEMBER: f64 = 10.0;
/// Points available to the dietary-accommodation component
pub const ACCOMMODATION_WEIGHT: f64 = 30.0;
/// Flat points for being a candidate at all; present in both score and
/// maximum so it never affects relative ranking
pub const AVAILABILITY_WEIGHT: f64 = 5.0;

/// Preference level at or above which a member counts as liking a cuisine
const LIKED_LEVEL: u8 = 4;
/// Preference level below which an expressed cuisine counts as disliked
const NEUTRAL_LEVEL: u8 = 3;
/// Price tier at or below which a restaurant reads as budget-friendly
const BUDGET_PRICE_CEILING: u8 = 2;
/// Cap on the number of reasons attached to one recommendation
const MAX_REASONS: usize = 4;

/// Per-restaurant scoring result, before filtering and ranking
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredRestaurant {
    pub score: f64,
    pub max_possible: f64,
    pub percentage: u8,
    pub reasons: Vec<String>,
    pub accommodated_member_ids: Vec<MemberId>,
    pub missed_restriction_ids: Vec<RestrictionId>,
}

/// Scores one restaurant against the selected group.
///
/// `required_restrictions` is the union of the group's dietary restrictions,
/// precomputed by the caller since it is identical for every restaurant in a
/// pass. The maximum achievable score depends only on the group, never on
/// other restaurants, so the percentage is comparable across the catalog.
pub fn score_restaurant(
    restaurant: &Restaurant,
    members: &[&FamilyMember],
    required_restrictions: &HashSet<RestrictionId>,
    catalogs: &Catalogs,
) -> ScoredRestaurant {
    let mut score = AVAILABILITY_WEIGHT;
    let mut max_possible = AVAILABILITY_WEIGHT;

    // Rating: an unrated restaurant earns nothing but the weight still
    // counts toward the maximum.
    max_possible += RATING_WEIGHT;
    if let Some(rating) = restaurant.rating {
        score += (rating / MAX_RATING * RATING_WEIGHT).clamp(0.0, RATING_WEIGHT);
    }

    // Price: tier 1 earns the full weight, tier 4 the smallest share.
    max_possible += PRICE_WEIGHT;
    if let Some(price) = restaurant.price_range {
        let share = (f64::from(MAX_PRICE_RANGE) - f64::from(price) + 1.0)
            / f64::from(MAX_PRICE_RANGE);
        score += (share * PRICE_WEIGHT).clamp(0.0, PRICE_WEIGHT);
    }

    // Cuisine affinity: only members who expressed a preference for one of
    // the served cuisines participate, on either side of the ratio.
    for member in members {
        if let Some(best) = member.best_preference_among(&restaurant.cuisines) {
            score += f64::from(best) / f64::from(MAX_PREFERENCE_LEVEL) * CUISINE_WEIGHT_PER_MEMBER;
            max_possible += CUISINE_WEIGHT_PER_MEMBER;
        }
    }

    // Dietary accommodation over the group's combined requirements. With no
    // requirements there is nothing to award, so the component is omitted
    // from both sides instead of granting free points.
    let mut covered = 0usize;
    let mut missed_restriction_ids: Vec<RestrictionId> = Vec::new();
    for restriction in required_restrictions {
        if restaurant.dietary_accommodations.contains(restriction) {
            covered += 1;
        } else {
            missed_restriction_ids.push(restriction.clone());
        }
    }
    missed_restriction_ids.sort();

    let required = required_restrictions.len();
    if required > 0 {
        score += covered as f64 / required as f64 * ACCOMMODATION_WEIGHT;
        max_possible += ACCOMMODATION_WEIGHT;
    }

    let percentage = if max_possible > 0.0 {
        (score / max_possible * 100.0).min(100.0).round() as u8
    } else {
        0
    };

    let accommodated_member_ids = members
        .iter()
        .filter(|member| accommodates_member(restaurant, member))
        .map(|member| member.id.clone())
        .collect();

    let reasons = build_reasons(restaurant, members, covered, required, catalogs);

    ScoredRestaurant {
        score,
        max_possible,
        percentage,
        reasons,
        accommodated_member_ids,
        missed_restriction_ids,
    }
}

/// A member is accommodated when every one of their personal restrictions is
/// covered and their cuisine sentiment toward the restaurant is neutral or
/// positive. Having expressed no preference for any served cuisine counts as
/// neutral.
fn accommodates_member(restaurant: &Restaurant, member: &FamilyMember) -> bool {
    let diet_covered = member
        .dietary_restrictions
        .iter()
        .all(|r| restaurant.dietary_accommodations.contains(r));
    if !diet_covered {
        return false;
    }

    match member.best_preference_among(&restaurant.cuisines) {
        Some(level) => level >= NEUTRAL_LEVEL,
        None => true,
    }
}

fn build_reasons(
    restaurant: &Restaurant,
    members: &[&FamilyMember],
    covered: usize,
    required: usize,
    catalogs: &Catalogs,
) -> Vec<String> {
    let mut reasons = Vec::new();

    if let Some(rating) = restaurant.rating {
        if rating >= 4.5 {
            reasons.push(format!("Excellent {rating:.1}/5 rating"));
        } else if rating >= 4.0 {
            reasons.push(format!("Great {rating:.1}/5 rating"));
        } else if rating >= 3.5 {
            reasons.push(format!("Good {rating:.1}/5 rating"));
        }
    }

    if required > 0 && covered > 0 {
        if covered == required {
            let plural = if required == 1 { "" } else { "s" };
            reasons.push(format!(
                "Accommodates all {required} dietary restriction{plural}"
            ));
        } else {
            reasons.push(format!(
                "Accommodates {covered} of {required} dietary restrictions"
            ));
        }
    }

    if let Some((cuisine, fans)) = most_liked_cuisine(restaurant, members) {
        let name = catalogs.cuisine_name(&cuisine);
        if fans == 1 {
            reasons.push(format!("1 member likes {name} cuisine"));
        } else {
            reasons.push(format!("{fans} members like {name} cuisine"));
        }
    }

    if restaurant
        .price_range
        .map_or(false, |price| price <= BUDGET_PRICE_CEILING)
    {
        reasons.push("Budget-friendly pricing".to_string());
    }

    reasons.truncate(MAX_REASONS);
    reasons
}

/// The served cuisine liked (level >= 4) by the most members, if any.
/// Cuisines are visited in id order so ties resolve the same way every call.
fn most_liked_cuisine(
    restaurant: &Restaurant,
    members: &[&FamilyMember],
) -> Option<(CuisineId, usize)> {
    let mut cuisines: Vec<&CuisineId> = restaurant.cuisines.iter().collect();
    cuisines.sort();

    let mut best: Option<(CuisineId, usize)> = None;
    for cuisine in cuisines {
        let fans = members
            .iter()
            .filter(|member| {
                member
                    .cuisine_preferences
                    .get(cuisine)
                    .map_or(false, |&level| level >= LIKED_LEVEL)
            })
            .count();
        if fans > 0 && best.as_ref().map_or(true, |(_, top)| fans > *top) {
            best = Some((cuisine.clone(), fans));
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FamilyId;

    fn member(name: &str) -> FamilyMember {
        FamilyMember::new(FamilyId::from("fam-1"), name.to_string())
    }

    fn restaurant(name: &str) -> Restaurant {
        Restaurant::new(name.to_string())
    }

    fn union_of(members: &[&FamilyMember]) -> HashSet<RestrictionId> {
        members
            .iter()
            .flat_map(|m| m.dietary_restrictions.iter().cloned())
            .collect()
    }

    #[test]
    fn test_unconstrained_member_and_loved_cuisine_scores_high() {
        let mut diner = member("Ava");
        diner
            .cuisine_preferences
            .insert(CuisineId::from("italian"), 5);

        let mut spot = restaurant("Trattoria Roma");
        spot.cuisines.insert(CuisineId::from("italian"));
        spot.rating = Some(4.8);
        spot.price_range = Some(1);

        let members = [&diner];
        let scored = score_restaurant(&spot, &members, &union_of(&members), &Catalogs::default());

        // rating 19.2 + price 10 + cuisine 10 + availability 5, no dietary
        // component since the group has no restrictions
        assert!((scored.score - 44.2).abs() < 1e-9);
        assert!((scored.max_possible - 45.0).abs() < 1e-9);
        assert_eq!(scored.percentage, 98);
        assert!(scored.missed_restriction_ids.is_empty());
        assert!(scored
            .reasons
            .iter()
            .any(|r| r.starts_with("Excellent")));
        assert!(scored.reasons.contains(&"Budget-friendly pricing".to_string()));
    }

    #[test]
    fn test_partial_accommodation_reports_missed_restrictions() {
        let mut ana = member("Ana");
        ana.dietary_restrictions.insert(RestrictionId::from("gf"));
        let mut ben = member("Ben");
        ben.dietary_restrictions.insert(RestrictionId::from("vegan"));

        let mut spot = restaurant("Corner Grill");
        spot.dietary_accommodations.insert(RestrictionId::from("gf"));

        let members = [&ana, &ben];
        let scored = score_restaurant(&spot, &members, &union_of(&members), &Catalogs::default());

        assert_eq!(
            scored.missed_restriction_ids,
            vec![RestrictionId::from("vegan")]
        );
        // Ana's only restriction is covered and she has no cuisine opinion;
        // Ben's is not covered.
        assert_eq!(scored.accommodated_member_ids, vec![ana.id.clone()]);
        assert!(scored
            .reasons
            .contains(&"Accommodates 1 of 2 dietary restrictions".to_string()));
    }

    #[test]
    fn test_full_accommodation_has_no_missed_restrictions() {
        let mut ana = member("Ana");
        ana.dietary_restrictions.insert(RestrictionId::from("gf"));
        ana.dietary_restrictions
            .insert(RestrictionId::from("nut-free"));

        let mut spot = restaurant("Safe Harbor");
        spot.dietary_accommodations.insert(RestrictionId::from("gf"));
        spot.dietary_accommodations
            .insert(RestrictionId::from("nut-free"));

        let members = [&ana];
        let scored = score_restaurant(&spot, &members, &union_of(&members), &Catalogs::default());

        assert!(scored.missed_restriction_ids.is_empty());
        assert!(scored
            .reasons
            .contains(&"Accommodates all 2 dietary restrictions".to_string()));
    }

    #[test]
    fn test_disliked_cuisine_blocks_accommodation() {
        let mut diner = member("Ava");
        diner
            .cuisine_preferences
            .insert(CuisineId::from("seafood"), 1);

        let mut spot = restaurant("The Wharf");
        spot.cuisines.insert(CuisineId::from("seafood"));

        let members = [&diner];
        let scored = score_restaurant(&spot, &members, &union_of(&members), &Catalogs::default());
        assert!(scored.accommodated_member_ids.is_empty());
    }

    #[test]
    fn test_neutral_cuisine_counts_as_accommodated() {
        let diner = member("Ava");

        let mut spot = restaurant("The Wharf");
        spot.cuisines.insert(CuisineId::from("seafood"));

        let members = [&diner];
        let scored = score_restaurant(&spot, &members, &union_of(&members), &Catalogs::default());
        assert_eq!(scored.accommodated_member_ids, vec![diner.id.clone()]);
    }

    #[test]
    fn test_higher_rating_never_scores_lower() {
        let diner = member("Ava");
        let members = [&diner];
        let required = union_of(&members);

        let mut low = restaurant("Low");
        low.rating = Some(3.0);
        let mut high = restaurant("High");
        high.rating = Some(4.0);

        let low_scored = score_restaurant(&low, &members, &required, &Catalogs::default());
        let high_scored = score_restaurant(&high, &members, &required, &Catalogs::default());
        assert!(high_scored.score >= low_scored.score);
    }

    #[test]
    fn test_bare_restaurant_still_scores_from_rating_and_price() {
        // No cuisines, no accommodations, nobody cares: rating and price
        // carry the whole score, and nothing excludes the candidate.
        let diner = member("Ava");
        let mut spot = restaurant("Mystery Diner");
        spot.rating = Some(4.0);
        spot.price_range = Some(3);

        let members = [&diner];
        let scored = score_restaurant(&spot, &members, &union_of(&members), &Catalogs::default());

        // rating 16 + price 5 + availability 5
        assert!((scored.score - 26.0).abs() < 1e-9);
        assert!((scored.max_possible - 35.0).abs() < 1e-9);
    }

    #[test]
    fn test_missing_rating_and_price_still_count_toward_maximum() {
        let diner = member("Ava");
        let spot = restaurant("Unlisted");

        let members = [&diner];
        let scored = score_restaurant(&spot, &members, &union_of(&members), &Catalogs::default());

        assert!((scored.score - AVAILABILITY_WEIGHT).abs() < 1e-9);
        assert!(
            (scored.max_possible - (AVAILABILITY_WEIGHT + RATING_WEIGHT + PRICE_WEIGHT)).abs()
                < 1e-9
        );
    }

    #[test]
    fn test_percentage_stays_within_bounds() {
        let mut diner = member("Ava");
        diner.cuisine_preferences.insert(CuisineId::from("thai"), 5);
        diner.dietary_restrictions.insert(RestrictionId::from("gf"));

        let mut spot = restaurant("Everything");
        spot.cuisines.insert(CuisineId::from("thai"));
        spot.dietary_accommodations.insert(RestrictionId::from("gf"));
        spot.rating = Some(5.0);
        spot.price_range = Some(1);

        let members = [&diner];
        let scored = score_restaurant(&spot, &members, &union_of(&members), &Catalogs::default());
        assert!(scored.percentage <= 100);
        assert_eq!(scored.percentage, 100);
    }

    #[test]
    fn test_cuisine_reason_names_the_most_liked_cuisine() {
        let mut ana = member("Ana");
        ana.cuisine_preferences.insert(CuisineId::from("thai"), 5);
        let mut ben = member("Ben");
        ben.cuisine_preferences.insert(CuisineId::from("thai"), 4);

        let mut spot = restaurant("Bangkok Table");
        spot.cuisines.insert(CuisineId::from("thai"));

        let mut catalogs = Catalogs::default();
        catalogs
            .cuisines
            .insert(CuisineId::from("thai"), "Thai".to_string());

        let members = [&ana, &ben];
        let scored = score_restaurant(&spot, &members, &union_of(&members), &catalogs);
        assert!(scored
            .reasons
            .contains(&"2 members like Thai cuisine".to_string()));
    }

    #[test]
    fn test_unknown_cuisine_name_falls_back_to_placeholder() {
        let mut diner = member("Ava");
        diner
            .cuisine_preferences
            .insert(CuisineId::from("fusion"), 5);

        let mut spot = restaurant("No Name");
        spot.cuisines.insert(CuisineId::from("fusion"));

        let members = [&diner];
        let scored = score_restaurant(&spot, &members, &union_of(&members), &Catalogs::default());
        assert!(scored
            .reasons
            .contains(&"1 member likes Unknown Cuisine cuisine".to_string()));
    }

    #[test]
    fn test_reasons_are_capped_at_four() {
        let mut ana = member("Ana");
        ana.dietary_restrictions.insert(RestrictionId::from("gf"));
        ana.cuisine_preferences.insert(CuisineId::from("thai"), 5);

        let mut spot = restaurant("Checks All Boxes");
        spot.cuisines.insert(CuisineId::from("thai"));
        spot.dietary_accommodations.insert(RestrictionId::from("gf"));
        spot.rating = Some(4.9);
        spot.price_range = Some(1);

        let members = [&ana];
        let scored = score_restaurant(&spot, &members, &union_of(&members), &Catalogs::default());
        assert_eq!(scored.reasons.len(), 4);
    }
}
