use std::cmp::Ordering;
use std::collections::HashMap;

use crate::models::{
    Catalogs, CuisineAffinity, CuisineId, FamilyMember, GroupSummary, RestrictionCount,
    RestrictionId,
};

/// Number of cuisines surfaced in the group summary
pub const TOP_CUISINE_LIMIT: usize = 5;

/// Digests the selected members into group-level facts.
///
/// Independent of the catalog of restaurants and of any filters: the same
/// summary is returned whether the recommendation list is full, relaxed, or
/// empty.
pub fn summarize_group(members: &[&FamilyMember], catalogs: &Catalogs) -> GroupSummary {
    let mut restriction_counts: HashMap<&RestrictionId, usize> = HashMap::new();
    for member in members {
        for restriction in &member.dietary_restrictions {
            *restriction_counts.entry(restriction).or_insert(0) += 1;
        }
    }

    let mut common_dietary_restrictions: Vec<RestrictionCount> = restriction_counts
        .into_iter()
        .map(|(id, member_count)| RestrictionCount {
            id: id.clone(),
            name: catalogs.restriction_name(id),
            member_count,
        })
        .collect();
    common_dietary_restrictions.sort_by(|a, b| {
        b.member_count
            .cmp(&a.member_count)
            .then_with(|| a.id.cmp(&b.id))
    });

    // Mean preference per cuisine, over the members who expressed one
    let mut preference_totals: HashMap<&CuisineId, (u32, usize)> = HashMap::new();
    for member in members {
        for (cuisine, &level) in &member.cuisine_preferences {
            let entry = preference_totals.entry(cuisine).or_insert((0, 0));
            entry.0 += u32::from(level);
            entry.1 += 1;
        }
    }

    let mut top_cuisine_preferences: Vec<CuisineAffinity> = preference_totals
        .into_iter()
        .map(|(id, (total, voters))| CuisineAffinity {
            cuisine_id: id.clone(),
            cuisine_name: catalogs.cuisine_name(id),
            average_preference: f64::from(total) / voters as f64,
        })
        .collect();
    top_cuisine_preferences.sort_by(|a, b| {
        b.average_preference
            .partial_cmp(&a.average_preference)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.cuisine_id.cmp(&b.cuisine_id))
    });
    top_cuisine_preferences.truncate(TOP_CUISINE_LIMIT);

    GroupSummary {
        total_members: members.len(),
        common_dietary_restrictions,
        top_cuisine_preferences,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FamilyId;

    fn member(name: &str) -> FamilyMember {
        FamilyMember::new(FamilyId::from("fam-1"), name.to_string())
    }

    #[test]
    fn test_restriction_counts_cover_the_whole_group() {
        let mut ana = member("Ana");
        ana.dietary_restrictions.insert(RestrictionId::from("gf"));
        ana.dietary_restrictions.insert(RestrictionId::from("vegan"));
        let mut ben = member("Ben");
        ben.dietary_restrictions.insert(RestrictionId::from("gf"));

        let mut catalogs = Catalogs::default();
        catalogs
            .restrictions
            .insert(RestrictionId::from("gf"), "Gluten-Free".to_string());

        let summary = summarize_group(&[&ana, &ben], &catalogs);

        assert_eq!(summary.total_members, 2);
        assert_eq!(summary.common_dietary_restrictions.len(), 2);
        // Shared restriction ranks first
        assert_eq!(
            summary.common_dietary_restrictions[0],
            RestrictionCount {
                id: RestrictionId::from("gf"),
                name: "Gluten-Free".to_string(),
                member_count: 2,
            }
        );
        assert_eq!(
            summary.common_dietary_restrictions[1].name,
            "Unknown Restriction"
        );
    }

    #[test]
    fn test_cuisine_means_ignore_non_voters() {
        let mut ana = member("Ana");
        ana.cuisine_preferences.insert(CuisineId::from("thai"), 5);
        let mut ben = member("Ben");
        ben.cuisine_preferences.insert(CuisineId::from("thai"), 2);
        let carol = member("Carol"); // no opinions at all

        let summary = summarize_group(&[&ana, &ben, &carol], &Catalogs::default());

        assert_eq!(summary.top_cuisine_preferences.len(), 1);
        let thai = &summary.top_cuisine_preferences[0];
        assert_eq!(thai.cuisine_id, CuisineId::from("thai"));
        assert!((thai.average_preference - 3.5).abs() < 1e-9);
    }

    #[test]
    fn test_top_cuisines_are_limited_to_five() {
        let mut ana = member("Ana");
        for (i, cuisine) in ["a", "b", "c", "d", "e", "f", "g"].iter().enumerate() {
            let level = 1 + (i % 5) as u8;
            ana.cuisine_preferences
                .insert(CuisineId::from(*cuisine), level);
        }

        let summary = summarize_group(&[&ana], &Catalogs::default());
        assert_eq!(summary.top_cuisine_preferences.len(), TOP_CUISINE_LIMIT);

        // Descending by mean
        let means: Vec<f64> = summary
            .top_cuisine_preferences
            .iter()
            .map(|c| c.average_preference)
            .collect();
        let mut sorted = means.clone();
        sorted.sort_by(|a, b| b.partial_cmp(a).unwrap());
        assert_eq!(means, sorted);
    }

    #[test]
    fn test_empty_selection_produces_an_empty_summary() {
        let summary = summarize_group(&[], &Catalogs::default());
        assert_eq!(summary.total_members, 0);
        assert!(summary.common_dietary_restrictions.is_empty());
        assert!(summary.top_cuisine_preferences.is_empty());
    }
}
