use serde::{Deserialize, Serialize};
use uuid::Uuid;

mod catalog;
mod family;
mod recommendation;
mod restaurant;

pub use catalog::{Catalogs, UNKNOWN_CUISINE, UNKNOWN_RESTRICTION};
pub use family::{FamilyMember, MAX_PREFERENCE_LEVEL, MIN_PREFERENCE_LEVEL};
pub use recommendation::{
    CuisineAffinity, FallbackMode, Filters, GroupSummary, Recommendation, RecommendationOutcome,
    RemovedMember, RestrictionCount,
};
pub use restaurant::{Restaurant, MAX_PRICE_RANGE, MAX_RATING, MIN_PRICE_RANGE};

/// Declares a tagged identifier over an opaque string.
///
/// Reference data arrives from clients and seed scripts as raw strings;
/// tagging at the model boundary keeps a cuisine id from ever being compared
/// against a restriction id further in.
macro_rules! tagged_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            /// Generates a fresh random id
            pub fn generate() -> Self {
                Self(Uuid::new_v4().to_string())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }
    };
}

tagged_id!(
    /// Identifier for a family (a group of members sharing a directory)
    FamilyId
);
tagged_id!(
    /// Identifier for a family member
    MemberId
);
tagged_id!(
    /// Identifier for a restaurant in the directory
    RestaurantId
);
tagged_id!(
    /// Identifier for a cuisine category (e.g. "italian")
    CuisineId
);
tagged_id!(
    /// Identifier for a dietary restriction (e.g. "gluten-free")
    RestrictionId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tagged_id_serde_is_transparent() {
        let id = CuisineId::from("italian");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, r#""italian""#);

        let deserialized: CuisineId = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, id);
    }

    #[test]
    fn test_tagged_id_display() {
        let id = RestaurantId::from("r-42");
        assert_eq!(format!("{}", id), "r-42");
    }

    #[test]
    fn test_generated_ids_are_unique() {
        assert_ne!(MemberId::generate(), MemberId::generate());
    }
}
