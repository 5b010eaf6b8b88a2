use std::collections::HashMap;

use tokio::sync::RwLock;

use crate::error::AppResult;
use crate::models::{
    Catalogs, CuisineId, FamilyId, FamilyMember, Restaurant, RestaurantId, RestrictionId,
};

use super::DirectoryStore;

/// In-memory directory store.
///
/// Backs tests and database-less operation. State lives behind a single
/// RwLock so every fetch observes a consistent snapshot.
pub struct MemoryStore {
    inner: RwLock<MemoryState>,
}

struct MemoryState {
    members: HashMap<FamilyId, Vec<FamilyMember>>,
    restaurants: Vec<Restaurant>,
    catalogs: Catalogs,
}

impl MemoryStore {
    /// Creates an empty store with empty reference catalogs
    pub fn new() -> Self {
        Self::with_catalogs(Catalogs::default())
    }

    /// Creates an empty store with the given reference catalogs
    pub fn with_catalogs(catalogs: Catalogs) -> Self {
        Self {
            inner: RwLock::new(MemoryState {
                members: HashMap::new(),
                restaurants: Vec::new(),
                catalogs,
            }),
        }
    }

    /// Creates a store preloaded with a small default cuisine and
    /// restriction catalog, so a database-less server is usable out of the
    /// box.
    pub fn seeded() -> Self {
        let mut catalogs = Catalogs::default();
        for (id, name) in [
            ("american", "American"),
            ("chinese", "Chinese"),
            ("indian", "Indian"),
            ("italian", "Italian"),
            ("japanese", "Japanese"),
            ("mediterranean", "Mediterranean"),
            ("mexican", "Mexican"),
            ("thai", "Thai"),
        ] {
            catalogs.cuisines.insert(CuisineId::from(id), name.to_string());
        }
        for (id, name) in [
            ("dairy-free", "Dairy-Free"),
            ("gluten-free", "Gluten-Free"),
            ("halal", "Halal"),
            ("kosher", "Kosher"),
            ("nut-free", "Nut-Free"),
            ("shellfish-free", "Shellfish-Free"),
            ("vegan", "Vegan"),
            ("vegetarian", "Vegetarian"),
        ] {
            catalogs
                .restrictions
                .insert(RestrictionId::from(id), name.to_string());
        }
        Self::with_catalogs(catalogs)
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl DirectoryStore for MemoryStore {
    async fn fetch_family_members(&self, family_id: &FamilyId) -> AppResult<Vec<FamilyMember>> {
        let state = self.inner.read().await;
        Ok(state.members.get(family_id).cloned().unwrap_or_default())
    }

    async fn fetch_restaurants(&self) -> AppResult<Vec<Restaurant>> {
        let state = self.inner.read().await;
        Ok(state.restaurants.clone())
    }

    async fn fetch_restaurant(&self, id: &RestaurantId) -> AppResult<Option<Restaurant>> {
        let state = self.inner.read().await;
        Ok(state.restaurants.iter().find(|r| &r.id == id).cloned())
    }

    async fn fetch_catalogs(&self) -> AppResult<Catalogs> {
        let state = self.inner.read().await;
        Ok(state.catalogs.clone())
    }

    async fn create_family_member(&self, member: FamilyMember) -> AppResult<FamilyMember> {
        let mut state = self.inner.write().await;
        state
            .members
            .entry(member.family_id.clone())
            .or_default()
            .push(member.clone());
        Ok(member)
    }

    async fn create_restaurant(&self, restaurant: Restaurant) -> AppResult<Restaurant> {
        let mut state = self.inner.write().await;
        state.restaurants.push(restaurant.clone());
        Ok(restaurant)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_member_round_trip() {
        let store = MemoryStore::new();
        let family_id = FamilyId::from("fam-1");

        tokio_test::block_on(async {
            let member = FamilyMember::new(family_id.clone(), "Ana".to_string());
            store.create_family_member(member.clone()).await.unwrap();

            let members = store.fetch_family_members(&family_id).await.unwrap();
            assert_eq!(members, vec![member]);

            let other = store
                .fetch_family_members(&FamilyId::from("fam-2"))
                .await
                .unwrap();
            assert!(other.is_empty());
        });
    }

    #[test]
    fn test_restaurant_round_trip() {
        let store = MemoryStore::new();

        tokio_test::block_on(async {
            let restaurant = Restaurant::new("Trattoria Roma".to_string());
            let id = restaurant.id.clone();
            store.create_restaurant(restaurant.clone()).await.unwrap();

            assert_eq!(store.fetch_restaurants().await.unwrap().len(), 1);
            assert_eq!(
                store.fetch_restaurant(&id).await.unwrap(),
                Some(restaurant)
            );
            assert_eq!(
                store
                    .fetch_restaurant(&RestaurantId::from("missing"))
                    .await
                    .unwrap(),
                None
            );
        });
    }

    #[test]
    fn test_seeded_store_has_reference_catalogs() {
        let store = MemoryStore::seeded();

        tokio_test::block_on(async {
            let catalogs = store.fetch_catalogs().await.unwrap();
            assert_eq!(
                catalogs.cuisine_name(&CuisineId::from("italian")),
                "Italian"
            );
            assert_eq!(
                catalogs.restriction_name(&RestrictionId::from("gluten-free")),
                "Gluten-Free"
            );
        });
    }
}
