use crate::error::AppResult;
use crate::models::{Catalogs, FamilyId, FamilyMember, Restaurant, RestaurantId};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Read/write access to the family and restaurant directory.
///
/// The recommendation engine never talks to a store; handlers load a
/// consistent snapshot through this trait and hand plain collections to the
/// engine. Fetches return whatever is currently visible; coordination with
/// concurrent writers is the implementation's concern.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait DirectoryStore: Send + Sync {
    /// All members of a family; empty when the family has none yet
    async fn fetch_family_members(&self, family_id: &FamilyId) -> AppResult<Vec<FamilyMember>>;

    /// The full restaurant directory, in stable order
    async fn fetch_restaurants(&self) -> AppResult<Vec<Restaurant>>;

    /// A single restaurant, when it exists
    async fn fetch_restaurant(&self, id: &RestaurantId) -> AppResult<Option<Restaurant>>;

    /// The cuisine and dietary-restriction reference catalogs
    async fn fetch_catalogs(&self) -> AppResult<Catalogs>;

    async fn create_family_member(&self, member: FamilyMember) -> AppResult<FamilyMember>;

    async fn create_restaurant(&self, restaurant: Restaurant) -> AppResult<Restaurant>;
}
