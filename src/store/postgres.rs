use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::error::AppResult;
use crate::models::{
    Catalogs, CuisineId, FamilyId, FamilyMember, MemberId, Restaurant, RestaurantId, RestrictionId,
};

use super::DirectoryStore;

/// PostgreSQL-backed directory store.
///
/// Entities span a main table plus association tables for set-valued fields;
/// fetches read the associations in bulk and assemble models in memory
/// rather than round-tripping per entity.
pub struct PgStore {
    pool: PgPool,
}

#[derive(sqlx::FromRow)]
struct RestaurantRow {
    id: String,
    name: String,
    price_range: Option<i16>,
    rating: Option<f64>,
    created_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow)]
struct MemberRow {
    id: String,
    family_id: String,
    name: String,
    created_at: DateTime<Utc>,
}

impl PgStore {
    /// Connects a pool and brings the schema up to date
    pub async fn connect(database_url: &str) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await?;

        sqlx::migrate!().run(&pool).await?;

        Ok(Self { pool })
    }

    fn assemble_restaurant(
        row: RestaurantRow,
        cuisines: &mut HashMap<String, Vec<String>>,
        accommodations: &mut HashMap<String, Vec<String>>,
    ) -> Restaurant {
        Restaurant {
            cuisines: cuisines
                .remove(&row.id)
                .unwrap_or_default()
                .into_iter()
                .map(CuisineId::from)
                .collect(),
            dietary_accommodations: accommodations
                .remove(&row.id)
                .unwrap_or_default()
                .into_iter()
                .map(RestrictionId::from)
                .collect(),
            id: RestaurantId::from(row.id),
            name: row.name,
            price_range: row.price_range.map(|p| p as u8),
            rating: row.rating,
            created_at: row.created_at,
        }
    }
}

fn group_pairs(pairs: Vec<(String, String)>) -> HashMap<String, Vec<String>> {
    let mut grouped: HashMap<String, Vec<String>> = HashMap::new();
    for (key, value) in pairs {
        grouped.entry(key).or_default().push(value);
    }
    grouped
}

#[async_trait::async_trait]
impl DirectoryStore for PgStore {
    async fn fetch_family_members(&self, family_id: &FamilyId) -> AppResult<Vec<FamilyMember>> {
        let rows: Vec<MemberRow> = sqlx::query_as(
            "SELECT id, family_id, name, created_at \
             FROM family_members WHERE family_id = $1 \
             ORDER BY created_at, id",
        )
        .bind(family_id.as_str())
        .fetch_all(&self.pool)
        .await?;

        let restriction_pairs: Vec<(String, String)> = sqlx::query_as(
            "SELECT mr.member_id, mr.restriction_id \
             FROM member_restrictions mr \
             JOIN family_members fm ON fm.id = mr.member_id \
             WHERE fm.family_id = $1",
        )
        .bind(family_id.as_str())
        .fetch_all(&self.pool)
        .await?;
        let mut restrictions = group_pairs(restriction_pairs);

        let preference_rows: Vec<(String, String, i16)> = sqlx::query_as(
            "SELECT mp.member_id, mp.cuisine_id, mp.preference_level \
             FROM member_cuisine_preferences mp \
             JOIN family_members fm ON fm.id = mp.member_id \
             WHERE fm.family_id = $1",
        )
        .bind(family_id.as_str())
        .fetch_all(&self.pool)
        .await?;
        let mut preferences: HashMap<String, HashMap<CuisineId, u8>> = HashMap::new();
        for (member_id, cuisine_id, level) in preference_rows {
            preferences
                .entry(member_id)
                .or_default()
                .insert(CuisineId::from(cuisine_id), level as u8);
        }

        Ok(rows
            .into_iter()
            .map(|row| FamilyMember {
                dietary_restrictions: restrictions
                    .remove(&row.id)
                    .unwrap_or_default()
                    .into_iter()
                    .map(RestrictionId::from)
                    .collect(),
                cuisine_preferences: preferences.remove(&row.id).unwrap_or_default(),
                id: MemberId::from(row.id),
                family_id: FamilyId::from(row.family_id),
                name: row.name,
                created_at: row.created_at,
            })
            .collect())
    }

    async fn fetch_restaurants(&self) -> AppResult<Vec<Restaurant>> {
        let rows: Vec<RestaurantRow> = sqlx::query_as(
            "SELECT id, name, price_range, rating, created_at \
             FROM restaurants ORDER BY created_at, id",
        )
        .fetch_all(&self.pool)
        .await?;

        let cuisine_pairs: Vec<(String, String)> =
            sqlx::query_as("SELECT restaurant_id, cuisine_id FROM restaurant_cuisines")
                .fetch_all(&self.pool)
                .await?;
        let mut cuisines = group_pairs(cuisine_pairs);

        let accommodation_pairs: Vec<(String, String)> = sqlx::query_as(
            "SELECT restaurant_id, restriction_id FROM restaurant_accommodations",
        )
        .fetch_all(&self.pool)
        .await?;
        let mut accommodations = group_pairs(accommodation_pairs);

        Ok(rows
            .into_iter()
            .map(|row| Self::assemble_restaurant(row, &mut cuisines, &mut accommodations))
            .collect())
    }

    async fn fetch_restaurant(&self, id: &RestaurantId) -> AppResult<Option<Restaurant>> {
        let row: Option<RestaurantRow> = sqlx::query_as(
            "SELECT id, name, price_range, rating, created_at \
             FROM restaurants WHERE id = $1",
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let cuisine_pairs: Vec<(String, String)> = sqlx::query_as(
            "SELECT restaurant_id, cuisine_id FROM restaurant_cuisines WHERE restaurant_id = $1",
        )
        .bind(id.as_str())
        .fetch_all(&self.pool)
        .await?;
        let mut cuisines = group_pairs(cuisine_pairs);

        let accommodation_pairs: Vec<(String, String)> = sqlx::query_as(
            "SELECT restaurant_id, restriction_id \
             FROM restaurant_accommodations WHERE restaurant_id = $1",
        )
        .bind(id.as_str())
        .fetch_all(&self.pool)
        .await?;
        let mut accommodations = group_pairs(accommodation_pairs);

        Ok(Some(Self::assemble_restaurant(
            row,
            &mut cuisines,
            &mut accommodations,
        )))
    }

    async fn fetch_catalogs(&self) -> AppResult<Catalogs> {
        let cuisine_rows: Vec<(String, String)> =
            sqlx::query_as("SELECT id, name FROM cuisines")
                .fetch_all(&self.pool)
                .await?;
        let restriction_rows: Vec<(String, String)> =
            sqlx::query_as("SELECT id, name FROM dietary_restrictions")
                .fetch_all(&self.pool)
                .await?;

        Ok(Catalogs {
            cuisines: cuisine_rows
                .into_iter()
                .map(|(id, name)| (CuisineId::from(id), name))
                .collect(),
            restrictions: restriction_rows
                .into_iter()
                .map(|(id, name)| (RestrictionId::from(id), name))
                .collect(),
        })
    }

    async fn create_family_member(&self, member: FamilyMember) -> AppResult<FamilyMember> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "INSERT INTO family_members (id, family_id, name, created_at) \
             VALUES ($1, $2, $3, $4)",
        )
        .bind(member.id.as_str())
        .bind(member.family_id.as_str())
        .bind(&member.name)
        .bind(member.created_at)
        .execute(&mut *tx)
        .await?;

        for restriction in &member.dietary_restrictions {
            sqlx::query(
                "INSERT INTO member_restrictions (member_id, restriction_id) VALUES ($1, $2)",
            )
            .bind(member.id.as_str())
            .bind(restriction.as_str())
            .execute(&mut *tx)
            .await?;
        }

        for (cuisine, level) in &member.cuisine_preferences {
            sqlx::query(
                "INSERT INTO member_cuisine_preferences \
                 (member_id, cuisine_id, preference_level) VALUES ($1, $2, $3)",
            )
            .bind(member.id.as_str())
            .bind(cuisine.as_str())
            .bind(i16::from(*level))
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(member)
    }

    async fn create_restaurant(&self, restaurant: Restaurant) -> AppResult<Restaurant> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "INSERT INTO restaurants (id, name, price_range, rating, created_at) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(restaurant.id.as_str())
        .bind(&restaurant.name)
        .bind(restaurant.price_range.map(i16::from))
        .bind(restaurant.rating)
        .bind(restaurant.created_at)
        .execute(&mut *tx)
        .await?;

        for cuisine in &restaurant.cuisines {
            sqlx::query(
                "INSERT INTO restaurant_cuisines (restaurant_id, cuisine_id) VALUES ($1, $2)",
            )
            .bind(restaurant.id.as_str())
            .bind(cuisine.as_str())
            .execute(&mut *tx)
            .await?;
        }

        for restriction in &restaurant.dietary_accommodations {
            sqlx::query(
                "INSERT INTO restaurant_accommodations \
                 (restaurant_id, restriction_id) VALUES ($1, $2)",
            )
            .bind(restaurant.id.as_str())
            .bind(restriction.as_str())
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(restaurant)
    }
}
