use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::{
    error::{AppError, AppResult},
    models::{
        CuisineId, Restaurant, RestaurantId, RestrictionId, MAX_PRICE_RANGE, MAX_RATING,
        MIN_PRICE_RANGE,
    },
    routes::AppState,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRestaurantRequest {
    pub name: String,
    #[serde(default)]
    pub cuisines: Vec<CuisineId>,
    #[serde(default)]
    pub dietary_accommodations: Vec<RestrictionId>,
    #[serde(default)]
    pub price_range: Option<u8>,
    #[serde(default)]
    pub rating: Option<f64>,
}

impl CreateRestaurantRequest {
    fn into_restaurant(self) -> AppResult<Restaurant> {
        if self.name.trim().is_empty() {
            return Err(AppError::InvalidRequest("name must not be empty".to_string()));
        }
        if let Some(price) = self.price_range {
            if !(MIN_PRICE_RANGE..=MAX_PRICE_RANGE).contains(&price) {
                return Err(AppError::InvalidRequest(format!(
                    "priceRange must be between {MIN_PRICE_RANGE} and {MAX_PRICE_RANGE}"
                )));
            }
        }
        if let Some(rating) = self.rating {
            if !(0.0..=MAX_RATING).contains(&rating) {
                return Err(AppError::InvalidRequest(format!(
                    "rating must be between 0 and {MAX_RATING}"
                )));
            }
        }

        let mut restaurant = Restaurant::new(self.name);
        restaurant.cuisines = self.cuisines.into_iter().collect();
        restaurant.dietary_accommodations = self.dietary_accommodations.into_iter().collect();
        restaurant.price_range = self.price_range;
        restaurant.rating = self.rating;
        Ok(restaurant)
    }
}

/// Handler for listing the restaurant directory
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<Restaurant>>> {
    let restaurants = state.store.fetch_restaurants().await?;
    Ok(Json(restaurants))
}

/// Handler for adding a restaurant to the directory
pub async fn create(
    State(state): State<AppState>,
    Json(request): Json<CreateRestaurantRequest>,
) -> AppResult<(StatusCode, Json<Restaurant>)> {
    let restaurant = request.into_restaurant()?;
    let created = state.store.create_restaurant(restaurant).await?;
    tracing::info!(restaurant_id = %created.id, "Restaurant created");
    Ok((StatusCode::CREATED, Json(created)))
}

/// Handler for fetching one restaurant
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<RestaurantId>,
) -> AppResult<Json<Restaurant>> {
    state
        .store
        .fetch_restaurant(&id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("restaurant {id}")))
}
