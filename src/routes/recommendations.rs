use std::collections::HashSet;

use axum::{extract::State, Extension, Json};
use serde::Deserialize;

use crate::{
    error::{AppError, AppResult},
    middleware::request_id::RequestId,
    models::{
        FamilyId, Filters, MemberId, RecommendationOutcome, RestaurantId, MAX_PRICE_RANGE,
        MAX_RATING, MIN_PRICE_RANGE,
    },
    routes::AppState,
    services::recommendations,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationRequest {
    pub family_id: FamilyId,
    pub selected_member_ids: Vec<MemberId>,
    #[serde(default)]
    pub filters: Option<Filters>,
    #[serde(default)]
    pub favorite_restaurant_ids: Vec<RestaurantId>,
}

fn validate_filters(filters: &Filters) -> AppResult<()> {
    if let Some(price) = filters.max_price_range {
        if !(MIN_PRICE_RANGE..=MAX_PRICE_RANGE).contains(&price) {
            return Err(AppError::InvalidRequest(format!(
                "maxPriceRange must be between {MIN_PRICE_RANGE} and {MAX_PRICE_RANGE}"
            )));
        }
    }
    if let Some(rating) = filters.min_rating {
        if !(0.0..=MAX_RATING).contains(&rating) {
            return Err(AppError::InvalidRequest(format!(
                "minRating must be between 0 and {MAX_RATING}"
            )));
        }
    }
    Ok(())
}

/// Handler for the recommendation endpoint.
///
/// Loads a snapshot of the family and the directory, then hands plain
/// collections to the engine.
pub async fn recommend(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<RecommendationRequest>,
) -> AppResult<Json<RecommendationOutcome>> {
    tracing::info!(
        request_id = %request_id,
        family_id = %request.family_id,
        selected = request.selected_member_ids.len(),
        "Processing recommendation request"
    );

    if let Some(filters) = &request.filters {
        validate_filters(filters)?;
    }

    let members = state.store.fetch_family_members(&request.family_id).await?;
    let restaurants = state.store.fetch_restaurants().await?;
    let catalogs = state.store.fetch_catalogs().await?;
    let favorites: HashSet<RestaurantId> =
        request.favorite_restaurant_ids.iter().cloned().collect();

    let outcome = recommendations::recommend(
        &restaurants,
        &members,
        &request.selected_member_ids,
        request.filters.as_ref(),
        &favorites,
        &catalogs,
    )?;

    tracing::info!(
        request_id = %request_id,
        results = outcome.recommendations.len(),
        fallback = ?outcome.fallback_mode,
        "Recommendation request completed"
    );

    Ok(Json(outcome))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Catalogs;
    use crate::store::MockDirectoryStore;
    use std::sync::Arc;

    fn empty_request() -> RecommendationRequest {
        RecommendationRequest {
            family_id: FamilyId::from("fam-1"),
            selected_member_ids: vec![],
            filters: None,
            favorite_restaurant_ids: vec![],
        }
    }

    #[tokio::test]
    async fn test_empty_selection_is_rejected_before_scoring() {
        let mut store = MockDirectoryStore::new();
        store
            .expect_fetch_family_members()
            .returning(|_| Ok(vec![]));
        store.expect_fetch_restaurants().returning(|| Ok(vec![]));
        store
            .expect_fetch_catalogs()
            .returning(|| Ok(Catalogs::default()));

        let state = AppState {
            store: Arc::new(store),
        };

        let result = recommend(
            State(state),
            Extension(RequestId::new()),
            Json(empty_request()),
        )
        .await;
        assert!(matches!(result, Err(AppError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn test_invalid_filter_bounds_are_rejected() {
        let store = MockDirectoryStore::new();
        let state = AppState {
            store: Arc::new(store),
        };

        let mut request = empty_request();
        request.filters = Some(Filters {
            max_price_range: Some(9),
            ..Filters::default()
        });

        let result = recommend(State(state), Extension(RequestId::new()), Json(request)).await;
        assert!(matches!(result, Err(AppError::InvalidRequest(_))));
    }
}
