use axum::{extract::State, Json};
use serde::Serialize;

use crate::{
    error::AppResult,
    models::{CuisineId, RestrictionId},
    routes::AppState,
};

#[derive(Debug, Serialize)]
pub struct CuisineEntry {
    pub id: CuisineId,
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct RestrictionEntry {
    pub id: RestrictionId,
    pub name: String,
}

/// Handler for the cuisine reference catalog
pub async fn cuisines(State(state): State<AppState>) -> AppResult<Json<Vec<CuisineEntry>>> {
    let catalogs = state.store.fetch_catalogs().await?;
    let mut entries: Vec<CuisineEntry> = catalogs
        .cuisines
        .into_iter()
        .map(|(id, name)| CuisineEntry { id, name })
        .collect();
    entries.sort_by(|a, b| a.id.cmp(&b.id));
    Ok(Json(entries))
}

/// Handler for the dietary-restriction reference catalog
pub async fn dietary_restrictions(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<RestrictionEntry>>> {
    let catalogs = state.store.fetch_catalogs().await?;
    let mut entries: Vec<RestrictionEntry> = catalogs
        .restrictions
        .into_iter()
        .map(|(id, name)| RestrictionEntry { id, name })
        .collect();
    entries.sort_by(|a, b| a.id.cmp(&b.id));
    Ok(Json(entries))
}
