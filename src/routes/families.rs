use std::collections::HashMap;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::{
    error::{AppError, AppResult},
    models::{
        CuisineId, FamilyId, FamilyMember, RestrictionId, MAX_PREFERENCE_LEVEL,
        MIN_PREFERENCE_LEVEL,
    },
    routes::AppState,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMemberRequest {
    pub name: String,
    #[serde(default)]
    pub dietary_restrictions: Vec<RestrictionId>,
    #[serde(default)]
    pub cuisine_preferences: HashMap<CuisineId, u8>,
}

impl CreateMemberRequest {
    fn into_member(self, family_id: FamilyId) -> AppResult<FamilyMember> {
        if self.name.trim().is_empty() {
            return Err(AppError::InvalidRequest("name must not be empty".to_string()));
        }
        for (cuisine, &level) in &self.cuisine_preferences {
            if !(MIN_PREFERENCE_LEVEL..=MAX_PREFERENCE_LEVEL).contains(&level) {
                return Err(AppError::InvalidRequest(format!(
                    "preference for {cuisine} must be between {MIN_PREFERENCE_LEVEL} and {MAX_PREFERENCE_LEVEL}"
                )));
            }
        }

        let mut member = FamilyMember::new(family_id, self.name);
        member.dietary_restrictions = self.dietary_restrictions.into_iter().collect();
        member.cuisine_preferences = self.cuisine_preferences;
        Ok(member)
    }
}

/// Handler for listing a family's members
pub async fn list_members(
    State(state): State<AppState>,
    Path(family_id): Path<FamilyId>,
) -> AppResult<Json<Vec<FamilyMember>>> {
    let members = state.store.fetch_family_members(&family_id).await?;
    Ok(Json(members))
}

/// Handler for adding a member to a family
pub async fn create_member(
    State(state): State<AppState>,
    Path(family_id): Path<FamilyId>,
    Json(request): Json<CreateMemberRequest>,
) -> AppResult<(StatusCode, Json<FamilyMember>)> {
    let member = request.into_member(family_id)?;
    let created = state.store.create_family_member(member).await?;
    tracing::info!(member_id = %created.id, family_id = %created.family_id, "Family member created");
    Ok((StatusCode::CREATED, Json(created)))
}
