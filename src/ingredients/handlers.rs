use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    auth::jwt::AuthUser,
    common::{validate_name, ListFilter},
    error::ApiError,
    state::AppState,
};

use super::{
    dto::{CreateIngredientRequest, IngredientOut, PatchIngredientRequest},
    repo,
};

#[instrument(skip(state))]
pub async fn list(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(filter): Query<ListFilter>,
) -> Result<Json<Vec<IngredientOut>>, ApiError> {
    let ingredients = repo::list_by_user(&state.db, user_id, filter.assigned_only()).await?;
    Ok(Json(
        ingredients.into_iter().map(IngredientOut::from).collect(),
    ))
}

#[instrument(skip(state, payload))]
pub async fn create(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<CreateIngredientRequest>,
) -> Result<(StatusCode, Json<IngredientOut>), ApiError> {
    let name = validate_name(&payload.name)?;
    let ingredient = repo::upsert_by_name(&state.db, user_id, name).await?;
    info!(user_id = %user_id, ingredient_id = %ingredient.id, "ingredient created");
    Ok((StatusCode::CREATED, Json(ingredient.into())))
}

#[instrument(skip(state))]
pub async fn retrieve(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<IngredientOut>, ApiError> {
    let ingredient = repo::find(&state.db, user_id, id)
        .await?
        .ok_or(ApiError::NotFound("ingredient"))?;
    Ok(Json(ingredient.into()))
}

#[instrument(skip(state, payload))]
pub async fn update(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<PatchIngredientRequest>,
) -> Result<Json<IngredientOut>, ApiError> {
    let Some(raw) = payload.name.as_deref() else {
        let ingredient = repo::find(&state.db, user_id, id)
            .await?
            .ok_or(ApiError::NotFound("ingredient"))?;
        return Ok(Json(ingredient.into()));
    };
    rename(&state, user_id, id, raw).await
}

#[instrument(skip(state, payload))]
pub async fn replace(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<CreateIngredientRequest>,
) -> Result<Json<IngredientOut>, ApiError> {
    rename(&state, user_id, id, &payload.name).await
}

async fn rename(
    state: &AppState,
    user_id: Uuid,
    id: Uuid,
    raw: &str,
) -> Result<Json<IngredientOut>, ApiError> {
    let name = validate_name(raw)?;
    let taken = sqlx::query_scalar::<_, Uuid>(
        "SELECT id FROM ingredients WHERE user_id = $1 AND name = $2",
    )
    .bind(user_id)
    .bind(name)
    .fetch_optional(&state.db)
    .await
    .map_err(anyhow::Error::from)?;
    if let Some(existing) = taken {
        if existing != id {
            return Err(ApiError::Conflict(
                "ingredient with this name already exists",
            ));
        }
    }
    let ingredient = repo::rename(&state.db, user_id, id, name)
        .await?
        .ok_or(ApiError::NotFound("ingredient"))?;
    Ok(Json(ingredient.into()))
}

#[instrument(skip(state))]
pub async fn remove(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if !repo::delete(&state.db, user_id, id).await? {
        return Err(ApiError::NotFound("ingredient"));
    }
    info!(user_id = %user_id, ingredient_id = %id, "ingredient deleted");
    Ok(StatusCode::NO_CONTENT)
}
