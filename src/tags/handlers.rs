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
    dto::{CreateTagRequest, PatchTagRequest, TagOut},
    repo,
};

#[instrument(skip(state))]
pub async fn list(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(filter): Query<ListFilter>,
) -> Result<Json<Vec<TagOut>>, ApiError> {
    let tags = repo::list_by_user(&state.db, user_id, filter.assigned_only()).await?;
    Ok(Json(tags.into_iter().map(TagOut::from).collect()))
}

#[instrument(skip(state, payload))]
pub async fn create(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<CreateTagRequest>,
) -> Result<(StatusCode, Json<TagOut>), ApiError> {
    let name = validate_name(&payload.name)?;
    // Same create-or-get as nested recipe writes: posting an existing name
    // yields the existing owned row rather than a constraint error.
    let tag = repo::upsert_by_name(&state.db, user_id, name).await?;
    info!(user_id = %user_id, tag_id = %tag.id, "tag created");
    Ok((StatusCode::CREATED, Json(tag.into())))
}

#[instrument(skip(state))]
pub async fn retrieve(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<TagOut>, ApiError> {
    let tag = repo::find(&state.db, user_id, id)
        .await?
        .ok_or(ApiError::NotFound("tag"))?;
    Ok(Json(tag.into()))
}

#[instrument(skip(state, payload))]
pub async fn update(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<PatchTagRequest>,
) -> Result<Json<TagOut>, ApiError> {
    let Some(raw) = payload.name.as_deref() else {
        // Nothing to change; still 404 when the record is not the caller's.
        let tag = repo::find(&state.db, user_id, id)
            .await?
            .ok_or(ApiError::NotFound("tag"))?;
        return Ok(Json(tag.into()));
    };
    rename(&state, user_id, id, raw).await
}

#[instrument(skip(state, payload))]
pub async fn replace(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<CreateTagRequest>,
) -> Result<Json<TagOut>, ApiError> {
    rename(&state, user_id, id, &payload.name).await
}

async fn rename(
    state: &AppState,
    user_id: Uuid,
    id: Uuid,
    raw: &str,
) -> Result<Json<TagOut>, ApiError> {
    let name = validate_name(raw)?;
    if let Some(existing) = find_by_name(state, user_id, name).await? {
        if existing != id {
            return Err(ApiError::Conflict("tag with this name already exists"));
        }
    }
    let tag = repo::rename(&state.db, user_id, id, name)
        .await?
        .ok_or(ApiError::NotFound("tag"))?;
    Ok(Json(tag.into()))
}

async fn find_by_name(state: &AppState, user_id: Uuid, name: &str) -> Result<Option<Uuid>, ApiError> {
    let id = sqlx::query_scalar::<_, Uuid>(
        "SELECT id FROM tags WHERE user_id = $1 AND name = $2",
    )
    .bind(user_id)
    .bind(name)
    .fetch_optional(&state.db)
    .await
    .map_err(anyhow::Error::from)?;
    Ok(id)
}

#[instrument(skip(state))]
pub async fn remove(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if !repo::delete(&state.db, user_id, id).await? {
        return Err(ApiError::NotFound("tag"));
    }
    info!(user_id = %user_id, tag_id = %id, "tag deleted");
    Ok(StatusCode::NO_CONTENT)
}
