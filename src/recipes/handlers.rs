use std::collections::HashMap;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    auth::jwt::AuthUser, error::ApiError, ingredients::dto::IngredientOut, state::AppState,
    tags::dto::TagOut,
};

use super::{
    dto::{parse_id_list, RecipeDetail, RecipePatchRequest, RecipeSummary, RecipeWriteRequest},
    repo::{self, AssocRow, Recipe, RecipeChanges},
};

#[derive(Debug, Default, Deserialize)]
pub struct RecipeListQuery {
    pub tags: Option<String>,
    pub ingredients: Option<String>,
}

#[instrument(skip(state))]
pub async fn list(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(query): Query<RecipeListQuery>,
) -> Result<Json<Vec<RecipeSummary>>, ApiError> {
    let tag_ids = match query.tags.as_deref() {
        Some(raw) => parse_id_list(raw)?,
        None => Vec::new(),
    };
    let ingredient_ids = match query.ingredients.as_deref() {
        Some(raw) => parse_id_list(raw)?,
        None => Vec::new(),
    };

    let recipes = repo::list_by_user(&state.db, user_id, &tag_ids, &ingredient_ids).await?;
    let ids: Vec<Uuid> = recipes.iter().map(|r| r.id).collect();
    let mut tags = group_by_recipe(repo::tags_for(&state.db, &ids).await?);
    let mut ingredients = group_by_recipe(repo::ingredients_for(&state.db, &ids).await?);

    let items = recipes
        .into_iter()
        .map(|r| {
            let tag_ids = ids_of(tags.remove(&r.id));
            let ingredient_ids = ids_of(ingredients.remove(&r.id));
            summarize(r, tag_ids, ingredient_ids)
        })
        .collect();
    Ok(Json(items))
}

#[instrument(skip(state, payload))]
pub async fn create(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<RecipeWriteRequest>,
) -> Result<(StatusCode, Json<RecipeDetail>), ApiError> {
    let new = payload.into_new_recipe()?;
    let recipe = repo::create(&state.db, user_id, new).await?;
    info!(user_id = %user_id, recipe_id = %recipe.id, "recipe created");
    let detail = load_detail(&state, recipe).await?;
    Ok((StatusCode::CREATED, Json(detail)))
}

#[instrument(skip(state))]
pub async fn retrieve(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<RecipeDetail>, ApiError> {
    let recipe = repo::find(&state.db, user_id, id)
        .await?
        .ok_or(ApiError::NotFound("recipe"))?;
    Ok(Json(load_detail(&state, recipe).await?))
}

#[instrument(skip(state, payload))]
pub async fn update(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<RecipePatchRequest>,
) -> Result<Json<RecipeDetail>, ApiError> {
    let changes = payload.into_changes()?;
    let recipe = repo::update(&state.db, user_id, id, changes)
        .await?
        .ok_or(ApiError::NotFound("recipe"))?;
    info!(user_id = %user_id, recipe_id = %id, "recipe updated");
    Ok(Json(load_detail(&state, recipe).await?))
}

#[instrument(skip(state, payload))]
pub async fn replace(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<RecipeWriteRequest>,
) -> Result<Json<RecipeDetail>, ApiError> {
    let new = payload.into_new_recipe()?;
    let changes = RecipeChanges {
        title: Some(new.title),
        time_minutes: Some(new.time_minutes),
        price: Some(new.price),
        description: Some(new.description),
        link: Some(new.link),
        tags: new.tags,
        ingredients: new.ingredients,
    };
    let recipe = repo::update(&state.db, user_id, id, changes)
        .await?
        .ok_or(ApiError::NotFound("recipe"))?;
    info!(user_id = %user_id, recipe_id = %id, "recipe replaced");
    Ok(Json(load_detail(&state, recipe).await?))
}

#[instrument(skip(state))]
pub async fn remove(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if !repo::delete(&state.db, user_id, id).await? {
        return Err(ApiError::NotFound("recipe"));
    }
    info!(user_id = %user_id, recipe_id = %id, "recipe deleted");
    Ok(StatusCode::NO_CONTENT)
}

async fn load_detail(state: &AppState, recipe: Recipe) -> Result<RecipeDetail, ApiError> {
    let ids = [recipe.id];
    let tags = repo::tags_for(&state.db, &ids)
        .await?
        .into_iter()
        .map(|row| TagOut {
            id: row.id,
            name: row.name,
        })
        .collect();
    let ingredients = repo::ingredients_for(&state.db, &ids)
        .await?
        .into_iter()
        .map(|row| IngredientOut {
            id: row.id,
            name: row.name,
        })
        .collect();
    Ok(RecipeDetail::from_parts(recipe, tags, ingredients))
}

fn summarize(recipe: Recipe, tags: Vec<Uuid>, ingredients: Vec<Uuid>) -> RecipeSummary {
    RecipeSummary {
        id: recipe.id,
        title: recipe.title,
        time_minutes: recipe.time_minutes,
        price: recipe.price,
        link: recipe.link,
        tags,
        ingredients,
    }
}

/// Batch association rows keyed by recipe; input order (name-descending)
/// is preserved within each bucket.
fn group_by_recipe(rows: Vec<AssocRow>) -> HashMap<Uuid, Vec<AssocRow>> {
    let mut grouped: HashMap<Uuid, Vec<AssocRow>> = HashMap::new();
    for row in rows {
        grouped.entry(row.recipe_id).or_default().push(row);
    }
    grouped
}

fn ids_of(rows: Option<Vec<AssocRow>>) -> Vec<Uuid> {
    rows.unwrap_or_default().into_iter().map(|r| r.id).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(recipe_id: Uuid, id: Uuid, name: &str) -> AssocRow {
        AssocRow {
            recipe_id,
            id,
            name: name.into(),
        }
    }

    #[test]
    fn grouping_keeps_rows_with_their_recipe() {
        let r1 = Uuid::new_v4();
        let r2 = Uuid::new_v4();
        let (a, b, c) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let grouped = group_by_recipe(vec![
            row(r1, a, "Vegan"),
            row(r1, b, "Quick"),
            row(r2, c, "Easy"),
        ]);
        assert_eq!(ids_of(grouped.get(&r1).cloned()), vec![a, b]);
        assert_eq!(ids_of(grouped.get(&r2).cloned()), vec![c]);
        assert!(ids_of(None).is_empty());
    }

    #[test]
    fn list_query_parses_optional_filters() {
        let q: RecipeListQuery = serde_json::from_str("{}").unwrap();
        assert!(q.tags.is_none() && q.ingredients.is_none());

        let id = Uuid::new_v4();
        let q: RecipeListQuery =
            serde_json::from_str(&format!(r#"{{"tags": "{id}"}}"#)).unwrap();
        assert_eq!(parse_id_list(q.tags.as_deref().unwrap()).unwrap(), vec![id]);
    }
}
