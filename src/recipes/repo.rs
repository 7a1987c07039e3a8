use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{ingredients, tags};

#[derive(Debug, Clone, FromRow)]
pub struct Recipe {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub time_minutes: i32,
    pub price: Decimal,
    pub description: String,
    pub link: String,
    pub created_at: OffsetDateTime,
}

/// Validated input for a create or full replace.
#[derive(Debug)]
pub struct NewRecipe {
    pub title: String,
    pub time_minutes: i32,
    pub price: Decimal,
    pub description: String,
    pub link: String,
    /// Tag names to upsert and associate; `None` leaves associations alone
    /// (only meaningful on replace).
    pub tags: Option<Vec<String>>,
    pub ingredients: Option<Vec<String>>,
}

/// Partial update: only `Some` fields change.
#[derive(Debug, Default)]
pub struct RecipeChanges {
    pub title: Option<String>,
    pub time_minutes: Option<i32>,
    pub price: Option<Decimal>,
    pub description: Option<String>,
    pub link: Option<String>,
    pub tags: Option<Vec<String>>,
    pub ingredients: Option<Vec<String>>,
}

/// One association row joined with its name, for batch-building summary
/// and detail views.
#[derive(Debug, Clone, FromRow)]
pub struct AssocRow {
    pub recipe_id: Uuid,
    pub id: Uuid,
    pub name: String,
}

const RECIPE_COLUMNS: &str =
    "id, user_id, title, time_minutes, price, description, link, created_at";

/// The caller's recipes, most recently created first. Nonempty id lists
/// restrict to recipes associated with at least one of the given tags /
/// ingredients; DISTINCT collapses multi-match rows.
pub async fn list_by_user(
    db: &PgPool,
    user_id: Uuid,
    tag_ids: &[Uuid],
    ingredient_ids: &[Uuid],
) -> anyhow::Result<Vec<Recipe>> {
    let rows = sqlx::query_as::<_, Recipe>(
        r#"
        SELECT DISTINCT r.id, r.user_id, r.title, r.time_minutes, r.price,
               r.description, r.link, r.created_at
        FROM recipes r
        LEFT JOIN recipe_tags rt ON rt.recipe_id = r.id
        LEFT JOIN recipe_ingredients ri ON ri.recipe_id = r.id
        WHERE r.user_id = $1
          AND (cardinality($2::uuid[]) = 0 OR rt.tag_id = ANY($2))
          AND (cardinality($3::uuid[]) = 0 OR ri.ingredient_id = ANY($3))
        ORDER BY r.created_at DESC, r.id DESC
        "#,
    )
    .bind(user_id)
    .bind(tag_ids)
    .bind(ingredient_ids)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

pub async fn find(db: &PgPool, user_id: Uuid, id: Uuid) -> anyhow::Result<Option<Recipe>> {
    let recipe = sqlx::query_as::<_, Recipe>(&format!(
        "SELECT {RECIPE_COLUMNS} FROM recipes WHERE id = $1 AND user_id = $2"
    ))
    .bind(id)
    .bind(user_id)
    .fetch_optional(db)
    .await?;
    Ok(recipe)
}

/// Insert the recipe and its nested tag/ingredient names in one
/// transaction. Names the caller already owns are reused; new ones are
/// created owned by the caller.
pub async fn create(db: &PgPool, user_id: Uuid, new: NewRecipe) -> anyhow::Result<Recipe> {
    let mut tx = db.begin().await?;
    let recipe = sqlx::query_as::<_, Recipe>(&format!(
        r#"
        INSERT INTO recipes (user_id, title, time_minutes, price, description, link)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING {RECIPE_COLUMNS}
        "#
    ))
    .bind(user_id)
    .bind(&new.title)
    .bind(new.time_minutes)
    .bind(new.price)
    .bind(&new.description)
    .bind(&new.link)
    .fetch_one(&mut *tx)
    .await?;

    if let Some(names) = &new.tags {
        set_tags(&mut tx, user_id, recipe.id, names).await?;
    }
    if let Some(names) = &new.ingredients {
        set_ingredients(&mut tx, user_id, recipe.id, names).await?;
    }

    tx.commit().await?;
    Ok(recipe)
}

/// Owner-scoped update. `None` when the id does not exist for this caller;
/// nothing is written in that case. The owning user is never part of the
/// statement, so ownership cannot change here.
pub async fn update(
    db: &PgPool,
    user_id: Uuid,
    id: Uuid,
    changes: RecipeChanges,
) -> anyhow::Result<Option<Recipe>> {
    let mut tx = db.begin().await?;
    let updated = sqlx::query_as::<_, Recipe>(&format!(
        r#"
        UPDATE recipes
        SET title = COALESCE($3, title),
            time_minutes = COALESCE($4, time_minutes),
            price = COALESCE($5, price),
            description = COALESCE($6, description),
            link = COALESCE($7, link)
        WHERE id = $1 AND user_id = $2
        RETURNING {RECIPE_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(user_id)
    .bind(changes.title)
    .bind(changes.time_minutes)
    .bind(changes.price)
    .bind(changes.description)
    .bind(changes.link)
    .fetch_optional(&mut *tx)
    .await?;

    let Some(recipe) = updated else {
        return Ok(None);
    };

    if let Some(names) = &changes.tags {
        set_tags(&mut tx, user_id, recipe.id, names).await?;
    }
    if let Some(names) = &changes.ingredients {
        set_ingredients(&mut tx, user_id, recipe.id, names).await?;
    }

    tx.commit().await?;
    Ok(Some(recipe))
}

/// Removes the recipe and, by cascade, its association rows. Tags and
/// ingredients themselves survive.
pub async fn delete(db: &PgPool, user_id: Uuid, id: Uuid) -> anyhow::Result<bool> {
    let result = sqlx::query("DELETE FROM recipes WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .execute(db)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Tag associations for a batch of recipes, name-descending.
pub async fn tags_for(db: &PgPool, recipe_ids: &[Uuid]) -> anyhow::Result<Vec<AssocRow>> {
    let rows = sqlx::query_as::<_, AssocRow>(
        r#"
        SELECT rt.recipe_id, t.id, t.name
        FROM recipe_tags rt
        JOIN tags t ON t.id = rt.tag_id
        WHERE rt.recipe_id = ANY($1)
        ORDER BY t.name DESC
        "#,
    )
    .bind(recipe_ids)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

/// Ingredient associations for a batch of recipes, name-descending.
pub async fn ingredients_for(db: &PgPool, recipe_ids: &[Uuid]) -> anyhow::Result<Vec<AssocRow>> {
    let rows = sqlx::query_as::<_, AssocRow>(
        r#"
        SELECT ri.recipe_id, i.id, i.name
        FROM recipe_ingredients ri
        JOIN ingredients i ON i.id = ri.ingredient_id
        WHERE ri.recipe_id = ANY($1)
        ORDER BY i.name DESC
        "#,
    )
    .bind(recipe_ids)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

/// Replace the recipe's tag set with upserts of the given names.
async fn set_tags(
    tx: &mut Transaction<'_, Postgres>,
    user_id: Uuid,
    recipe_id: Uuid,
    names: &[String],
) -> anyhow::Result<()> {
    sqlx::query("DELETE FROM recipe_tags WHERE recipe_id = $1")
        .bind(recipe_id)
        .execute(&mut **tx)
        .await?;
    for name in names {
        let tag = tags::repo::upsert_by_name(&mut **tx, user_id, name.trim()).await?;
        sqlx::query(
            "INSERT INTO recipe_tags (recipe_id, tag_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
        )
        .bind(recipe_id)
        .bind(tag.id)
        .execute(&mut **tx)
        .await?;
    }
    Ok(())
}

async fn set_ingredients(
    tx: &mut Transaction<'_, Postgres>,
    user_id: Uuid,
    recipe_id: Uuid,
    names: &[String],
) -> anyhow::Result<()> {
    sqlx::query("DELETE FROM recipe_ingredients WHERE recipe_id = $1")
        .bind(recipe_id)
        .execute(&mut **tx)
        .await?;
    for name in names {
        let ingredient =
            ingredients::repo::upsert_by_name(&mut **tx, user_id, name.trim()).await?;
        sqlx::query(
            "INSERT INTO recipe_ingredients (recipe_id, ingredient_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
        )
        .bind(recipe_id)
        .bind(ingredient.id)
        .execute(&mut **tx)
        .await?;
    }
    Ok(())
}
