use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;
use crate::ingredients::dto::IngredientOut;
use crate::tags::dto::TagOut;

use super::repo::{NewRecipe, Recipe, RecipeChanges};

/// List form: association identifiers only.
#[derive(Debug, Serialize)]
pub struct RecipeSummary {
    pub id: Uuid,
    pub title: String,
    pub time_minutes: i32,
    pub price: Decimal,
    pub link: String,
    pub tags: Vec<Uuid>,
    pub ingredients: Vec<Uuid>,
}

/// Detail form: summary fields plus description and full tag/ingredient
/// objects.
#[derive(Debug, Serialize)]
pub struct RecipeDetail {
    pub id: Uuid,
    pub title: String,
    pub time_minutes: i32,
    pub price: Decimal,
    pub link: String,
    pub description: String,
    pub tags: Vec<TagOut>,
    pub ingredients: Vec<IngredientOut>,
}

impl RecipeDetail {
    pub fn from_parts(
        recipe: Recipe,
        tags: Vec<TagOut>,
        ingredients: Vec<IngredientOut>,
    ) -> Self {
        Self {
            id: recipe.id,
            title: recipe.title,
            time_minutes: recipe.time_minutes,
            price: recipe.price,
            link: recipe.link,
            description: recipe.description,
            tags,
            ingredients,
        }
    }
}

/// Body for create and full replace. Owner is never part of the payload;
/// serde drops any `user` key a client sends. `tags` / `ingredients` are
/// lists of names; absent means "leave associations alone" on replace and
/// "none" on create.
#[derive(Debug, Deserialize)]
pub struct RecipeWriteRequest {
    #[serde(default)]
    pub title: String,
    pub time_minutes: Option<i32>,
    pub price: Option<Decimal>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub link: String,
    pub tags: Option<Vec<String>>,
    pub ingredients: Option<Vec<String>>,
}

impl RecipeWriteRequest {
    /// Full-representation validation: title, time and price are required,
    /// every problem reported at once with field-level detail.
    pub fn into_new_recipe(self) -> Result<NewRecipe, ApiError> {
        let mut errors: BTreeMap<&'static str, Vec<String>> = BTreeMap::new();

        let title = self.title.trim().to_string();
        if title.is_empty() {
            errors
                .entry("title")
                .or_default()
                .push("this field may not be blank".into());
        }
        match self.time_minutes {
            Some(t) if t < 0 => {
                errors
                    .entry("time_minutes")
                    .or_default()
                    .push("must be a non-negative integer".into());
            }
            Some(_) => {}
            None => {
                errors
                    .entry("time_minutes")
                    .or_default()
                    .push("this field is required".into());
            }
        }
        if self.price.is_none() {
            errors
                .entry("price")
                .or_default()
                .push("this field is required".into());
        }

        if !errors.is_empty() {
            return Err(ApiError::Validation(errors));
        }

        Ok(NewRecipe {
            title,
            time_minutes: self.time_minutes.unwrap_or_default(),
            price: self.price.unwrap_or_default(),
            description: self.description,
            link: self.link,
            tags: self.tags,
            ingredients: self.ingredients,
        })
    }
}

/// PATCH body: every field optional, absent means unchanged.
#[derive(Debug, Default, Deserialize)]
pub struct RecipePatchRequest {
    pub title: Option<String>,
    pub time_minutes: Option<i32>,
    pub price: Option<Decimal>,
    pub description: Option<String>,
    pub link: Option<String>,
    pub tags: Option<Vec<String>>,
    pub ingredients: Option<Vec<String>>,
}

impl RecipePatchRequest {
    pub fn into_changes(self) -> Result<RecipeChanges, ApiError> {
        let title = match self.title {
            Some(raw) => {
                let trimmed = raw.trim();
                if trimmed.is_empty() {
                    return Err(ApiError::field("title", "this field may not be blank"));
                }
                Some(trimmed.to_string())
            }
            None => None,
        };
        if matches!(self.time_minutes, Some(t) if t < 0) {
            return Err(ApiError::field(
                "time_minutes",
                "must be a non-negative integer",
            ));
        }
        Ok(RecipeChanges {
            title,
            time_minutes: self.time_minutes,
            price: self.price,
            description: self.description,
            link: self.link,
            tags: self.tags,
            ingredients: self.ingredients,
        })
    }
}

/// Comma-separated uuid list from a query parameter.
pub fn parse_id_list(raw: &str) -> Result<Vec<Uuid>, ApiError> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            Uuid::parse_str(s)
                .map_err(|_| ApiError::field("filter", format!("invalid identifier: {s}")))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_body() -> &'static str {
        r#"{"title": "Sample recipe", "time_minutes": 30, "price": "5.99"}"#
    }

    #[test]
    fn write_request_accepts_full_representation() {
        let req: RecipeWriteRequest = serde_json::from_str(full_body()).unwrap();
        let new = req.into_new_recipe().unwrap();
        assert_eq!(new.title, "Sample recipe");
        assert_eq!(new.time_minutes, 30);
        assert_eq!(new.price, "5.99".parse().unwrap());
        assert_eq!(new.description, "");
        assert_eq!(new.link, "");
        assert!(new.tags.is_none());
    }

    #[test]
    fn missing_required_fields_are_all_reported() {
        let req: RecipeWriteRequest = serde_json::from_str("{}").unwrap();
        match req.into_new_recipe() {
            Err(ApiError::Validation(errors)) => {
                assert!(errors.contains_key("title"));
                assert!(errors.contains_key("time_minutes"));
                assert!(errors.contains_key("price"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn owner_field_in_payload_is_dropped() {
        let req: RecipeWriteRequest = serde_json::from_str(
            r#"{"title": "t", "time_minutes": 1, "price": "1.00", "user": "someone-else",
                "user_id": "e4c32cb2-5cf1-4ed9-98a5-4155c3a74b43"}"#,
        )
        .unwrap();
        assert!(req.into_new_recipe().is_ok());
    }

    #[test]
    fn patch_keeps_absent_fields_unchanged() {
        let req: RecipePatchRequest =
            serde_json::from_str(r#"{"title": "Updated title"}"#).unwrap();
        let changes = req.into_changes().unwrap();
        assert_eq!(changes.title.as_deref(), Some("Updated title"));
        assert!(changes.time_minutes.is_none());
        assert!(changes.price.is_none());
        assert!(changes.link.is_none());
        assert!(changes.tags.is_none());
    }

    #[test]
    fn patch_rejects_blank_title_and_negative_time() {
        let req: RecipePatchRequest = serde_json::from_str(r#"{"title": "  "}"#).unwrap();
        assert!(req.into_changes().is_err());

        let req: RecipePatchRequest =
            serde_json::from_str(r#"{"time_minutes": -5}"#).unwrap();
        assert!(req.into_changes().is_err());
    }

    #[test]
    fn nested_names_survive_deserialization() {
        let req: RecipeWriteRequest = serde_json::from_str(
            r#"{"title": "t", "time_minutes": 1, "price": "1.00", "tags": ["Quick", "Easy"]}"#,
        )
        .unwrap();
        let new = req.into_new_recipe().unwrap();
        assert_eq!(new.tags.as_deref(), Some(&["Quick".to_string(), "Easy".to_string()][..]));
    }

    #[test]
    fn price_serializes_as_decimal_string() {
        let summary = RecipeSummary {
            id: Uuid::new_v4(),
            title: "Sample".into(),
            time_minutes: 22,
            price: "5.25".parse().unwrap(),
            link: "".into(),
            tags: vec![],
            ingredients: vec![],
        };
        let value = serde_json::to_value(&summary).unwrap();
        assert_eq!(value["price"], "5.25");
    }

    #[test]
    fn price_deserializes_from_string_or_number() {
        let req: RecipeWriteRequest =
            serde_json::from_str(r#"{"title": "t", "time_minutes": 1, "price": 2.5}"#).unwrap();
        assert_eq!(req.price, Some("2.5".parse().unwrap()));

        let req: RecipeWriteRequest =
            serde_json::from_str(r#"{"title": "t", "time_minutes": 1, "price": "2.50"}"#)
                .unwrap();
        assert_eq!(req.price, Some("2.50".parse().unwrap()));
    }

    #[test]
    fn id_list_parses_and_rejects_garbage() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let parsed = parse_id_list(&format!("{a},{b}")).unwrap();
        assert_eq!(parsed, vec![a, b]);

        let parsed = parse_id_list(&format!(" {a} , ,")).unwrap();
        assert_eq!(parsed, vec![a]);

        assert!(parse_id_list("not-a-uuid").is_err());
    }
}
