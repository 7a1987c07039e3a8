use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::repo::Ingredient;

#[derive(Debug, Serialize)]
pub struct IngredientOut {
    pub id: Uuid,
    pub name: String,
}

impl From<Ingredient> for IngredientOut {
    fn from(ingredient: Ingredient) -> Self {
        Self {
            id: ingredient.id,
            name: ingredient.name,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateIngredientRequest {
    #[serde(default)]
    pub name: String,
}

/// PATCH body: absent name means no change.
#[derive(Debug, Deserialize)]
pub struct PatchIngredientRequest {
    pub name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::OffsetDateTime;

    #[test]
    fn wire_form_is_id_and_name_only() {
        let ingredient = Ingredient {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            name: "Kale".into(),
            created_at: OffsetDateTime::now_utc(),
        };
        let value = serde_json::to_value(IngredientOut::from(ingredient)).unwrap();
        let obj = value.as_object().unwrap();
        assert_eq!(obj.len(), 2);
        assert_eq!(obj["name"], "Kale");
        assert!(!obj.contains_key("user_id"));
    }
}
