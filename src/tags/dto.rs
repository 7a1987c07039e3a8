use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::repo::Tag;

#[derive(Debug, Serialize)]
pub struct TagOut {
    pub id: Uuid,
    pub name: String,
}

impl From<Tag> for TagOut {
    fn from(tag: Tag) -> Self {
        Self {
            id: tag.id,
            name: tag.name,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateTagRequest {
    #[serde(default)]
    pub name: String,
}

/// PATCH body: absent name means no change.
#[derive(Debug, Deserialize)]
pub struct PatchTagRequest {
    pub name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::OffsetDateTime;

    #[test]
    fn wire_form_is_id_and_name_only() {
        let tag = Tag {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            name: "Vegan".into(),
            created_at: OffsetDateTime::now_utc(),
        };
        let value = serde_json::to_value(TagOut::from(tag)).unwrap();
        let obj = value.as_object().unwrap();
        assert_eq!(obj.len(), 2);
        assert_eq!(obj["name"], "Vegan");
        assert!(!obj.contains_key("user_id"));
    }

    #[test]
    fn patch_distinguishes_absent_name() {
        let req: PatchTagRequest = serde_json::from_str("{}").unwrap();
        assert!(req.name.is_none());

        let req: PatchTagRequest = serde_json::from_str(r#"{"name": "Quick"}"#).unwrap();
        assert_eq!(req.name.as_deref(), Some("Quick"));
    }

    #[test]
    fn owner_field_in_payload_is_dropped() {
        let req: CreateTagRequest =
            serde_json::from_str(r#"{"name": "Vegan", "user": "someone-else"}"#).unwrap();
        assert_eq!(req.name, "Vegan");
    }
}
