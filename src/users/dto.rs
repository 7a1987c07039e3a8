use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::repo::User;

/// Request body for registration. Fields default so a missing email turns
/// into the blank-email validation error instead of a deserialize reject.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub name: String,
}

/// Credentials exchange request.
#[derive(Debug, Deserialize)]
pub struct TokenRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub user: PublicUser,
}

/// Public part of a user returned to the client. Never carries the hash.
#[derive(Debug, Serialize)]
pub struct PublicUser {
    pub id: Uuid,
    pub email: String,
    pub name: String,
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
        }
    }
}

/// Partial profile update: only present fields change.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateMeRequest {
    pub email: Option<String>,
    pub name: Option<String>,
    pub password: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_user_exposes_only_id_email_name() {
        let user = PublicUser {
            id: Uuid::new_v4(),
            email: "test@example.com".to_string(),
            name: "Test".to_string(),
        };
        let value = serde_json::to_value(&user).unwrap();
        let obj = value.as_object().unwrap();
        assert_eq!(obj.len(), 3);
        assert_eq!(obj["email"], "test@example.com");
        assert!(!obj.contains_key("password_hash"));
    }

    #[test]
    fn register_request_defaults_missing_fields_to_blank() {
        let req: RegisterRequest = serde_json::from_str("{}").unwrap();
        assert!(req.email.is_empty());
        assert!(req.password.is_empty());
        assert!(req.name.is_empty());
    }

    #[test]
    fn update_me_distinguishes_absent_fields() {
        let req: UpdateMeRequest = serde_json::from_str(r#"{"name": "New Name"}"#).unwrap();
        assert_eq!(req.name.as_deref(), Some("New Name"));
        assert!(req.email.is_none());
        assert!(req.password.is_none());
    }

    #[test]
    fn unknown_flag_fields_are_ignored() {
        // is_staff / is_superuser are not caller-mutable; serde drops them.
        let req: UpdateMeRequest =
            serde_json::from_str(r#"{"name": "x", "is_staff": true, "is_superuser": true}"#)
                .unwrap();
        assert_eq!(req.name.as_deref(), Some("x"));
    }
}
