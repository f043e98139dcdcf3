//! User model for storage and API.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Account role. Admins may read the aggregate admin views.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl Role {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }
}

/// User account stored in Firestore (document ID = `id`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    /// Lower-cased, unique
    pub email: String,
    /// Argon2 PHC string
    #[serde(default)]
    pub password_hash: Option<String>,
    pub name: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub role: Role,
    pub created_at: String,
}

impl User {
    /// Fields safe to show to other users.
    pub fn public_profile(&self) -> PublicProfile {
        PublicProfile {
            id: self.id.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
            avatar_url: self.avatar_url.clone(),
        }
    }
}

/// Minimal public view of a user (never includes credentials or role).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct PublicProfile {
    pub id: String,
    pub name: String,
    pub email: String,
    pub avatar_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_profile_omits_password() {
        let user = User {
            id: "u1".to_string(),
            email: "a@example.com".to_string(),
            password_hash: Some("$argon2id$secret".to_string()),
            name: "Ann".to_string(),
            avatar_url: None,
            role: Role::Admin,
            created_at: "2024-01-01T00:00:00Z".to_string(),
        };

        let json = serde_json::to_string(&user.public_profile()).unwrap();
        assert!(!json.contains("argon2"));
        assert!(!json.contains("admin"));
        assert!(json.contains("\"avatarUrl\":null"));
    }

    #[test]
    fn test_role_defaults_to_user() {
        let user: User = serde_json::from_value(serde_json::json!({
            "id": "u1",
            "email": "a@example.com",
            "name": "Ann",
            "createdAt": "2024-01-01T00:00:00Z"
        }))
        .unwrap();
        assert_eq!(user.role, Role::User);
        assert!(user.password_hash.is_none());
    }
}
