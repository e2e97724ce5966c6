use super::DomainError;
use blog_common::rules;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct RegisterUserRequest {
    #[serde(default)]
    #[validate(custom(function = "rules::username"))]
    pub username: String,
    #[serde(default)]
    #[validate(custom(function = "rules::email"))]
    pub email: String,
    #[serde(default)]
    #[validate(custom(function = "rules::password"))]
    pub password: String,
}

/// Registration data after normalization, ready to be stored.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
}

impl RegisterUserRequest {
    /// Emails are stored lowercased so lookups ignore case.
    pub fn into_new_user(&self) -> Result<NewUser, DomainError> {
        self.validate()?;

        Ok(NewUser {
            username: self.username.trim().to_string(),
            email: self.email.trim().to_lowercase(),
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginUserRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            created_at: user.created_at,
        }
    }
}

/// Identity of the caller behind a verified bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub id: Uuid,
    pub username: String,
    pub email: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_reports_all_fields() {
        let req = RegisterUserRequest {
            username: "a b".into(),
            email: "nope".into(),
            password: "123".into(),
        };
        assert_eq!(
            req.into_new_user().unwrap_err().invalid_fields(),
            vec!["username", "email", "password"]
        );
    }

    #[test]
    fn register_normalizes() {
        let req = RegisterUserRequest {
            username: " jane_smith ".into(),
            email: "Jane@Example.com".into(),
            password: "password123".into(),
        };
        let user = req.into_new_user().unwrap();
        assert_eq!(user.username, "jane_smith");
        assert_eq!(user.email, "jane@example.com");
    }

    #[test]
    fn user_response_never_leaks_hash() {
        let user = User {
            id: Uuid::new_v4(),
            username: "jane".into(),
            email: "jane@example.com".into(),
            password_hash: "$argon2id$secret".into(),
            created_at: Utc::now(),
        };
        let json = serde_json::to_string(&UserResponse::from(user)).unwrap();
        assert!(!json.contains("argon2"));
        assert!(json.contains("createdAt"));
    }
}
