use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

use super::EntityId;

/// A registered user as stored
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct User {
    pub id: EntityId,
    pub email: String,
    pub user_name: String,
    pub first_name: String,
    pub last_name: String,
    pub password_digest: String,
    pub user_bio: Option<String>,
    pub user_image: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Client-facing projection of a user; never carries the password digest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: EntityId,
    pub email: String,
    pub user_name: String,
    pub first_name: String,
    pub last_name: String,
    pub user_bio: Option<String>,
    pub user_image: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            user_name: user.user_name,
            first_name: user.first_name,
            last_name: user.last_name,
            user_bio: user.user_bio,
            user_image: user.user_image,
            is_active: user.is_active,
            created_at: user.created_at,
        }
    }
}

/// Signup payload
#[derive(Debug, Clone, Deserialize)]
pub struct SignupRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub user_name: String,
    pub password: String,
}

impl SignupRequest {
    pub fn validate(&self) -> AppResult<()> {
        if !self.email.contains('@') {
            return Err(AppError::Validation(format!(
                "'{}' is not a valid email address",
                self.email
            )));
        }
        if self.user_name.trim().is_empty() {
            return Err(AppError::Validation("user_name must not be empty".to_string()));
        }
        if self.password.is_empty() {
            return Err(AppError::Validation("password must not be empty".to_string()));
        }
        Ok(())
    }
}

/// User ready for insertion, password already digested
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub email: String,
    pub user_name: String,
    pub first_name: String,
    pub last_name: String,
    pub password_digest: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signup() -> SignupRequest {
        SignupRequest {
            first_name: "Alice".to_string(),
            last_name: "Liddell".to_string(),
            email: "alice@example.com".to_string(),
            user_name: "alice".to_string(),
            password: "hunter2".to_string(),
        }
    }

    #[test]
    fn test_signup_validation() {
        assert!(signup().validate().is_ok());

        let mut bad_email = signup();
        bad_email.email = "alice".to_string();
        assert!(matches!(bad_email.validate(), Err(AppError::Validation(_))));

        let mut blank_name = signup();
        blank_name.user_name = " ".to_string();
        assert!(blank_name.validate().is_err());
    }

    #[test]
    fn test_profile_omits_password_digest() {
        let user = User {
            id: 1,
            email: "alice@example.com".to_string(),
            user_name: "alice".to_string(),
            first_name: "Alice".to_string(),
            last_name: "Liddell".to_string(),
            password_digest: "deadbeef".to_string(),
            user_bio: None,
            user_image: None,
            is_active: true,
            created_at: Utc::now(),
        };
        let json = serde_json::to_value(UserProfile::from(user)).unwrap();
        assert!(json.get("password_digest").is_none());
        assert_eq!(json["user_bio"], serde_json::Value::Null);
    }
}
