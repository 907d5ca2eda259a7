use std::sync::Arc;

use serde::Serialize;

use crate::{
    auth::{digest_password, verify_password, IdentityProvider},
    db::UserRepository,
    error::{AppError, AppResult},
    models::{NewUser, SignupRequest, User, UserProfile},
};

/// Result of a successful login
#[derive(Debug, Clone, Serialize)]
pub struct LoginOutcome {
    pub access_token: String,
    pub user: UserProfile,
}

/// Signup, login and profile maintenance
#[derive(Clone)]
pub struct Accounts {
    users: Arc<dyn UserRepository>,
    identity: Arc<dyn IdentityProvider>,
}

impl Accounts {
    pub fn new(users: Arc<dyn UserRepository>, identity: Arc<dyn IdentityProvider>) -> Self {
        Self { users, identity }
    }

    pub async fn signup(&self, request: SignupRequest) -> AppResult<UserProfile> {
        request.validate()?;

        let user = self
            .users
            .create_user(NewUser {
                password_digest: digest_password(&request.password),
                email: request.email,
                user_name: request.user_name,
                first_name: request.first_name,
                last_name: request.last_name,
            })
            .await?;

        tracing::info!(user_name = %user.user_name, "User signed up");
        Ok(user.into())
    }

    /// Unknown email and wrong password produce the same error
    pub async fn login(&self, email: &str, password: &str) -> AppResult<LoginOutcome> {
        let user = self
            .users
            .find_user_by_email(email)
            .await?
            .filter(|u| u.is_active && verify_password(password, &u.password_digest))
            .ok_or_else(|| {
                tracing::warn!(email = %email, "Rejected login");
                AppError::Auth("invalid email or password".to_string())
            })?;

        let access_token = self.identity.issue(&user.email).await?;
        tracing::info!(user_name = %user.user_name, "User logged in");

        Ok(LoginOutcome {
            access_token,
            user: user.into(),
        })
    }

    /// Resolves a bearer token to the user it belongs to
    pub async fn authenticate(&self, token: &str) -> AppResult<User> {
        let email = self.identity.verify(token).await?;
        self.users
            .find_user_by_email(&email)
            .await?
            .ok_or_else(|| AppError::Auth(format!("no user for identity {}", email)))
    }

    pub async fn list_users(&self) -> AppResult<Vec<UserProfile>> {
        let users = self.users.list_users().await?;
        Ok(users.into_iter().map(UserProfile::from).collect())
    }

    pub async fn find_by_name(&self, user_name: &str) -> AppResult<User> {
        self.users
            .find_user_by_name(user_name)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("user {}", user_name)))
    }

    /// Empty or whitespace-only input clears the bio
    pub async fn update_bio(&self, email: &str, bio: Option<String>) -> AppResult<Option<String>> {
        let user = self.users.update_bio(email, normalize(bio)).await?;
        tracing::info!(user_name = %user.user_name, "Bio updated");
        Ok(user.user_bio)
    }

    /// Empty or whitespace-only input clears the image
    pub async fn update_image(
        &self,
        email: &str,
        image: Option<String>,
    ) -> AppResult<Option<String>> {
        let user = self.users.update_image(email, normalize(image)).await?;
        tracing::info!(user_name = %user.user_name, "Image updated");
        Ok(user.user_image)
    }
}

fn normalize(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
