//! Identity tokens and password digests.
//!
//! An identity token is an opaque bearer string bound to a user's email.
//! Handlers only ever see the `IdentityProvider` trait, so the session-table
//! implementation here can be swapped for an external issuer.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::error::AppResult;

pub mod password;
pub mod session;

pub use password::{digest_password, verify_password};
pub use session::SessionIdentityProvider;

/// Issued identity token as stored
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct Session {
    pub token: Uuid,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Issues and verifies identity tokens
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Issues a fresh token for an already-authenticated email
    async fn issue(&self, email: &str) -> AppResult<String>;

    /// Resolves a token to the email it was issued for.
    /// Fails with `AppError::Auth` for malformed, unknown or expired tokens.
    async fn verify(&self, token: &str) -> AppResult<String>;
}
