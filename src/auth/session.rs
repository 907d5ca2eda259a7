use std::sync::Arc;

use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::{
    db::SessionRepository,
    error::{AppError, AppResult},
};

use super::IdentityProvider;

/// Identity provider backed by the `sessions` table
///
/// Tokens are random v4 uuids; each verification reads the shared store, so
/// every server instance sees the same sessions.
#[derive(Clone)]
pub struct SessionIdentityProvider {
    sessions: Arc<dyn SessionRepository>,
    ttl: Duration,
}

impl SessionIdentityProvider {
    pub fn new(sessions: Arc<dyn SessionRepository>, ttl: Duration) -> Self {
        Self { sessions, ttl }
    }
}

#[async_trait::async_trait]
impl IdentityProvider for SessionIdentityProvider {
    async fn issue(&self, email: &str) -> AppResult<String> {
        let now = Utc::now();
        let purged = self.sessions.purge_expired_sessions(now).await?;
        if purged > 0 {
            tracing::debug!(purged, "Purged expired sessions");
        }

        let token = Uuid::new_v4();
        let expires_at = now + self.ttl;
        self.sessions
            .create_session(token, email, expires_at)
            .await?;

        tracing::debug!(email = %email, expires_at = %expires_at, "Issued session token");
        Ok(token.simple().to_string())
    }

    async fn verify(&self, token: &str) -> AppResult<String> {
        let token = Uuid::parse_str(token)
            .map_err(|_| AppError::Auth("malformed identity token".to_string()))?;

        let session = self
            .sessions
            .find_session(token)
            .await?
            .ok_or_else(|| AppError::Auth("unknown identity token".to_string()))?;

        let now = Utc::now();
        if session.is_expired_at(now) {
            tracing::debug!(email = %session.email, "Rejected expired session token");
            self.sessions.purge_expired_sessions(now).await?;
            return Err(AppError::Auth("identity token expired".to_string()));
        }

        Ok(session.email)
    }
}
