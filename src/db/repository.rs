//! Capability traits over the shared store.
//!
//! Services only see these traits, so ledger logic runs the same against
//! PostgreSQL, the in-memory store, or a mock. Every mutating method is a
//! single atomic operation in each implementation: callers never split a
//! lookup and the mutation it guards across two calls.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    auth::Session,
    error::AppResult,
    models::{
        ContentEntity, EntityId, Favorite, FavoriteTarget, NewComment, NewReview, NewShow,
        NewTag, NewUser, TargetKind, User, WatchEntry, WatchState,
    },
};

#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait FavoriteRepository: Send + Sync {
    /// Inserts a favorite. `Conflict` if the user already favorited the target.
    async fn insert_favorite(&self, user_name: &str, target: FavoriteTarget)
        -> AppResult<Favorite>;

    /// Removes and returns the favorite for `(user_name, target)`.
    /// `NotFound` if there is none.
    async fn delete_favorite(&self, user_name: &str, target: FavoriteTarget)
        -> AppResult<Favorite>;

    async fn find_favorite(&self, id: EntityId) -> AppResult<Option<Favorite>>;

    /// All favorites pointing at `kind`, across users, ordered by id
    async fn favorites_of_kind(&self, kind: TargetKind) -> AppResult<Vec<Favorite>>;

    async fn favorites_of_user(&self, user_name: &str) -> AppResult<Vec<Favorite>>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait WatchRepository: Send + Sync {
    /// `Conflict` if the show is already on that list for the user.
    async fn insert_watch(
        &self,
        user_name: &str,
        state: WatchState,
        show_id: EntityId,
    ) -> AppResult<WatchEntry>;

    /// `NotFound` if the show is not on that list for the user.
    async fn delete_watch(
        &self,
        user_name: &str,
        state: WatchState,
        show_id: EntityId,
    ) -> AppResult<WatchEntry>;

    async fn find_watch(
        &self,
        user_name: &str,
        state: WatchState,
        show_id: EntityId,
    ) -> AppResult<Option<WatchEntry>>;

    async fn watches_of_user(
        &self,
        user_name: &str,
        state: WatchState,
    ) -> AppResult<Vec<WatchEntry>>;
}

/// Catalog and community content: shows, reviews, comments, tags
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait EntityStore: Send + Sync {
    async fn get_entity(&self, kind: TargetKind, id: EntityId)
        -> AppResult<Option<ContentEntity>>;

    async fn list_entities(&self, kind: TargetKind) -> AppResult<Vec<ContentEntity>>;

    async fn create_show(&self, show: NewShow) -> AppResult<ContentEntity>;

    async fn create_review(&self, user_name: &str, review: NewReview) -> AppResult<ContentEntity>;

    async fn create_comment(&self, user_name: &str, comment: NewComment)
        -> AppResult<ContentEntity>;

    /// `Conflict` if a tag with the same name exists.
    async fn create_tag(&self, tag: NewTag) -> AppResult<ContentEntity>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait UserRepository: Send + Sync {
    /// `Conflict` if the email or user name is taken.
    async fn create_user(&self, user: NewUser) -> AppResult<User>;

    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>>;

    async fn find_user_by_name(&self, user_name: &str) -> AppResult<Option<User>>;

    async fn list_users(&self) -> AppResult<Vec<User>>;

    /// Sets (or clears, with `None`) the bio. `NotFound` for an unknown email.
    async fn update_bio(&self, email: &str, bio: Option<String>) -> AppResult<User>;

    /// Sets (or clears, with `None`) the image. `NotFound` for an unknown email.
    async fn update_image(&self, email: &str, image: Option<String>) -> AppResult<User>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait SessionRepository: Send + Sync {
    async fn create_session(
        &self,
        token: Uuid,
        email: &str,
        expires_at: DateTime<Utc>,
    ) -> AppResult<Session>;

    async fn find_session(&self, token: Uuid) -> AppResult<Option<Session>>;

    /// Deletes every session expired at `now`, returning how many went
    async fn purge_expired_sessions(&self, now: DateTime<Utc>) -> AppResult<u64>;
}
