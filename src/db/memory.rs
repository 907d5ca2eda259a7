use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    auth::Session,
    error::{AppError, AppResult},
    models::{
        Comment, ContentEntity, EntityId, Favorite, FavoriteTarget, NewComment, NewReview,
        NewShow, NewTag, NewUser, Review, Show, Tag, TargetKind, User, WatchEntry, WatchState,
    },
};

use super::repository::{
    EntityStore, FavoriteRepository, SessionRepository, UserRepository, WatchRepository,
};

/// Process-local store implementing every repository trait
///
/// All tables sit behind one lock, and every mutation holds the write guard
/// from its lookup through its write, so concurrent handlers observe each
/// create/delete as a single step.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<Tables>>,
}

/// Ordered by id, like the `ORDER BY id` queries of the Postgres store
#[derive(Default)]
struct Tables {
    next_id: EntityId,
    users: BTreeMap<EntityId, User>,
    sessions: HashMap<Uuid, Session>,
    shows: BTreeMap<EntityId, Show>,
    reviews: BTreeMap<EntityId, Review>,
    comments: BTreeMap<EntityId, Comment>,
    tags: BTreeMap<EntityId, Tag>,
    favorites: BTreeMap<EntityId, Favorite>,
    watches: BTreeMap<EntityId, WatchEntry>,
}

impl Tables {
    fn allocate_id(&mut self) -> EntityId {
        self.next_id += 1;
        self.next_id
    }

    fn user_by_email_mut(&mut self, email: &str) -> AppResult<&mut User> {
        self.users
            .values_mut()
            .find(|u| u.email == email)
            .ok_or_else(|| AppError::NotFound(format!("user {}", email)))
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl FavoriteRepository for MemoryStore {
    async fn insert_favorite(
        &self,
        user_name: &str,
        target: FavoriteTarget,
    ) -> AppResult<Favorite> {
        let mut tables = self.inner.write().await;

        if tables
            .favorites
            .values()
            .any(|f| f.user_name == user_name && f.target == target)
        {
            return Err(AppError::Conflict(format!(
                "{} already favorited {}",
                user_name, target
            )));
        }

        let favorite = Favorite {
            id: tables.allocate_id(),
            user_name: user_name.to_string(),
            target,
            created_at: Utc::now(),
        };
        tables.favorites.insert(favorite.id, favorite.clone());
        Ok(favorite)
    }

    async fn delete_favorite(
        &self,
        user_name: &str,
        target: FavoriteTarget,
    ) -> AppResult<Favorite> {
        let mut tables = self.inner.write().await;

        let id = tables
            .favorites
            .values()
            .find(|f| f.user_name == user_name && f.target == target)
            .map(|f| f.id)
            .ok_or_else(|| {
                AppError::NotFound(format!("{} has not favorited {}", user_name, target))
            })?;

        tables
            .favorites
            .remove(&id)
            .ok_or_else(|| AppError::Internal(format!("favorite #{} vanished", id)))
    }

    async fn find_favorite(&self, id: EntityId) -> AppResult<Option<Favorite>> {
        Ok(self.inner.read().await.favorites.get(&id).cloned())
    }

    async fn favorites_of_kind(&self, kind: TargetKind) -> AppResult<Vec<Favorite>> {
        let tables = self.inner.read().await;
        Ok(tables
            .favorites
            .values()
            .filter(|f| f.target.kind() == kind)
            .cloned()
            .collect())
    }

    async fn favorites_of_user(&self, user_name: &str) -> AppResult<Vec<Favorite>> {
        let tables = self.inner.read().await;
        Ok(tables
            .favorites
            .values()
            .filter(|f| f.user_name == user_name)
            .cloned()
            .collect())
    }
}

#[async_trait::async_trait]
impl WatchRepository for MemoryStore {
    async fn insert_watch(
        &self,
        user_name: &str,
        state: WatchState,
        show_id: EntityId,
    ) -> AppResult<WatchEntry> {
        let mut tables = self.inner.write().await;

        if tables
            .watches
            .values()
            .any(|w| w.user_name == user_name && w.state == state && w.show_id == show_id)
        {
            return Err(AppError::Conflict(format!(
                "show #{} is already on {}'s {} list",
                show_id, user_name, state
            )));
        }

        let entry = WatchEntry {
            id: tables.allocate_id(),
            user_name: user_name.to_string(),
            state,
            show_id,
            created_at: Utc::now(),
        };
        tables.watches.insert(entry.id, entry.clone());
        Ok(entry)
    }

    async fn delete_watch(
        &self,
        user_name: &str,
        state: WatchState,
        show_id: EntityId,
    ) -> AppResult<WatchEntry> {
        let mut tables = self.inner.write().await;

        let id = tables
            .watches
            .values()
            .find(|w| w.user_name == user_name && w.state == state && w.show_id == show_id)
            .map(|w| w.id)
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "show #{} is not on {}'s {} list",
                    show_id, user_name, state
                ))
            })?;

        tables
            .watches
            .remove(&id)
            .ok_or_else(|| AppError::Internal(format!("watch entry #{} vanished", id)))
    }

    async fn find_watch(
        &self,
        user_name: &str,
        state: WatchState,
        show_id: EntityId,
    ) -> AppResult<Option<WatchEntry>> {
        let tables = self.inner.read().await;
        Ok(tables
            .watches
            .values()
            .find(|w| w.user_name == user_name && w.state == state && w.show_id == show_id)
            .cloned())
    }

    async fn watches_of_user(
        &self,
        user_name: &str,
        state: WatchState,
    ) -> AppResult<Vec<WatchEntry>> {
        let tables = self.inner.read().await;
        Ok(tables
            .watches
            .values()
            .filter(|w| w.user_name == user_name && w.state == state)
            .cloned()
            .collect())
    }
}

#[async_trait::async_trait]
impl EntityStore for MemoryStore {
    async fn get_entity(
        &self,
        kind: TargetKind,
        id: EntityId,
    ) -> AppResult<Option<ContentEntity>> {
        let tables = self.inner.read().await;
        let entity = match kind {
            TargetKind::Show => tables.shows.get(&id).cloned().map(ContentEntity::Show),
            TargetKind::Review => tables.reviews.get(&id).cloned().map(ContentEntity::Review),
            TargetKind::Comment => tables.comments.get(&id).cloned().map(ContentEntity::Comment),
            TargetKind::Tag => tables.tags.get(&id).cloned().map(ContentEntity::Tag),
        };
        Ok(entity)
    }

    async fn list_entities(&self, kind: TargetKind) -> AppResult<Vec<ContentEntity>> {
        let tables = self.inner.read().await;
        let entities = match kind {
            TargetKind::Show => tables.shows.values().cloned().map(ContentEntity::Show).collect(),
            TargetKind::Review => tables
                .reviews
                .values()
                .cloned()
                .map(ContentEntity::Review)
                .collect(),
            TargetKind::Comment => tables
                .comments
                .values()
                .cloned()
                .map(ContentEntity::Comment)
                .collect(),
            TargetKind::Tag => tables.tags.values().cloned().map(ContentEntity::Tag).collect(),
        };
        Ok(entities)
    }

    async fn create_show(&self, show: NewShow) -> AppResult<ContentEntity> {
        let mut tables = self.inner.write().await;
        let show = Show {
            id: tables.allocate_id(),
            title: show.title,
            overview: show.overview,
            release_year: show.release_year,
        };
        tables.shows.insert(show.id, show.clone());
        Ok(ContentEntity::Show(show))
    }

    async fn create_review(&self, user_name: &str, review: NewReview) -> AppResult<ContentEntity> {
        let mut tables = self.inner.write().await;
        if !tables.shows.contains_key(&review.show_id) {
            return Err(AppError::NotFound(format!("show #{}", review.show_id)));
        }
        let review = Review {
            id: tables.allocate_id(),
            show_id: review.show_id,
            user_name: user_name.to_string(),
            body: review.body,
            rating: review.rating,
        };
        tables.reviews.insert(review.id, review.clone());
        Ok(ContentEntity::Review(review))
    }

    async fn create_comment(
        &self,
        user_name: &str,
        comment: NewComment,
    ) -> AppResult<ContentEntity> {
        let mut tables = self.inner.write().await;
        if !tables.reviews.contains_key(&comment.review_id) {
            return Err(AppError::NotFound(format!("review #{}", comment.review_id)));
        }
        let comment = Comment {
            id: tables.allocate_id(),
            review_id: comment.review_id,
            user_name: user_name.to_string(),
            body: comment.body,
        };
        tables.comments.insert(comment.id, comment.clone());
        Ok(ContentEntity::Comment(comment))
    }

    async fn create_tag(&self, tag: NewTag) -> AppResult<ContentEntity> {
        let mut tables = self.inner.write().await;
        if tables.tags.values().any(|t| t.name == tag.name) {
            return Err(AppError::Conflict(format!("tag '{}' already exists", tag.name)));
        }
        let tag = Tag {
            id: tables.allocate_id(),
            name: tag.name,
        };
        tables.tags.insert(tag.id, tag.clone());
        Ok(ContentEntity::Tag(tag))
    }
}

#[async_trait::async_trait]
impl UserRepository for MemoryStore {
    async fn create_user(&self, user: NewUser) -> AppResult<User> {
        let mut tables = self.inner.write().await;
        if tables
            .users
            .values()
            .any(|u| u.email == user.email || u.user_name == user.user_name)
        {
            return Err(AppError::Conflict(format!(
                "email or user name for {} already taken",
                user.email
            )));
        }

        let user = User {
            id: tables.allocate_id(),
            email: user.email,
            user_name: user.user_name,
            first_name: user.first_name,
            last_name: user.last_name,
            password_digest: user.password_digest,
            user_bio: None,
            user_image: None,
            is_active: true,
            created_at: Utc::now(),
        };
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let tables = self.inner.read().await;
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }

    async fn find_user_by_name(&self, user_name: &str) -> AppResult<Option<User>> {
        let tables = self.inner.read().await;
        Ok(tables
            .users
            .values()
            .find(|u| u.user_name == user_name)
            .cloned())
    }

    async fn list_users(&self) -> AppResult<Vec<User>> {
        Ok(self.inner.read().await.users.values().cloned().collect())
    }

    async fn update_bio(&self, email: &str, bio: Option<String>) -> AppResult<User> {
        let mut tables = self.inner.write().await;
        let user = tables.user_by_email_mut(email)?;
        user.user_bio = bio;
        Ok(user.clone())
    }

    async fn update_image(&self, email: &str, image: Option<String>) -> AppResult<User> {
        let mut tables = self.inner.write().await;
        let user = tables.user_by_email_mut(email)?;
        user.user_image = image;
        Ok(user.clone())
    }
}

#[async_trait::async_trait]
impl SessionRepository for MemoryStore {
    async fn create_session(
        &self,
        token: Uuid,
        email: &str,
        expires_at: DateTime<Utc>,
    ) -> AppResult<Session> {
        let session = Session {
            token,
            email: email.to_string(),
            created_at: Utc::now(),
            expires_at,
        };
        self.inner
            .write()
            .await
            .sessions
            .insert(token, session.clone());
        Ok(session)
    }

    async fn find_session(&self, token: Uuid) -> AppResult<Option<Session>> {
        Ok(self.inner.read().await.sessions.get(&token).cloned())
    }

    async fn purge_expired_sessions(&self, now: DateTime<Utc>) -> AppResult<u64> {
        let mut tables = self.inner.write().await;
        let before = tables.sessions.len();
        tables.sessions.retain(|_, session| !session.is_expired_at(now));
        Ok((before - tables.sessions.len()) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_favorite_insert_then_delete_restores_state() {
        let store = MemoryStore::new();
        let before = store.favorites_of_user("alice").await.unwrap();

        let created = store
            .insert_favorite("alice", FavoriteTarget::Review(7))
            .await
            .unwrap();
        let removed = store
            .delete_favorite("alice", FavoriteTarget::Review(7))
            .await
            .unwrap();

        assert_eq!(created, removed);
        assert_eq!(store.favorites_of_user("alice").await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_duplicate_favorite_conflicts() {
        let store = MemoryStore::new();
        store
            .insert_favorite("alice", FavoriteTarget::Tag(1))
            .await
            .unwrap();
        let err = store
            .insert_favorite("alice", FavoriteTarget::Tag(1))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        // Same id under a different kind is a different target
        assert!(store
            .insert_favorite("alice", FavoriteTarget::Show(1))
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_delete_missing_watch_is_not_found() {
        let store = MemoryStore::new();
        let err = store
            .delete_watch("bob", WatchState::WatchLater, 3)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_concurrent_inserts_leave_one_record() {
        let store = MemoryStore::new();
        let mut tasks = Vec::new();

        for _ in 0..8 {
            let store = store.clone();
            tasks.push(tokio::spawn(async move {
                store.insert_favorite("carol", FavoriteTarget::Show(5)).await
            }));
        }

        let mut successes = 0;
        for task in tasks {
            if task.await.unwrap().is_ok() {
                successes += 1;
            }
        }

        assert_eq!(successes, 1);
        assert_eq!(store.favorites_of_user("carol").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_review_requires_existing_show() {
        let store = MemoryStore::new();
        let err = store
            .create_review(
                "alice",
                NewReview {
                    show_id: 99,
                    body: "Missing".to_string(),
                    rating: None,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_purge_drops_only_expired_sessions() {
        let store = MemoryStore::new();
        let now = Utc::now();
        let stale = Uuid::new_v4();
        let live = Uuid::new_v4();

        store
            .create_session(stale, "alice@example.com", now - chrono::Duration::minutes(5))
            .await
            .unwrap();
        store
            .create_session(live, "alice@example.com", now + chrono::Duration::hours(1))
            .await
            .unwrap();

        assert_eq!(store.purge_expired_sessions(now).await.unwrap(), 1);
        assert!(store.find_session(stale).await.unwrap().is_none());
        assert!(store.find_session(live).await.unwrap().is_some());
    }
}
