use chrono::{DateTime, Utc};
use sqlx::{postgres::PgPoolOptions, PgPool};
use uuid::Uuid;

use crate::{
    auth::Session,
    error::{AppError, AppResult},
    models::{
        Comment, ContentEntity, EntityId, Favorite, FavoriteRow, FavoriteTarget, NewComment,
        NewReview, NewShow, NewTag, NewUser, Review, Show, Tag, TargetKind, User, WatchEntry,
        WatchRow, WatchState,
    },
};

use super::repository::{
    EntityStore, FavoriteRepository, SessionRepository, UserRepository, WatchRepository,
};

/// Creates a PostgreSQL connection pool
///
/// Establishes a pool of database connections for efficient reuse.
/// The pool automatically manages connection lifecycle and limits.
pub async fn create_pool(database_url: &str, max_connections: u32) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await?;

    Ok(pool)
}

/// Applies the schema in `migrations/`
pub async fn run_migrations(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    tracing::info!("Database migrations applied");
    Ok(())
}

const FAVORITE_COLUMNS: &str = "id, user_name, target_kind, target_id, created_at";
const WATCH_COLUMNS: &str = "id, user_name, state, show_id, created_at";
const USER_COLUMNS: &str = "id, email, user_name, first_name, last_name, password_digest, \
     user_bio, user_image, is_active, created_at";

/// PostgreSQL-backed implementation of every repository trait
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn favorites_from_rows(rows: Vec<FavoriteRow>) -> AppResult<Vec<Favorite>> {
    rows.into_iter().map(Favorite::try_from).collect()
}

fn watches_from_rows(rows: Vec<WatchRow>) -> AppResult<Vec<WatchEntry>> {
    rows.into_iter().map(WatchEntry::try_from).collect()
}

#[async_trait::async_trait]
impl FavoriteRepository for PgStore {
    async fn insert_favorite(
        &self,
        user_name: &str,
        target: FavoriteTarget,
    ) -> AppResult<Favorite> {
        let row: FavoriteRow = sqlx::query_as(&format!(
            "INSERT INTO favorites (user_name, target_kind, target_id) \
             VALUES ($1, $2, $3) RETURNING {}",
            FAVORITE_COLUMNS
        ))
        .bind(user_name)
        .bind(target.kind().as_str())
        .bind(target.id())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::from_insert(e, format!("{} already favorited {}", user_name, target))
        })?;

        row.try_into()
    }

    async fn delete_favorite(
        &self,
        user_name: &str,
        target: FavoriteTarget,
    ) -> AppResult<Favorite> {
        let row: Option<FavoriteRow> = sqlx::query_as(&format!(
            "DELETE FROM favorites \
             WHERE user_name = $1 AND target_kind = $2 AND target_id = $3 \
             RETURNING {}",
            FAVORITE_COLUMNS
        ))
        .bind(user_name)
        .bind(target.kind().as_str())
        .bind(target.id())
        .fetch_optional(&self.pool)
        .await?;

        row.ok_or_else(|| {
            AppError::NotFound(format!("{} has not favorited {}", user_name, target))
        })?
        .try_into()
    }

    async fn find_favorite(&self, id: EntityId) -> AppResult<Option<Favorite>> {
        let row: Option<FavoriteRow> = sqlx::query_as(&format!(
            "SELECT {} FROM favorites WHERE id = $1",
            FAVORITE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Favorite::try_from).transpose()
    }

    async fn favorites_of_kind(&self, kind: TargetKind) -> AppResult<Vec<Favorite>> {
        let rows: Vec<FavoriteRow> = sqlx::query_as(&format!(
            "SELECT {} FROM favorites WHERE target_kind = $1 ORDER BY id",
            FAVORITE_COLUMNS
        ))
        .bind(kind.as_str())
        .fetch_all(&self.pool)
        .await?;

        favorites_from_rows(rows)
    }

    async fn favorites_of_user(&self, user_name: &str) -> AppResult<Vec<Favorite>> {
        let rows: Vec<FavoriteRow> = sqlx::query_as(&format!(
            "SELECT {} FROM favorites WHERE user_name = $1 ORDER BY id",
            FAVORITE_COLUMNS
        ))
        .bind(user_name)
        .fetch_all(&self.pool)
        .await?;

        favorites_from_rows(rows)
    }
}

#[async_trait::async_trait]
impl WatchRepository for PgStore {
    async fn insert_watch(
        &self,
        user_name: &str,
        state: WatchState,
        show_id: EntityId,
    ) -> AppResult<WatchEntry> {
        let row: WatchRow = sqlx::query_as(&format!(
            "INSERT INTO watches (user_name, state, show_id) VALUES ($1, $2, $3) RETURNING {}",
            WATCH_COLUMNS
        ))
        .bind(user_name)
        .bind(state.as_str())
        .bind(show_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::from_insert(
                e,
                format!("show #{} is already on {}'s {} list", show_id, user_name, state),
            )
        })?;

        row.try_into()
    }

    async fn delete_watch(
        &self,
        user_name: &str,
        state: WatchState,
        show_id: EntityId,
    ) -> AppResult<WatchEntry> {
        let row: Option<WatchRow> = sqlx::query_as(&format!(
            "DELETE FROM watches WHERE user_name = $1 AND state = $2 AND show_id = $3 \
             RETURNING {}",
            WATCH_COLUMNS
        ))
        .bind(user_name)
        .bind(state.as_str())
        .bind(show_id)
        .fetch_optional(&self.pool)
        .await?;

        row.ok_or_else(|| {
            AppError::NotFound(format!(
                "show #{} is not on {}'s {} list",
                show_id, user_name, state
            ))
        })?
        .try_into()
    }

    async fn find_watch(
        &self,
        user_name: &str,
        state: WatchState,
        show_id: EntityId,
    ) -> AppResult<Option<WatchEntry>> {
        let row: Option<WatchRow> = sqlx::query_as(&format!(
            "SELECT {} FROM watches WHERE user_name = $1 AND state = $2 AND show_id = $3",
            WATCH_COLUMNS
        ))
        .bind(user_name)
        .bind(state.as_str())
        .bind(show_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(WatchEntry::try_from).transpose()
    }

    async fn watches_of_user(
        &self,
        user_name: &str,
        state: WatchState,
    ) -> AppResult<Vec<WatchEntry>> {
        let rows: Vec<WatchRow> = sqlx::query_as(&format!(
            "SELECT {} FROM watches WHERE user_name = $1 AND state = $2 ORDER BY id",
            WATCH_COLUMNS
        ))
        .bind(user_name)
        .bind(state.as_str())
        .fetch_all(&self.pool)
        .await?;

        watches_from_rows(rows)
    }
}

#[async_trait::async_trait]
impl EntityStore for PgStore {
    async fn get_entity(
        &self,
        kind: TargetKind,
        id: EntityId,
    ) -> AppResult<Option<ContentEntity>> {
        let entity = match kind {
            TargetKind::Show => sqlx::query_as::<_, Show>(
                "SELECT id, title, overview, release_year FROM shows WHERE id = $1",
            )
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(ContentEntity::Show),
            TargetKind::Review => sqlx::query_as::<_, Review>(
                "SELECT id, show_id, user_name, body, rating FROM reviews WHERE id = $1",
            )
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(ContentEntity::Review),
            TargetKind::Comment => sqlx::query_as::<_, Comment>(
                "SELECT id, review_id, user_name, body FROM comments WHERE id = $1",
            )
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(ContentEntity::Comment),
            TargetKind::Tag => {
                sqlx::query_as::<_, Tag>("SELECT id, name FROM tags WHERE id = $1")
                    .bind(id)
                    .fetch_optional(&self.pool)
                    .await?
                    .map(ContentEntity::Tag)
            }
        };

        Ok(entity)
    }

    async fn list_entities(&self, kind: TargetKind) -> AppResult<Vec<ContentEntity>> {
        let entities = match kind {
            TargetKind::Show => sqlx::query_as::<_, Show>(
                "SELECT id, title, overview, release_year FROM shows ORDER BY id",
            )
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(ContentEntity::Show)
            .collect(),
            TargetKind::Review => sqlx::query_as::<_, Review>(
                "SELECT id, show_id, user_name, body, rating FROM reviews ORDER BY id",
            )
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(ContentEntity::Review)
            .collect(),
            TargetKind::Comment => sqlx::query_as::<_, Comment>(
                "SELECT id, review_id, user_name, body FROM comments ORDER BY id",
            )
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(ContentEntity::Comment)
            .collect(),
            TargetKind::Tag => sqlx::query_as::<_, Tag>("SELECT id, name FROM tags ORDER BY id")
                .fetch_all(&self.pool)
                .await?
                .into_iter()
                .map(ContentEntity::Tag)
                .collect(),
        };

        Ok(entities)
    }

    async fn create_show(&self, show: NewShow) -> AppResult<ContentEntity> {
        let show: Show = sqlx::query_as(
            "INSERT INTO shows (title, overview, release_year) VALUES ($1, $2, $3) \
             RETURNING id, title, overview, release_year",
        )
        .bind(show.title)
        .bind(show.overview)
        .bind(show.release_year)
        .fetch_one(&self.pool)
        .await?;

        Ok(ContentEntity::Show(show))
    }

    async fn create_review(&self, user_name: &str, review: NewReview) -> AppResult<ContentEntity> {
        let review: Review = sqlx::query_as(
            "INSERT INTO reviews (show_id, user_name, body, rating) VALUES ($1, $2, $3, $4) \
             RETURNING id, show_id, user_name, body, rating",
        )
        .bind(review.show_id)
        .bind(user_name)
        .bind(review.body)
        .bind(review.rating)
        .fetch_one(&self.pool)
        .await?;

        Ok(ContentEntity::Review(review))
    }

    async fn create_comment(
        &self,
        user_name: &str,
        comment: NewComment,
    ) -> AppResult<ContentEntity> {
        let comment: Comment = sqlx::query_as(
            "INSERT INTO comments (review_id, user_name, body) VALUES ($1, $2, $3) \
             RETURNING id, review_id, user_name, body",
        )
        .bind(comment.review_id)
        .bind(user_name)
        .bind(comment.body)
        .fetch_one(&self.pool)
        .await?;

        Ok(ContentEntity::Comment(comment))
    }

    async fn create_tag(&self, tag: NewTag) -> AppResult<ContentEntity> {
        let name = tag.name;
        let tag: Tag = sqlx::query_as("INSERT INTO tags (name) VALUES ($1) RETURNING id, name")
            .bind(&name)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::from_insert(e, format!("tag '{}' already exists", name)))?;

        Ok(ContentEntity::Tag(tag))
    }
}

#[async_trait::async_trait]
impl UserRepository for PgStore {
    async fn create_user(&self, user: NewUser) -> AppResult<User> {
        let email = user.email.clone();
        sqlx::query_as(&format!(
            "INSERT INTO users (email, user_name, first_name, last_name, password_digest) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {}",
            USER_COLUMNS
        ))
        .bind(user.email)
        .bind(user.user_name)
        .bind(user.first_name)
        .bind(user.last_name)
        .bind(user.password_digest)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::from_insert(e, format!("email or user name for {} already taken", email))
        })
    }

    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let user = sqlx::query_as(&format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS))
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn find_user_by_name(&self, user_name: &str) -> AppResult<Option<User>> {
        let user = sqlx::query_as(&format!(
            "SELECT {} FROM users WHERE user_name = $1",
            USER_COLUMNS
        ))
        .bind(user_name)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn list_users(&self) -> AppResult<Vec<User>> {
        let users = sqlx::query_as(&format!("SELECT {} FROM users ORDER BY id", USER_COLUMNS))
            .fetch_all(&self.pool)
            .await?;
        Ok(users)
    }

    async fn update_bio(&self, email: &str, bio: Option<String>) -> AppResult<User> {
        let user: Option<User> = sqlx::query_as(&format!(
            "UPDATE users SET user_bio = $2 WHERE email = $1 RETURNING {}",
            USER_COLUMNS
        ))
        .bind(email)
        .bind(bio)
        .fetch_optional(&self.pool)
        .await?;

        user.ok_or_else(|| AppError::NotFound(format!("user {}", email)))
    }

    async fn update_image(&self, email: &str, image: Option<String>) -> AppResult<User> {
        let user: Option<User> = sqlx::query_as(&format!(
            "UPDATE users SET user_image = $2 WHERE email = $1 RETURNING {}",
            USER_COLUMNS
        ))
        .bind(email)
        .bind(image)
        .fetch_optional(&self.pool)
        .await?;

        user.ok_or_else(|| AppError::NotFound(format!("user {}", email)))
    }
}

#[async_trait::async_trait]
impl SessionRepository for PgStore {
    async fn create_session(
        &self,
        token: Uuid,
        email: &str,
        expires_at: DateTime<Utc>,
    ) -> AppResult<Session> {
        let session = sqlx::query_as(
            "INSERT INTO sessions (token, email, expires_at) VALUES ($1, $2, $3) \
             RETURNING token, email, created_at, expires_at",
        )
        .bind(token)
        .bind(email)
        .bind(expires_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(session)
    }

    async fn find_session(&self, token: Uuid) -> AppResult<Option<Session>> {
        let session = sqlx::query_as(
            "SELECT token, email, created_at, expires_at FROM sessions WHERE token = $1",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;
        Ok(session)
    }

    async fn purge_expired_sessions(&self, now: DateTime<Utc>) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= $1")
            .bind(now)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
