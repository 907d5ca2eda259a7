use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};

use crate::error::AppError;

use super::EntityId;

/// Kind of content a favorite can point at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetKind {
    Review,
    Comment,
    Tag,
    Show,
}

impl TargetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetKind::Review => "review",
            TargetKind::Comment => "comment",
            TargetKind::Tag => "tag",
            TargetKind::Show => "show",
        }
    }

    /// Binds an id to this kind
    pub fn target(self, id: EntityId) -> FavoriteTarget {
        match self {
            TargetKind::Review => FavoriteTarget::Review(id),
            TargetKind::Comment => FavoriteTarget::Comment(id),
            TargetKind::Tag => FavoriteTarget::Tag(id),
            TargetKind::Show => FavoriteTarget::Show(id),
        }
    }
}

impl Display for TargetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accepts both singular and plural spellings (`review`, `reviews`), which
/// lets routes use the collection name as a path segment.
impl FromStr for TargetKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "review" | "reviews" => Ok(TargetKind::Review),
            "comment" | "comments" => Ok(TargetKind::Comment),
            "tag" | "tags" => Ok(TargetKind::Tag),
            "show" | "shows" => Ok(TargetKind::Show),
            other => Err(AppError::Validation(format!(
                "unknown favorite kind '{}', expected one of review, comment, tag, show",
                other
            ))),
        }
    }
}

/// The one entity a favorite refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum FavoriteTarget {
    Review(EntityId),
    Comment(EntityId),
    Tag(EntityId),
    Show(EntityId),
}

impl FavoriteTarget {
    pub fn kind(&self) -> TargetKind {
        match self {
            FavoriteTarget::Review(_) => TargetKind::Review,
            FavoriteTarget::Comment(_) => TargetKind::Comment,
            FavoriteTarget::Tag(_) => TargetKind::Tag,
            FavoriteTarget::Show(_) => TargetKind::Show,
        }
    }

    pub fn id(&self) -> EntityId {
        match *self {
            FavoriteTarget::Review(id)
            | FavoriteTarget::Comment(id)
            | FavoriteTarget::Tag(id)
            | FavoriteTarget::Show(id) => id,
        }
    }
}

impl Display for FavoriteTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} #{}", self.kind(), self.id())
    }
}

/// A user's favorite-marking of one content entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Favorite {
    pub id: EntityId,
    pub user_name: String,
    pub target: FavoriteTarget,
    pub created_at: DateTime<Utc>,
}

/// Storage row for the `favorites` table
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct FavoriteRow {
    pub id: EntityId,
    pub user_name: String,
    pub target_kind: String,
    pub target_id: EntityId,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<FavoriteRow> for Favorite {
    type Error = AppError;

    fn try_from(row: FavoriteRow) -> Result<Self, Self::Error> {
        let kind: TargetKind = row.target_kind.parse()?;
        Ok(Favorite {
            id: row.id,
            user_name: row.user_name,
            target: kind.target(row.target_id),
            created_at: row.created_at,
        })
    }
}
