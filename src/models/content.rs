use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

use super::{EntityId, TargetKind};

/// A TV show or movie in the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Show {
    pub id: EntityId,
    pub title: String,
    pub overview: Option<String>,
    pub release_year: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Review {
    pub id: EntityId,
    pub show_id: EntityId,
    pub user_name: String,
    pub body: String,
    pub rating: Option<i16>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Comment {
    pub id: EntityId,
    pub review_id: EntityId,
    pub user_name: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Tag {
    pub id: EntityId,
    pub name: String,
}

/// Any of the four content entities, tagged with its kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ContentEntity {
    Review(Review),
    Comment(Comment),
    Tag(Tag),
    Show(Show),
}

impl ContentEntity {
    pub fn kind(&self) -> TargetKind {
        match self {
            ContentEntity::Review(_) => TargetKind::Review,
            ContentEntity::Comment(_) => TargetKind::Comment,
            ContentEntity::Tag(_) => TargetKind::Tag,
            ContentEntity::Show(_) => TargetKind::Show,
        }
    }

    pub fn id(&self) -> EntityId {
        match self {
            ContentEntity::Review(r) => r.id,
            ContentEntity::Comment(c) => c.id,
            ContentEntity::Tag(t) => t.id,
            ContentEntity::Show(s) => s.id,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewShow {
    pub title: String,
    pub overview: Option<String>,
    pub release_year: Option<i32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewReview {
    pub show_id: EntityId,
    pub body: String,
    pub rating: Option<i16>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewComment {
    pub review_id: EntityId,
    pub body: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewTag {
    pub name: String,
}

fn require_text(field: &str, value: &str) -> AppResult<()> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{} must not be empty", field)));
    }
    Ok(())
}

impl NewShow {
    pub fn validate(&self) -> AppResult<()> {
        require_text("title", &self.title)
    }
}

impl NewReview {
    pub fn validate(&self) -> AppResult<()> {
        require_text("body", &self.body)?;
        match self.rating {
            Some(rating) if !(1..=10).contains(&rating) => Err(AppError::Validation(format!(
                "rating must be between 1 and 10, got {}",
                rating
            ))),
            _ => Ok(()),
        }
    }
}

impl NewComment {
    pub fn validate(&self) -> AppResult<()> {
        require_text("body", &self.body)
    }
}

impl NewTag {
    pub fn validate(&self) -> AppResult<()> {
        require_text("name", &self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_review_rating_bounds() {
        let mut review = NewReview {
            show_id: 1,
            body: "Great pilot".to_string(),
            rating: Some(10),
        };
        assert!(review.validate().is_ok());

        review.rating = Some(0);
        assert!(matches!(review.validate(), Err(AppError::Validation(_))));

        review.rating = None;
        assert!(review.validate().is_ok());
    }

    #[test]
    fn test_blank_tag_name_rejected() {
        let tag = NewTag {
            name: "   ".to_string(),
        };
        assert!(tag.validate().is_err());
    }

    #[test]
    fn test_entity_serializes_with_kind() {
        let entity = ContentEntity::Tag(Tag {
            id: 4,
            name: "noir".to_string(),
        });
        let json = serde_json::to_value(&entity).unwrap();
        assert_eq!(json["kind"], "tag");
        assert_eq!(json["name"], "noir");
        assert_eq!(entity.kind(), TargetKind::Tag);
        assert_eq!(entity.id(), 4);
    }
}
