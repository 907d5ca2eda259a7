use std::sync::Arc;

use crate::{
    db::EntityStore,
    error::{AppError, AppResult},
    models::{ContentEntity, EntityId, NewComment, NewReview, NewShow, NewTag, TargetKind},
};

/// Read and create access to shows, reviews, comments and tags
#[derive(Clone)]
pub struct Catalog {
    entities: Arc<dyn EntityStore>,
}

impl Catalog {
    pub fn new(entities: Arc<dyn EntityStore>) -> Self {
        Self { entities }
    }

    pub async fn get(&self, kind: TargetKind, id: EntityId) -> AppResult<ContentEntity> {
        self.entities
            .get_entity(kind, id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("{} #{}", kind, id)))
    }

    pub async fn list(&self, kind: TargetKind) -> AppResult<Vec<ContentEntity>> {
        self.entities.list_entities(kind).await
    }

    pub async fn create_show(&self, show: NewShow) -> AppResult<ContentEntity> {
        show.validate()?;
        let created = self.entities.create_show(show).await?;
        tracing::info!(show_id = created.id(), "Show created");
        Ok(created)
    }

    pub async fn create_review(
        &self,
        user_name: &str,
        review: NewReview,
    ) -> AppResult<ContentEntity> {
        review.validate()?;
        self.get(TargetKind::Show, review.show_id).await?;
        let created = self.entities.create_review(user_name, review).await?;
        tracing::info!(review_id = created.id(), user_name = %user_name, "Review created");
        Ok(created)
    }

    pub async fn create_comment(
        &self,
        user_name: &str,
        comment: NewComment,
    ) -> AppResult<ContentEntity> {
        comment.validate()?;
        self.get(TargetKind::Review, comment.review_id).await?;
        let created = self.entities.create_comment(user_name, comment).await?;
        tracing::info!(comment_id = created.id(), user_name = %user_name, "Comment created");
        Ok(created)
    }

    pub async fn create_tag(&self, tag: NewTag) -> AppResult<ContentEntity> {
        tag.validate()?;
        let created = self.entities.create_tag(tag).await?;
        tracing::info!(tag_id = created.id(), "Tag created");
        Ok(created)
    }
}
