use std::sync::Arc;

use crate::{
    db::{EntityStore, FavoriteRepository},
    error::{AppError, AppResult},
    models::{EntityId, Favorite, TargetKind},
};

/// Tracks which content items users have favorited
///
/// A favorite always points at exactly one review, comment, tag or show.
/// Targets are checked against the entity store before insertion, and a
/// user can favorite a given target at most once.
#[derive(Clone)]
pub struct FavoritesLedger {
    favorites: Arc<dyn FavoriteRepository>,
    entities: Arc<dyn EntityStore>,
}

impl FavoritesLedger {
    pub fn new(favorites: Arc<dyn FavoriteRepository>, entities: Arc<dyn EntityStore>) -> Self {
        Self {
            favorites,
            entities,
        }
    }

    pub async fn create_favorite(
        &self,
        user_name: &str,
        kind: TargetKind,
        target_id: EntityId,
    ) -> AppResult<Favorite> {
        if self.entities.get_entity(kind, target_id).await?.is_none() {
            return Err(AppError::NotFound(format!("{} #{}", kind, target_id)));
        }

        let favorite = self
            .favorites
            .insert_favorite(user_name, kind.target(target_id))
            .await?;

        tracing::info!(
            user_name = %user_name,
            kind = %kind,
            target_id,
            favorite_id = favorite.id,
            "Favorite created"
        );

        Ok(favorite)
    }

    /// Removes the favorite and returns what was removed
    pub async fn delete_favorite(
        &self,
        user_name: &str,
        kind: TargetKind,
        target_id: EntityId,
    ) -> AppResult<Favorite> {
        let favorite = self
            .favorites
            .delete_favorite(user_name, kind.target(target_id))
            .await?;

        tracing::info!(
            user_name = %user_name,
            kind = %kind,
            target_id,
            "Favorite removed"
        );

        Ok(favorite)
    }

    /// Every favorite of one kind, across all users
    pub async fn list_favorites_for_kind(&self, kind: TargetKind) -> AppResult<Vec<Favorite>> {
        self.favorites.favorites_of_kind(kind).await
    }

    /// A single favorite by its own id. A favorite that exists but points at
    /// another kind is reported as missing.
    pub async fn get_favorite_by_id(&self, kind: TargetKind, id: EntityId) -> AppResult<Favorite> {
        self.favorites
            .find_favorite(id)
            .await?
            .filter(|f| f.target.kind() == kind)
            .ok_or_else(|| AppError::NotFound(format!("{} favorite #{}", kind, id)))
    }

    pub async fn list_user_favorites(&self, user_name: &str) -> AppResult<Vec<Favorite>> {
        self.favorites.favorites_of_user(user_name).await
    }
}
