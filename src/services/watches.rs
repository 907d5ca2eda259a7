use std::sync::Arc;

use crate::{
    db::{EntityStore, WatchRepository},
    error::{AppError, AppResult},
    models::{ContentEntity, EntityId, Show, TargetKind, WatchEntry, WatchState},
};

/// Tracks each user's watch-later and continue-watching lists
///
/// The two lists are independent: a show can be on both at once, as two
/// separate entries. Nothing moves a show between lists; callers remove it
/// from one and add it to the other.
#[derive(Clone)]
pub struct WatchLedger {
    watches: Arc<dyn WatchRepository>,
    entities: Arc<dyn EntityStore>,
}

impl WatchLedger {
    pub fn new(watches: Arc<dyn WatchRepository>, entities: Arc<dyn EntityStore>) -> Self {
        Self { watches, entities }
    }

    pub async fn add_to_watch_later(
        &self,
        user_name: &str,
        show_id: EntityId,
    ) -> AppResult<WatchEntry> {
        self.add(user_name, WatchState::WatchLater, show_id).await
    }

    pub async fn add_to_continue_watching(
        &self,
        user_name: &str,
        show_id: EntityId,
    ) -> AppResult<WatchEntry> {
        self.add(user_name, WatchState::ContinueWatching, show_id).await
    }

    pub async fn remove_from_watch_later(
        &self,
        user_name: &str,
        show_id: EntityId,
    ) -> AppResult<WatchEntry> {
        self.remove(user_name, WatchState::WatchLater, show_id).await
    }

    pub async fn remove_from_continue_watching(
        &self,
        user_name: &str,
        show_id: EntityId,
    ) -> AppResult<WatchEntry> {
        self.remove(user_name, WatchState::ContinueWatching, show_id)
            .await
    }

    pub async fn add(
        &self,
        user_name: &str,
        state: WatchState,
        show_id: EntityId,
    ) -> AppResult<WatchEntry> {
        self.get_show_state(show_id).await?;

        let entry = self.watches.insert_watch(user_name, state, show_id).await?;

        tracing::info!(
            user_name = %user_name,
            state = %state,
            show_id,
            "Show added to watch list"
        );

        Ok(entry)
    }

    pub async fn remove(
        &self,
        user_name: &str,
        state: WatchState,
        show_id: EntityId,
    ) -> AppResult<WatchEntry> {
        let entry = self.watches.delete_watch(user_name, state, show_id).await?;

        tracing::info!(
            user_name = %user_name,
            state = %state,
            show_id,
            "Show removed from watch list"
        );

        Ok(entry)
    }

    /// Show metadata only; list membership is queried with `get_watch_entry`
    pub async fn get_show_state(&self, show_id: EntityId) -> AppResult<Show> {
        match self.entities.get_entity(TargetKind::Show, show_id).await? {
            Some(ContentEntity::Show(show)) => Ok(show),
            Some(other) => Err(AppError::Internal(format!(
                "entity store returned a {} for show #{}",
                other.kind(),
                show_id
            ))),
            None => Err(AppError::NotFound(format!("show #{}", show_id))),
        }
    }

    pub async fn get_watch_entry(
        &self,
        user_name: &str,
        state: WatchState,
        show_id: EntityId,
    ) -> AppResult<WatchEntry> {
        self.watches
            .find_watch(user_name, state, show_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "show #{} is not on {}'s {} list",
                    show_id, user_name, state
                ))
            })
    }

    pub async fn list_watch_entries(
        &self,
        user_name: &str,
        state: WatchState,
    ) -> AppResult<Vec<WatchEntry>> {
        self.watches.watches_of_user(user_name, state).await
    }
}
