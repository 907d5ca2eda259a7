use axum::{
    extract::State,
    http::StatusCode,
};

use crate::{
    api::{
        response::{created, ok, ApiJson},
        AppState, AuthUser, PathParam,
    },
    error::AppResult,
    models::{EntityId, Show, WatchEntry, WatchState},
};

/// `GET /shows/:id`: show metadata without list membership
pub async fn show_state(
    State(state): State<AppState>,
    PathParam(show_id): PathParam<EntityId>,
) -> AppResult<ApiJson<Show>> {
    Ok(ok(state.watches.get_show_state(show_id).await?))
}

/// The caller's entries on one list; the list is fixed per route
pub async fn list(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    list: WatchState,
) -> AppResult<ApiJson<Vec<WatchEntry>>> {
    Ok(ok(state
        .watches
        .list_watch_entries(&user.user_name, list)
        .await?))
}

pub async fn get(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    PathParam(show_id): PathParam<EntityId>,
    list: WatchState,
) -> AppResult<ApiJson<WatchEntry>> {
    Ok(ok(state
        .watches
        .get_watch_entry(&user.user_name, list, show_id)
        .await?))
}

pub async fn add(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    PathParam(show_id): PathParam<EntityId>,
    list: WatchState,
) -> AppResult<(StatusCode, ApiJson<WatchEntry>)> {
    let entry = match list {
        WatchState::WatchLater => {
            state
                .watches
                .add_to_watch_later(&user.user_name, show_id)
                .await?
        }
        WatchState::ContinueWatching => {
            state
                .watches
                .add_to_continue_watching(&user.user_name, show_id)
                .await?
        }
    };
    Ok(created(entry))
}

/// Responds with the removed entry
pub async fn remove(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    PathParam(show_id): PathParam<EntityId>,
    list: WatchState,
) -> AppResult<ApiJson<WatchEntry>> {
    let entry = match list {
        WatchState::WatchLater => {
            state
                .watches
                .remove_from_watch_later(&user.user_name, show_id)
                .await?
        }
        WatchState::ContinueWatching => {
            state
                .watches
                .remove_from_continue_watching(&user.user_name, show_id)
                .await?
        }
    };
    Ok(ok(entry))
}
