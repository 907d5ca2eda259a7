use axum::{
    extract::State,
    http::StatusCode,
    Extension,
};

use crate::{
    api::{
        response::{created, ok, ApiJson},
        AppState, AuthUser, PathParam,
    },
    error::AppResult,
    middleware::request_id::RequestId,
    models::{EntityId, Favorite, TargetKind},
};

/// `GET /favorites/:kind`
pub async fn list_for_kind(
    State(state): State<AppState>,
    PathParam(kind): PathParam<String>,
) -> AppResult<ApiJson<Vec<Favorite>>> {
    let kind: TargetKind = kind.parse()?;
    Ok(ok(state.favorites.list_favorites_for_kind(kind).await?))
}

/// `GET /favorites/:kind/:id`, where `id` is the favorite's own id
pub async fn get_by_id(
    State(state): State<AppState>,
    PathParam((kind, id)): PathParam<(String, EntityId)>,
) -> AppResult<ApiJson<Favorite>> {
    let kind: TargetKind = kind.parse()?;
    Ok(ok(state.favorites.get_favorite_by_id(kind, id).await?))
}

/// `POST /<collection>/:id/favorite`; the kind is fixed per route
pub async fn create(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    AuthUser(user): AuthUser,
    PathParam(target_id): PathParam<EntityId>,
    kind: TargetKind,
) -> AppResult<(StatusCode, ApiJson<Favorite>)> {
    tracing::debug!(request_id = %request_id, kind = %kind, target_id, "Favorite requested");
    let favorite = state
        .favorites
        .create_favorite(&user.user_name, kind, target_id)
        .await?;
    Ok(created(favorite))
}

/// `DELETE /<collection>/:id/favorite`; responds with the removed record
pub async fn delete(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    AuthUser(user): AuthUser,
    PathParam(target_id): PathParam<EntityId>,
    kind: TargetKind,
) -> AppResult<ApiJson<Favorite>> {
    tracing::debug!(request_id = %request_id, kind = %kind, target_id, "Unfavorite requested");
    let favorite = state
        .favorites
        .delete_favorite(&user.user_name, kind, target_id)
        .await?;
    Ok(ok(favorite))
}
