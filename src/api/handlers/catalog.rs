use axum::{
    extract::State,
    http::StatusCode,
};

use crate::{
    api::{
        response::{created, ok, ApiJson},
        AppState, AuthUser, JsonBody, PathParam,
    },
    error::AppResult,
    models::{
        ContentEntity, EntityId, NewComment, NewReview, NewShow, NewTag, TargetKind,
    },
};

type Created = AppResult<(StatusCode, ApiJson<ContentEntity>)>;

/// Every entity of one kind. The kind is fixed per route.
pub async fn list(
    State(state): State<AppState>,
    kind: TargetKind,
) -> AppResult<ApiJson<Vec<ContentEntity>>> {
    Ok(ok(state.catalog.list(kind).await?))
}

pub async fn get(
    State(state): State<AppState>,
    PathParam(id): PathParam<EntityId>,
    kind: TargetKind,
) -> AppResult<ApiJson<ContentEntity>> {
    Ok(ok(state.catalog.get(kind, id).await?))
}

pub async fn create_show(
    State(state): State<AppState>,
    _user: AuthUser,
    JsonBody(show): JsonBody<NewShow>,
) -> Created {
    Ok(created(state.catalog.create_show(show).await?))
}

pub async fn create_review(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    JsonBody(review): JsonBody<NewReview>,
) -> Created {
    Ok(created(
        state.catalog.create_review(&user.user_name, review).await?,
    ))
}

pub async fn create_comment(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    JsonBody(comment): JsonBody<NewComment>,
) -> Created {
    Ok(created(
        state
            .catalog
            .create_comment(&user.user_name, comment)
            .await?,
    ))
}

pub async fn create_tag(
    State(state): State<AppState>,
    _user: AuthUser,
    JsonBody(tag): JsonBody<NewTag>,
) -> Created {
    Ok(created(state.catalog.create_tag(tag).await?))
}
