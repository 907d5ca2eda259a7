use axum::{
    extract::State,
    http::StatusCode,
    Extension,
};
use serde::{Deserialize, Serialize};

use crate::{
    api::{
        response::{created, ok, ApiJson},
        AppState, AuthUser, JsonBody, PathParam,
    },
    error::AppResult,
    middleware::request_id::RequestId,
    models::{SignupRequest, UserLibrary, UserProfile, WatchState},
    services::LoginOutcome,
};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Bio in one shape whether or not it is set
#[derive(Debug, Serialize, Deserialize)]
pub struct BioPayload {
    #[serde(default)]
    pub user_bio: Option<String>,
}

/// Image reference in one shape whether or not it is set
#[derive(Debug, Serialize, Deserialize)]
pub struct ImagePayload {
    #[serde(default)]
    pub user_image: Option<String>,
}

pub async fn signup(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    JsonBody(request): JsonBody<SignupRequest>,
) -> AppResult<(StatusCode, ApiJson<UserProfile>)> {
    tracing::info!(request_id = %request_id, user_name = %request.user_name, "Processing signup");
    let profile = state.accounts.signup(request).await?;
    Ok(created(profile))
}

pub async fn login(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<LoginRequest>,
) -> AppResult<ApiJson<LoginOutcome>> {
    let outcome = state
        .accounts
        .login(&request.email, &request.password)
        .await?;
    Ok(ok(outcome))
}

pub async fn me(AuthUser(user): AuthUser) -> ApiJson<UserProfile> {
    ok(UserProfile::from(user))
}

pub async fn get_bio(AuthUser(user): AuthUser) -> ApiJson<BioPayload> {
    ok(BioPayload {
        user_bio: user.user_bio,
    })
}

pub async fn update_bio(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    JsonBody(payload): JsonBody<BioPayload>,
) -> AppResult<ApiJson<BioPayload>> {
    let user_bio = state
        .accounts
        .update_bio(&user.email, payload.user_bio)
        .await?;
    Ok(ok(BioPayload { user_bio }))
}

pub async fn get_image(AuthUser(user): AuthUser) -> ApiJson<ImagePayload> {
    ok(ImagePayload {
        user_image: user.user_image,
    })
}

pub async fn update_image(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    JsonBody(payload): JsonBody<ImagePayload>,
) -> AppResult<ApiJson<ImagePayload>> {
    let user_image = state
        .accounts
        .update_image(&user.email, payload.user_image)
        .await?;
    Ok(ok(ImagePayload { user_image }))
}

pub async fn list_users(State(state): State<AppState>) -> AppResult<ApiJson<Vec<UserProfile>>> {
    Ok(ok(state.accounts.list_users().await?))
}

/// Favorites plus both watch lists for one user
pub async fn user_library(
    State(state): State<AppState>,
    PathParam(user_name): PathParam<String>,
) -> AppResult<ApiJson<UserLibrary>> {
    let user = state.accounts.find_by_name(&user_name).await?;

    let favorites = state.favorites.list_user_favorites(&user.user_name).await?;
    let watch_later = state
        .watches
        .list_watch_entries(&user.user_name, WatchState::WatchLater)
        .await?;
    let continue_watching = state
        .watches
        .list_watch_entries(&user.user_name, WatchState::ContinueWatching)
        .await?;

    Ok(ok(UserLibrary {
        user_name: user.user_name,
        favorites,
        watch_later,
        continue_watching,
    }))
}
