use axum::{
    extract::State,
    middleware,
    routing::{get, post, MethodRouter},
    Extension, Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    middleware::request_id::{make_span_with_request_id, request_id_middleware, RequestId},
    models::{EntityId, TargetKind, WatchState},
};

use super::handlers::{self, accounts, catalog, favorites, watches};
use super::{AppState, AuthUser, PathParam};

/// Creates the main API router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/api", api_routes())
        .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// API routes under /api
fn api_routes() -> Router<AppState> {
    Router::new()
        // Accounts
        .route("/signup", post(accounts::signup))
        .route("/login", post(accounts::login))
        .route("/me", get(accounts::me))
        .route("/me/bio", get(accounts::get_bio).put(accounts::update_bio))
        .route("/me/image", get(accounts::get_image).put(accounts::update_image))
        .route("/users", get(accounts::list_users))
        .route("/users/:user_name/library", get(accounts::user_library))
        // Content
        .route("/shows", list_content(TargetKind::Show).post(catalog::create_show))
        .route("/shows/:id", get(watches::show_state))
        .route("/reviews", list_content(TargetKind::Review).post(catalog::create_review))
        .route("/reviews/:id", get_content(TargetKind::Review))
        .route("/comments", list_content(TargetKind::Comment).post(catalog::create_comment))
        .route("/comments/:id", get_content(TargetKind::Comment))
        .route("/tags", list_content(TargetKind::Tag).post(catalog::create_tag))
        .route("/tags/:id", get_content(TargetKind::Tag))
        // Favorites
        .route("/shows/:id/favorite", favorite(TargetKind::Show))
        .route("/reviews/:id/favorite", favorite(TargetKind::Review))
        .route("/comments/:id/favorite", favorite(TargetKind::Comment))
        .route("/tags/:id/favorite", favorite(TargetKind::Tag))
        .route("/favorites/:kind", get(favorites::list_for_kind))
        .route("/favorites/:kind/:id", get(favorites::get_by_id))
        // Watch lists
        .route("/watch-later", watch_list(WatchState::WatchLater))
        .route("/watch-later/:show_id", watch_entry(WatchState::WatchLater))
        .route("/continue-watching", watch_list(WatchState::ContinueWatching))
        .route(
            "/continue-watching/:show_id",
            watch_entry(WatchState::ContinueWatching),
        )
}

fn list_content(kind: TargetKind) -> MethodRouter<AppState> {
    get(move |state: State<AppState>| catalog::list(state, kind))
}

fn get_content(kind: TargetKind) -> MethodRouter<AppState> {
    get(move |state: State<AppState>, id: PathParam<EntityId>| catalog::get(state, id, kind))
}

fn favorite(kind: TargetKind) -> MethodRouter<AppState> {
    post(
        move |state: State<AppState>,
              request_id: Extension<RequestId>,
              user: AuthUser,
              id: PathParam<EntityId>| favorites::create(state, request_id, user, id, kind),
    )
    .delete(
        move |state: State<AppState>,
              request_id: Extension<RequestId>,
              user: AuthUser,
              id: PathParam<EntityId>| favorites::delete(state, request_id, user, id, kind),
    )
}

fn watch_list(list: WatchState) -> MethodRouter<AppState> {
    get(move |state: State<AppState>, user: AuthUser| watches::list(state, user, list))
}

fn watch_entry(list: WatchState) -> MethodRouter<AppState> {
    get(
        move |state: State<AppState>, user: AuthUser, id: PathParam<EntityId>| {
            watches::get(state, user, id, list)
        },
    )
    .post(
        move |state: State<AppState>, user: AuthUser, id: PathParam<EntityId>| {
            watches::add(state, user, id, list)
        },
    )
    .delete(
        move |state: State<AppState>, user: AuthUser, id: PathParam<EntityId>| {
            watches::remove(state, user, id, list)
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;

    fn request(method: &str, uri: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn test_health_echoes_request_id() {
        let app = create_router(AppState::in_memory());
        let id = "6f9619ff-8b86-d011-b42d-00cf4fc964ff";

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .header("x-request-id", id)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["x-request-id"], id);
    }

    #[tokio::test]
    async fn test_favorite_routes_require_auth() {
        let app = create_router(AppState::in_memory());

        for method in ["POST", "DELETE"] {
            let response = app
                .clone()
                .oneshot(request(method, "/api/comments/1/favorite"))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        }
    }

    #[tokio::test]
    async fn test_unknown_route_is_not_found() {
        let app = create_router(AppState::in_memory());
        let response = app.oneshot(request("GET", "/api/episodes")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
