use axum::http::{header::AUTHORIZATION, HeaderValue, StatusCode};
use axum_test::TestServer;
use serde_json::{json, Value};

use showlog_api::api::{create_router, AppState};

fn create_test_server() -> TestServer {
    let state = AppState::in_memory();
    let app = create_router(state);
    TestServer::new(app).unwrap()
}

fn bearer(token: &str) -> HeaderValue {
    HeaderValue::from_str(&format!("Bearer {}", token)).unwrap()
}

/// Signs up and logs in a user, returning their access token
async fn register(server: &TestServer, user_name: &str) -> String {
    let email = format!("{}@example.com", user_name);

    server
        .post("/api/signup")
        .json(&json!({
            "first_name": user_name,
            "last_name": "Tester",
            "email": email,
            "user_name": user_name,
            "password": "hunter2"
        }))
        .await
        .assert_status(StatusCode::CREATED);

    let response = server
        .post("/api/login")
        .json(&json!({ "email": email, "password": "hunter2" }))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    body["payload"]["access_token"].as_str().unwrap().to_string()
}

async fn create_show(server: &TestServer, token: &str, title: &str) -> i64 {
    let response = server
        .post("/api/shows")
        .add_header(AUTHORIZATION, bearer(token))
        .json(&json!({ "title": title, "release_year": 2019 }))
        .await;
    response.assert_status(StatusCode::CREATED);

    let body: Value = response.json();
    body["payload"]["id"].as_i64().unwrap()
}

async fn create_review(server: &TestServer, token: &str, show_id: i64) -> i64 {
    let response = server
        .post("/api/reviews")
        .add_header(AUTHORIZATION, bearer(token))
        .json(&json!({ "show_id": show_id, "body": "Worth it", "rating": 9 }))
        .await;
    response.assert_status(StatusCode::CREATED);

    let body: Value = response.json();
    body["payload"]["id"].as_i64().unwrap()
}

async fn library(server: &TestServer, user_name: &str) -> Value {
    let response = server
        .get(&format!("/api/users/{}/library", user_name))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    body["payload"].clone()
}

#[tokio::test]
async fn test_health_check() {
    let server = create_test_server();
    let response = server.get("/health").await;
    response.assert_status_ok();
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let server = create_test_server();
    let response = server.get("/health").await;
    assert!(response.headers().get("x-request-id").is_some());
}

#[tokio::test]
async fn test_signup_login_and_profile() {
    let server = create_test_server();
    let token = register(&server, "alice").await;

    let response = server
        .get("/api/me")
        .add_header(AUTHORIZATION, bearer(&token))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["payload"]["user_name"], "alice");
    assert!(body["payload"].get("password_digest").is_none());
}

#[tokio::test]
async fn test_duplicate_signup_conflicts() {
    let server = create_test_server();
    register(&server, "alice").await;

    let response = server
        .post("/api/signup")
        .json(&json!({
            "first_name": "Other",
            "last_name": "Alice",
            "email": "alice@example.com",
            "user_name": "alice2",
            "password": "pw"
        }))
        .await;

    response.assert_status(StatusCode::CONFLICT);
    let body: Value = response.json();
    assert_eq!(body["status"], "error");
    assert_eq!(body["error"]["kind"], "conflict");
}

#[tokio::test]
async fn test_login_with_wrong_password() {
    let server = create_test_server();
    register(&server, "alice").await;

    let response = server
        .post("/api/login")
        .json(&json!({ "email": "alice@example.com", "password": "nope" }))
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_protected_routes_require_token() {
    let server = create_test_server();

    server
        .get("/api/me")
        .await
        .assert_status(StatusCode::UNAUTHORIZED);

    server
        .post("/api/shows/1/favorite")
        .add_header(AUTHORIZATION, bearer("not-a-real-token"))
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_bio_and_image_have_consistent_shape() {
    let server = create_test_server();
    let token = register(&server, "alice").await;

    let response = server
        .get("/api/me/bio")
        .add_header(AUTHORIZATION, bearer(&token))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["payload"], json!({ "user_bio": null }));

    let response = server
        .put("/api/me/bio")
        .add_header(AUTHORIZATION, bearer(&token))
        .json(&json!({ "user_bio": "Watches too much TV" }))
        .await;
    response.assert_status_ok();

    let response = server
        .get("/api/me/bio")
        .add_header(AUTHORIZATION, bearer(&token))
        .await;
    let body: Value = response.json();
    assert_eq!(body["payload"], json!({ "user_bio": "Watches too much TV" }));

    let response = server
        .get("/api/me/image")
        .add_header(AUTHORIZATION, bearer(&token))
        .await;
    let body: Value = response.json();
    assert_eq!(body["payload"], json!({ "user_image": null }));
}

#[tokio::test]
async fn test_favorite_review_round_trip() {
    let server = create_test_server();
    let token = register(&server, "alice").await;
    let show_id = create_show(&server, &token, "Dark").await;
    let review_id = create_review(&server, &token, show_id).await;

    let response = server
        .post(&format!("/api/reviews/{}/favorite", review_id))
        .add_header(AUTHORIZATION, bearer(&token))
        .await;
    response.assert_status(StatusCode::CREATED);
    let body: Value = response.json();
    assert_eq!(body["payload"]["user_name"], "alice");
    assert_eq!(
        body["payload"]["target"],
        json!({ "kind": "review", "id": review_id })
    );

    let favorites = library(&server, "alice").await["favorites"].clone();
    assert_eq!(favorites.as_array().unwrap().len(), 1);

    server
        .delete(&format!("/api/reviews/{}/favorite", review_id))
        .add_header(AUTHORIZATION, bearer(&token))
        .await
        .assert_status_ok();

    let favorites = library(&server, "alice").await["favorites"].clone();
    assert!(favorites.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_duplicate_favorite_conflicts() {
    let server = create_test_server();
    let token = register(&server, "alice").await;
    let show_id = create_show(&server, &token, "Dark").await;
    let path = format!("/api/shows/{}/favorite", show_id);

    server
        .post(&path)
        .add_header(AUTHORIZATION, bearer(&token))
        .await
        .assert_status(StatusCode::CREATED);

    server
        .post(&path)
        .add_header(AUTHORIZATION, bearer(&token))
        .await
        .assert_status(StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_favorite_of_missing_entity_is_not_found() {
    let server = create_test_server();
    let token = register(&server, "alice").await;

    let response = server
        .post("/api/tags/404/favorite")
        .add_header(AUTHORIZATION, bearer(&token))
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
    let body: Value = response.json();
    assert_eq!(body["error"]["kind"], "not_found");
}

#[tokio::test]
async fn test_unfavorite_without_favorite_is_not_found() {
    let server = create_test_server();
    let token = register(&server, "alice").await;
    let show_id = create_show(&server, &token, "Dark").await;

    server
        .delete(&format!("/api/shows/{}/favorite", show_id))
        .add_header(AUTHORIZATION, bearer(&token))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_favorites_by_kind_and_id() {
    let server = create_test_server();
    let alice = register(&server, "alice").await;
    let bob = register(&server, "bob").await;
    let show_id = create_show(&server, &alice, "Dark").await;

    let response = server
        .post(&format!("/api/shows/{}/favorite", show_id))
        .add_header(AUTHORIZATION, bearer(&alice))
        .await;
    let favorite_id = response.json::<Value>()["payload"]["id"].as_i64().unwrap();

    server
        .post(&format!("/api/shows/{}/favorite", show_id))
        .add_header(AUTHORIZATION, bearer(&bob))
        .await
        .assert_status(StatusCode::CREATED);

    let response = server.get("/api/favorites/shows").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["payload"].as_array().unwrap().len(), 2);

    let response = server.get("/api/favorites/reviews").await;
    let body: Value = response.json();
    assert!(body["payload"].as_array().unwrap().is_empty());

    server
        .get(&format!("/api/favorites/show/{}", favorite_id))
        .await
        .assert_status_ok();

    server
        .get(&format!("/api/favorites/comment/{}", favorite_id))
        .await
        .assert_status(StatusCode::NOT_FOUND);

    server
        .get("/api/favorites/show/9999")
        .await
        .assert_status(StatusCode::NOT_FOUND);

    server
        .get("/api/favorites/episodes")
        .await
        .assert_status(StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_show_on_both_watch_lists() {
    let server = create_test_server();
    let token = register(&server, "bob").await;
    let show_id = create_show(&server, &token, "Severance").await;

    server
        .post(&format!("/api/watch-later/{}", show_id))
        .add_header(AUTHORIZATION, bearer(&token))
        .await
        .assert_status(StatusCode::CREATED);
    server
        .post(&format!("/api/continue-watching/{}", show_id))
        .add_header(AUTHORIZATION, bearer(&token))
        .await
        .assert_status(StatusCode::CREATED);

    let lib = library(&server, "bob").await;
    assert_eq!(lib["watch_later"].as_array().unwrap().len(), 1);
    assert_eq!(lib["continue_watching"].as_array().unwrap().len(), 1);

    server
        .delete(&format!("/api/watch-later/{}", show_id))
        .add_header(AUTHORIZATION, bearer(&token))
        .await
        .assert_status_ok();

    let lib = library(&server, "bob").await;
    assert!(lib["watch_later"].as_array().unwrap().is_empty());
    let remaining = lib["continue_watching"].as_array().unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0]["state"], "continue_watching");
    assert_eq!(remaining[0]["show_id"], show_id);

    server
        .get(&format!("/api/watch-later/{}", show_id))
        .add_header(AUTHORIZATION, bearer(&token))
        .await
        .assert_status(StatusCode::NOT_FOUND);
    server
        .get(&format!("/api/continue-watching/{}", show_id))
        .add_header(AUTHORIZATION, bearer(&token))
        .await
        .assert_status_ok();
}

#[tokio::test]
async fn test_watch_list_errors() {
    let server = create_test_server();
    let token = register(&server, "bob").await;
    let show_id = create_show(&server, &token, "Severance").await;

    server
        .post("/api/watch-later/777")
        .add_header(AUTHORIZATION, bearer(&token))
        .await
        .assert_status(StatusCode::NOT_FOUND);

    server
        .delete(&format!("/api/continue-watching/{}", show_id))
        .add_header(AUTHORIZATION, bearer(&token))
        .await
        .assert_status(StatusCode::NOT_FOUND);

    server
        .post(&format!("/api/watch-later/{}", show_id))
        .add_header(AUTHORIZATION, bearer(&token))
        .await
        .assert_status(StatusCode::CREATED);
    server
        .post(&format!("/api/watch-later/{}", show_id))
        .add_header(AUTHORIZATION, bearer(&token))
        .await
        .assert_status(StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_show_state_excludes_list_membership() {
    let server = create_test_server();
    let token = register(&server, "bob").await;
    let show_id = create_show(&server, &token, "Severance").await;

    server
        .post(&format!("/api/watch-later/{}", show_id))
        .add_header(AUTHORIZATION, bearer(&token))
        .await;

    let response = server.get(&format!("/api/shows/{}", show_id)).await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["payload"]["title"], "Severance");
    assert!(body["payload"].get("watch_later").is_none());

    server
        .get("/api/shows/31337")
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_content_listing() {
    let server = create_test_server();
    let token = register(&server, "alice").await;
    let show_id = create_show(&server, &token, "Dark").await;
    create_show(&server, &token, "1899").await;
    let review_id = create_review(&server, &token, show_id).await;

    let response = server.get("/api/shows").await;
    let body: Value = response.json();
    assert_eq!(body["payload"].as_array().unwrap().len(), 2);

    let response = server.get(&format!("/api/reviews/{}", review_id)).await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["payload"]["kind"], "review");
    assert_eq!(body["payload"]["user_name"], "alice");

    server
        .get("/api/comments/1")
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_library_for_unknown_user() {
    let server = create_test_server();
    server
        .get("/api/users/nobody/library")
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_malformed_body_uses_error_envelope() {
    let server = create_test_server();

    let response = server
        .post("/api/signup")
        .json(&json!({ "email": "a@b.c" }))
        .await;
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);

    let body: Value = response.json();
    assert_eq!(body["status"], "error");
    assert_eq!(body["error"]["kind"], "validation");
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("first_name"));
}

#[tokio::test]
async fn test_non_numeric_id_uses_error_envelope() {
    let server = create_test_server();
    let token = register(&server, "alice").await;

    let response = server
        .post("/api/shows/abc/favorite")
        .add_header(AUTHORIZATION, bearer(&token))
        .await;
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);

    let body: Value = response.json();
    assert_eq!(body["status"], "error");
    assert_eq!(body["error"]["kind"], "validation");

    let response = server.get("/api/reviews/seven").await;
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = response.json();
    assert_eq!(body["error"]["kind"], "validation");
}
