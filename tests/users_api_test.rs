mod common;

use axum::http::{Method, StatusCode, header};
use common::{MultipartForm, TestApp};
use serde_json::json;

#[tokio::test]
async fn test_register_returns_public_profile() {
    let app = TestApp::new();

    let response = app.register("Alice").await;

    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["statusCode"], 201);
    assert_eq!(response.body["success"], true);
    let user = response.data();
    assert_eq!(user["username"], "alice");
    assert_eq!(user["email"], "alice@example.com");
    assert!(user["avatar"].as_str().unwrap().starts_with("http://localhost:8000/media/"));
    assert!(user.get("password").is_none());
    assert!(user.get("refreshToken").is_none());
}

#[tokio::test]
async fn test_register_twice_conflicts() {
    let app = TestApp::new();
    app.register("alice").await;

    let response = app.register("alice").await;

    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(response.body["success"], false);
}

#[tokio::test]
async fn test_register_without_avatar_is_rejected() {
    let app = TestApp::new();
    let form = MultipartForm::new()
        .text("fullName", "Bob")
        .text("email", "bob@example.com")
        .text("username", "bob")
        .text("password", "secret");

    let response = app.multipart(Method::POST, "/api/v1/users/register", None, form).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["statusCode"], 400);
}

#[tokio::test]
async fn test_login_sets_session_cookies() {
    let app = TestApp::new();
    app.register("alice").await;

    let response = app.login("alice", "correct horse").await;

    assert_eq!(response.status, StatusCode::OK);
    let cookies = response.set_cookies();
    assert!(cookies.iter().any(|c| c.starts_with("accessToken=") && c.contains("HttpOnly")));
    assert!(cookies.iter().any(|c| c.starts_with("refreshToken=")));
    assert!(response.data()["accessToken"].is_string());
    assert!(response.data()["user"].get("password").is_none());
}

#[tokio::test]
async fn test_wrong_password_sets_no_cookie() {
    let app = TestApp::new();
    app.register("alice").await;

    let response = app.login("alice", "wrong").await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert!(response.set_cookies().is_empty());
    assert_eq!(response.body["success"], false);
}

#[tokio::test]
async fn test_unknown_user_login_is_not_found() {
    let app = TestApp::new();

    let response = app.login("ghost", "whatever").await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_current_user_requires_session() {
    let app = TestApp::new();
    let alice = app.sign_up("alice").await;

    let anonymous = app.get("/api/v1/users/current-user", None).await;
    assert_eq!(anonymous.status, StatusCode::UNAUTHORIZED);

    let me = app.get("/api/v1/users/current-user", Some(&alice)).await;
    assert_eq!(me.status, StatusCode::OK);
    assert_eq!(me.data()["_id"], alice.id.as_str());
}

#[tokio::test]
async fn test_refresh_rotates_and_logout_revokes() {
    let app = TestApp::new();
    app.register("alice").await;
    let login = app.login("alice", "correct horse").await;
    let refresh_token = login.data()["refreshToken"].as_str().unwrap().to_string();

    let refreshed = app
        .json(
            Method::POST,
            "/api/v1/users/refresh-token",
            None,
            &json!({"refreshToken": refresh_token}),
        )
        .await;
    assert_eq!(refreshed.status, StatusCode::OK, "{}", refreshed.body);
    let rotated = refreshed.data()["refreshToken"].as_str().unwrap().to_string();

    // The previous refresh token is no longer the stored one
    let replay = app
        .json(
            Method::POST,
            "/api/v1/users/refresh-token",
            None,
            &json!({"refreshToken": refresh_token}),
        )
        .await;
    assert_ne!(rotated, refresh_token);
    assert_eq!(replay.status, StatusCode::UNAUTHORIZED);

    let session = common::Session {
        id: login.data()["user"]["_id"].as_str().unwrap().to_string(),
        username: "alice".to_string(),
        access_token: refreshed.data()["accessToken"].as_str().unwrap().to_string(),
    };
    let logout = app.empty(Method::POST, "/api/v1/users/logout", Some(&session)).await;
    assert_eq!(logout.status, StatusCode::OK);
    assert!(logout.set_cookies().iter().any(|c| c.starts_with("accessToken=")));

    let after_logout = app
        .json(Method::POST, "/api/v1/users/refresh-token", None, &json!({"refreshToken": rotated}))
        .await;
    assert_eq!(after_logout.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_responses_carry_request_id() {
    let app = TestApp::new();

    let response = app.login("ghost", "whatever").await;

    assert!(response.headers.get("x-request-id").is_some());
    assert_eq!(
        response.headers.get(header::CONTENT_TYPE).unwrap(),
        "application/json"
    );
}
