mod common;

use axum::http::{Method, StatusCode};
use common::TestApp;
use serde_json::json;

#[tokio::test]
async fn test_toggle_video_like_twice_restores_state() {
    let app = TestApp::new();
    let alice = app.sign_up("alice").await;
    let video = app.publish_video(&alice, "Intro", "first upload").await;
    let path = format!("/api/v1/likes/toggle/v/{video}");

    let liked = app.empty(Method::POST, &path, Some(&alice)).await;
    assert_eq!(liked.status, StatusCode::OK, "{}", liked.body);
    assert!(liked.data()["_id"].is_string());
    let listed = app.get("/api/v1/likes/videos", Some(&alice)).await;
    assert_eq!(listed.data().as_array().unwrap().len(), 1);
    assert_eq!(listed.data()[0]["video"]["title"], "Intro");

    let unliked = app.empty(Method::POST, &path, Some(&alice)).await;
    assert_eq!(unliked.status, StatusCode::OK);
    assert_eq!(unliked.data(), &json!({}));
    let listed = app.get("/api/v1/likes/videos", Some(&alice)).await;
    assert!(listed.data().as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_like_on_missing_target_is_not_found() {
    let app = TestApp::new();
    let alice = app.sign_up("alice").await;
    let missing = "64b7f0c2a1b2c3d4e5f60718";

    for kind in ["v", "c", "p"] {
        let response =
            app.empty(Method::POST, &format!("/api/v1/likes/toggle/{kind}/{missing}"), Some(&alice)).await;
        assert_eq!(response.status, StatusCode::NOT_FOUND, "{kind}");
    }
}

#[tokio::test]
async fn test_comment_lifecycle_and_ownership() {
    let app = TestApp::new();
    let alice = app.sign_up("alice").await;
    let mallory = app.sign_up("mallory").await;
    let video = app.publish_video(&alice, "Intro", "first upload").await;

    let added = app
        .json(Method::POST, &format!("/api/v1/comments/{video}"), Some(&alice), &json!({"content": "hello"}))
        .await;
    assert_eq!(added.status, StatusCode::CREATED, "{}", added.body);
    let comment = added.data()["_id"].as_str().unwrap().to_string();

    let blank = app
        .json(Method::POST, &format!("/api/v1/comments/{video}"), Some(&alice), &json!({"content": "  "}))
        .await;
    assert_eq!(blank.status, StatusCode::BAD_REQUEST);

    let hijack = app
        .json(Method::PATCH, &format!("/api/v1/comments/{comment}"), Some(&mallory), &json!({"content": "pwned"}))
        .await;
    assert_eq!(hijack.status, StatusCode::FORBIDDEN);

    let listed = app.get(&format!("/api/v1/comments/{video}?page=1&limit=5"), Some(&mallory)).await;
    assert_eq!(listed.status, StatusCode::OK);
    assert_eq!(listed.data()["totalDocs"], 1);
    assert_eq!(listed.data()["docs"][0]["content"], "hello");
    assert_eq!(listed.data()["docs"][0]["owner"]["username"], "alice");

    let liked = app.empty(Method::POST, &format!("/api/v1/likes/toggle/c/{comment}"), Some(&mallory)).await;
    assert_eq!(liked.status, StatusCode::OK);
    assert_eq!(liked.data()["target"], json!({"kind": "comment", "id": comment}));

    let deleted = app.empty(Method::DELETE, &format!("/api/v1/comments/{comment}"), Some(&alice)).await;
    assert_eq!(deleted.status, StatusCode::OK);
    let listed = app.get(&format!("/api/v1/comments/{video}"), Some(&alice)).await;
    assert_eq!(listed.data()["totalDocs"], 0);
}

#[tokio::test]
async fn test_comment_page_limit_zero_is_rejected() {
    let app = TestApp::new();
    let alice = app.sign_up("alice").await;
    let video = app.publish_video(&alice, "Intro", "first upload").await;

    let response = app.get(&format!("/api/v1/comments/{video}?limit=0"), Some(&alice)).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_self_subscription_is_rejected() {
    let app = TestApp::new();
    let alice = app.sign_up("alice").await;

    let response =
        app.empty(Method::POST, &format!("/api/v1/subscriptions/ch/{}", alice.id), Some(&alice)).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    let subscribers = app.get(&format!("/api/v1/subscriptions/ch/{}", alice.id), Some(&alice)).await;
    assert!(subscribers.data().as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_subscription_toggle_and_lists() {
    let app = TestApp::new();
    let alice = app.sign_up("alice").await;
    let bob = app.sign_up("bob").await;
    let channel = format!("/api/v1/subscriptions/ch/{}", alice.id);

    let subscribed = app.empty(Method::POST, &channel, Some(&bob)).await;
    assert_eq!(subscribed.status, StatusCode::OK, "{}", subscribed.body);

    let subscribers = app.get(&channel, Some(&alice)).await;
    assert_eq!(subscribers.data()[0]["user"]["username"], "bob");

    let following = app.get(&format!("/api/v1/subscriptions/u/{}", bob.id), Some(&bob)).await;
    assert_eq!(following.data()[0]["user"]["username"], "alice");

    let snooping = app.get(&channel, Some(&bob)).await;
    assert_eq!(snooping.status, StatusCode::FORBIDDEN);

    let unsubscribed = app.empty(Method::POST, &channel, Some(&bob)).await;
    assert_eq!(unsubscribed.data(), &json!({}));
}

#[tokio::test]
async fn test_playlist_rejects_duplicate_video() {
    let app = TestApp::new();
    let alice = app.sign_up("alice").await;
    let video = app.publish_video(&alice, "Intro", "first upload").await;

    let created = app
        .json(Method::POST, "/api/v1/playlists", Some(&alice), &json!({"name": "Mix", "description": "songs"}))
        .await;
    assert_eq!(created.status, StatusCode::CREATED, "{}", created.body);
    let playlist = created.data()["_id"].as_str().unwrap().to_string();
    let add = format!("/api/v1/playlists/add/{video}/{playlist}");

    let first = app.empty(Method::PATCH, &add, Some(&alice)).await;
    assert_eq!(first.status, StatusCode::OK, "{}", first.body);

    let second = app.empty(Method::PATCH, &add, Some(&alice)).await;
    assert_eq!(second.status, StatusCode::BAD_REQUEST);

    let detail = app.get(&format!("/api/v1/playlists/{playlist}"), Some(&alice)).await;
    assert_eq!(detail.data()["videos"].as_array().unwrap().len(), 1);
    assert_eq!(detail.data()["videos"][0]["title"], "Intro");
}

#[tokio::test]
async fn test_private_playlist_visible_to_owner_only() {
    let app = TestApp::new();
    let alice = app.sign_up("alice").await;
    let bob = app.sign_up("bob").await;

    let created = app
        .json(Method::POST, "/api/v1/playlists", Some(&alice), &json!({"name": "Secret", "isPrivate": true}))
        .await;
    let playlist = created.data()["_id"].as_str().unwrap().to_string();

    let as_bob = app.get(&format!("/api/v1/playlists/{playlist}"), Some(&bob)).await;
    assert_eq!(as_bob.status, StatusCode::NOT_FOUND);
    let listed = app.get(&format!("/api/v1/playlists/user/{}", alice.id), Some(&bob)).await;
    assert!(listed.data().as_array().unwrap().is_empty());

    let listed = app.get(&format!("/api/v1/playlists/user/{}", alice.id), Some(&alice)).await;
    assert_eq!(listed.data().as_array().unwrap().len(), 1);

    let renamed = app
        .json(Method::PATCH, &format!("/api/v1/playlists/{playlist}"), Some(&alice), &json!({"isPrivate": false}))
        .await;
    assert_eq!(renamed.status, StatusCode::OK);
    let as_bob = app.get(&format!("/api/v1/playlists/{playlist}"), Some(&bob)).await;
    assert_eq!(as_bob.status, StatusCode::OK);

    let delete = app.empty(Method::DELETE, &format!("/api/v1/playlists/{playlist}"), Some(&bob)).await;
    assert_eq!(delete.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_community_posts_crud() {
    let app = TestApp::new();
    let alice = app.sign_up("alice").await;
    let mallory = app.sign_up("mallory").await;

    let created = app
        .json(Method::POST, "/api/v1/community-posts", Some(&alice), &json!({"content": "new video soon"}))
        .await;
    assert_eq!(created.status, StatusCode::CREATED, "{}", created.body);
    let post = created.data()["_id"].as_str().unwrap().to_string();

    let listed = app.get(&format!("/api/v1/community-posts/user/{}", alice.id), Some(&mallory)).await;
    assert_eq!(listed.data()[0]["content"], "new video soon");

    let edit = app
        .json(Method::PATCH, &format!("/api/v1/community-posts/{post}"), Some(&mallory), &json!({"content": "spam"}))
        .await;
    assert_eq!(edit.status, StatusCode::FORBIDDEN);

    let liked = app.empty(Method::POST, &format!("/api/v1/likes/toggle/p/{post}"), Some(&mallory)).await;
    assert_eq!(liked.status, StatusCode::OK);

    let deleted = app.empty(Method::DELETE, &format!("/api/v1/community-posts/{post}"), Some(&alice)).await;
    assert_eq!(deleted.status, StatusCode::OK);
    let listed = app.get(&format!("/api/v1/community-posts/user/{}", alice.id), Some(&alice)).await;
    assert!(listed.data().as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_empty_listings_report_no_results() {
    let app = TestApp::new();
    let alice = app.sign_up("alice").await;
    let video = app.publish_video(&alice, "Intro", "first upload").await;

    let cases = [
        (format!("/api/v1/subscriptions/ch/{}", alice.id), "No subscribers found"),
        (format!("/api/v1/subscriptions/u/{}", alice.id), "No subscribed channels found"),
        ("/api/v1/likes/videos".to_string(), "User has no liked videos"),
        (format!("/api/v1/comments/{video}"), "No comments found"),
        (format!("/api/v1/playlists/user/{}", alice.id), "User has no playlists"),
        (format!("/api/v1/community-posts/user/{}", alice.id), "User has no community posts"),
    ];

    for (path, message) in cases {
        let response = app.get(&path, Some(&alice)).await;
        assert_eq!(response.status, StatusCode::OK, "{path}");
        assert_eq!(response.body["message"], message, "{path}");
        assert_eq!(response.body["success"], true, "{path}");
    }
}

#[tokio::test]
async fn test_non_empty_listing_reports_fetched() {
    let app = TestApp::new();
    let alice = app.sign_up("alice").await;
    let bob = app.sign_up("bob").await;
    let channel = format!("/api/v1/subscriptions/ch/{}", alice.id);
    app.empty(Method::POST, &channel, Some(&bob)).await;

    let subscribers = app.get(&channel, Some(&alice)).await;

    assert_eq!(subscribers.body["message"], "Subscribers fetched successfully");
}
