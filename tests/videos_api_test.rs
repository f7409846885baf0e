mod common;

use axum::http::{Method, StatusCode};
use common::{MultipartForm, TestApp, png, webm};

#[tokio::test]
async fn test_search_without_query_is_rejected() {
    let app = TestApp::new();

    for path in ["/api/v1/videos", "/api/v1/videos?query=", "/api/v1/videos?query=%3F%21"] {
        let response = app.get(path, None).await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST, "{path}");
        assert_eq!(response.body["success"], false);
    }
}

#[tokio::test]
async fn test_search_rejects_unknown_sort_field() {
    let app = TestApp::new();

    let response = app.get("/api/v1/videos?query=rust&sortBy=password", None).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_search_ranks_and_paginates_published_videos() {
    let app = TestApp::new();
    let alice = app.sign_up("alice").await;
    app.publish_video(&alice, "Rust async", "tokio and rust in practice").await;
    app.publish_video(&alice, "Cooking", "pasta night").await;
    let hidden = app.publish_video(&alice, "Rust secrets", "unlisted rust").await;
    let toggled =
        app.empty(Method::PATCH, &format!("/api/v1/videos/toggle/publish/{hidden}"), Some(&alice)).await;
    assert_eq!(toggled.data()["isPublished"], false);

    let response = app.get("/api/v1/videos?query=rust%20tokio&limit=10", None).await;

    assert_eq!(response.status, StatusCode::OK, "{}", response.body);
    let page = response.data();
    assert_eq!(page["totalDocs"], 1);
    assert_eq!(page["docs"][0]["title"], "Rust async");
    assert_eq!(page["docs"][0]["owner"]["username"], "alice");
    assert!(page["docs"][0].get("password").is_none());

    let beyond = app.get("/api/v1/videos?query=rust&page=9&limit=10", None).await;
    assert_eq!(beyond.status, StatusCode::OK);
    assert_eq!(beyond.data()["docs"].as_array().unwrap().len(), 0);
    assert_eq!(beyond.data()["hasNextPage"], false);
}

#[tokio::test]
async fn test_unpublished_video_hidden_from_others() {
    let app = TestApp::new();
    let alice = app.sign_up("alice").await;
    let bob = app.sign_up("bob").await;
    let video = app.publish_video(&alice, "Draft", "not yet").await;
    app.empty(Method::PATCH, &format!("/api/v1/videos/toggle/publish/{video}"), Some(&alice)).await;

    let owner_view = app.get(&format!("/api/v1/videos/v/{video}"), Some(&alice)).await;
    assert_eq!(owner_view.status, StatusCode::OK);
    assert_eq!(owner_view.data()["owner"]["username"], "alice");

    let other_view = app.get(&format!("/api/v1/videos/v/{video}"), Some(&bob)).await;
    assert_eq!(other_view.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_non_owner_cannot_modify_video() {
    let app = TestApp::new();
    let alice = app.sign_up("alice").await;
    let mallory = app.sign_up("mallory").await;
    let video = app.publish_video(&alice, "Original", "by alice").await;

    let form = MultipartForm::new().text("title", "Stolen");
    let update = app
        .multipart(Method::PATCH, &format!("/api/v1/videos/update/video/{video}"), Some(&mallory), form)
        .await;
    assert_eq!(update.status, StatusCode::FORBIDDEN);

    let delete = app.empty(Method::DELETE, &format!("/api/v1/videos/del/video/{video}"), Some(&mallory)).await;
    assert_eq!(delete.status, StatusCode::FORBIDDEN);

    let toggle = app
        .empty(Method::PATCH, &format!("/api/v1/videos/toggle/publish/{video}"), Some(&mallory))
        .await;
    assert_eq!(toggle.status, StatusCode::FORBIDDEN);

    let detail = app.get(&format!("/api/v1/videos/v/{video}"), Some(&alice)).await;
    assert_eq!(detail.data()["title"], "Original");
    assert_eq!(detail.data()["isPublished"], true);
}

#[tokio::test]
async fn test_owner_updates_and_deletes_video() {
    let app = TestApp::new();
    let alice = app.sign_up("alice").await;
    let video = app.publish_video(&alice, "Original", "by alice").await;

    let form = MultipartForm::new()
        .text("title", "Renamed")
        .file("thumbnail", "new.png", "image/png", &png("fresh-thumbnail"));
    let update = app
        .multipart(Method::PATCH, &format!("/api/v1/videos/update/video/{video}"), Some(&alice), form)
        .await;
    assert_eq!(update.status, StatusCode::OK, "{}", update.body);
    assert_eq!(update.data()["title"], "Renamed");
    assert_eq!(update.data()["description"], "by alice");

    let delete = app.empty(Method::DELETE, &format!("/api/v1/videos/del/video/{video}"), Some(&alice)).await;
    assert_eq!(delete.status, StatusCode::OK);

    let gone = app.get(&format!("/api/v1/videos/v/{video}"), Some(&alice)).await;
    assert_eq!(gone.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_publish_rejects_image_as_video_file() {
    let app = TestApp::new();
    let alice = app.sign_up("alice").await;
    let form = MultipartForm::new()
        .text("title", "Fake")
        .text("description", "an image pretending")
        .file("videoFile", "clip.mp4", "video/mp4", &png("not-a-video"))
        .file("thumbnail", "thumb.png", "image/png", &png("thumb"));

    let response =
        app.multipart(Method::POST, "/api/v1/videos/publish/video", Some(&alice), form).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_malformed_id_is_rejected_before_store_access() {
    let app = TestApp::new();
    let alice = app.sign_up("alice").await;
    let before = app.memory.operation_count();

    let response = app.get("/api/v1/videos/v/not-an-object-id", Some(&alice)).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["success"], false);
    assert_eq!(app.memory.operation_count(), before);
}

#[tokio::test]
async fn test_unknown_route_renders_not_found_envelope() {
    let app = TestApp::new();

    let response = app.get("/api/v1/nothing-here", None).await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["statusCode"], 404);
    assert_eq!(response.body["success"], false);
}

#[tokio::test]
async fn test_search_without_matches_reports_no_videos() {
    let app = TestApp::new();
    let alice = app.sign_up("alice").await;
    app.publish_video(&alice, "Rust async", "tokio in practice").await;

    let empty = app.get("/api/v1/videos?query=nothingmatches", None).await;
    assert_eq!(empty.status, StatusCode::OK);
    assert_eq!(empty.body["message"], "No videos found");
    assert_eq!(empty.data()["totalDocs"], 0);

    let found = app.get("/api/v1/videos?query=rust", None).await;
    assert_eq!(found.body["message"], "Videos fetched successfully");
}

#[tokio::test]
async fn test_deleting_video_keeps_identical_upload_of_another() {
    let app = TestApp::new();
    let alice = app.sign_up("alice").await;
    let bob = app.sign_up("bob").await;
    let form = || {
        MultipartForm::new()
            .text("title", "Same clip")
            .text("description", "uploaded twice")
            .file("videoFile", "clip.webm", "video/webm", &webm("shared"))
            .file("thumbnail", "thumb.png", "image/png", &png("shared"))
    };

    let first = app.multipart(Method::POST, "/api/v1/videos/publish/video", Some(&alice), form()).await;
    let second = app.multipart(Method::POST, "/api/v1/videos/publish/video", Some(&bob), form()).await;
    assert_eq!(first.status, StatusCode::CREATED, "{}", first.body);
    assert_eq!(second.status, StatusCode::CREATED, "{}", second.body);
    let first_id = first.data()["_id"].as_str().unwrap();

    let deleted =
        app.empty(Method::DELETE, &format!("/api/v1/videos/del/video/{first_id}"), Some(&alice)).await;
    assert_eq!(deleted.status, StatusCode::OK);

    for field in ["videoFile", "thumbnail"] {
        let gone = first.data()[field].as_str().unwrap();
        let kept = second.data()[field].as_str().unwrap();
        assert_eq!(app.fetch_media(gone).await, StatusCode::NOT_FOUND, "{field}");
        assert_eq!(app.fetch_media(kept).await, StatusCode::OK, "{field}");
    }
}
