use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{HeaderMap, Method, Request, StatusCode, header},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;
use video_platform_service::infrastructure::http::create_app;
use video_platform_service::infrastructure::persistence::InMemoryStore;
use video_platform_service::infrastructure::storage::{FilesystemStorage, MediaStorage};
use video_platform_service::presentation::handlers::AppState;

use super::fixtures::{MultipartForm, png, test_config, webm};

/// The full router over an in-memory store and a temporary media root
pub struct TestApp {
    pub router: Router,
    pub memory: InMemoryStore,
    _media_root: TempDir,
}

/// A registered, logged-in user
#[derive(Debug, Clone)]
pub struct Session {
    pub id: String,
    pub username: String,
    pub access_token: String,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestResponse {
    async fn new(response: axum::response::Response) -> Self {
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };
        Self { status, headers, body }
    }

    pub fn data(&self) -> &Value {
        &self.body["data"]
    }

    pub fn set_cookies(&self) -> Vec<String> {
        self.headers
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .map(str::to_string)
            .collect()
    }
}

impl TestApp {
    pub fn new() -> Self {
        let media_root = tempfile::tempdir().unwrap();
        let config = test_config(media_root.path());

        let memory = InMemoryStore::new();
        let media: Arc<dyn MediaStorage> = Arc::new(FilesystemStorage::new(
            media_root.path(),
            config.storage.public_base_url.clone(),
            config.storage.max_file_size,
        ));
        let state = AppState::new(memory.store(), media, &config.auth);

        Self { router: create_app(&config, state), memory, _media_root: media_root }
    }

    async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();
        TestResponse::new(response).await
    }

    fn builder(method: Method, path: &str, session: Option<&Session>) -> axum::http::request::Builder {
        let builder = Request::builder().method(method).uri(path);
        match session {
            Some(session) => {
                builder.header(header::AUTHORIZATION, format!("Bearer {}", session.access_token))
            }
            None => builder,
        }
    }

    pub async fn get(&self, path: &str, session: Option<&Session>) -> TestResponse {
        let request = Self::builder(Method::GET, path, session).body(Body::empty()).unwrap();
        self.send(request).await
    }

    pub async fn json(
        &self,
        method: Method,
        path: &str,
        session: Option<&Session>,
        body: &Value,
    ) -> TestResponse {
        let request = Self::builder(method, path, session)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    /// Request without a body, as used by toggles and deletes
    pub async fn empty(&self, method: Method, path: &str, session: Option<&Session>) -> TestResponse {
        let request = Self::builder(method, path, session).body(Body::empty()).unwrap();
        self.send(request).await
    }

    pub async fn multipart(
        &self,
        method: Method,
        path: &str,
        session: Option<&Session>,
        form: MultipartForm,
    ) -> TestResponse {
        let request = Self::builder(method, path, session)
            .header(header::CONTENT_TYPE, MultipartForm::content_type())
            .body(Body::from(form.finish()))
            .unwrap();
        self.send(request).await
    }

    /// Fetch a stored asset through the `/media` file service
    pub async fn fetch_media(&self, url: &str) -> StatusCode {
        let path = url.strip_prefix("http://localhost:8000").unwrap();
        self.get(path, None).await.status
    }

    pub async fn register(&self, username: &str) -> TestResponse {
        let form = MultipartForm::new()
            .text("fullName", &format!("{username} tester"))
            .text("email", &format!("{username}@example.com"))
            .text("username", username)
            .text("password", "correct horse")
            .file("avatar", "avatar.png", "image/png", &png(username));
        self.multipart(Method::POST, "/api/v1/users/register", None, form).await
    }

    pub async fn login(&self, username: &str, password: &str) -> TestResponse {
        let body = json!({"username": username, "password": password});
        self.json(Method::POST, "/api/v1/users/login", None, &body).await
    }

    /// Register and log in `username`
    pub async fn sign_up(&self, username: &str) -> Session {
        let registered = self.register(username).await;
        assert_eq!(registered.status, StatusCode::CREATED, "{}", registered.body);

        let login = self.login(username, "correct horse").await;
        assert_eq!(login.status, StatusCode::OK, "{}", login.body);

        Session {
            id: login.data()["user"]["_id"].as_str().unwrap().to_string(),
            username: username.to_string(),
            access_token: login.data()["accessToken"].as_str().unwrap().to_string(),
        }
    }

    /// Publish a video through the API and return its id
    pub async fn publish_video(&self, session: &Session, title: &str, description: &str) -> String {
        let tag = format!("{}-{title}", session.username);
        let form = MultipartForm::new()
            .text("title", title)
            .text("description", description)
            .file("videoFile", "clip.webm", "video/webm", &webm(&tag))
            .file("thumbnail", "thumb.png", "image/png", &png(&tag));

        let response =
            self.multipart(Method::POST, "/api/v1/videos/publish/video", Some(session), form).await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
        response.data()["_id"].as_str().unwrap().to_string()
    }
}
