use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method, header},
};
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer,
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    services::ServeDir,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::{info, warn};

use crate::domain::repositories::Store;
use crate::infrastructure::config::{AppConfig, RuntimeMode};
use crate::infrastructure::persistence::{Database, InMemoryStore, postgres_store};
use crate::infrastructure::storage::{FilesystemStorage, MediaStorage};
use crate::presentation::handlers::AppState;
use crate::presentation::middleware::error::{handle_panic, route_not_found};
use crate::presentation::middleware::request_id::{REQUEST_ID_HEADER, RequestUuid, request_span};
use crate::presentation::routes;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Create the main application router
pub fn create_app(config: &AppConfig, state: AppState) -> Router {
    let middleware_stack = ServiceBuilder::new()
        .layer(SetRequestIdLayer::new(REQUEST_ID_HEADER, RequestUuid))
        .layer(TraceLayer::new_for_http().make_span_with(request_span))
        .layer(PropagateRequestIdLayer::new(REQUEST_ID_HEADER))
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
        .layer(create_cors_layer(&config.server.cors_origin))
        .layer(DefaultBodyLimit::max(
            usize::try_from(config.server.max_upload_size).unwrap_or(usize::MAX),
        ));

    Router::new()
        .merge(routes::create_routes(state))
        .nest_service("/media", ServeDir::new(&config.storage.base_path))
        .fallback(route_not_found)
        .layer(middleware_stack)
}

/// `*` allows any origin without credentials; a comma-separated list
/// allows those origins with cookies
fn create_cors_layer(origins: &str) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .max_age(Duration::from_secs(3600));

    if origins.trim() == "*" {
        return layer.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    layer.allow_origin(AllowOrigin::list(allowed)).allow_credentials(true)
}

/// Connect the configured database; local mode falls back to an in-memory store
async fn open_store(config: &AppConfig) -> anyhow::Result<(Store, Option<Database>)> {
    match Database::new(&config.database).await {
        Ok(database) => {
            if config.database.run_migrations {
                database.migrate().await?;
            }
            Ok((postgres_store(&database), Some(database)))
        }
        Err(e) if config.mode == RuntimeMode::Local => {
            warn!("Failed to connect to database: {e:#}");
            info!("Starting with an in-memory store; data will not survive a restart");
            Ok((InMemoryStore::new().store(), None))
        }
        Err(e) => Err(e),
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("Shutdown signal received");
}

/// Start the HTTP server
///
/// # Errors
/// Returns an error if the store cannot be opened or the server fails to start
pub async fn start_server(config: AppConfig) -> anyhow::Result<()> {
    let (store, database) = open_store(&config).await?;

    tokio::fs::create_dir_all(&config.storage.base_path)
        .await
        .with_context(|| format!("failed to create media root {}", config.storage.base_path))?;
    let media: Arc<dyn MediaStorage> = Arc::new(FilesystemStorage::new(
        &config.storage.base_path,
        &config.storage.public_base_url,
        config.storage.max_file_size,
    ));

    let state = AppState::new(store, media, &config.auth);
    let app = create_app(&config, state);
    let addr = config.server.socket_addr()?;

    info!("Starting server on {} ({} mode)", addr, config.mode);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;

    if let Some(database) = database {
        database.close().await;
    }
    info!("Server stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::config::tests::test_config;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use http_body_util::BodyExt;
    use serde_json::Value;
    use tower::ServiceExt;

    fn app() -> (Router, tempfile::TempDir) {
        let root = tempfile::tempdir().unwrap();
        let mut config = test_config();
        config.storage.base_path = root.path().display().to_string();

        let media: Arc<dyn MediaStorage> = Arc::new(FilesystemStorage::new(
            root.path(),
            &config.storage.public_base_url,
            config.storage.max_file_size,
        ));
        let state = AppState::new(InMemoryStore::new().store(), media, &config.auth);
        (create_app(&config, state), root)
    }

    async fn read_json(response: axum::response::Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_and_ready() {
        let (app, _root) = app();

        let health = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let response = app.clone().oneshot(health).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let ready = Request::builder().uri("/ready").body(Body::empty()).unwrap();
        let response = app.oneshot(ready).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = read_json(response).await;
        assert_eq!(body["checks"]["database"], "ok");
        assert_eq!(body["checks"]["storage"], "ok");
    }

    #[tokio::test]
    async fn test_unknown_route_uses_failure_envelope() {
        let (app, _root) = app();

        let request = Request::builder().uri("/non-existent-route").body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(response.headers().get("x-request-id").is_some());
        let body = read_json(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["statusCode"], 404);
    }

    #[tokio::test]
    async fn test_failure_echoes_client_request_id_once() {
        let (app, _root) = app();

        let request = Request::builder()
            .uri("/api/v1/missing")
            .header("x-request-id", "client-42")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let ids: Vec<&str> =
            response.headers().get_all("x-request-id").iter().map(|v| v.to_str().unwrap()).collect();
        assert_eq!(ids, ["client-42"]);
    }

    #[tokio::test]
    async fn test_protected_route_without_session_is_unauthorized() {
        let (app, _root) = app();

        let request =
            Request::builder().uri("/api/v1/users/current-user").body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(read_json(response).await["success"], false);
    }

    #[test]
    fn test_cors_layer_accepts_origin_lists() {
        drop(create_cors_layer("*"));
        drop(create_cors_layer("http://localhost:3000, not a header\n"));
    }
}
