use tracing::{error, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use video_platform_service::infrastructure::{
    config::{AppConfig, LogFormat, LoggingConfig},
    http::start_server,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            init_tracing(None);
            error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };
    init_tracing(Some(&config.logging));

    info!("Starting Video Platform Service");
    info!("Configuration loaded: mode={}, storage={}", config.mode, config.storage.base_path);

    if let Err(e) = start_server(config).await {
        error!("Server error: {:#}", e);
        return Err(e);
    }

    Ok(())
}

/// Initialize structured logging.
///
/// Filter precedence: `logging.filter`, then `RUST_LOG`, then `logging.level`.
fn init_tracing(logging: Option<&LoggingConfig>) {
    let level = logging.map_or("info", |l| l.level.as_str());
    let filter = logging
        .and_then(|l| l.filter.as_deref())
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .or_else(|| EnvFilter::try_from_default_env().ok())
        .unwrap_or_else(|| {
            EnvFilter::new(format!("video_platform_service={level},tower_http={level}"))
        });

    let registry = tracing_subscriber::registry().with(filter);
    match logging.map_or(LogFormat::Pretty, |l| l.format) {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Compact => registry.with(tracing_subscriber::fmt::layer().compact()).init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer().pretty()).init(),
    }
}
