use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

/// Runtime mode for the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeMode {
    Local,
    Production,
}

impl std::fmt::Display for RuntimeMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Local => write!(f, "local"),
            Self::Production => write!(f, "production"),
        }
    }
}

impl std::str::FromStr for RuntimeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" | "prod" => Ok(Self::Production),
            _ => Err(format!("Invalid runtime mode: {s}. Valid values: local, production")),
        }
    }
}

const ENV_PREFIX: &str = "VIDEO_PLATFORM";

/// Unprefixed variables accepted for common settings, with the key each one sets
const BARE_VARIABLES: &[(&str, &str)] = &[
    ("PORT", "server.port"),
    ("CORS_ORIGIN", "server.cors_origin"),
    ("DATABASE_URL", "database.url"),
    ("ACCESS_TOKEN_SECRET", "auth.access_token_secret"),
    ("REFRESH_TOKEN_SECRET", "auth.refresh_token_secret"),
    ("MEDIA_ROOT", "storage.base_path"),
    ("MEDIA_PUBLIC_URL", "storage.public_base_url"),
];

/// Settings taken from bare variables; a `VIDEO_PLATFORM__` variable for the same key wins
fn bare_overrides(lookup: impl Fn(&str) -> Option<String>) -> Vec<(&'static str, String)> {
    BARE_VARIABLES
        .iter()
        .filter(|(_, key)| {
            let prefixed = format!("{ENV_PREFIX}__{}", key.replace('.', "__").to_uppercase());
            lookup(&prefixed).is_none()
        })
        .filter_map(|&(name, key)| lookup(name).map(|value| (key, value)))
        .collect()
}

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub mode: RuntimeMode,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub storage: StorageConfig,
    pub auth: AuthConfig,
    pub logging: LoggingConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_upload_size: u64, // bytes
    pub cors_origin: String,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_seconds: u64,
    pub host: String,
    pub port: u16,
    pub database: String,
    pub user: String,
    pub password: String,
    pub run_migrations: bool,
}

/// Media storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub base_path: String,
    pub public_base_url: String,
    pub max_file_size: u64, // bytes
}

/// Session token configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    pub access_token_secret: String,
    pub access_token_ttl_minutes: i64,
    pub refresh_token_secret: String,
    pub refresh_token_ttl_days: i64,
    pub secure_cookies: bool,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("access_token_secret", &"<redacted>")
            .field("access_token_ttl_minutes", &self.access_token_ttl_minutes)
            .field("refresh_token_secret", &"<redacted>")
            .field("refresh_token_ttl_days", &self.refresh_token_ttl_days)
            .field("secure_cookies", &self.secure_cookies)
            .finish()
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub filter: Option<String>,
    pub format: LogFormat,
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
    Compact,
}

impl AppConfig {
    /// Load configuration based on runtime mode
    ///
    /// # Errors
    /// Returns an error if required environment variables are missing or invalid
    pub fn load() -> Result<Self, config::ConfigError> {
        let mode = std::env::var("RUN_MODE")
            .unwrap_or_else(|_| "local".to_string())
            .parse::<RuntimeMode>()
            .map_err(config::ConfigError::Message)?;

        Self::load_for_mode(mode)
    }

    /// Load configuration for a specific runtime mode
    ///
    /// # Errors
    /// Returns an error if required environment variables are missing or invalid
    pub fn load_for_mode(mode: RuntimeMode) -> Result<Self, config::ConfigError> {
        // Local overrides land in the process environment before it is read
        if mode == RuntimeMode::Local {
            dotenvy::from_filename(".env.local").ok();
        }

        // VIDEO_PLATFORM__SERVER__PORT=8000 -> server.port
        let mut builder = config::Config::builder().add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );
        for (key, value) in bare_overrides(|name| std::env::var(name).ok()) {
            builder = builder.set_override(key, value)?;
        }

        let (storage_base, log_format, secure_cookies) = match mode {
            RuntimeMode::Local => ("./media", "pretty", false),
            RuntimeMode::Production => ("/app/media", "json", true),
        };

        let settings = builder
            .set_default("mode", mode.to_string())?
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8000)?
            .set_default("server.max_upload_size", 200_000_000)? // 200MB
            .set_default("server.cors_origin", "*")?
            .set_default("database.url", "")?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 1)?
            .set_default("database.acquire_timeout_seconds", 30)?
            .set_default("database.host", "localhost")?
            .set_default("database.port", 5432)?
            .set_default("database.database", "video_platform")?
            .set_default("database.user", "postgres")?
            .set_default("database.password", "")?
            .set_default("database.run_migrations", true)?
            .set_default("storage.base_path", storage_base)?
            .set_default("storage.public_base_url", "http://localhost:8000/media")?
            .set_default("storage.max_file_size", 200_000_000)?
            .set_default("auth.access_token_secret", "")?
            .set_default("auth.access_token_ttl_minutes", 60 * 24)?
            .set_default("auth.refresh_token_secret", "")?
            .set_default("auth.refresh_token_ttl_days", 10)?
            .set_default("auth.secure_cookies", secure_cookies)?
            .set_default("logging.level", "info")?
            .set_default("logging.filter", None::<String>)?
            .set_default("logging.format", log_format)?
            .build()?;

        let config: Self = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the service cannot run with
    ///
    /// # Errors
    /// Returns an error naming the first invalid setting
    pub fn validate(&self) -> Result<(), config::ConfigError> {
        if self.auth.access_token_secret.is_empty() || self.auth.refresh_token_secret.is_empty() {
            return Err(config::ConfigError::Message(
                "auth.access_token_secret and auth.refresh_token_secret must be set".to_string(),
            ));
        }
        if self.auth.access_token_secret == self.auth.refresh_token_secret {
            return Err(config::ConfigError::Message(
                "access and refresh tokens must use different secrets".to_string(),
            ));
        }
        if self.auth.access_token_ttl_minutes <= 0 || self.auth.refresh_token_ttl_days <= 0 {
            return Err(config::ConfigError::Message("token lifetimes must be positive".to_string()));
        }
        if self.database.min_connections > self.database.max_connections {
            return Err(config::ConfigError::Message(
                "database.min_connections exceeds database.max_connections".to_string(),
            ));
        }
        self.server.socket_addr().map(|_| ())
    }
}

impl ServerConfig {
    /// Get the socket address for binding
    ///
    /// # Errors
    /// Returns an error if host and port do not form a valid socket address
    pub fn socket_addr(&self) -> Result<SocketAddr, config::ConfigError> {
        format!("{}:{}", self.host, self.port).parse().map_err(|e| {
            config::ConfigError::Message(format!(
                "Invalid host/port configuration {}:{}: {e}",
                self.host, self.port
            ))
        })
    }
}

impl DatabaseConfig {
    /// Get the `PostgreSQL` connection URL
    ///
    /// If url is provided, use it directly. Otherwise, construct from components.
    #[must_use]
    pub fn connection_url(&self) -> String {
        if self.url.is_empty() {
            format!(
                "postgres://{}:{}@{}:{}/{}",
                self.user, self.password, self.host, self.port, self.database
            )
        } else {
            self.url.clone()
        }
    }
}
