use std::path::Path;

use video_platform_service::infrastructure::config::{
    AppConfig, AuthConfig, DatabaseConfig, LogFormat, LoggingConfig, RuntimeMode, ServerConfig,
    StorageConfig,
};

pub const BOUNDARY: &str = "video-platform-test-boundary";

/// Smallest byte string detected as a PNG image
pub const PNG: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];

pub fn test_config(media_root: &Path) -> AppConfig {
    AppConfig {
        mode: RuntimeMode::Local,
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            max_upload_size: 5_000_000,
            cors_origin: "*".to_string(),
        },
        database: DatabaseConfig {
            url: String::new(),
            max_connections: 1,
            min_connections: 1,
            acquire_timeout_seconds: 1,
            host: "localhost".to_string(),
            port: 5432,
            database: "unused".to_string(),
            user: "unused".to_string(),
            password: String::new(),
            run_migrations: false,
        },
        storage: StorageConfig {
            base_path: media_root.display().to_string(),
            public_base_url: "http://localhost:8000/media".to_string(),
            max_file_size: 1_000_000,
        },
        auth: AuthConfig {
            access_token_secret: "integration-access-secret".to_string(),
            access_token_ttl_minutes: 15,
            refresh_token_secret: "integration-refresh-secret".to_string(),
            refresh_token_ttl_days: 1,
            secure_cookies: false,
        },
        logging: LoggingConfig {
            level: "debug".to_string(),
            filter: None,
            format: LogFormat::Compact,
        },
    }
}

/// WebM magic followed by `tag`, so each fixture video stores as a distinct file
pub fn webm(tag: &str) -> Vec<u8> {
    let mut bytes = vec![0x1A, 0x45, 0xDF, 0xA3];
    bytes.extend_from_slice(tag.as_bytes());
    bytes
}

/// PNG magic plus a distinguishing tail
pub fn png(tag: &str) -> Vec<u8> {
    let mut bytes = PNG.to_vec();
    bytes.extend_from_slice(tag.as_bytes());
    bytes
}

/// Hand-built `multipart/form-data` body
#[derive(Debug, Default)]
pub struct MultipartForm {
    body: Vec<u8>,
}

impl MultipartForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
        self
    }

    pub fn file(mut self, name: &str, file_name: &str, content_type: &str, bytes: &[u8]) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; \
                 filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(bytes);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    pub fn content_type() -> String {
        format!("multipart/form-data; boundary={BOUNDARY}")
    }

    pub fn finish(mut self) -> Vec<u8> {
        self.body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        self.body
    }
}
