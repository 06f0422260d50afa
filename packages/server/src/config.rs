use common::BackendConfig;
use common::storage_path::UploadSuffix;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct CorsConfig {
    pub allow_origins: Vec<String>,
    pub max_age: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors: CorsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LogConfig {
    /// One of trace, debug, info, warn, error.
    pub level: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SessionConfig {
    /// Cookie carrying the access token.
    pub cookie_name: String,
    /// Mark cookies `Secure`. Enable behind HTTPS.
    pub secure: bool,
    pub max_age_secs: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct UploadConfig {
    /// Request body limit for the upload endpoints.
    pub max_body_bytes: usize,
    /// Upper bound on objects enumerated when listing a category.
    pub list_limit: usize,
    pub suffix: UploadSuffix,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub log: LogConfig,
    #[serde(default)]
    pub backend: BackendConfig,
    pub session: SessionConfig,
    pub upload: UploadConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let s = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("server.cors.allow_origins", Vec::<String>::new())?
            .set_default("server.cors.max_age", 3600)?
            .set_default("log.level", "info")?
            .set_default("session.cookie_name", "portal_session")?
            .set_default("session.secure", false)?
            .set_default("session.max_age_secs", 3600)?
            .set_default("upload.max_body_bytes", 50 * 1024 * 1024)?
            .set_default("upload.list_limit", 100)?
            .set_default("upload.suffix", "timestamp")?
            // Load from config/config.toml
            .add_source(File::with_name("config/config").required(false))
            // Override from environment (e.g., PORTAL__BACKEND__ANON_KEY)
            .add_source(Environment::with_prefix("PORTAL").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".into(),
                port: 3000,
                cors: CorsConfig {
                    allow_origins: Vec::new(),
                    max_age: 3600,
                },
            },
            log: LogConfig {
                level: "info".into(),
            },
            backend: BackendConfig::default(),
            session: SessionConfig {
                cookie_name: "portal_session".into(),
                secure: false,
                max_age_secs: 3600,
            },
            upload: UploadConfig {
                max_body_bytes: 50 * 1024 * 1024,
                list_limit: 100,
                suffix: UploadSuffix::default(),
            },
        }
    }
}
