//! Application settings.
//!
//! `Settings` is built once at process start (see `main.rs` and `bin/seed.rs`)
//! and handed to every collaborator that needs it, either as `web::Data<Settings>`
//! or as a plain `&Settings` argument. Nothing in the crate reads the environment
//! after start-up.

use jsonwebtoken::Algorithm;
use std::env;
use std::fmt;
use std::str::FromStr;

/// Errors raised while building `Settings` from the environment.
#[derive(Debug)]
pub enum ConfigError {
    /// A required variable is not set.
    Missing(&'static str),
    /// A variable is set but its value cannot be used.
    Invalid { key: &'static str, message: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "{} must be set", key),
            ConfigError::Invalid { key, message } => write!(f, "Invalid {}: {}", key, message),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Clone)]
pub struct Settings {
    pub project_name: String,
    pub version: String,
    /// Prefix for every versioned route, e.g. `/api/v1`.
    pub api_v1_str: String,

    pub secret_key: String,
    /// Signing algorithm for issued and accepted tokens. Only HMAC variants are allowed.
    pub algorithm: Algorithm,
    pub access_token_expire_minutes: i64,
    pub refresh_token_expire_days: i64,

    pub database_url: String,
    pub test_database_url: String,

    pub backend_cors_origins: Vec<String>,

    /// Default filter for `env_logger` when `RUST_LOG` is not set.
    pub log_level: String,

    pub server_host: String,
    pub server_port: u16,
}

impl Settings {
    /// Settings with every default applied and the given signing secret.
    pub fn new(secret_key: impl Into<String>) -> Self {
        Self {
            project_name: "TaskFlow".to_string(),
            version: "1.0.0".to_string(),
            api_v1_str: "/api/v1".to_string(),
            secret_key: secret_key.into(),
            algorithm: Algorithm::HS256,
            access_token_expire_minutes: 30,
            refresh_token_expire_days: 7,
            database_url: "sqlite://taskflow.db".to_string(),
            test_database_url: "sqlite://test.db".to_string(),
            backend_cors_origins: vec!["http://localhost:3000".to_string()],
            log_level: "INFO".to_string(),
            server_host: "127.0.0.1".to_string(),
            server_port: 8000,
        }
    }

    /// Loads settings from the process environment, reading `.env` first if present.
    ///
    /// `SECRET_KEY` is required; every other variable falls back to its default.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();

        let secret_key = env::var("SECRET_KEY").map_err(|_| ConfigError::Missing("SECRET_KEY"))?;
        let mut settings = Settings::new(secret_key);

        if let Ok(value) = env::var("PROJECT_NAME") {
            settings.project_name = value;
        }
        if let Ok(value) = env::var("VERSION") {
            settings.version = value;
        }
        if let Ok(value) = env::var("API_V1_STR") {
            settings.api_v1_str = value;
        }
        if let Ok(value) = env::var("ALGORITHM") {
            settings.algorithm = parse_algorithm(&value)?;
        }
        if let Ok(value) = env::var("ACCESS_TOKEN_EXPIRE_MINUTES") {
            settings.access_token_expire_minutes = parse_number("ACCESS_TOKEN_EXPIRE_MINUTES", &value)?;
        }
        if let Ok(value) = env::var("REFRESH_TOKEN_EXPIRE_DAYS") {
            settings.refresh_token_expire_days = parse_number("REFRESH_TOKEN_EXPIRE_DAYS", &value)?;
        }
        if let Ok(value) = env::var("DATABASE_URL") {
            settings.database_url = value;
        }
        if let Ok(value) = env::var("TEST_DATABASE_URL") {
            settings.test_database_url = value;
        }
        if let Ok(value) = env::var("BACKEND_CORS_ORIGINS") {
            settings.backend_cors_origins = parse_cors_origins(&value)?;
        }
        if let Ok(value) = env::var("LOG_LEVEL") {
            settings.log_level = value;
        }
        if let Ok(value) = env::var("SERVER_HOST") {
            settings.server_host = value;
        }
        if let Ok(value) = env::var("SERVER_PORT") {
            settings.server_port = parse_number("SERVER_PORT", &value)?;
        }

        Ok(settings)
    }

    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.server_host, self.server_port)
    }

    /// The `env_logger` filter derived from `LOG_LEVEL` (`"INFO"` becomes `"info"`).
    pub fn log_filter(&self) -> String {
        self.log_level.to_lowercase()
    }
}

/// Accepts either a JSON array (`["http://a", "http://b"]`) or a comma-separated list.
pub fn parse_cors_origins(raw: &str) -> Result<Vec<String>, ConfigError> {
    let trimmed = raw.trim();
    if trimmed.starts_with('[') {
        return serde_json::from_str(trimmed).map_err(|e| ConfigError::Invalid {
            key: "BACKEND_CORS_ORIGINS",
            message: e.to_string(),
        });
    }
    Ok(trimmed
        .split(',')
        .map(|origin| origin.trim().to_string())
        .filter(|origin| !origin.is_empty())
        .collect())
}

fn parse_algorithm(raw: &str) -> Result<Algorithm, ConfigError> {
    let algorithm = Algorithm::from_str(raw.trim()).map_err(|e| ConfigError::Invalid {
        key: "ALGORITHM",
        message: e.to_string(),
    })?;
    match algorithm {
        Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512 => Ok(algorithm),
        other => Err(ConfigError::Invalid {
            key: "ALGORITHM",
            message: format!("{:?} needs a key pair; only HMAC algorithms are supported", other),
        }),
    }
}

fn parse_number<T: FromStr>(key: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T::Err: fmt::Display,
{
    raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
        key,
        message: e.to_string(),
    })
}
