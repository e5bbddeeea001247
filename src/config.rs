use crate::error::{AppError, AppResult};
use serde::Deserialize;

const PLACEHOLDER_SECRET: &str = "your-secret-key";

#[derive(Deserialize, Clone, Debug)]
pub struct Config {
    pub database_url: String,
    #[serde(default = "default_max_connections")]
    pub database_max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub database_min_connections: u32,
    #[serde(default = "default_connection_timeout")]
    pub database_connection_timeout: u64,

    /// When unset, notifications are queued in memory and processed inline.
    #[serde(default)]
    pub redis_url: Option<String>,

    #[serde(default = "default_host")]
    pub server_host: String,
    #[serde(default = "default_port")]
    pub server_port: u16,
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,

    #[serde(default = "default_session_secret")]
    pub session_jwt_secret: String,
    #[serde(default)]
    pub session_jwt_audience: Option<String>,

    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_log_format")]
    pub log_format: String,

    #[serde(default = "default_app_base_url")]
    pub app_base_url: String,

    #[serde(default)]
    pub resend_api_key: Option<String>,
    #[serde(default = "default_email_from_address")]
    pub email_from_address: String,
    #[serde(default = "default_email_from_name")]
    pub email_from_name: String,
    #[serde(default = "default_notification_max_attempts")]
    pub notification_max_attempts: u32,
    #[serde(default = "default_notification_retry_delay_ms")]
    pub notification_retry_delay_ms: u64,
    #[serde(default = "default_notification_inline_worker")]
    pub notification_inline_worker: bool,
}

#[derive(Clone, Debug)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connection_timeout: u64,
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors_origins: Vec<String>,
}

#[derive(Clone, Debug)]
pub struct SessionConfig {
    pub jwt_secret: String,
    pub audience: Option<String>,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

#[derive(Clone, Debug)]
pub struct NotificationConfig {
    pub redis_url: Option<String>,
    pub resend_api_key: Option<String>,
    pub from_address: String,
    pub from_name: String,
    pub app_base_url: String,
    pub max_attempts: u32,
    pub retry_delay_ms: u64,
    pub inline_worker: bool,
}

impl NotificationConfig {
    pub fn from_header(&self) -> String {
        format!("{} <{}>", self.from_name, self.from_address)
    }

    pub fn email_enabled(&self) -> bool {
        self.resend_api_key
            .as_deref()
            .is_some_and(|key| !key.trim().is_empty())
    }
}

// Default value functions
fn default_max_connections() -> u32 {
    20
}
fn default_min_connections() -> u32 {
    5
}
fn default_connection_timeout() -> u64 {
    30
}
fn default_host() -> String {
    "127.0.0.1".to_string()
}
fn default_port() -> u16 {
    8000
}
fn default_cors_origins() -> Vec<String> {
    vec!["*".to_string()]
}
fn default_session_secret() -> String {
    PLACEHOLDER_SECRET.to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_format() -> String {
    "json".to_string()
}
fn default_app_base_url() -> String {
    "http://localhost:3000".to_string()
}
fn default_email_from_address() -> String {
    "noreply@urpeer.com".to_string()
}
fn default_email_from_name() -> String {
    "Urpeer".to_string()
}
fn default_notification_max_attempts() -> u32 {
    3
}
fn default_notification_retry_delay_ms() -> u64 {
    500
}
fn default_notification_inline_worker() -> bool {
    true
}

impl Config {
    pub fn from_env() -> AppResult<Self> {
        dotenvy::dotenv().ok();

        let config = envy::from_env::<Config>()
            .map_err(|e| AppError::Config(format!("Failed to load config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.database_max_connections == 0 {
            return Err(AppError::Config(
                "DATABASE_MAX_CONNECTIONS must be > 0".to_string(),
            ));
        }

        if self.database_min_connections > self.database_max_connections {
            return Err(AppError::Config(
                "DATABASE_MIN_CONNECTIONS cannot be greater than DATABASE_MAX_CONNECTIONS"
                    .to_string(),
            ));
        }

        if self.session_jwt_secret.trim().is_empty() || self.session_jwt_secret == PLACEHOLDER_SECRET
        {
            return Err(AppError::Config(
                "SESSION_JWT_SECRET must be set to the identity provider's signing secret"
                    .to_string(),
            ));
        }

        if self.notification_max_attempts == 0 {
            return Err(AppError::Config(
                "NOTIFICATION_MAX_ATTEMPTS must be > 0".to_string(),
            ));
        }

        if !matches!(self.log_format.as_str(), "json" | "text") {
            return Err(AppError::Config(format!(
                "LOG_FORMAT must be 'json' or 'text', got '{}'",
                self.log_format
            )));
        }

        Ok(())
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }

    pub fn database(&self) -> DatabaseConfig {
        DatabaseConfig {
            url: self.database_url.clone(),
            max_connections: self.database_max_connections,
            min_connections: self.database_min_connections,
            connection_timeout: self.database_connection_timeout,
        }
    }

    pub fn server(&self) -> ServerConfig {
        ServerConfig {
            host: self.server_host.clone(),
            port: self.server_port,
            cors_origins: self.cors_origins.clone(),
        }
    }

    pub fn session(&self) -> SessionConfig {
        SessionConfig {
            jwt_secret: self.session_jwt_secret.clone(),
            audience: self.session_jwt_audience.clone(),
        }
    }

    pub fn logging(&self) -> LoggingConfig {
        LoggingConfig {
            level: self.log_level.clone(),
            format: self.log_format.clone(),
        }
    }

    pub fn notifications(&self) -> NotificationConfig {
        NotificationConfig {
            redis_url: self.redis_url.clone(),
            resend_api_key: self.resend_api_key.clone(),
            from_address: self.email_from_address.clone(),
            from_name: self.email_from_name.clone(),
            app_base_url: self.app_base_url.trim_end_matches('/').to_string(),
            max_attempts: self.notification_max_attempts,
            retry_delay_ms: self.notification_retry_delay_ms,
            inline_worker: self.notification_inline_worker,
        }
    }
}
