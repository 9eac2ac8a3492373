/*
 * Responsibility
 * - 環境変数や設定の読み込み (DATABASE_URL, REDIS_URL, CORS 許可、認証ヘッダ、session cookie など)
 * - 設定値のバリデーション (不足なら起動失敗)
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use axum::http::HeaderName;

use crate::auth::ResolverSettings;
use crate::services::session::SessionCookieConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    pub fn from_env() -> Self {
        Self::parse(&std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()))
    }

    fn parse(raw: &str) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub database_url: String,
    pub redis_url: String,

    pub app_env: AppEnv,
    pub cors_allowed_origins: Vec<String>,

    pub auth_header: HeaderName,
    pub lookup_timeout: Duration,

    pub session_cookie_name: String,
    pub session_cookie_signed: bool,
    pub session_key_prefix: String,

    pub request_timeout: Duration,
    pub request_body_limit: usize,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup (env in production, a map in tests).
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let port: u16 = match get("PORT") {
            Some(v) => v.parse().map_err(|_| ConfigError::Invalid("PORT"))?,
            None => 3000,
        };

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let database_url = get("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;
        let redis_url = get("REDIS_URL").ok_or(ConfigError::Missing("REDIS_URL"))?;

        let app_env = get("APP_ENV")
            .map(|v| AppEnv::parse(&v))
            .unwrap_or(AppEnv::Development);

        let cors_allowed_origins = get("CORS_ALLOWED_ORIGINS")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>();

        let auth_header = match get("AUTH_HEADER") {
            Some(v) => HeaderName::from_bytes(v.trim().as_bytes())
                .map_err(|_| ConfigError::Invalid("AUTH_HEADER"))?,
            None => HeaderName::from_static("authentication"),
        };

        let lookup_timeout = Duration::from_millis(parse_or(&get, "AUTH_LOOKUP_TIMEOUT_MS", 3000)?);

        let session_cookie_name =
            get("SESSION_COOKIE_NAME").unwrap_or_else(|| "koa.sess".to_string());
        if session_cookie_name.trim().is_empty() {
            return Err(ConfigError::Invalid("SESSION_COOKIE_NAME"));
        }

        let session_cookie_signed = parse_or(&get, "SESSION_COOKIE_SIGNED", true)?;

        let session_key_prefix =
            get("SESSION_KEY_PREFIX").unwrap_or_else(|| "koa:sess:".to_string());

        let request_timeout =
            Duration::from_secs(parse_or(&get, "REQUEST_TIMEOUT_SECONDS", 30)?);

        let request_body_limit = parse_or(&get, "REQUEST_BODY_LIMIT_BYTES", 1024 * 1024)?;

        Ok(Self {
            addr,
            database_url,
            redis_url,
            app_env,
            cors_allowed_origins,
            auth_header,
            lookup_timeout,
            session_cookie_name,
            session_cookie_signed,
            session_key_prefix,
            request_timeout,
            request_body_limit,
        })
    }

    pub fn resolver_settings(&self) -> ResolverSettings {
        ResolverSettings {
            auth_header: self.auth_header.clone(),
            session_cookie_name: self.session_cookie_name.clone(),
            lookup_timeout: self.lookup_timeout,
        }
    }

    pub fn session_cookie(&self) -> SessionCookieConfig {
        SessionCookieConfig {
            name: self.session_cookie_name.clone(),
            path: "/".to_string(),
            secure: self.app_env.is_production(),
            signed: self.session_cookie_signed,
        }
    }
}

// Unset keys fall back to `default`; set but unparsable keys are rejected.
fn parse_or<T: FromStr>(
    get: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match get(key) {
        Some(v) => v.trim().parse().map_err(|_| ConfigError::Invalid(key)),
        None => Ok(default),
    }
}

#[cfg(test)]
pub(crate) fn test_config() -> Config {
    Config::from_lookup(|key| match key {
        "DATABASE_URL" => Some("postgres://localhost/test".to_string()),
        "REDIS_URL" => Some("redis://localhost:6379".to_string()),
        _ => None,
    })
    .expect("test config")
}
