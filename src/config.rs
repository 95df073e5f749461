/*
 * Responsibility
 * - Load settings from the environment (.env supported) exactly once at startup
 * - Validate required values (startup fails when anything is missing)
 * - Hand the filter an immutable `FilterSettings`
 */
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use crate::security::{FilterSettings, SigningKey};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn parse(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

/// Startup configuration failure. Always fatal.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing configuration: {0}")]
    Missing(&'static str),
    #[error("invalid configuration: {key} ({reason})")]
    Invalid { key: &'static str, reason: String },
}

impl ConfigError {
    pub fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            reason: reason.into(),
        }
    }
}

/// Where the filter looks for the bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenSource {
    Header,
    Cookie(String),
    Query(String),
    /// Header first, then cookie, then query parameter.
    Any { cookie: String, query: String },
}

pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,
    pub filter: FilterSettings,
    pub token_source: TokenSource,
    pub loader_timeout: Option<Duration>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    /// `from_env` is the production entry point; tests feed a map.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port: u16 = match lookup("PORT") {
            Some(v) => v
                .parse()
                .map_err(|_| ConfigError::invalid("PORT", "expected a port number"))?,
            None => 3000,
        };

        let addr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|e| ConfigError::invalid("PORT", e.to_string()))?;

        let app_env = lookup("APP_ENV")
            .map(|v| AppEnv::parse(&v))
            .unwrap_or(AppEnv::Development);

        let service_name = required(&lookup, "JWT_SERVICE_NAME")?;
        let signing_key = required(&lookup, "JWT_SIGNING_KEY")?;

        let leeway_seconds = match lookup("JWT_LEEWAY_SECONDS") {
            Some(v) => v.parse::<u64>().map_err(|_| {
                ConfigError::invalid("JWT_LEEWAY_SECONDS", "expected a number of seconds")
            })?,
            None => 60,
        };

        let cookie_name =
            lookup("JWT_COOKIE_NAME").unwrap_or_else(|| "access_token".to_string());
        let query_param =
            lookup("JWT_QUERY_PARAM").unwrap_or_else(|| "access_token".to_string());

        let token_source = match lookup("JWT_TOKEN_SOURCE")
            .unwrap_or_else(|| "header".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "header" => TokenSource::Header,
            "cookie" => TokenSource::Cookie(cookie_name),
            "query" => TokenSource::Query(query_param),
            "any" => TokenSource::Any {
                cookie: cookie_name,
                query: query_param,
            },
            other => {
                return Err(ConfigError::invalid(
                    "JWT_TOKEN_SOURCE",
                    format!("unknown token source '{other}'"),
                ));
            }
        };

        let loader_timeout = match lookup("JWT_LOADER_TIMEOUT_MS") {
            Some(v) => Some(Duration::from_millis(v.parse::<u64>().map_err(|_| {
                ConfigError::invalid("JWT_LOADER_TIMEOUT_MS", "expected milliseconds")
            })?)),
            None => None,
        };

        let filter = FilterSettings::new(service_name, SigningKey::new(signing_key))
            .with_leeway_seconds(leeway_seconds);
        filter.validate()?;

        Ok(Self {
            addr,
            app_env,
            filter,
            token_source,
            loader_timeout,
        })
    }
}

fn required<F>(lookup: &F, key: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .filter(|v| !v.trim().is_empty())
        .ok_or(ConfigError::Missing(key))
}
