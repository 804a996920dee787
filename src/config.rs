// src/config.rs

use std::env;
use std::net::SocketAddr;

use dotenvy::dotenv;
use thiserror::Error;
use url::Url;

use crate::ai::openai::DEFAULT_BASE_URL;

/// Origins allowed for local frontend development, always accepted.
const DEV_ORIGINS: [&str; 7] = [
    "http://localhost:8080",
    "http://127.0.0.1:8080",
    "http://localhost:8030",
    "http://127.0.0.1:8030",
    "http://0.0.0.0:8030",
    "http://localhost:3000",
    "http://127.0.0.1:3000",
];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} is invalid: {reason}")]
    Invalid { name: &'static str, reason: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub rust_log: String,
    pub session_ttl_secs: u64,
    pub allowed_origins: Vec<String>,
    pub openai_api_key: String,
    pub openai_assistant_id: String,
    pub openai_base_url: String,
    pub ai_timeout_secs: u64,
    pub catalog_path: Option<String>,
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or(ConfigError::Missing(name))
}

fn parsed_or<T>(name: &'static str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            name,
            reason: e.to_string(),
        }),
        Err(_) => Ok(default),
    }
}

/// Development origins plus the comma separated `extra` list.
pub fn merge_origins(extra: Option<&str>) -> Vec<String> {
    let mut origins: Vec<String> = DEV_ORIGINS.iter().map(|o| o.to_string()).collect();
    for origin in extra.unwrap_or_default().split(',').map(str::trim) {
        if !origin.is_empty() && !origins.iter().any(|o| o == origin) {
            origins.push(origin.to_string());
        }
    }
    origins
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();

        let bind_addr = parsed_or("BIND_ADDR", SocketAddr::from(([0, 0, 0, 0], 8080)))?;

        let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        let session_ttl_secs = parsed_or("SESSION_TTL_SECS", 24 * 60 * 60)?;

        let allowed_origins = merge_origins(env::var("ALLOWED_ORIGINS").ok().as_deref());

        let openai_api_key = required("OPENAI_API_KEY")?;
        let openai_assistant_id = required("OPENAI_ASSISTANT_ID")?;

        let openai_base_url =
            env::var("OPENAI_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Url::parse(&openai_base_url).map_err(|e| ConfigError::Invalid {
            name: "OPENAI_BASE_URL",
            reason: e.to_string(),
        })?;

        let ai_timeout_secs = parsed_or("AI_TIMEOUT_SECS", 20)?;

        let catalog_path = env::var("CATALOG_PATH").ok().filter(|p| !p.is_empty());

        Ok(Self {
            bind_addr,
            rust_log,
            session_ttl_secs,
            allowed_origins,
            openai_api_key,
            openai_assistant_id,
            openai_base_url,
            ai_timeout_secs,
            catalog_path,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_origins_adds_trimmed_unique_entries() {
        let origins = merge_origins(Some(" http://example.com:8030 ,,http://localhost:3000"));
        assert_eq!(origins.len(), DEV_ORIGINS.len() + 1);
        assert!(origins.contains(&"http://example.com:8030".to_string()));
    }

    #[test]
    fn merge_origins_without_extra() {
        assert_eq!(merge_origins(None).len(), DEV_ORIGINS.len());
    }

    // Only test in this binary that touches the process environment.
    #[test]
    fn from_env_requires_openai_keys() {
        unsafe {
            env::set_var("OPENAI_API_KEY", "sk-local");
            env::set_var("OPENAI_ASSISTANT_ID", "asst_local");
            env::set_var("AI_TIMEOUT_SECS", "7");
        }
        let config = Config::from_env().unwrap();
        assert_eq!(config.openai_api_key, "sk-local");
        assert_eq!(config.openai_assistant_id, "asst_local");
        assert_eq!(config.ai_timeout_secs, 7);

        unsafe {
            env::remove_var("OPENAI_API_KEY");
        }
        assert!(matches!(
            Config::from_env(),
            Err(ConfigError::Missing("OPENAI_API_KEY"))
        ));

        unsafe {
            env::remove_var("OPENAI_ASSISTANT_ID");
            env::remove_var("AI_TIMEOUT_SECS");
        }
    }
}
