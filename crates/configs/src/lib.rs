//! # configs
//!
//! Layered settings for the hanami client: defaults, then an optional
//! `hanami.toml`, then `HANAMI__`-prefixed environment variables (with
//! `__` separating nesting levels, e.g. `HANAMI__API__BASE_URL`). The
//! session token is held behind `secrecy` so it never lands in debug
//! output or logs.

use config::{Config, Environment, File};
use secrecy::SecretString;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigsError {
    #[error("configuration error: {0}")]
    Load(#[from] config::ConfigError),
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub api: ApiSettings,
    #[serde(default)]
    pub log: LogSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiSettings {
    /// Base URL of the platform backend, e.g. `https://api.hanami.moe`.
    pub base_url: String,
    /// Ambient session credential supplied by the execution environment.
    pub session_token: SecretString,
    /// Identity the session belongs to.
    pub username: String,
    /// Deadline for every remote call. A hung collaborator call fails with
    /// a timeout instead of pinning the UI in a loading state.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogSettings {
    #[serde(default = "default_filter")]
    pub filter: String,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self { filter: default_filter() }
    }
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_filter() -> String {
    "info".to_string()
}

/// Loads settings from `.env`, `hanami.toml` (optional) and the
/// environment.
pub fn load() -> Result<Settings, ConfigsError> {
    dotenvy::dotenv().ok();
    let cfg = Config::builder()
        .add_source(File::with_name("hanami").required(false))
        .add_source(Environment::with_prefix("HANAMI").separator("__"))
        .build()?;
    Ok(cfg.try_deserialize()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_in_timeout_and_filter() {
        let cfg = Config::builder()
            .set_override("api.base_url", "http://localhost:5000")
            .unwrap()
            .set_override("api.session_token", "sekrit")
            .unwrap()
            .set_override("api.username", "rin")
            .unwrap()
            .build()
            .unwrap();
        let settings: Settings = cfg.try_deserialize().unwrap();
        assert_eq!(settings.api.timeout_secs, 30);
        assert_eq!(settings.log.filter, "info");
        assert_eq!(settings.api.username, "rin");
    }
}
