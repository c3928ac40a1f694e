// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.

use std::env;
use std::time::Duration;

const DEFAULT_FRONTEND_URL: &str = "http://localhost:3000";
const DEFAULT_BACKEND_TIMEOUT_SECS: u64 = 10;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the SMS gateway backend (no trailing slash)
    pub backend_url: String,
    /// Public origin of the dashboard, used for CORS and cookie security
    pub frontend_url: String,
    /// Server port
    pub port: u16,
    /// Directory served under `/static`
    pub static_dir: String,
    /// Per-request timeout for backend calls
    pub backend_timeout: Duration,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// A `.env` file is honored for local development.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let backend_url = env::var("BACKEND_URL").map_err(|_| ConfigError::Missing("BACKEND_URL"))?;
        if !backend_url.starts_with("http://") && !backend_url.starts_with("https://") {
            return Err(ConfigError::Invalid {
                name: "BACKEND_URL",
                reason: "must be an http(s) URL".to_string(),
            });
        }

        let backend_timeout = match env::var("BACKEND_TIMEOUT_SECS") {
            Ok(raw) => raw.trim().parse::<u64>().map_err(|_| ConfigError::Invalid {
                name: "BACKEND_TIMEOUT_SECS",
                reason: format!("not a number of seconds: {raw}"),
            })?,
            Err(_) => DEFAULT_BACKEND_TIMEOUT_SECS,
        };

        Ok(Self {
            backend_url: backend_url.trim().trim_end_matches('/').to_string(),
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| DEFAULT_FRONTEND_URL.to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            static_dir: env::var("STATIC_DIR").unwrap_or_else(|_| "static".to_string()),
            backend_timeout: Duration::from_secs(backend_timeout),
        })
    }

    /// Fixed configuration for tests.
    pub fn test_default() -> Self {
        Self {
            backend_url: "http://127.0.0.1:9".to_string(),
            frontend_url: DEFAULT_FRONTEND_URL.to_string(),
            port: 8080,
            static_dir: "static".to_string(),
            backend_timeout: Duration::from_secs(2),
        }
    }

    /// Session cookies carry `Secure` only when the dashboard is served over HTTPS.
    pub fn secure_cookies(&self) -> bool {
        self.frontend_url.starts_with("https://")
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}
