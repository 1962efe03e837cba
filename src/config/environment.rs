// ABOUTME: Environment configuration for the admin server: port, database, auth mode, CORS, limits
// ABOUTME: Parses environment variables into typed settings with defaults
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fluent Life

//! Environment-based configuration management

use std::env;
use std::fmt;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::constants::defaults;

/// Deployment environment
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local development
    #[default]
    Development,
    /// Production deployment
    Production,
    /// Automated tests
    Testing,
}

impl Environment {
    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "testing" | "test" => Self::Testing,
            _ => Self::Development,
        }
    }

    /// Check if this is a production environment
    #[must_use]
    pub const fn is_production(self) -> bool {
        matches!(self, Self::Production)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
            Self::Testing => write!(f, "testing"),
        }
    }
}

/// How `/admin` requests are authenticated
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum AuthMode {
    /// Bearer token compared with a configured literal
    #[default]
    Static,
    /// HS256 JWT carrying an admin role claim
    Jwt,
}

impl AuthMode {
    /// Parse `ADMIN_AUTH_MODE`
    pub fn parse(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "static" => Ok(Self::Static),
            "jwt" => Ok(Self::Jwt),
            other => bail!("Invalid ADMIN_AUTH_MODE '{other}', expected 'static' or 'jwt'"),
        }
    }
}

/// Admin authentication settings
#[derive(Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Selected mode
    pub mode: AuthMode,
    /// Token accepted in static mode
    pub static_token: String,
    /// HS256 secret used in JWT mode
    pub jwt_secret: Option<String>,
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("mode", &self.mode)
            .field("static_token", &"[REDACTED]")
            .field("jwt_secret", &self.jwt_secret.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// Complete server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP listen port
    pub http_port: u16,
    /// sqlx `SQLite` URL
    pub database_url: String,
    /// Deployment environment
    pub environment: Environment,
    /// Admin authentication
    pub auth: AuthConfig,
    /// Allowed CORS origins, `*` for any
    pub cors_allowed_origins: Vec<String>,
    /// Request body limit in bytes
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_port: defaults::HTTP_PORT,
            database_url: defaults::DATABASE_URL.to_owned(),
            environment: Environment::Development,
            auth: AuthConfig {
                mode: AuthMode::Static,
                static_token: defaults::ADMIN_TOKEN.to_owned(),
                jwt_secret: None,
            },
            cors_allowed_origins: vec!["*".to_owned()],
            max_body_bytes: defaults::MAX_BODY_BYTES,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");

        let config = Self {
            http_port: env_var_or("HTTP_PORT", &defaults::HTTP_PORT.to_string())
                .parse()
                .context("Invalid HTTP_PORT value")?,
            database_url: env_var_or("DATABASE_URL", defaults::DATABASE_URL),
            environment: Environment::from_str_or_default(&env_var_or(
                "ENVIRONMENT",
                "development",
            )),
            auth: AuthConfig {
                mode: AuthMode::parse(&env_var_or("ADMIN_AUTH_MODE", "static"))?,
                static_token: env_var_or("ADMIN_TOKEN", defaults::ADMIN_TOKEN),
                jwt_secret: env::var("JWT_SECRET").ok().filter(|s| !s.is_empty()),
            },
            cors_allowed_origins: parse_origins(&env_var_or("CORS_ALLOWED_ORIGINS", "*")),
            max_body_bytes: env_var_or("MAX_BODY_BYTES", &defaults::MAX_BODY_BYTES.to_string())
                .parse()
                .context("Invalid MAX_BODY_BYTES value")?,
        };

        config.validate()?;
        Ok(config)
    }

    /// Reject combinations the server cannot start with
    pub fn validate(&self) -> Result<()> {
        match self.auth.mode {
            AuthMode::Jwt if self.auth.jwt_secret.is_none() => {
                bail!("JWT_SECRET is required when ADMIN_AUTH_MODE=jwt")
            }
            AuthMode::Static if self.auth.static_token.trim().is_empty() => {
                bail!("ADMIN_TOKEN must not be empty when ADMIN_AUTH_MODE=static")
            }
            _ => {}
        }
        if self.max_body_bytes == 0 {
            bail!("MAX_BODY_BYTES must be greater than zero");
        }
        Ok(())
    }

    /// One-line summary for startup logs, without secrets
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "environment={} http_port={} database_url={} auth_mode={:?} cors_origins={}",
            self.environment,
            self.http_port,
            self.database_url,
            self.auth.mode,
            self.cors_allowed_origins.join(",")
        )
    }
}

fn env_var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_owned())
}

/// Parse comma-separated CORS origins
fn parse_origins(origins_str: &str) -> Vec<String> {
    if origins_str.trim() == "*" {
        vec!["*".to_owned()]
    } else {
        origins_str
            .split(',')
            .map(|s| s.trim().to_owned())
            .filter(|s| !s.is_empty())
            .collect()
    }
}
