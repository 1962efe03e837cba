// ABOUTME: Integration tests for environment-driven server configuration
// ABOUTME: Validates variable parsing, defaults and startup validation errors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fluent Life

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use std::env;

use fluent_admin_api::config::{AuthMode, Environment, ServerConfig};
use fluent_admin_api::constants::defaults;
use fluent_admin_api::logging::{LogFormat, LoggingConfig};
use serial_test::serial;

const CONFIG_VARS: &[&str] = &[
    "HTTP_PORT",
    "DATABASE_URL",
    "ENVIRONMENT",
    "ADMIN_AUTH_MODE",
    "ADMIN_TOKEN",
    "JWT_SECRET",
    "CORS_ALLOWED_ORIGINS",
    "MAX_BODY_BYTES",
];

fn clear_config_env() {
    for key in CONFIG_VARS {
        env::remove_var(key);
    }
}

#[test]
#[serial]
fn test_defaults_without_environment() {
    clear_config_env();

    let config = ServerConfig::from_env().unwrap();

    assert_eq!(config.http_port, defaults::HTTP_PORT);
    assert_eq!(config.database_url, defaults::DATABASE_URL);
    assert_eq!(config.environment, Environment::Development);
    assert_eq!(config.auth.mode, AuthMode::Static);
    assert_eq!(config.auth.static_token, defaults::ADMIN_TOKEN);
    assert_eq!(config.cors_allowed_origins, vec!["*"]);
    assert_eq!(config.max_body_bytes, defaults::MAX_BODY_BYTES);
}

#[test]
#[serial]
fn test_environment_overrides() {
    clear_config_env();
    env::set_var("HTTP_PORT", "9090");
    env::set_var("DATABASE_URL", "sqlite:./admin-test.db");
    env::set_var("ENVIRONMENT", "production");
    env::set_var("ADMIN_AUTH_MODE", "jwt");
    env::set_var("JWT_SECRET", "shared-secret");
    env::set_var("CORS_ALLOWED_ORIGINS", "https://admin.fluent.life, http://localhost:5173");
    env::set_var("MAX_BODY_BYTES", "2048");

    let config = ServerConfig::from_env().unwrap();
    clear_config_env();

    assert_eq!(config.http_port, 9090);
    assert_eq!(config.database_url, "sqlite:./admin-test.db");
    assert!(config.environment.is_production());
    assert_eq!(config.auth.mode, AuthMode::Jwt);
    assert_eq!(config.auth.jwt_secret.as_deref(), Some("shared-secret"));
    assert_eq!(
        config.cors_allowed_origins,
        vec!["https://admin.fluent.life", "http://localhost:5173"]
    );
    assert_eq!(config.max_body_bytes, 2048);
}

#[test]
#[serial]
fn test_jwt_mode_without_secret_fails() {
    clear_config_env();
    env::set_var("ADMIN_AUTH_MODE", "jwt");
    env::set_var("JWT_SECRET", "");

    let err = ServerConfig::from_env().unwrap_err();
    clear_config_env();

    assert!(err.to_string().contains("JWT_SECRET is required"));
}

#[test]
#[serial]
fn test_invalid_values_are_rejected() {
    clear_config_env();
    env::set_var("HTTP_PORT", "not-a-port");
    assert!(ServerConfig::from_env().is_err());

    clear_config_env();
    env::set_var("ADMIN_AUTH_MODE", "oauth");
    assert!(ServerConfig::from_env().is_err());

    clear_config_env();
    env::set_var("MAX_BODY_BYTES", "0");
    assert!(ServerConfig::from_env().is_err());

    clear_config_env();
}

#[test]
#[serial]
fn test_debug_output_redacts_secrets() {
    clear_config_env();
    env::set_var("ADMIN_TOKEN", "very-secret-token");

    let config = ServerConfig::from_env().unwrap();
    clear_config_env();

    let debug = format!("{config:?}");
    assert!(!debug.contains("very-secret-token"));
    assert!(debug.contains("[REDACTED]"));
}

#[test]
#[serial]
fn test_logging_config_loads_when_server_config_is_invalid() {
    clear_config_env();
    env::set_var("HTTP_PORT", "not-a-port");
    env::set_var("LOG_FORMAT", "json");

    let logging = LoggingConfig::from_env();
    let server = ServerConfig::from_env();
    clear_config_env();
    env::remove_var("LOG_FORMAT");

    assert_eq!(logging.format, LogFormat::Json);
    let err = server.unwrap_err();
    assert!(format!("{err:#}").contains("Invalid HTTP_PORT value"));
}
