// ABOUTME: Configuration module root for the admin server
// ABOUTME: Re-exports the environment-driven server configuration types
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fluent Life

//! Server configuration loaded from environment variables

/// Environment-based configuration
pub mod environment;

pub use environment::{AuthConfig, AuthMode, Environment, ServerConfig};
