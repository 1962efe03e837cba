// ABOUTME: Core types and constants for the Fluent admin API
// ABOUTME: Foundation crate with error handling, pagination and constants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fluent Life

#![deny(unsafe_code)]

//! # Fluent Core
//!
//! Shared foundation for the Fluent Life admin back office. Kept separate from
//! the server crate so it changes rarely and compiles once.
//!
//! - **errors**: `AppError`, `ErrorCode`, HTTP envelope rendering
//! - **pagination**: `page` / `page_size` normalization
//! - **constants**: setting keys, default identifiers, source tags

/// Unified error handling with HTTP status mapping
pub mod errors;

/// Offset pagination parameters
pub mod pagination;

/// Application constants organized by domain
pub mod constants;
