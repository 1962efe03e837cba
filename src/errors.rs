// ABOUTME: Re-exports the unified error type from fluent-core
// ABOUTME: Handlers and storage share one AppError so `?` works across crate boundaries
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fluent Life

pub use fluent_core::errors::*;
