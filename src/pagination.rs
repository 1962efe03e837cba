// ABOUTME: Re-exports pagination types from fluent-core for unified type identity
// ABOUTME: Ensures PageParams/Page are the same type across the server and core crates
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fluent Life

pub use fluent_core::pagination::*;
