// ABOUTME: Re-exports application constants from fluent-core
// ABOUTME: Setting keys, defaults, role codes and video source tags
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fluent Life

pub use fluent_core::constants::*;
