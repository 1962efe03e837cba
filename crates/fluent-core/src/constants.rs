// ABOUTME: Application-wide constants shared between the server and seed binaries
// ABOUTME: Setting keys, default identifiers, step types and video source tags
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fluent Life

/// Service names used in logs
pub mod service_names {
    /// Name reported by the admin server
    pub const FLUENT_ADMIN_API: &str = "fluent-admin-api";
}

/// Keys of rows in the `app_settings` table
pub mod setting_keys {
    /// Legacy JSON array of AI simulation personas
    pub const AI_SIMULATION_ROLES: &str = "ai_simulation_roles";
}

/// Default identifiers
pub mod defaults {
    /// Voice type used when no enabled voice type exists
    pub const VOICE_TYPE: &str = "zh_female_wanqudashu_moon_bigtts";

    /// Static admin token used when none is configured
    pub const ADMIN_TOKEN: &str = "admin_token_12345";

    /// Default HTTP port
    pub const HTTP_PORT: u16 = 8081;

    /// Default `SQLite` database URL
    pub const DATABASE_URL: &str = "sqlite:./data/fluent_admin.db";

    /// Default request body limit in bytes
    pub const MAX_BODY_BYTES: usize = 1024 * 1024;
}

/// Roles accepted by the JWT admin guard
pub mod roles {
    /// Administrator
    pub const ADMIN: &str = "admin";
    /// Super administrator
    pub const SUPER_ADMIN: &str = "super_admin";
}

/// Video source tags
pub mod video_sources {
    /// Videos attached to exposure training records
    pub const EXPOSURE_MODULE: &str = "exposure_module";
    /// Videos attached to community posts
    pub const COMMUNITY_POST: &str = "community_post";
    /// Training record type that carries exposure videos
    pub const EXPOSURE_RECORD_TYPE: &str = "exposure";
    /// Number of content characters kept for a post title
    pub const POST_TITLE_CHARS: usize = 50;
    /// Label shown for exposure videos in the admin UI
    pub const EXPOSURE_MODULE_DETAIL: &str = "脱敏练习";
    /// Label shown for community post videos in the admin UI
    pub const COMMUNITY_POST_DETAIL: &str = "感悟广场";
}

/// Operation log vocabulary
pub mod operation_log {
    /// Successful operation status
    pub const STATUS_SUCCESS: &str = "success";
    /// Create action
    pub const ACTION_CREATE: &str = "create";
    /// Update action
    pub const ACTION_UPDATE: &str = "update";
    /// Delete action
    pub const ACTION_DELETE: &str = "delete";
    /// Bulk reset action
    pub const ACTION_RESET: &str = "reset";
    /// Actor name recorded when the static admin token is used
    pub const STATIC_TOKEN_ACTOR: &str = "static-token";
}
