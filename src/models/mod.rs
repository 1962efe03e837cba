// ABOUTME: Domain models for the admin back-office: roles, menus, exposure content, voices, personas
// ABOUTME: Request payloads and their validation live next to the model they produce
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fluent Life

//! # Data Models
//!
//! Every entity managed by the admin API has a model here, together with the
//! request bodies accepted by its routes. Validation that depends only on the
//! request itself (required fields, enum values, reorder payload shape) is
//! implemented on the request types so handlers stay thin.

pub mod ai_role;
pub mod app_setting;
pub mod exposure;
pub mod menu;
pub mod operation_log;
pub mod role;
pub mod video;
pub mod voice_type;

pub use ai_role::{default_personas, AiRole, AiRoleDraft, AiRoleRequest};
pub use app_setting::{AppSetting, UpsertAppSettingRequest};
pub use exposure::{
    ExposureModule, ExposureStep, ModuleOrderItem, ModulePatch, NewExposureModule,
    NewExposureStep, ReorderModulesRequest, ReorderStepsRequest, StepDraft, StepOrderItem,
    StepPatch, StepType,
};
pub use menu::{Menu, MenuNode, MenuPatch, NewMenu};
pub use operation_log::{NewOperationLog, OperationLog};
pub use role::{NewRole, Role, RolePatch};
pub use video::{Video, VideoFilter, VideoOrigin, VideoSource};
pub use voice_type::{NewVoiceType, VoiceType, VoiceTypeOption};

use serde::{Deserialize, Deserializer};

use crate::errors::{AppError, AppResult};

/// Deserialize a field that distinguishes "absent" from "explicit null"
///
/// Use together with `#[serde(default)]`: a missing key yields `None`, a JSON
/// `null` yields `Some(None)` and a value yields `Some(Some(value))`.
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Return the trimmed value, or a `MissingRequiredField` error naming `field`
pub fn require_text(value: &str, field: &str) -> AppResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::missing_field(format!("{field} is required")));
    }
    Ok(trimmed.to_owned())
}

/// Treat empty strings as "not provided"
#[must_use]
pub fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
