// ABOUTME: AI simulation personas with optimistic-lock versioning and the built-in default set
// ABOUTME: Also decodes the legacy single-setting JSON array personas were once stored in
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fluent Life

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::require_text;
use crate::constants::defaults::VOICE_TYPE;
use crate::errors::AppResult;

/// A conversational persona used by the practice simulator
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AiRole {
    /// Caller chosen identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Description
    pub description: String,
    /// Prompt sent to the language model
    pub system_prompt: String,
    /// Voice type code used for speech
    pub voice_type: String,
    /// Whether the app offers this persona
    pub enabled: bool,
    /// Incremented on every update
    pub version: i64,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Last modification time
    pub updated_at: DateTime<Utc>,
}

/// Persona fields as written to storage and to the published snapshot
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AiRoleDraft {
    /// Identifier
    #[serde(default)]
    pub id: String,
    /// Display name
    #[serde(default)]
    pub name: String,
    /// Description
    #[serde(default)]
    pub description: String,
    /// Prompt
    #[serde(default)]
    pub system_prompt: String,
    /// Voice type code
    #[serde(default)]
    pub voice_type: String,
    /// Enabled flag
    #[serde(default)]
    pub enabled: bool,
}

impl From<&AiRole> for AiRoleDraft {
    fn from(role: &AiRole) -> Self {
        Self {
            id: role.id.clone(),
            name: role.name.clone(),
            description: role.description.clone(),
            system_prompt: role.system_prompt.clone(),
            voice_type: role.voice_type.clone(),
            enabled: role.enabled,
        }
    }
}

/// Body of `POST /admin/ai-roles` and `PUT /admin/ai-roles/:id`
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AiRoleRequest {
    /// Identifier, ignored on update
    #[serde(default)]
    pub id: String,
    /// Display name
    #[serde(default)]
    pub name: String,
    /// Description
    #[serde(default)]
    pub description: String,
    /// Prompt
    #[serde(default)]
    pub system_prompt: String,
    /// Voice type code; empty picks a default on create
    #[serde(default)]
    pub voice_type: String,
    /// Enabled flag
    #[serde(default)]
    pub enabled: bool,
    /// Expected stored version; the update fails with 409 when it differs
    pub version: Option<i64>,
}

impl AiRoleRequest {
    /// Validate a create request; `id`, `name` and `system_prompt` are required
    pub fn into_new_draft(self) -> AppResult<AiRoleDraft> {
        Ok(AiRoleDraft {
            id: require_text(&self.id, "id")?,
            name: require_text(&self.name, "name")?,
            description: self.description,
            system_prompt: require_text(&self.system_prompt, "system_prompt")?,
            voice_type: self.voice_type.trim().to_owned(),
            enabled: self.enabled,
        })
    }

    /// Build the replacement draft for an update of `id`
    #[must_use]
    pub fn into_update_draft(self, id: &str) -> (AiRoleDraft, Option<i64>) {
        (
            AiRoleDraft {
                id: id.to_owned(),
                name: self.name,
                description: self.description,
                system_prompt: self.system_prompt,
                voice_type: self.voice_type.trim().to_owned(),
                enabled: self.enabled,
            },
            self.version,
        )
    }
}

/// Built-in personas installed by `init-from-config`
#[must_use]
pub fn default_personas() -> Vec<AiRoleDraft> {
    vec![
        AiRoleDraft {
            id: "interviewer".to_owned(),
            name: "面试官".to_owned(),
            description: "专业的面试官，帮助提升面试技巧".to_owned(),
            system_prompt: "你现在是一名面试官，请根据用户的问题进行提问和追问，并对用户的回答进行评价和指导。你的目标是模拟一场真实的面试，帮助用户提升面试技巧。".to_owned(),
            voice_type: VOICE_TYPE.to_owned(),
            enabled: true,
        },
        AiRoleDraft {
            id: "language_tutor".to_owned(),
            name: "语言导师".to_owned(),
            description: "专业的语言导师，帮助练习口语和纠正语法".to_owned(),
            system_prompt: "你现在是一名语言导师，请帮助用户练习口语，纠正语法错误，并提供词汇和表达建议。你的目标是帮助用户提高语言流利度和准确性。".to_owned(),
            voice_type: VOICE_TYPE.to_owned(),
            enabled: true,
        },
        AiRoleDraft {
            id: "presentation_coach".to_owned(),
            name: "演讲教练".to_owned(),
            description: "专业的演讲教练，帮助准备演讲和提升表达能力".to_owned(),
            system_prompt: "你现在是一名演讲教练，请帮助用户准备演讲，提供演讲稿修改建议，并指导用户如何更好地表达。你的目标是帮助用户提升演讲能力和自信心。".to_owned(),
            voice_type: VOICE_TYPE.to_owned(),
            enabled: true,
        },
    ]
}
