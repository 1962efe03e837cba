// ABOUTME: Text-to-speech voice descriptors and the dropdown projection of enabled voices
// ABOUTME: The technical `type` code is the unique key personas refer to
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fluent Life

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::require_text;
use crate::errors::AppResult;

/// A TTS voice
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VoiceType {
    /// Generated identifier
    pub id: Uuid,
    /// Display name
    pub name: String,
    /// Technical code passed to the speech engine
    #[serde(rename = "type")]
    pub voice_type: String,
    /// Description
    pub description: String,
    /// Whether personas may use this voice
    pub enabled: bool,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Last modification time
    pub updated_at: DateTime<Utc>,
}

/// Dropdown entry for `GET /admin/voice-types/enabled`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VoiceTypeOption {
    /// Technical code
    #[serde(rename = "type")]
    pub voice_type: String,
    /// Display name
    pub name: String,
}

impl From<VoiceType> for VoiceTypeOption {
    fn from(voice: VoiceType) -> Self {
        Self {
            voice_type: voice.voice_type,
            name: voice.name,
        }
    }
}

/// Body of `POST /admin/voice-types` and `PUT /admin/voice-types/:id`
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct NewVoiceType {
    /// Display name
    #[serde(default)]
    pub name: String,
    /// Technical code
    #[serde(default, rename = "type")]
    pub voice_type: String,
    /// Description
    #[serde(default)]
    pub description: String,
    /// Enabled flag; new voices are enabled and updates keep the stored value when omitted
    pub enabled: Option<bool>,
}

impl NewVoiceType {
    /// Check required fields
    pub fn validated(self) -> AppResult<Self> {
        Ok(Self {
            name: require_text(&self.name, "name")?,
            voice_type: require_text(&self.voice_type, "type")?,
            description: self.description,
            enabled: self.enabled,
        })
    }

    /// Convenience constructor used by the seeder
    #[must_use]
    pub fn enabled(name: &str, voice_type: &str, description: &str) -> Self {
        Self {
            name: name.to_owned(),
            voice_type: voice_type.to_owned(),
            description: description.to_owned(),
            enabled: Some(true),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_field_is_renamed() {
        let request: NewVoiceType =
            serde_json::from_str(r#"{"name":"Warm","type":"zh_female_vv_uranus_bigtts"}"#).unwrap();
        let request = request.validated().unwrap();
        assert_eq!(request.voice_type, "zh_female_vv_uranus_bigtts");
        assert!(request.enabled.is_none());
    }

    #[test]
    fn test_missing_type_is_rejected() {
        let request = NewVoiceType {
            name: "Warm".to_owned(),
            ..NewVoiceType::default()
        };
        assert_eq!(request.validated().unwrap_err().message, "type is required");
    }
}
