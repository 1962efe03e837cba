// ABOUTME: Exposure training modules, their ordered steps, and the reorder payloads
// ABOUTME: Owns step-type validation, popup config normalization and sparse step patch decoding
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fluent Life

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use super::{non_empty, require_text};
use crate::errors::{AppError, AppResult};

/// Stored value for a step without popups
pub const EMPTY_POPUP_CONFIGS: &str = "[]";

/// Kind of screen a step renders in the mobile app
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepType {
    /// Approach a stranger
    Approach,
    /// Hold a conversation
    Conversation,
    /// Upload a recording
    Upload,
    /// Review the analysis
    Analysis,
    /// Update the profile
    Profile,
    /// Share with the community
    Community,
}

impl StepType {
    /// All accepted step types
    pub const ALL: [Self; 6] = [
        Self::Approach,
        Self::Conversation,
        Self::Upload,
        Self::Analysis,
        Self::Profile,
        Self::Community,
    ];

    /// Wire and storage representation
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Approach => "approach",
            Self::Conversation => "conversation",
            Self::Upload => "upload",
            Self::Analysis => "analysis",
            Self::Profile => "profile",
            Self::Community => "community",
        }
    }
}

impl fmt::Display for StepType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StepType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| AppError::invalid_input(format!("Invalid step type: {s}")))
    }
}

/// Normalize a stored popup config column: NULL and empty become `"[]"`
#[must_use]
pub fn normalize_popup_configs(stored: Option<String>) -> String {
    match stored {
        Some(value) if !value.trim().is_empty() => value,
        _ => EMPTY_POPUP_CONFIGS.to_owned(),
    }
}

/// Text to store for a `popup_configs` value taken from a request body
///
/// `null` resets to `"[]"`, strings are kept verbatim and any other JSON value
/// is stored as its serialized text.
#[must_use]
pub fn popup_configs_from_json(value: &Value) -> String {
    match value {
        Value::Null => EMPTY_POPUP_CONFIGS.to_owned(),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// A training module
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExposureModule {
    /// Caller supplied identifier
    pub id: String,
    /// Title
    pub title: String,
    /// Description
    pub description: String,
    /// Icon name
    pub icon: String,
    /// Theme color
    pub color: String,
    /// Ascending display order
    pub display_order: i32,
    /// Whether the module is visible in the app
    pub is_active: bool,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Last modification time
    pub updated_at: DateTime<Utc>,
    /// Steps ordered by `step_order`
    pub steps: Vec<ExposureStep>,
}

/// A step inside a module
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExposureStep {
    /// Generated identifier
    pub id: Uuid,
    /// Owning module
    pub module_id: String,
    /// Position inside the module
    pub step_order: i32,
    /// Screen kind
    pub step_type: StepType,
    /// Title
    pub title: String,
    /// Description
    pub description: String,
    /// Guide text
    pub guide_content: String,
    /// Scenario list heading
    pub scenario_list_title: String,
    /// Scenario list body
    pub scenario_list_content: String,
    /// JSON encoded popup array, never empty
    pub popup_configs: String,
    /// Icon name
    pub icon: String,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Last modification time
    pub updated_at: DateTime<Utc>,
}

/// Body of `POST /admin/exposure/modules`
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct NewExposureModule {
    /// Caller supplied identifier
    #[serde(default)]
    pub id: String,
    /// Title
    #[serde(default)]
    pub title: String,
    /// Description
    #[serde(default)]
    pub description: String,
    /// Icon name
    #[serde(default)]
    pub icon: String,
    /// Theme color
    #[serde(default)]
    pub color: String,
    /// Display order, 0 when omitted
    #[serde(default)]
    pub display_order: i32,
    /// Visibility, active when omitted
    pub is_active: Option<bool>,
}

impl NewExposureModule {
    /// Check required fields
    pub fn validated(self) -> AppResult<Self> {
        Ok(Self {
            id: require_text(&self.id, "id")?,
            title: require_text(&self.title, "title")?,
            description: require_text(&self.description, "description")?,
            icon: require_text(&self.icon, "icon")?,
            color: require_text(&self.color, "color")?,
            display_order: self.display_order,
            is_active: self.is_active,
        })
    }
}

/// Body of `PUT /admin/exposure/modules/:id`
///
/// Empty strings count as "not provided" for the text fields.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ModulePatch {
    /// New title
    pub title: Option<String>,
    /// New description
    pub description: Option<String>,
    /// New icon
    pub icon: Option<String>,
    /// New color
    pub color: Option<String>,
    /// New display order
    pub display_order: Option<i32>,
    /// New visibility
    pub is_active: Option<bool>,
}

impl ModulePatch {
    /// Drop empty text fields
    #[must_use]
    pub fn normalized(self) -> Self {
        Self {
            title: non_empty(self.title),
            description: non_empty(self.description),
            icon: non_empty(self.icon),
            color: non_empty(self.color),
            display_order: self.display_order,
            is_active: self.is_active,
        }
    }
}

/// Body of `POST /admin/exposure/modules/:id/steps`
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct NewExposureStep {
    /// Position inside the module
    pub step_order: Option<i32>,
    /// Screen kind, validated against [`StepType`]
    #[serde(default)]
    pub step_type: String,
    /// Title
    #[serde(default)]
    pub title: String,
    /// Description
    #[serde(default)]
    pub description: String,
    /// Guide text
    #[serde(default)]
    pub guide_content: String,
    /// Scenario list heading
    #[serde(default)]
    pub scenario_list_title: String,
    /// Scenario list body
    #[serde(default)]
    pub scenario_list_content: String,
    /// Popup array as JSON text or a JSON value
    #[serde(default)]
    pub popup_configs: Value,
    /// Icon name
    #[serde(default)]
    pub icon: String,
}

/// A validated step ready for insert
#[derive(Debug, Clone)]
pub struct StepDraft {
    /// Position inside the module
    pub step_order: i32,
    /// Screen kind
    pub step_type: StepType,
    /// Title
    pub title: String,
    /// Description
    pub description: String,
    /// Guide text
    pub guide_content: String,
    /// Scenario list heading
    pub scenario_list_title: String,
    /// Scenario list body
    pub scenario_list_content: String,
    /// Popup array as JSON text
    pub popup_configs: String,
    /// Icon name
    pub icon: String,
}

impl NewExposureStep {
    /// Check required fields and the step type
    pub fn validated(self) -> AppResult<StepDraft> {
        let step_order = self
            .step_order
            .ok_or_else(|| AppError::missing_field("step_order is required"))?;
        let step_type = require_text(&self.step_type, "step_type")?.parse()?;
        let popup_configs = normalize_popup_configs(Some(popup_configs_from_json(&self.popup_configs)));

        Ok(StepDraft {
            step_order,
            step_type,
            title: require_text(&self.title, "title")?,
            description: require_text(&self.description, "description")?,
            guide_content: self.guide_content,
            scenario_list_title: self.scenario_list_title,
            scenario_list_content: self.scenario_list_content,
            popup_configs,
            icon: require_text(&self.icon, "icon")?,
        })
    }
}

/// Sparse step update decoded from the raw request object
///
/// Decoding from a [`Value`] keeps the difference between an absent
/// `popup_configs` key (unchanged) and an explicit `null` (reset to `"[]"`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepPatch {
    /// New position
    pub step_order: Option<i32>,
    /// New screen kind
    pub step_type: Option<StepType>,
    /// New title
    pub title: Option<String>,
    /// New description
    pub description: Option<String>,
    /// New guide text
    pub guide_content: Option<String>,
    /// New scenario heading
    pub scenario_list_title: Option<String>,
    /// New scenario body
    pub scenario_list_content: Option<String>,
    /// New popup array text
    pub popup_configs: Option<String>,
    /// New icon
    pub icon: Option<String>,
}

impl StepPatch {
    /// Decode a patch from a JSON object body
    pub fn from_json(body: &Value) -> AppResult<Self> {
        let object = body
            .as_object()
            .ok_or_else(|| AppError::invalid_input("Request body must be a JSON object"))?;

        let patch = Self {
            step_order: object
                .get("step_order")
                .map(|v| {
                    integral_i32(v)
                        .ok_or_else(|| AppError::invalid_input("step_order must be an integer"))
                })
                .transpose()?,
            step_type: text_field(object, "step_type")?
                .map(|t| t.parse())
                .transpose()?,
            title: text_field(object, "title")?,
            description: text_field(object, "description")?,
            guide_content: text_field(object, "guide_content")?,
            scenario_list_title: text_field(object, "scenario_list_title")?,
            scenario_list_content: text_field(object, "scenario_list_content")?,
            popup_configs: object.get("popup_configs").map(popup_configs_from_json),
            icon: text_field(object, "icon")?,
        };

        if patch.is_empty() {
            return Err(AppError::invalid_input("No fields to update"));
        }
        Ok(patch)
    }

    /// Whether the patch changes nothing
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Any JSON number with no fractional part that fits in `i32` (`2` and `2.0`)
fn integral_i32(value: &Value) -> Option<i32> {
    if let Some(n) = value.as_i64() {
        return i32::try_from(n).ok();
    }
    let f = value.as_f64()?;
    if f.fract().abs() > f64::EPSILON || f < f64::from(i32::MIN) || f > f64::from(i32::MAX) {
        return None;
    }
    Some(f as i32)
}

fn text_field(object: &Map<String, Value>, key: &str) -> AppResult<Option<String>> {
    match object.get(key) {
        None => Ok(None),
        Some(Value::String(text)) => Ok(Some(text.clone())),
        Some(_) => Err(AppError::invalid_input(format!("{key} must be a string"))),
    }
}

/// One entry of a step reorder request
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StepOrderItem {
    /// Step identifier, parsed inside the reorder transaction
    pub id: String,
    /// New position
    pub order: i32,
}

/// Body of `PUT /admin/exposure/modules/:id/steps/order`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReorderStepsRequest {
    /// New positions
    pub steps: Vec<StepOrderItem>,
}

/// One entry of a module reorder request
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ModuleOrderItem {
    /// Module identifier
    pub id: String,
    /// New display order
    pub order: i32,
}

/// Body of `PUT /admin/exposure/modules/order`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReorderModulesRequest {
    /// New display orders
    pub modules: Vec<ModuleOrderItem>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_step_type_parsing() {
        assert_eq!("approach".parse::<StepType>().unwrap(), StepType::Approach);
        assert_eq!("community".parse::<StepType>().unwrap(), StepType::Community);
        let err = "meditation".parse::<StepType>().unwrap_err();
        assert_eq!(err.http_status(), 400);
        assert!("Approach".parse::<StepType>().is_err());
    }

    #[test]
    fn test_normalize_popup_configs() {
        assert_eq!(normalize_popup_configs(None), "[]");
        assert_eq!(normalize_popup_configs(Some(String::new())), "[]");
        assert_eq!(
            normalize_popup_configs(Some(r#"[{"title":"Tip"}]"#.to_owned())),
            r#"[{"title":"Tip"}]"#
        );
    }

    #[test]
    fn test_patch_popup_null_resets() {
        let patch = StepPatch::from_json(&json!({ "popup_configs": null })).unwrap();
        assert_eq!(patch.popup_configs.as_deref(), Some("[]"));
    }

    #[test]
    fn test_patch_popup_absent_is_unchanged() {
        let patch = StepPatch::from_json(&json!({ "title": "New" })).unwrap();
        assert!(patch.popup_configs.is_none());
        assert_eq!(patch.title.as_deref(), Some("New"));
    }

    #[test]
    fn test_patch_popup_array_is_stored_as_text() {
        let patch = StepPatch::from_json(&json!({ "popup_configs": [{"title": "Tip"}] })).unwrap();
        assert_eq!(patch.popup_configs.as_deref(), Some(r#"[{"title":"Tip"}]"#));
    }

    #[test]
    fn test_patch_step_order_accepts_integral_numbers() {
        let patch = StepPatch::from_json(&json!({ "step_order": 2.0 })).unwrap();
        assert_eq!(patch.step_order, Some(2));
        let patch = StepPatch::from_json(&json!({ "step_order": 3 })).unwrap();
        assert_eq!(patch.step_order, Some(3));

        for bad in [json!(2.5), json!("2"), json!(1e12)] {
            let err = StepPatch::from_json(&json!({ "step_order": bad })).unwrap_err();
            assert_eq!(err.message, "step_order must be an integer");
        }
    }

    #[test]
    fn test_patch_rejects_empty_and_bad_types() {
        assert!(StepPatch::from_json(&json!({})).is_err());
        assert!(StepPatch::from_json(&json!({ "unknown": 1 })).is_err());
        assert!(StepPatch::from_json(&json!({ "step_type": "dance" })).is_err());
        assert!(StepPatch::from_json(&json!({ "title": 5 })).is_err());
        assert!(StepPatch::from_json(&json!([1, 2])).is_err());
    }

    #[test]
    fn test_new_step_requires_order_and_valid_type() {
        let mut step = NewExposureStep {
            step_type: "approach".to_owned(),
            title: "S1".to_owned(),
            description: "d".to_owned(),
            icon: "i".to_owned(),
            ..NewExposureStep::default()
        };
        assert_eq!(step.clone().validated().unwrap_err().message, "step_order is required");

        step.step_order = Some(1);
        let draft = step.clone().validated().unwrap();
        assert_eq!(draft.step_type, StepType::Approach);
        assert_eq!(draft.popup_configs, "[]");

        step.step_type = "other".to_owned();
        assert!(step.validated().is_err());
    }
}
