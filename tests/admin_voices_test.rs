// ABOUTME: Integration tests for voice type and AI persona administration
// ABOUTME: Tests voice validation, default voice fallback, optimistic versioning and the settings snapshot
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fluent Life

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;
mod helpers;

use axum::{http::StatusCode, Router};
use common::{create_test_router, TEST_ADMIN_TOKEN};
use fluent_admin_api::constants::{defaults, setting_keys::AI_SIMULATION_ROLES};
use helpers::axum_test::AxumTestRequest;
use serde_json::{json, Value};

// ============================================================================
// Test Helpers
// ============================================================================

async fn create_voice(router: &Router, name: &str, code: &str, enabled: bool) -> Value {
    AxumTestRequest::post("/admin/voice-types")
        .bearer(TEST_ADMIN_TOKEN)
        .json(&json!({
            "name": name,
            "type": code,
            "description": "test voice",
            "enabled": enabled
        }))
        .send(router.clone())
        .await
        .assert_status(StatusCode::OK)
        .data()
}

async fn create_persona(router: &Router, body: &Value) -> axum::http::StatusCode {
    AxumTestRequest::post("/admin/ai-roles")
        .bearer(TEST_ADMIN_TOKEN)
        .json(body)
        .send(router.clone())
        .await
        .status_code()
}

async fn get_persona(router: &Router, id: &str) -> Value {
    AxumTestRequest::get(&format!("/admin/ai-roles/{id}"))
        .bearer(TEST_ADMIN_TOKEN)
        .send(router.clone())
        .await
        .assert_status(StatusCode::OK)
        .data()
}

async fn snapshot(router: &Router) -> Vec<Value> {
    let setting = AxumTestRequest::get(&format!("/admin/app-settings/{AI_SIMULATION_ROLES}"))
        .bearer(TEST_ADMIN_TOKEN)
        .send(router.clone())
        .await
        .assert_status(StatusCode::OK)
        .data();
    serde_json::from_str(setting["value"].as_str().unwrap()).unwrap()
}

fn persona(id: &str, voice_type: &str) -> Value {
    json!({
        "id": id,
        "name": "Interviewer",
        "description": "Mock job interview",
        "system_prompt": "You are a strict interviewer.",
        "voice_type": voice_type,
        "enabled": true
    })
}

// ============================================================================
// Voice Types
// ============================================================================

#[tokio::test]
async fn test_voice_type_crud() {
    let (router, _db) = create_test_router().await.unwrap();

    let voice = create_voice(&router, "Vivi", "zh_female_vv_uranus_bigtts", true).await;
    assert_eq!(voice["type"], "zh_female_vv_uranus_bigtts");
    let id = voice["id"].as_str().unwrap();

    let updated = AxumTestRequest::put(&format!("/admin/voice-types/{id}"))
        .bearer(TEST_ADMIN_TOKEN)
        .json(&json!({
            "name": "Vivi 2.0",
            "type": "zh_female_vv_uranus_bigtts",
            "description": "general purpose"
        }))
        .send(router.clone())
        .await
        .assert_status(StatusCode::OK)
        .data();
    assert_eq!(updated["name"], "Vivi 2.0");
    assert_eq!(updated["enabled"], true);

    AxumTestRequest::delete(&format!("/admin/voice-types/{id}"))
        .bearer(TEST_ADMIN_TOKEN)
        .send(router.clone())
        .await
        .assert_status(StatusCode::OK);

    AxumTestRequest::get(&format!("/admin/voice-types/{id}"))
        .bearer(TEST_ADMIN_TOKEN)
        .send(router)
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_duplicate_voice_type_conflicts() {
    let (router, _db) = create_test_router().await.unwrap();
    create_voice(&router, "Vivi", "vivi", true).await;
    let other = create_voice(&router, "Yunzhou", "yunzhou", true).await;

    let response = AxumTestRequest::post("/admin/voice-types")
        .bearer(TEST_ADMIN_TOKEN)
        .json(&json!({ "name": "Vivi again", "type": "vivi" }))
        .send(router.clone())
        .await;
    assert_eq!(response.status_code(), StatusCode::CONFLICT);
    assert_eq!(response.message(), "Voice type already exists");

    let id = other["id"].as_str().unwrap();
    let response = AxumTestRequest::put(&format!("/admin/voice-types/{id}"))
        .bearer(TEST_ADMIN_TOKEN)
        .json(&json!({ "name": "Yunzhou", "type": "vivi" }))
        .send(router)
        .await;
    assert_eq!(response.status_code(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_enabled_voice_types_projection() {
    let (router, _db) = create_test_router().await.unwrap();
    create_voice(&router, "Beta", "beta", true).await;
    create_voice(&router, "Alpha", "alpha", true).await;
    create_voice(&router, "Hidden", "hidden", false).await;

    let data = AxumTestRequest::get("/admin/voice-types/enabled")
        .bearer(TEST_ADMIN_TOKEN)
        .send(router.clone())
        .await
        .assert_status(StatusCode::OK)
        .data();
    assert_eq!(
        data["voice_types"],
        json!([{ "type": "alpha", "name": "Alpha" }, { "type": "beta", "name": "Beta" }])
    );

    let all = AxumTestRequest::get("/admin/voice-types")
        .bearer(TEST_ADMIN_TOKEN)
        .send(router)
        .await
        .data();
    assert_eq!(all["voice_types"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_malformed_voice_type_id_is_bad_request() {
    let (router, _db) = create_test_router().await.unwrap();

    let response = AxumTestRequest::get("/admin/voice-types/abc")
        .bearer(TEST_ADMIN_TOKEN)
        .send(router)
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.message(), "Invalid voice type id");
}

// ============================================================================
// AI Personas
// ============================================================================

#[tokio::test]
async fn test_persona_requires_enabled_voice_type() {
    let (router, _db) = create_test_router().await.unwrap();
    create_voice(&router, "Hidden", "hidden", false).await;

    let response = AxumTestRequest::post("/admin/ai-roles")
        .bearer(TEST_ADMIN_TOKEN)
        .json(&persona("interviewer", "hidden"))
        .send(router.clone())
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(
        response.message(),
        "Voice type does not exist or is disabled: hidden"
    );

    assert_eq!(
        create_persona(&router, &persona("interviewer", "unknown")).await,
        StatusCode::BAD_REQUEST
    );
}

#[tokio::test]
async fn test_persona_voice_falls_back_to_first_enabled_then_default() {
    let (router, _db) = create_test_router().await.unwrap();

    assert_eq!(create_persona(&router, &persona("first", "")).await, StatusCode::OK);
    assert_eq!(get_persona(&router, "first").await["voice_type"], defaults::VOICE_TYPE);

    create_voice(&router, "Vivi", "vivi", true).await;
    create_voice(&router, "Dayi", "dayi", true).await;

    assert_eq!(create_persona(&router, &persona("second", "")).await, StatusCode::OK);
    assert_eq!(get_persona(&router, "second").await["voice_type"], "vivi");
}

#[tokio::test]
async fn test_duplicate_persona_conflicts() {
    let (router, _db) = create_test_router().await.unwrap();
    create_persona(&router, &persona("interviewer", "")).await;

    let response = AxumTestRequest::post("/admin/ai-roles")
        .bearer(TEST_ADMIN_TOKEN)
        .json(&persona("interviewer", ""))
        .send(router)
        .await;

    assert_eq!(response.status_code(), StatusCode::CONFLICT);
    assert_eq!(response.message(), "AI role already exists: interviewer");
}

#[tokio::test]
async fn test_persona_update_replaces_fields_and_bumps_version() {
    let (router, _db) = create_test_router().await.unwrap();
    create_voice(&router, "Vivi", "vivi", true).await;
    create_persona(&router, &persona("interviewer", "vivi")).await;
    assert_eq!(get_persona(&router, "interviewer").await["version"], 1);

    let updated = AxumTestRequest::put("/admin/ai-roles/interviewer")
        .bearer(TEST_ADMIN_TOKEN)
        .json(&json!({
            "name": "Friendly interviewer",
            "system_prompt": "Be kind.",
            "voice_type": "vivi",
            "enabled": false,
            "version": 1
        }))
        .send(router.clone())
        .await
        .assert_status(StatusCode::OK)
        .data();

    assert_eq!(updated["name"], "Friendly interviewer");
    assert_eq!(updated["description"], "");
    assert_eq!(updated["enabled"], false);
    assert_eq!(updated["version"], 2);
}

#[tokio::test]
async fn test_stale_persona_version_conflicts_and_leaves_row() {
    let (router, _db) = create_test_router().await.unwrap();
    create_persona(&router, &persona("interviewer", "")).await;

    let response = AxumTestRequest::put("/admin/ai-roles/interviewer")
        .bearer(TEST_ADMIN_TOKEN)
        .json(&json!({
            "name": "Overwritten",
            "system_prompt": "x",
            "version": 7
        }))
        .send(router.clone())
        .await;
    assert_eq!(response.status_code(), StatusCode::CONFLICT);

    let stored = get_persona(&router, "interviewer").await;
    assert_eq!(stored["name"], "Interviewer");
    assert_eq!(stored["version"], 1);
}

#[tokio::test]
async fn test_update_missing_persona_is_not_found() {
    let (router, _db) = create_test_router().await.unwrap();

    let response = AxumTestRequest::put("/admin/ai-roles/ghost")
        .bearer(TEST_ADMIN_TOKEN)
        .json(&json!({ "name": "Ghost", "system_prompt": "boo" }))
        .send(router)
        .await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_persona_mutations_publish_snapshot() {
    let (router, _db) = create_test_router().await.unwrap();

    create_persona(&router, &persona("interviewer", "")).await;
    create_persona(&router, &persona("tutor", "")).await;
    let ids: Vec<String> = snapshot(&router)
        .await
        .iter()
        .map(|p| p["id"].as_str().unwrap().to_owned())
        .collect();
    assert_eq!(ids, ["interviewer", "tutor"]);

    AxumTestRequest::delete("/admin/ai-roles/interviewer")
        .bearer(TEST_ADMIN_TOKEN)
        .send(router.clone())
        .await
        .assert_status(StatusCode::OK);
    let remaining = snapshot(&router).await;
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0]["id"], "tutor");

    AxumTestRequest::delete("/admin/ai-roles/interviewer")
        .bearer(TEST_ADMIN_TOKEN)
        .send(router)
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_snapshot_setting_is_read_only_through_app_settings() {
    let (router, _db) = create_test_router().await.unwrap();
    create_persona(&router, &persona("coach", "")).await;

    let overwrite = AxumTestRequest::put(&format!("/admin/app-settings/{AI_SIMULATION_ROLES}"))
        .bearer(TEST_ADMIN_TOKEN)
        .json(&json!({ "value": json!([persona("tutor", "")]).to_string() }))
        .send(router.clone())
        .await;
    assert_eq!(overwrite.status_code(), StatusCode::CONFLICT);
    assert_eq!(
        overwrite.message(),
        format!("Setting {AI_SIMULATION_ROLES} is managed by /admin/ai-roles")
    );

    AxumTestRequest::delete(&format!("/admin/app-settings/{AI_SIMULATION_ROLES}"))
        .bearer(TEST_ADMIN_TOKEN)
        .send(router.clone())
        .await
        .assert_status(StatusCode::CONFLICT);

    let ids: Vec<Value> = snapshot(&router).await.iter().map(|p| p["id"].clone()).collect();
    assert_eq!(ids, [json!("coach")]);

    let personas = AxumTestRequest::get("/admin/ai-roles")
        .bearer(TEST_ADMIN_TOKEN)
        .send(router)
        .await
        .data();
    assert_eq!(personas["roles"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_init_from_config_resets_to_defaults() {
    let (router, _db) = create_test_router().await.unwrap();
    create_persona(&router, &persona("custom", "")).await;

    let data = AxumTestRequest::post("/admin/ai-roles/init-from-config")
        .bearer(TEST_ADMIN_TOKEN)
        .send(router.clone())
        .await
        .assert_status(StatusCode::OK)
        .data();
    let ids: Vec<&str> = data["roles"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, ["interviewer", "language_tutor", "presentation_coach"]);

    AxumTestRequest::get("/admin/ai-roles/custom")
        .bearer(TEST_ADMIN_TOKEN)
        .send(router.clone())
        .await
        .assert_status(StatusCode::NOT_FOUND);
    assert_eq!(snapshot(&router).await.len(), 3);

    let logs = AxumTestRequest::get("/admin/operation-logs?resource=ai_role")
        .bearer(TEST_ADMIN_TOKEN)
        .send(router)
        .await
        .data();
    assert_eq!(logs["logs"][0]["action"], "reset");
    assert_eq!(logs["logs"][0]["resource_id"], "*");
}

#[tokio::test]
async fn test_legacy_personas_are_imported_once() {
    let (_router, db) = create_test_router().await.unwrap();
    let legacy = json!([
        { "id": "coach", "name": "Coach", "system_prompt": "p", "voice_type": "v", "enabled": true },
        { "id": "", "name": "No id", "system_prompt": "p" }
    ]);
    db.set_app_setting(AI_SIMULATION_ROLES, &legacy.to_string(), None)
        .await
        .unwrap();

    assert_eq!(db.import_legacy_ai_roles().await.unwrap(), 1);
    assert_eq!(db.import_legacy_ai_roles().await.unwrap(), 0);

    let roles = db.list_ai_roles().await.unwrap();
    assert_eq!(roles.len(), 1);
    assert_eq!(roles[0].id, "coach");
    assert_eq!(roles[0].version, 1);
}
