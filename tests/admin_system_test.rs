// ABOUTME: Integration tests for app settings, the operation log, health and the middleware stack
// ABOUTME: Tests upsert semantics, audit entries, envelope shapes and request id propagation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fluent Life

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;
mod helpers;

use axum::http::StatusCode;
use common::{create_test_router, create_test_router_with, test_config, TEST_ADMIN_TOKEN};
use helpers::axum_test::AxumTestRequest;
use serde_json::{json, Value};

// ============================================================================
// App Settings
// ============================================================================

#[tokio::test]
async fn test_setting_upsert_keeps_description() {
    let (router, _db) = create_test_router().await.unwrap();

    let created = AxumTestRequest::put("/admin/app-settings/support_email")
        .bearer(TEST_ADMIN_TOKEN)
        .json(&json!({ "value": "help@fluent.life", "description": "Support contact" }))
        .send(router.clone())
        .await
        .assert_status(StatusCode::OK)
        .data();
    assert_eq!(created["key"], "support_email");
    assert_eq!(created["description"], "Support contact");

    let updated = AxumTestRequest::put("/admin/app-settings/support_email")
        .bearer(TEST_ADMIN_TOKEN)
        .json(&json!({ "value": "care@fluent.life" }))
        .send(router.clone())
        .await
        .assert_status(StatusCode::OK)
        .data();
    assert_eq!(updated["value"], "care@fluent.life");
    assert_eq!(updated["description"], "Support contact");

    let listed = AxumTestRequest::get("/admin/app-settings")
        .bearer(TEST_ADMIN_TOKEN)
        .send(router)
        .await
        .data();
    assert_eq!(listed["settings"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_setting_upsert_requires_value() {
    let (router, _db) = create_test_router().await.unwrap();

    let response = AxumTestRequest::put("/admin/app-settings/support_email")
        .bearer(TEST_ADMIN_TOKEN)
        .json(&json!({ "description": "no value" }))
        .send(router)
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.message(), "value is required");
}

#[tokio::test]
async fn test_missing_setting_is_not_found() {
    let (router, _db) = create_test_router().await.unwrap();

    let response = AxumTestRequest::get("/admin/app-settings/nothing")
        .bearer(TEST_ADMIN_TOKEN)
        .send(router.clone())
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    assert_eq!(response.message(), "Setting not found: nothing");

    AxumTestRequest::delete("/admin/app-settings/nothing")
        .bearer(TEST_ADMIN_TOKEN)
        .send(router)
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_malformed_json_body_uses_error_envelope() {
    let (router, _db) = create_test_router().await.unwrap();

    let response = AxumTestRequest::put("/admin/app-settings/support_email")
        .bearer(TEST_ADMIN_TOKEN)
        .raw_body("{not json", "application/json")
        .send(router)
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["success"], false);
    assert!(body["message"]
        .as_str()
        .unwrap()
        .starts_with("Invalid request body"));
}

// ============================================================================
// Operation Log
// ============================================================================

#[tokio::test]
async fn test_mutations_are_logged_newest_first() {
    let (router, _db) = create_test_router().await.unwrap();

    AxumTestRequest::put("/admin/app-settings/theme")
        .bearer(TEST_ADMIN_TOKEN)
        .json(&json!({ "value": "dark" }))
        .send(router.clone())
        .await
        .assert_status(StatusCode::OK);
    AxumTestRequest::post("/admin/roles")
        .bearer(TEST_ADMIN_TOKEN)
        .json(&json!({ "name": "Editor", "code": "editor" }))
        .send(router.clone())
        .await
        .assert_status(StatusCode::OK);
    AxumTestRequest::delete("/admin/app-settings/theme")
        .bearer(TEST_ADMIN_TOKEN)
        .send(router.clone())
        .await
        .assert_status(StatusCode::OK);

    let all = AxumTestRequest::get("/admin/operation-logs")
        .bearer(TEST_ADMIN_TOKEN)
        .send(router.clone())
        .await
        .assert_status(StatusCode::OK)
        .data();
    assert_eq!(all["total"], 3);
    let latest = &all["logs"][0];
    assert_eq!(latest["action"], "delete");
    assert_eq!(latest["resource"], "app_setting");
    assert_eq!(latest["resource_id"], "theme");
    assert_eq!(latest["username"], "static-token");
    assert_eq!(latest["user_role"], "admin");
    assert_eq!(latest["status"], "success");

    let settings_only = AxumTestRequest::get("/admin/operation-logs?resource=app_setting")
        .bearer(TEST_ADMIN_TOKEN)
        .send(router.clone())
        .await
        .data();
    assert_eq!(settings_only["total"], 2);

    let blank_filter = AxumTestRequest::get("/admin/operation-logs?resource=%20")
        .bearer(TEST_ADMIN_TOKEN)
        .send(router)
        .await
        .data();
    assert_eq!(blank_filter["total"], 3);
}

#[tokio::test]
async fn test_failed_mutations_are_not_logged() {
    let (router, _db) = create_test_router().await.unwrap();

    AxumTestRequest::delete("/admin/app-settings/absent")
        .bearer(TEST_ADMIN_TOKEN)
        .send(router.clone())
        .await
        .assert_status(StatusCode::NOT_FOUND);

    let logs = AxumTestRequest::get("/admin/operation-logs")
        .bearer(TEST_ADMIN_TOKEN)
        .send(router)
        .await
        .data();
    assert_eq!(logs["total"], 0);
}

// ============================================================================
// Health and Middleware
// ============================================================================

#[tokio::test]
async fn test_health_reports_database() {
    let (router, _db) = create_test_router().await.unwrap();

    let body: Value = AxumTestRequest::get("/health")
        .send(router)
        .await
        .assert_status(StatusCode::OK)
        .json();

    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "ok");
    assert_eq!(body["service"], "fluent-admin-api");
}

#[tokio::test]
async fn test_request_id_is_generated_and_propagated() {
    let (router, _db) = create_test_router().await.unwrap();

    let generated = AxumTestRequest::get("/health").send(router.clone()).await;
    assert!(generated.header("x-request-id").is_some());

    let echoed = AxumTestRequest::get("/health")
        .header("x-request-id", "req-123")
        .send(router)
        .await;
    assert_eq!(echoed.header("x-request-id").as_deref(), Some("req-123"));
}

#[tokio::test]
async fn test_oversized_body_is_rejected() {
    let mut config = test_config();
    config.max_body_bytes = 64;
    let (router, _db) = create_test_router_with(&config).await.unwrap();

    let body = json!({ "value": "x".repeat(256) }).to_string();
    let response = AxumTestRequest::put("/admin/app-settings/big")
        .bearer(TEST_ADMIN_TOKEN)
        .header("content-length", &body.len().to_string())
        .raw_body(&body, "application/json")
        .send(router)
        .await;

    assert_eq!(response.status_code(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn test_cors_preflight_is_answered() {
    let (router, _db) = create_test_router().await.unwrap();

    let response = AxumTestRequest::options("/admin/roles")
        .header("origin", "https://admin.fluent.life")
        .header("access-control-request-method", "DELETE")
        .send(router)
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(
        response.header("access-control-allow-origin").as_deref(),
        Some("*")
    );
}
