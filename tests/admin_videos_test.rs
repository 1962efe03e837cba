// ABOUTME: Integration tests for the video aggregator over training records and community posts
// ABOUTME: Tests source filtering, source probing, soft deletes and batch delete accounting
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fluent Life

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;
mod helpers;

use std::sync::Arc;

use axum::{http::StatusCode, Router};
use common::{create_test_router, insert_post, insert_training_record, insert_user, TEST_ADMIN_TOKEN};
use fluent_admin_api::database::Database;
use helpers::axum_test::AxumTestRequest;
use serde_json::{json, Value};

struct Fixture {
    router: Router,
    db: Arc<Database>,
    alice: String,
    bob: String,
    exposure_video: String,
    post_video: String,
    image_post: String,
}

async fn setup() -> Fixture {
    let (router, db) = create_test_router().await.unwrap();

    AxumTestRequest::post("/admin/exposure/modules")
        .bearer(TEST_ADMIN_TOKEN)
        .json(&json!({
            "id": "coffee", "title": "Ordering coffee", "description": "d", "icon": "i", "color": "c"
        }))
        .send(router.clone())
        .await
        .assert_status(StatusCode::OK);

    let alice = insert_user(&db, "alice", "user").await.unwrap();
    let bob = insert_user(&db, "bob", "user").await.unwrap();

    let exposure_video = insert_training_record(
        &db,
        &alice,
        "exposure",
        &json!({ "video_url": "https://cdn/e/1.webm", "module_id": "coffee", "step_title": "Greet" }),
        "2025-03-01 10:00:00",
    )
    .await
    .unwrap();
    // Not an exposure record, never listed
    insert_training_record(
        &db,
        &alice,
        "reading",
        &json!({ "video_url": "https://cdn/r/1.mp4" }),
        "2025-03-02 10:00:00",
    )
    .await
    .unwrap();
    // Exposure record without a video
    insert_training_record(&db, &bob, "exposure", &json!({ "module_id": "coffee" }), "2025-03-03 10:00:00")
        .await
        .unwrap();

    let post_video = insert_post(
        &db,
        &bob,
        &"练".repeat(60),
        Some("https://cdn/p/2.MP4"),
        "2025-03-04 10:00:00",
    )
    .await
    .unwrap();
    let image_post = insert_post(&db, &bob, "a photo", Some("https://cdn/p/3.jpg"), "2025-03-05 10:00:00")
        .await
        .unwrap();
    insert_post(&db, &alice, "text only", None, "2025-03-06 10:00:00")
        .await
        .unwrap();

    Fixture {
        router,
        db,
        alice,
        bob,
        exposure_video,
        post_video,
        image_post,
    }
}

async fn list(router: &Router, query: &str) -> Value {
    AxumTestRequest::get(&format!("/admin/videos{query}"))
        .bearer(TEST_ADMIN_TOKEN)
        .send(router.clone())
        .await
        .assert_status(StatusCode::OK)
        .data()
}

// ============================================================================
// Listing
// ============================================================================

#[tokio::test]
async fn test_list_merges_sources_exposure_first() {
    let fx = setup().await;

    let data = list(&fx.router, "").await;
    assert_eq!(data["total"], 2);

    let videos = data["videos"].as_array().unwrap();
    assert_eq!(videos[0]["id"], fx.exposure_video.as_str());
    assert_eq!(videos[0]["source"], "exposure_module");
    assert_eq!(videos[0]["module_title"], "Ordering coffee");
    assert_eq!(videos[0]["username"], "alice");
    assert_eq!(videos[0]["duration"], 120);

    assert_eq!(videos[1]["id"], fx.post_video.as_str());
    assert_eq!(videos[1]["source"], "community_post");
    assert_eq!(videos[1]["post_id"], fx.post_video.as_str());
    assert!(videos[1]["post_title"].as_str().unwrap().ends_with("..."));
}

#[tokio::test]
async fn test_list_filters_by_source_and_user() {
    let fx = setup().await;

    let posts = list(&fx.router, "?source=community_post").await;
    assert_eq!(posts["total"], 1);
    assert_eq!(posts["videos"][0]["source"], "community_post");

    let alice = list(&fx.router, &format!("?user_id={}", fx.alice)).await;
    assert_eq!(alice["total"], 1);
    assert_eq!(alice["videos"][0]["user_id"], fx.alice.as_str());

    let bob_exposure = list(
        &fx.router,
        &format!("?source=exposure_module&user_id={}", fx.bob),
    )
    .await;
    assert_eq!(bob_exposure["total"], 0);

    let by_module = list(&fx.router, "?source=exposure_module&module_id=coffee").await;
    assert_eq!(by_module["total"], 1);
}

#[tokio::test]
async fn test_list_rejects_unknown_source() {
    let fx = setup().await;

    let response = AxumTestRequest::get("/admin/videos?source=youtube")
        .bearer(TEST_ADMIN_TOKEN)
        .send(fx.router)
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.message(), "Invalid video source: youtube");
}

#[tokio::test]
async fn test_module_title_falls_back_to_step_title() {
    let fx = setup().await;
    let orphan = insert_training_record(
        &fx.db,
        &fx.alice,
        "exposure",
        &json!({ "video_url": "https://cdn/e/2.webm", "module_id": "deleted", "step_title": "Smile" }),
        "2025-03-07 10:00:00",
    )
    .await
    .unwrap();

    let video = AxumTestRequest::get(&format!("/admin/videos/{orphan}"))
        .bearer(TEST_ADMIN_TOKEN)
        .send(fx.router)
        .await
        .assert_status(StatusCode::OK)
        .data()["video"]
        .clone();
    assert_eq!(video["module_title"], "Smile");
    assert_eq!(video["module_id"], "deleted");
}

// ============================================================================
// Single Video
// ============================================================================

#[tokio::test]
async fn test_get_probes_sources_when_unspecified() {
    let fx = setup().await;

    let video = AxumTestRequest::get(&format!("/admin/videos/{}", fx.post_video))
        .bearer(TEST_ADMIN_TOKEN)
        .send(fx.router.clone())
        .await
        .assert_status(StatusCode::OK)
        .data()["video"]
        .clone();
    assert_eq!(video["source"], "community_post");

    AxumTestRequest::get(&format!(
        "/admin/videos/{}?source=exposure_module",
        fx.post_video
    ))
    .bearer(TEST_ADMIN_TOKEN)
    .send(fx.router.clone())
    .await
    .assert_status(StatusCode::NOT_FOUND);

    AxumTestRequest::get(&format!("/admin/videos/{}", fx.image_post))
        .bearer(TEST_ADMIN_TOKEN)
        .send(fx.router)
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_exposure_video_keeps_record() {
    let fx = setup().await;

    AxumTestRequest::delete(&format!("/admin/videos/{}", fx.exposure_video))
        .bearer(TEST_ADMIN_TOKEN)
        .send(fx.router.clone())
        .await
        .assert_status(StatusCode::OK);

    let data: String = sqlx::query_scalar("SELECT data FROM training_records WHERE id = ?1")
        .bind(&fx.exposure_video)
        .fetch_one(fx.db.pool())
        .await
        .unwrap();
    let data: Value = serde_json::from_str(&data).unwrap();
    assert!(data.get("video_url").is_none());
    assert_eq!(data["module_id"], "coffee");

    AxumTestRequest::delete(&format!("/admin/videos/{}", fx.exposure_video))
        .bearer(TEST_ADMIN_TOKEN)
        .send(fx.router.clone())
        .await
        .assert_status(StatusCode::NOT_FOUND);

    assert_eq!(list(&fx.router, "").await["total"], 1);
}

#[tokio::test]
async fn test_delete_post_video_blanks_attachment() {
    let fx = setup().await;

    AxumTestRequest::delete(&format!(
        "/admin/videos/{}?source=community_post",
        fx.post_video
    ))
    .bearer(TEST_ADMIN_TOKEN)
    .send(fx.router.clone())
    .await
    .assert_status(StatusCode::OK);

    let image: Option<String> = sqlx::query_scalar("SELECT image FROM posts WHERE id = ?1")
        .bind(&fx.post_video)
        .fetch_one(fx.db.pool())
        .await
        .unwrap();
    assert_eq!(image.as_deref(), Some(""));

    let content: String = sqlx::query_scalar("SELECT content FROM posts WHERE id = ?1")
        .bind(&fx.post_video)
        .fetch_one(fx.db.pool())
        .await
        .unwrap();
    assert_eq!(content.chars().count(), 60);
}

#[tokio::test]
async fn test_delete_image_post_is_not_found() {
    let fx = setup().await;

    AxumTestRequest::delete(&format!("/admin/videos/{}", fx.image_post))
        .bearer(TEST_ADMIN_TOKEN)
        .send(fx.router)
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

// ============================================================================
// Batch Delete
// ============================================================================

#[tokio::test]
async fn test_batch_delete_counts_each_item() {
    let fx = setup().await;

    let response = AxumTestRequest::post("/admin/videos/batch-delete")
        .bearer(TEST_ADMIN_TOKEN)
        .json(&json!({
            "video_ids": [
                { "id": fx.exposure_video, "source": "exposure_module" },
                { "id": fx.post_video, "source": "community_post" },
                { "id": fx.image_post, "source": "community_post" },
                { "id": "missing", "source": "youtube" },
                { "id": "no-source" }
            ]
        }))
        .send(fx.router.clone())
        .await
        .assert_status(StatusCode::OK);

    let body: Value = response.json();
    assert_eq!(body["message"], "Batch delete finished: 2 succeeded, 3 failed");
    assert_eq!(body["data"], json!({ "success_count": 2, "fail_count": 3 }));

    assert_eq!(list(&fx.router, "").await["total"], 0);
}

#[tokio::test]
async fn test_batch_delete_with_empty_list() {
    let fx = setup().await;

    let data = AxumTestRequest::post("/admin/videos/batch-delete")
        .bearer(TEST_ADMIN_TOKEN)
        .json(&json!({ "video_ids": [] }))
        .send(fx.router)
        .await
        .assert_status(StatusCode::OK)
        .data();

    assert_eq!(data, json!({ "success_count": 0, "fail_count": 0 }));
}
