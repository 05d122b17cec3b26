//! API-surface tests for submission and polling. No worker runs
//! here, so submitted jobs stay queued.

mod common;

use axum::http::StatusCode;
use serde_json::json;
use vocalis_core::types::JobId;

#[tokio::test]
async fn submit_against_unknown_voice_is_404_and_creates_nothing() {
    let app = common::spawn_app().await;

    let response = common::post_json(
        &app,
        "/api/v1/tts",
        json!({
            "user_id": "alice",
            "voice_name": "ghost",
            "text": "hello",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = common::body_json(response).await;
    assert_eq!(body["code"], "NOT_FOUND");
    assert_eq!(body["error"], "Voice not found: alice/ghost");

    // No record was persisted for the rejected submission.
    let records = app.store.list().await.unwrap();
    assert!(records.is_empty());
}

#[tokio::test]
async fn submit_returns_202_with_queued_status() {
    let app = common::spawn_app().await;
    common::upload_voice(&app, "alice", "My Voice").await;

    let response = common::post_json(
        &app,
        "/api/v1/tts",
        json!({
            "user_id": "alice",
            "voice_name": "My Voice",
            "text": "hello world",
            "language": "en",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::ACCEPTED);

    let body = common::body_json(response).await;
    assert_eq!(body["status"], "queued");
    assert!(body["queue_position"].as_u64().unwrap() >= 1);

    // The record is immediately observable through the status
    // endpoint.
    let job_id = body["job_id"].as_str().unwrap().to_string();
    let status = common::get(&app, &format!("/api/v1/tts/{job_id}")).await;
    assert_eq!(status.status(), StatusCode::OK);
    let status = common::body_json(status).await;
    assert_eq!(status["status"], "queued");
    assert_eq!(status["job_id"], job_id.as_str());
    assert!(status["created_at"].is_string());
}

#[tokio::test]
async fn submit_with_empty_text_is_400() {
    let app = common::spawn_app().await;
    common::upload_voice(&app, "alice", "My Voice").await;

    let response = common::post_json(
        &app,
        "/api/v1/tts",
        json!({
            "user_id": "alice",
            "voice_name": "My Voice",
            "text": "   ",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = common::body_json(response).await;
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn unknown_job_is_404() {
    let app = common::spawn_app().await;

    let bogus = JobId::new();
    let response = common::get(&app, &format!("/api/v1/tts/{bogus}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = common::body_json(response).await;
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn queue_endpoint_reports_pending_jobs() {
    let app = common::spawn_app().await;
    common::upload_voice(&app, "alice", "My Voice").await;

    for _ in 0..3 {
        let response = common::post_json(
            &app,
            "/api/v1/tts",
            json!({
                "user_id": "alice",
                "voice_name": "My Voice",
                "text": "hello",
            }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::ACCEPTED);
    }

    let response = common::get(&app, "/api/v1/queue").await;
    let body = common::body_json(response).await;
    assert_eq!(body["data"]["pending"], 3);
}

#[tokio::test]
async fn language_defaults_when_omitted() {
    let app = common::spawn_app().await;
    common::upload_voice(&app, "alice", "My Voice").await;

    let response = common::post_json(
        &app,
        "/api/v1/tts",
        json!({
            "user_id": "alice",
            "voice_name": "My Voice",
            "text": "no language given",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::ACCEPTED);
    let body = common::body_json(response).await;

    let job_id = vocalis_core::types::JobId::from(body["job_id"].as_str().unwrap());
    let record = app.store.read(&job_id).await.unwrap().unwrap();
    assert_eq!(record.language, "en");
}
