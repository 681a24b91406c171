//! Integration tests for document upload.

use axum::http::{Method, StatusCode};

use sehetak_core::types::UserId;
use sehetak_entity::UserRole;

use crate::helpers::{Part, TestApp};

fn form(owner: UserId, file: Part) -> Vec<Part> {
    vec![
        Part::text("userId", owner),
        Part::text("type", "lab-report"),
        file,
    ]
}

#[tokio::test]
async fn test_upload_creates_version_one() {
    let app = TestApp::new();
    let owner = app.user("amal", UserRole::Patient).await;

    let response = app
        .multipart(
            "/api/documents/upload",
            None,
            form(owner, Part::file("x.pdf", "application/pdf", vec![1u8; 1024])),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json()["message"], "Document uploaded successfully");
    let id = response.json()["document_id"].as_i64().unwrap();

    let versions = app
        .request(Method::GET, &format!("/api/documents/versions/{id}"), None, None)
        .await;
    assert_eq!(versions.status, StatusCode::OK);
    let versions = versions.json();
    assert_eq!(versions.as_array().unwrap().len(), 1);
    assert_eq!(versions[0]["version_number"], 1);
    assert_eq!(versions[0]["uploaded_by"], owner.get());
    assert_eq!(versions[0]["change_description"], "Initial version");
}

#[tokio::test]
async fn test_upload_60_mib_rejected_without_writes() {
    let app = TestApp::new();
    let owner = app.user("amal", UserRole::Patient).await;

    let response = app
        .multipart(
            "/api/documents/upload",
            None,
            form(
                owner,
                Part::file("scan.pdf", "application/pdf", vec![0u8; 60 * 1024 * 1024]),
            ),
        )
        .await;

    assert_eq!(response.status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(response.error_code(), "PAYLOAD_TOO_LARGE");
    assert_eq!(app.store.document_count().await, 0);
    assert_eq!(app.store.version_count().await, 0);
}

#[tokio::test]
async fn test_upload_over_configured_limit() {
    let app = TestApp::with_config(|c| c.documents.max_upload_size_bytes = 1024);
    let owner = app.user("amal", UserRole::Patient).await;

    let response = app
        .multipart(
            "/api/documents/upload",
            None,
            form(owner, Part::file("x.pdf", "application/pdf", vec![1u8; 1025])),
        )
        .await;

    assert_eq!(response.status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(app.store.document_count().await, 0);
}

#[tokio::test]
async fn test_upload_at_exact_limit_accepted() {
    let app = TestApp::with_config(|c| c.documents.max_upload_size_bytes = 1024);
    let owner = app.user("amal", UserRole::Patient).await;

    let response = app
        .multipart(
            "/api/documents/upload",
            None,
            form(owner, Part::file("x.pdf", "application/pdf", vec![1u8; 1024])),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_upload_unsupported_media_type() {
    let app = TestApp::new();
    let owner = app.user("amal", UserRole::Patient).await;

    let response = app
        .multipart(
            "/api/documents/upload",
            None,
            form(
                owner,
                Part::file("setup.exe", "application/x-msdownload", vec![0x4d, 0x5a]),
            ),
        )
        .await;

    assert_eq!(response.status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert_eq!(response.error_code(), "UNSUPPORTED_MEDIA_TYPE");
}

#[tokio::test]
async fn test_upload_missing_file() {
    let app = TestApp::new();
    let owner = app.user("amal", UserRole::Patient).await;

    let response = app
        .multipart(
            "/api/documents/upload",
            None,
            vec![Part::text("userId", owner), Part::text("type", "lab-report")],
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.json()["message"], "No file uploaded");
}

#[tokio::test]
async fn test_upload_missing_type() {
    let app = TestApp::new();
    let owner = app.user("amal", UserRole::Patient).await;

    let response = app
        .multipart(
            "/api/documents/upload",
            None,
            vec![
                Part::text("userId", owner),
                Part::file("x.pdf", "application/pdf", vec![1]),
            ],
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.json()["message"], "Document type is required");
}

#[tokio::test]
async fn test_upload_unknown_user() {
    let app = TestApp::new();

    let response = app
        .multipart(
            "/api/documents/upload",
            None,
            form(UserId(999), Part::file("x.pdf", "application/pdf", vec![1])),
        )
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_upload_without_user_id() {
    let app = TestApp::new();

    let response = app
        .multipart(
            "/api/documents/upload",
            None,
            vec![
                Part::text("type", "lab-report"),
                Part::file("x.pdf", "application/pdf", vec![1]),
            ],
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_upload_unknown_category() {
    let app = TestApp::new();
    let owner = app.user("amal", UserRole::Patient).await;

    let response = app
        .multipart(
            "/api/documents/upload",
            None,
            vec![
                Part::text("userId", owner),
                Part::text("type", "lab-report"),
                Part::text("categoryId", 4242),
                Part::file("x.pdf", "application/pdf", vec![1]),
            ],
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(app.store.document_count().await, 0);
}

#[tokio::test]
async fn test_store_failure_leaves_nothing_behind() {
    let app = TestApp::new();
    let owner = app.user("amal", UserRole::Patient).await;
    app.store.fail_next_write().await;

    let response = app
        .multipart(
            "/api/documents/upload",
            None,
            form(owner, Part::file("x.pdf", "application/pdf", vec![1u8; 32])),
        )
        .await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.json()["message"], "Internal server error");
    assert_eq!(app.store.document_count().await, 0);
    assert_eq!(app.store.version_count().await, 0);
}

async fn failed_upload(app: &TestApp) -> serde_json::Value {
    let owner = app.user("amal", UserRole::Patient).await;
    app.store.fail_next_write().await;
    let response = app
        .multipart(
            "/api/documents/upload",
            None,
            form(owner, Part::file("x.pdf", "application/pdf", vec![1u8; 32])),
        )
        .await;
    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    response.json()
}

#[tokio::test]
async fn test_error_details_follow_each_apps_config() {
    let exposing = TestApp::with_config(|c| c.server.expose_error_details = true);
    let default = TestApp::new();

    let body = failed_upload(&exposing).await;
    assert_eq!(body["error"], "DATABASE");
    assert_eq!(body["message"], "Internal server error");
    assert!(
        body["details"]
            .as_str()
            .is_some_and(|d| d.contains("Injected store failure"))
    );

    let body = failed_upload(&default).await;
    assert_eq!(body["message"], "Internal server error");
    assert!(body.get("details").is_none());
}
