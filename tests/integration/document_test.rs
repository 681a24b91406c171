//! Integration tests for listing, download, and delete.

use axum::http::{Method, StatusCode, header};

use sehetak_entity::UserRole;

use crate::helpers::TestApp;

#[tokio::test]
async fn test_categories_sorted_by_name() {
    let app = TestApp::new();

    let response = app
        .request(Method::GET, "/api/documents/categories", None, None)
        .await;

    assert_eq!(response.status, StatusCode::OK);
    let names: Vec<String> = response
        .json()
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap().to_string())
        .collect();
    let mut sorted = names.clone();
    sorted.sort();
    assert_eq!(names.len(), 6);
    assert_eq!(names, sorted);
}

#[tokio::test]
async fn test_download_returns_exact_bytes() {
    let app = TestApp::new();
    let owner = app.user("amal", UserRole::Patient).await;
    let payload: Vec<u8> = (0..=255u8).cycle().take(4096).collect();
    let doc = app.upload(owner, "scan.png", "image/png", payload.clone()).await;

    let response = app
        .request(
            Method::GET,
            &format!("/api/documents/download/{doc}"),
            Some(owner),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.headers[header::CONTENT_TYPE], "image/png");
    let disposition = response.headers[header::CONTENT_DISPOSITION].to_str().unwrap();
    assert!(disposition.starts_with("inline; filename=\"scan.png\""));
    assert_eq!(response.body.as_ref(), payload.as_slice());
}

#[tokio::test]
async fn test_requester_from_query_parameter() {
    let app = TestApp::new();
    let owner = app.user("amal", UserRole::Patient).await;
    let doc = app.upload(owner, "x.pdf", "application/pdf", vec![9; 16]).await;

    let response = app
        .request(
            Method::GET,
            &format!("/api/documents/download/{doc}?userId={owner}"),
            None,
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_download_without_requester_is_bad_request() {
    let app = TestApp::new();
    let owner = app.user("amal", UserRole::Patient).await;
    let doc = app.upload(owner, "x.pdf", "application/pdf", vec![9; 16]).await;

    let response = app
        .request(Method::GET, &format!("/api/documents/download/{doc}"), None, None)
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_download_without_grant_is_forbidden() {
    let app = TestApp::new();
    let owner = app.user("amal", UserRole::Patient).await;
    let stranger = app.user("dr.sami", UserRole::Doctor).await;
    let doc = app.upload(owner, "x.pdf", "application/pdf", vec![1; 8]).await;

    let response = app
        .request(
            Method::GET,
            &format!("/api/documents/download/{doc}"),
            Some(stranger),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.error_code(), "ACCESS_DENIED");
}

#[tokio::test]
async fn test_download_unknown_document_not_found() {
    let app = TestApp::new();
    let owner = app.user("amal", UserRole::Patient).await;

    let response = app
        .request(Method::GET, "/api/documents/download/4040", Some(owner), None)
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_malformed_path_id_is_json_validation_error() {
    let app = TestApp::new();
    let owner = app.user("amal", UserRole::Patient).await;

    let response = app
        .request(Method::GET, "/api/documents/download/abc", Some(owner), None)
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_code(), "VALIDATION");

    let response = app
        .request(Method::GET, "/api/documents/user/not-a-number", Some(owner), None)
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_code(), "VALIDATION");
}

#[tokio::test]
async fn test_delete_grant_allows_view() {
    let app = TestApp::new();
    let owner = app.user("amal", UserRole::Patient).await;
    let doctor = app.user("dr.nour", UserRole::Doctor).await;
    let doc = app.upload(owner, "x.pdf", "application/pdf", vec![1; 8]).await;

    let shared = app.share(owner, doc, doctor, "delete").await;
    assert_eq!(shared.status, StatusCode::OK);

    let response = app
        .request(
            Method::GET,
            &format!("/api/documents/download/{doc}"),
            Some(doctor),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_owner_delete_then_download_not_found() {
    let app = TestApp::new();
    let owner = app.user("amal", UserRole::Patient).await;
    let doc = app.upload(owner, "x.pdf", "application/pdf", vec![1; 8]).await;

    let deleted = app
        .request(
            Method::DELETE,
            &format!("/api/documents/{doc}"),
            Some(owner),
            None,
        )
        .await;
    assert_eq!(deleted.status, StatusCode::OK);
    assert_eq!(deleted.json()["message"], "Document deleted successfully");

    let response = app
        .request(
            Method::GET,
            &format!("/api/documents/download/{doc}"),
            Some(owner),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(app.store.version_count().await, 0);
}

#[tokio::test]
async fn test_delete_needs_delete_grant() {
    let app = TestApp::new();
    let owner = app.user("amal", UserRole::Patient).await;
    let doctor = app.user("dr.nour", UserRole::Doctor).await;
    let doc = app.upload(owner, "x.pdf", "application/pdf", vec![1; 8]).await;
    app.share(owner, doc, doctor, "edit").await;

    let response = app
        .request(
            Method::DELETE,
            &format!("/api/documents/{doc}"),
            Some(doctor),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(app.store.document_count().await, 1);
}

#[tokio::test]
async fn test_list_for_user_reports_access_level() {
    let app = TestApp::new();
    let owner = app.user("amal", UserRole::Patient).await;
    let doctor = app.user("dr.nour", UserRole::Doctor).await;
    let own = app.upload(doctor, "notes.pdf", "application/pdf", vec![1]).await;
    let shared = app.upload(owner, "x.pdf", "application/pdf", vec![2]).await;
    app.upload(owner, "private.pdf", "application/pdf", vec![3]).await;
    app.share(owner, shared, doctor, "edit").await;

    let response = app
        .request(
            Method::GET,
            &format!("/api/documents/user/{doctor}"),
            None,
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    let rows = response.json();
    let rows = rows.as_array().unwrap();
    assert_eq!(rows.len(), 2);
    // Newest first.
    assert_eq!(rows[0]["id"], shared.get());
    assert_eq!(rows[0]["access_level"], "edit");
    assert_eq!(rows[0]["owner_username"], "amal");
    assert_eq!(rows[0]["type"], "Lab Report");
    assert_eq!(rows[1]["id"], own.get());
    assert_eq!(rows[1]["access_level"], "owner");
}

#[tokio::test]
async fn test_list_for_unknown_user_not_found() {
    let app = TestApp::new();

    let response = app
        .request(Method::GET, "/api/documents/user/999", None, None)
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_health_endpoints() {
    let app = TestApp::new();

    let health = app.request(Method::GET, "/api/health", None, None).await;
    assert_eq!(health.status, StatusCode::OK);
    assert_eq!(health.json()["status"], "ok");

    let detailed = app
        .request(Method::GET, "/api/health/detailed", None, None)
        .await;
    assert_eq!(detailed.json()["store_backend"], "memory");
    assert_eq!(detailed.json()["store_status"], "connected");
}

#[tokio::test]
async fn test_view_grant_cannot_delete() {
    let app = TestApp::new();
    let owner = app.user("amal", UserRole::Patient).await;
    let doctor = app.user("dr.nour", UserRole::Doctor).await;
    let doc = app.upload(owner, "x.pdf", "application/pdf", vec![1; 8]).await;
    app.share(owner, doc, doctor, "view").await;

    let response = app
        .request(
            Method::DELETE,
            &format!("/api/documents/{doc}"),
            Some(doctor),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(app.store.document_count().await, 1);
}
