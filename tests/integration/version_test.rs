//! Integration tests for document versioning.

use axum::http::{Method, StatusCode, header};

use sehetak_entity::UserRole;

use crate::helpers::{Part, TestApp};

#[tokio::test]
async fn test_add_version_becomes_current() {
    let app = TestApp::new();
    let owner = app.user("amal", UserRole::Patient).await;
    let doc = app.upload(owner, "v1.pdf", "application/pdf", b"first".to_vec()).await;

    let response = app
        .multipart(
            &format!("/api/documents/{doc}/versions"),
            Some(owner),
            vec![
                Part::file("v2.png", "image/png", b"second".to_vec()),
                Part::text("changeDescription", "Rescanned"),
            ],
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json()["version_number"], 2);
    assert_eq!(response.json()["change_description"], "Rescanned");
    assert_eq!(response.json()["uploaded_by_username"], "amal");

    let current = app
        .request(
            Method::GET,
            &format!("/api/documents/download/{doc}"),
            Some(owner),
            None,
        )
        .await;
    assert_eq!(current.headers[header::CONTENT_TYPE], "image/png");
    assert_eq!(current.body.as_ref(), b"second");

    let first = app
        .request(
            Method::GET,
            &format!("/api/documents/{doc}/versions/1/download"),
            Some(owner),
            None,
        )
        .await;
    assert_eq!(first.status, StatusCode::OK);
    assert_eq!(first.body.as_ref(), b"first");

    let history = app
        .request(Method::GET, &format!("/api/documents/versions/{doc}"), None, None)
        .await
        .json();
    let numbers: Vec<i64> = history
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["version_number"].as_i64().unwrap())
        .collect();
    assert_eq!(numbers, vec![2, 1]);
}

#[tokio::test]
async fn test_view_grant_cannot_add_version() {
    let app = TestApp::new();
    let owner = app.user("amal", UserRole::Patient).await;
    let doctor = app.user("dr.nour", UserRole::Doctor).await;
    let doc = app.upload(owner, "v1.pdf", "application/pdf", vec![1]).await;
    app.share(owner, doc, doctor, "view").await;

    let response = app
        .multipart(
            &format!("/api/documents/{doc}/versions"),
            Some(doctor),
            vec![Part::file("v2.pdf", "application/pdf", vec![2])],
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(app.store.version_count().await, 1);
}

#[tokio::test]
async fn test_edit_grant_can_add_version() {
    let app = TestApp::new();
    let owner = app.user("amal", UserRole::Patient).await;
    let doctor = app.user("dr.nour", UserRole::Doctor).await;
    let doc = app.upload(owner, "v1.pdf", "application/pdf", vec![1]).await;
    app.share(owner, doc, doctor, "edit").await;

    let response = app
        .multipart(
            &format!("/api/documents/{doc}/versions"),
            Some(doctor),
            vec![Part::file("v2.pdf", "application/pdf", vec![2])],
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json()["uploaded_by"], doctor.get());
}

#[tokio::test]
async fn test_new_version_checks_media_type() {
    let app = TestApp::new();
    let owner = app.user("amal", UserRole::Patient).await;
    let doc = app.upload(owner, "v1.pdf", "application/pdf", vec![1]).await;

    let response = app
        .multipart(
            &format!("/api/documents/{doc}/versions"),
            Some(owner),
            vec![Part::file("v2.zip", "application/zip", vec![2])],
        )
        .await;
    assert_eq!(response.status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert_eq!(app.store.version_count().await, 1);
}

#[tokio::test]
async fn test_missing_version_not_found() {
    let app = TestApp::new();
    let owner = app.user("amal", UserRole::Patient).await;
    let doc = app.upload(owner, "v1.pdf", "application/pdf", vec![1]).await;

    let response = app
        .request(
            Method::GET,
            &format!("/api/documents/{doc}/versions/7/download"),
            Some(owner),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_versions_of_unknown_document_empty() {
    let app = TestApp::new();

    let response = app
        .request(Method::GET, "/api/documents/versions/777", None, None)
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json(), serde_json::json!([]));
}
