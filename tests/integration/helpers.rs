//! Shared test helpers for integration tests.

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{HeaderMap, Method, Request, StatusCode, header};
use bytes::Bytes;
use serde_json::Value;
use tower::ServiceExt;

use sehetak_core::config::{AppConfig, DatabaseBackend};
use sehetak_core::types::{DocumentId, UserId};
use sehetak_database::{MemoryStore, Stores, UserDirectory};
use sehetak_entity::{CreateUser, UserRole};

const BOUNDARY: &str = "sehetak-test-boundary";

/// Test application over a fresh in-memory store
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Direct handle on the backing store
    pub store: MemoryStore,
}

/// A buffered response
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl TestResponse {
    /// Body parsed as JSON
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap_or(Value::Null)
    }

    /// The `error` code of an error body
    pub fn error_code(&self) -> String {
        self.json()["error"].as_str().unwrap_or_default().to_string()
    }
}

/// One part of a multipart form
pub enum Part {
    Text(&'static str, String),
    File {
        field: &'static str,
        file_name: String,
        mime_type: String,
        data: Vec<u8>,
    },
}

impl Part {
    pub fn text(name: &'static str, value: impl ToString) -> Self {
        Self::Text(name, value.to_string())
    }

    pub fn file(file_name: &str, mime_type: &str, data: Vec<u8>) -> Self {
        Self::File {
            field: "file",
            file_name: file_name.to_string(),
            mime_type: mime_type.to_string(),
            data,
        }
    }
}

/// Encode parts as a `multipart/form-data` body
pub fn multipart_body(parts: Vec<Part>) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
            Part::File {
                field,
                file_name,
                mime_type,
                data,
            } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\n\
                         Content-Type: {mime_type}\r\n\r\n"
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(&data);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

impl TestApp {
    /// Create a test application with default configuration
    pub fn new() -> Self {
        Self::with_config(|_| {})
    }

    /// Create a test application after adjusting the configuration
    pub fn with_config(adjust: impl FnOnce(&mut AppConfig)) -> Self {
        let mut config = AppConfig::default();
        config.database.backend = DatabaseBackend::Memory;
        adjust(&mut config);

        let store = MemoryStore::seeded();
        let router = sehetak_api::build_app(config, Stores::memory(store.clone()));
        Self { router, store }
    }

    /// Register a user directly in the store
    pub async fn user(&self, username: &str, role: UserRole) -> UserId {
        UserDirectory::create(
            &self.store,
            &CreateUser {
                username: username.to_string(),
                role,
            },
        )
        .await
        .expect("Failed to create test user")
        .id
    }

    /// Send a request, optionally as a user and with a JSON body
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        user: Option<UserId>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(user) = user {
            builder = builder.header("x-user-id", user.to_string());
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("Failed to build request");
        self.send(request).await
    }

    /// Send a multipart form
    pub async fn multipart(&self, uri: &str, user: Option<UserId>, parts: Vec<Part>) -> TestResponse {
        let mut builder = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            );
        if let Some(user) = user {
            builder = builder.header("x-user-id", user.to_string());
        }
        let request = builder
            .body(Body::from(multipart_body(parts)))
            .expect("Failed to build request");
        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Request failed");
        let status = response.status();
        let headers = response.headers().clone();
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read body");
        TestResponse {
            status,
            headers,
            body,
        }
    }

    /// Upload a document through the API and return its id
    pub async fn upload(
        &self,
        owner: UserId,
        file_name: &str,
        mime_type: &str,
        data: Vec<u8>,
    ) -> DocumentId {
        let response = self
            .multipart(
                "/api/documents/upload",
                None,
                vec![
                    Part::text("userId", owner),
                    Part::text("type", "Lab Report"),
                    Part::text("description", "Routine blood work"),
                    Part::text("categoryId", 1),
                    Part::file(file_name, mime_type, data),
                ],
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "upload failed: {:?}", response.json());
        DocumentId(
            response.json()["document_id"]
                .as_i64()
                .expect("document_id missing"),
        )
    }

    /// Share a document as its owner
    pub async fn share(
        &self,
        owner: UserId,
        document: DocumentId,
        with: UserId,
        permission: &str,
    ) -> TestResponse {
        self.request(
            Method::POST,
            &format!("/api/documents/{document}/shares"),
            Some(owner),
            Some(serde_json::json!({ "user_id": with.get(), "permission": permission })),
        )
        .await
    }
}
