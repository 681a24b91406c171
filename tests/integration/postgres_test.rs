//! PostgreSQL store tests. Ignored unless `SEHETAK_TEST_DATABASE_URL`
//! names a scratch database; each test uses its own users so they can
//! share one schema.

use bytes::Bytes;
use sqlx::PgPool;

use sehetak_core::config::DatabaseConfig;
use sehetak_core::error::ErrorKind;
use sehetak_core::types::{DocumentId, UserId};
use sehetak_database::store::StoreBackend;
use sehetak_database::Stores;
use sehetak_entity::{CreateDocument, CreateUser, CreateVersion, PermissionLevel, UserRole};

const DATABASE_URL_VAR: &str = "SEHETAK_TEST_DATABASE_URL";

struct PgFixture {
    stores: Stores,
    pool: PgPool,
}

impl PgFixture {
    async fn open() -> Self {
        let url = std::env::var(DATABASE_URL_VAR)
            .unwrap_or_else(|_| panic!("{DATABASE_URL_VAR} must be set for PostgreSQL tests"));
        let config = DatabaseConfig {
            url,
            ..DatabaseConfig::default()
        };
        let stores = Stores::open(&config).await.expect("Failed to open stores");
        let pool = match stores.backend() {
            StoreBackend::Postgres(db) => db.pool().clone(),
            StoreBackend::Memory(_) => panic!("expected the postgres backend"),
        };
        Self { stores, pool }
    }

    async fn user(&self, prefix: &str) -> UserId {
        self.stores
            .users
            .create(&CreateUser {
                username: format!("{prefix}-{}", uuid::Uuid::new_v4()),
                role: UserRole::Patient,
            })
            .await
            .expect("Failed to create user")
            .id
    }

    async fn document(&self, owner: UserId, data: &'static [u8]) -> DocumentId {
        self.stores
            .documents
            .create_with_initial_version(&new_document(owner, data))
            .await
            .expect("Failed to create document")
    }

    async fn count(&self, sql: &str, id: i64) -> i64 {
        sqlx::query_scalar(sql)
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .expect("Count query failed")
    }
}

fn new_document(owner: UserId, data: &'static [u8]) -> CreateDocument {
    CreateDocument {
        owner_id: owner,
        category_id: None,
        doc_type: "Lab Report".to_string(),
        description: None,
        file_name: "cbc.pdf".to_string(),
        mime_type: "application/pdf".to_string(),
        data: Bytes::from_static(data),
    }
}

#[tokio::test]
#[ignore]
async fn test_pg_payload_round_trip() {
    let pg = PgFixture::open().await;
    let owner = pg.user("owner").await;
    let doc = pg.document(owner, b"%PDF-1.7\x00\xff").await;

    let stored = pg.stores.documents.find(doc).await.unwrap().unwrap();
    assert_eq!(stored.file_data, b"%PDF-1.7\x00\xff");
    assert_eq!(stored.current_version, 1);

    let versions = pg.stores.documents.list_versions(doc).await.unwrap();
    assert_eq!(versions.len(), 1);
    assert_eq!(versions[0].uploaded_by, owner);
}

#[tokio::test]
#[ignore]
async fn test_pg_unknown_owner_writes_nothing() {
    let pg = PgFixture::open().await;
    let ghost = UserId(i64::MAX);

    let err = pg
        .stores
        .documents
        .create_with_initial_version(&new_document(ghost, b"x"))
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::NotFound);
    let documents = pg
        .count("SELECT COUNT(*) FROM documents WHERE owner_id = $1", ghost.get())
        .await;
    assert_eq!(documents, 0);
}

#[tokio::test]
#[ignore]
async fn test_pg_concurrent_versions_are_distinct() {
    let pg = PgFixture::open().await;
    let owner = pg.user("owner").await;
    let doc = pg.document(owner, b"v1").await;

    let mut handles = Vec::new();
    for i in 0..8 {
        let documents = pg.stores.documents.clone();
        handles.push(tokio::spawn(async move {
            documents
                .append_version(&CreateVersion {
                    document_id: doc,
                    uploaded_by: owner,
                    file_name: format!("v{i}.pdf"),
                    mime_type: "application/pdf".to_string(),
                    data: Bytes::from(vec![i as u8; 4]),
                    change_description: None,
                })
                .await
                .map(|v| v.version_number)
        }));
    }

    let mut numbers = Vec::new();
    for handle in handles {
        numbers.push(handle.await.unwrap().unwrap());
    }
    numbers.sort_unstable();
    assert_eq!(numbers, (2..=9).collect::<Vec<i32>>());

    let stored = pg.stores.documents.find(doc).await.unwrap().unwrap();
    assert_eq!(stored.current_version, 9);
}

#[tokio::test]
#[ignore]
async fn test_pg_delete_cascades() {
    let pg = PgFixture::open().await;
    let owner = pg.user("owner").await;
    let doctor = pg.user("doctor").await;
    let doc = pg.document(owner, b"v1").await;
    pg.stores
        .sharing
        .upsert(doc, doctor, PermissionLevel::View, owner)
        .await
        .unwrap();

    assert!(pg.stores.documents.delete(doc).await.unwrap());

    let versions = pg
        .count(
            "SELECT COUNT(*) FROM document_versions WHERE document_id = $1",
            doc.get(),
        )
        .await;
    let grants = pg
        .count(
            "SELECT COUNT(*) FROM document_sharing WHERE document_id = $1",
            doc.get(),
        )
        .await;
    assert_eq!(versions, 0);
    assert_eq!(grants, 0);
    assert!(!pg.stores.documents.delete(doc).await.unwrap());
}

#[tokio::test]
#[ignore]
async fn test_pg_reshare_reactivates() {
    let pg = PgFixture::open().await;
    let owner = pg.user("owner").await;
    let doctor = pg.user("doctor").await;
    let doc = pg.document(owner, b"v1").await;

    let first = pg
        .stores
        .sharing
        .upsert(doc, doctor, PermissionLevel::View, owner)
        .await
        .unwrap();
    assert!(pg.stores.sharing.deactivate(doc, doctor).await.unwrap());
    assert!(pg.stores.sharing.grants_for(doc, doctor).await.unwrap().is_empty());

    let second = pg
        .stores
        .sharing
        .upsert(doc, doctor, PermissionLevel::Edit, owner)
        .await
        .unwrap();
    assert_eq!(first.id, second.id);
    assert!(second.is_active);
    assert_eq!(second.permission, PermissionLevel::Edit);
}

#[tokio::test]
#[ignore]
async fn test_pg_failed_version_insert_rolls_back_document() {
    let pg = PgFixture::open().await;
    let owner = pg.user("rollback").await;
    let function = format!("sehetak_reject_version_{}", owner.get());
    let trigger = format!("{function}_trg");

    let ddl = [
        format!(
            "CREATE OR REPLACE FUNCTION {function}() RETURNS trigger AS $$ \
             BEGIN RAISE EXCEPTION 'version insert rejected'; END; $$ LANGUAGE plpgsql"
        ),
        format!(
            "CREATE TRIGGER {trigger} BEFORE INSERT ON document_versions \
             FOR EACH ROW WHEN (NEW.uploaded_by = {}) EXECUTE FUNCTION {function}()",
            owner.get()
        ),
    ];
    for statement in &ddl {
        sqlx::query(statement)
            .execute(&pg.pool)
            .await
            .expect("Failed to install trigger");
    }

    let result = pg
        .stores
        .documents
        .create_with_initial_version(&new_document(owner, b"never committed"))
        .await;

    for statement in [
        format!("DROP TRIGGER IF EXISTS {trigger} ON document_versions"),
        format!("DROP FUNCTION IF EXISTS {function}()"),
    ] {
        sqlx::query(&statement)
            .execute(&pg.pool)
            .await
            .expect("Failed to remove trigger");
    }

    let err = result.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Database);
    assert_eq!(
        pg.count("SELECT COUNT(*) FROM documents WHERE owner_id = $1", owner.get())
            .await,
        0
    );
}
