//! SeaORM link store tests
//!
//! Run against temporary SQLite databases.

use chrono::{Duration, Utc};
use shortgate::config::DatabaseConfig;
use shortgate::errors::ShortgateError;
use shortgate::storage::backend::{connect_sqlite, infer_backend_from_url, run_migrations};
use shortgate::storage::{LinkPatch, LinkStore, NewLink, SeaOrmStorage, StorageFactory, VisitContext};
use tempfile::TempDir;

// =============================================================================
// Test Setup
// =============================================================================

fn sqlite_config(temp_dir: &TempDir) -> DatabaseConfig {
    let db_path = temp_dir.path().join("links.db");
    DatabaseConfig {
        database_url: format!("sqlite://{}?mode=rwc", db_path.display()),
        ..Default::default()
    }
}

async fn create_temp_storage() -> (SeaOrmStorage, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let storage = SeaOrmStorage::new(&sqlite_config(&temp_dir), "sqlite")
        .await
        .expect("Failed to create storage");
    (storage, temp_dir)
}

fn new_link(code: &str, owner: &str) -> NewLink {
    NewLink {
        code: code.to_string(),
        target_url: format!("https://example.com/{}", code),
        owner_id: owner.to_string(),
        expires_at: None,
    }
}

// =============================================================================
// Connection
// =============================================================================

mod connection_tests {
    use super::*;

    #[tokio::test]
    async fn test_connect_sqlite_creates_file() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("new.db");

        let db = connect_sqlite(&db_path.to_string_lossy()).await;

        assert!(db.is_ok());
        assert!(db_path.exists());
    }

    #[tokio::test]
    async fn test_run_migrations_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("migrate.db");
        let db = connect_sqlite(&db_path.to_string_lossy()).await.unwrap();
        run_migrations(&db).await.unwrap();
        run_migrations(&db).await.unwrap();
    }

    #[tokio::test]
    async fn test_storage_new_empty_url_fails() {
        let config = DatabaseConfig {
            database_url: String::new(),
            ..Default::default()
        };
        let result = SeaOrmStorage::new(&config, "sqlite").await;
        assert!(matches!(result, Err(ShortgateError::DatabaseConfig(_))));
    }

    #[tokio::test]
    async fn test_factory_infers_sqlite() {
        let temp_dir = TempDir::new().unwrap();
        let storage = StorageFactory::create(&sqlite_config(&temp_dir))
            .await
            .unwrap();
        assert_eq!(storage.backend_name(), "sqlite");
        storage.close().await.unwrap();
    }

    #[test]
    fn test_infer_backend_rejects_unknown_scheme() {
        assert!(infer_backend_from_url("redis://localhost").is_err());
    }
}

// =============================================================================
// Links
// =============================================================================

mod link_tests {
    use super::*;

    #[tokio::test]
    async fn test_insert_and_find() {
        let (storage, _dir) = create_temp_storage().await;

        let link = storage.insert_link(new_link("abc123", "alice")).await.unwrap();

        assert_eq!(link.id.len(), 36);
        assert!(link.is_active);
        assert_eq!(link.clicks, 0);

        let by_code = storage.find_by_code("abc123").await.unwrap().unwrap();
        let by_id = storage.find_by_id(&link.id).await.unwrap().unwrap();
        assert_eq!(by_code.id, link.id);
        assert_eq!(by_id.code, "abc123");
        assert_eq!(by_id.target_url, "https://example.com/abc123");
    }

    #[tokio::test]
    async fn test_find_nonexistent_returns_none() {
        let (storage, _dir) = create_temp_storage().await;

        assert!(storage.find_by_code("missing").await.unwrap().is_none());
        assert!(storage.find_by_id("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_code_is_conflict() {
        let (storage, _dir) = create_temp_storage().await;

        storage.insert_link(new_link("dup001", "alice")).await.unwrap();
        let err = storage
            .insert_link(new_link("dup001", "bob"))
            .await
            .unwrap_err();

        assert!(matches!(err, ShortgateError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_update_applies_patch() {
        let (storage, _dir) = create_temp_storage().await;
        let link = storage.insert_link(new_link("abc123", "alice")).await.unwrap();
        let expires_at = Utc::now() + Duration::days(1);

        let updated = storage
            .update_link(
                &link.id,
                LinkPatch {
                    is_active: Some(false),
                    expires_at: Some(expires_at),
                },
            )
            .await
            .unwrap();

        assert!(!updated.is_active);
        assert_eq!(
            updated.expires_at.map(|t| t.timestamp()),
            Some(expires_at.timestamp())
        );
        assert_eq!(updated.target_url, link.target_url);
    }

    #[tokio::test]
    async fn test_update_missing_link_not_found() {
        let (storage, _dir) = create_temp_storage().await;

        let err = storage
            .update_link(
                "missing",
                LinkPatch {
                    is_active: Some(false),
                    expires_at: None,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ShortgateError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_list_by_owner_and_page() {
        let (storage, _dir) = create_temp_storage().await;
        for code in ["aaa111", "bbb222", "ccc333"] {
            storage.insert_link(new_link(code, "alice")).await.unwrap();
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
        storage.insert_link(new_link("ddd444", "bob")).await.unwrap();

        let owned = storage.list_by_owner("alice").await.unwrap();
        assert_eq!(owned.len(), 3);
        assert_eq!(owned[0].code, "ccc333");

        let page = storage.list_page(1, 3).await.unwrap();
        assert_eq!(page.total, 4);
        assert_eq!(page.pages, 2);
        assert_eq!(page.items[0].code, "ddd444");

        let last = storage.list_page(2, 3).await.unwrap();
        assert_eq!(last.items.len(), 1);
        assert_eq!(last.items[0].code, "aaa111");
    }
}

// =============================================================================
// Visits and counters
// =============================================================================

mod visit_tests {
    use super::*;

    #[tokio::test]
    async fn test_increment_clicks_is_additive() {
        let (storage, _dir) = create_temp_storage().await;
        let link = storage.insert_link(new_link("abc123", "alice")).await.unwrap();

        let (a, b, c) = tokio::join!(
            storage.increment_clicks(&link.id),
            storage.increment_clicks(&link.id),
            storage.increment_clicks(&link.id)
        );
        a.unwrap();
        b.unwrap();
        c.unwrap();

        let reloaded = storage.find_by_id(&link.id).await.unwrap().unwrap();
        assert_eq!(reloaded.clicks, 3);
    }

    #[tokio::test]
    async fn test_increment_missing_link_not_found() {
        let (storage, _dir) = create_temp_storage().await;

        let err = storage.increment_clicks("missing").await.unwrap_err();
        assert!(matches!(err, ShortgateError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_visit_for_missing_link_rejected() {
        let (storage, _dir) = create_temp_storage().await;

        let result = storage
            .insert_visit("missing", &VisitContext::new("127.0.0.1"))
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_recent_visits_newest_first_and_limited() {
        let (storage, _dir) = create_temp_storage().await;
        let link = storage.insert_link(new_link("abc123", "alice")).await.unwrap();

        for i in 0..5 {
            let context = VisitContext {
                ip_address: format!("10.0.0.{}", i),
                user_agent: None,
                referrer: Some("https://ref.example".to_string()),
            };
            storage.insert_visit(&link.id, &context).await.unwrap();
        }

        let visits = storage.recent_visits(&link.id, 3).await.unwrap();
        assert_eq!(visits.len(), 3);
        assert_eq!(visits[0].ip_address, "10.0.0.4");
        assert!(visits.windows(2).all(|w| w[0].visited_at >= w[1].visited_at));
        assert_eq!(visits[0].referrer.as_deref(), Some("https://ref.example"));
    }

    #[tokio::test]
    async fn test_visit_keeps_long_client_address() {
        let (storage, _dir) = create_temp_storage().await;
        let link = storage.insert_link(new_link("abc123", "alice")).await.unwrap();
        let forwarded = format!(
            "fe80::1ff:fe23:4567:890a%eth0, {}",
            (1..=12).map(|i| format!("203.0.113.{}", i)).collect::<Vec<_>>().join(", ")
        );
        assert!(forwarded.len() > 45);

        storage
            .insert_visit(&link.id, &VisitContext::new(forwarded.clone()))
            .await
            .unwrap();

        let visits = storage.recent_visits(&link.id, 1).await.unwrap();
        assert_eq!(visits[0].ip_address, forwarded);
    }

    #[tokio::test]
    async fn test_delete_removes_visits_then_link() {
        let (storage, _dir) = create_temp_storage().await;
        let link = storage.insert_link(new_link("abc123", "alice")).await.unwrap();
        let other = storage.insert_link(new_link("other1", "alice")).await.unwrap();
        for _ in 0..3 {
            storage
                .insert_visit(&link.id, &VisitContext::new("127.0.0.1"))
                .await
                .unwrap();
        }
        storage
            .insert_visit(&other.id, &VisitContext::new("127.0.0.1"))
            .await
            .unwrap();

        let removed = storage.delete_link(&link.id).await.unwrap();

        assert_eq!(removed, 3);
        assert!(storage.find_by_id(&link.id).await.unwrap().is_none());
        assert!(storage.recent_visits(&link.id, 10).await.unwrap().is_empty());
        assert_eq!(storage.recent_visits(&other.id, 10).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_missing_link_not_found() {
        let (storage, _dir) = create_temp_storage().await;

        let err = storage.delete_link("missing").await.unwrap_err();
        assert!(matches!(err, ShortgateError::NotFound(_)));
    }
}
