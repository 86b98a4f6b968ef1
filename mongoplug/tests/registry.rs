//! Registry lifecycle tests.
//!
//! The MongoDB driver establishes connections lazily, so these tests
//! exercise bootstrap, caching and disposal without a live server.

use std::sync::Arc;

use bson::Uuid;
use serde::{Deserialize, Serialize};

use mongoplug::prelude::*;
use mongodb::options::ReadConcern;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct UserAccount {
    #[serde(rename = "_id")]
    id: Uuid,
    name: String,
}

impl Entity for UserAccount {
    type Key = Uuid;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct AuditEvent {
    #[serde(rename = "_id")]
    id: i64,
    action: String,
}

impl Entity for AuditEvent {
    type Key = i64;

    fn collection_name() -> String {
        "audit".to_string()
    }
}

fn offline_config() -> MongoConfig {
    MongoConfig {
        uri: Some("mongodb://localhost:27017/testdb".to_string()),
        ..MongoConfig::default()
    }
}

#[tokio::test]
async fn same_key_returns_the_same_handle() {
    let registry = MongoRegistry::new(offline_config());

    let first = registry
        .collection::<UserAccount, Uuid>("accounts")
        .await
        .expect("first request");
    let second = registry
        .collection::<UserAccount, Uuid>("accounts")
        .await
        .expect("second request");

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(registry.cached_collections(), 1);
    assert!(registry.has_collection::<UserAccount, Uuid>("accounts"));
}

#[tokio::test]
async fn same_name_with_different_types_caches_independently() {
    let registry = MongoRegistry::new(offline_config());

    registry
        .collection::<UserAccount, Uuid>("shared")
        .await
        .expect("first type");
    registry
        .collection::<AuditEvent, i64>("shared")
        .await
        .expect("second type");

    assert_eq!(registry.cached_collections(), 2);
    assert!(registry.has_collection::<UserAccount, Uuid>("shared"));
    assert!(registry.has_collection::<AuditEvent, i64>("shared"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn concurrent_first_requests_retain_exactly_one_handle() {
    let registry = Arc::new(MongoRegistry::new(offline_config()));

    let tasks = (0..16)
        .map(|_| {
            let registry = registry.clone();
            tokio::spawn(async move { registry.collection::<UserAccount, Uuid>("accounts").await })
        })
        .collect::<Vec<_>>();

    let mut handles = Vec::new();
    for task in tasks {
        handles.push(task.await.expect("task").expect("collection"));
    }

    assert_eq!(registry.cached_collections(), 1);
    for handle in &handles[1..] {
        assert!(Arc::ptr_eq(&handles[0], handle));
    }
}

#[tokio::test]
async fn uri_binds_the_named_database() {
    let registry = MongoRegistry::new(offline_config());
    registry.connect().await.expect("connect");

    let database = registry.database().await.expect("database");
    assert_eq!(database.name(), "testdb");
}

#[tokio::test]
async fn entity_collections_use_declared_names() {
    let registry = MongoRegistry::new(offline_config());

    let accounts = registry
        .entity_collection::<UserAccount>()
        .await
        .expect("accounts");
    let audit = registry
        .entity_collection::<AuditEvent>()
        .await
        .expect("audit");

    assert_eq!(accounts.name(), "userAccount");
    assert_eq!(audit.name(), "audit");
}

#[tokio::test]
async fn dispose_clears_the_cache_and_is_permanent() {
    let registry = MongoRegistry::new(offline_config());
    registry.connect().await.expect("connect");
    registry
        .collection::<UserAccount, Uuid>("accounts")
        .await
        .expect("collection");

    registry.dispose().await.expect("dispose");

    assert!(registry.is_disposed());
    assert_eq!(registry.cached_collections(), 0);

    let err = registry
        .collection::<UserAccount, Uuid>("accounts")
        .await
        .expect_err("disposed registry must refuse access");
    assert!(matches!(err, MongoPlugError::Disposed));

    // Repeated disposal is a no-op.
    registry.dispose().await.expect("second dispose");
}

#[tokio::test]
async fn dispose_can_leave_the_connection_open() {
    let registry = MongoRegistry::new(MongoConfig {
        close_on_dispose: false,
        ..offline_config()
    });
    registry.connect().await.expect("connect");

    registry.dispose().await.expect("dispose");
    assert!(registry.is_disposed());
}

#[tokio::test]
async fn disabled_integration_fails_explicitly() {
    let registry = MongoRegistry::new(MongoConfig {
        enabled: false,
        ..offline_config()
    });

    let err = registry
        .collection::<UserAccount, Uuid>("accounts")
        .await
        .expect_err("disabled integration must refuse access");
    assert!(matches!(err, MongoPlugError::Disabled(_)));
    assert!(err.to_string().contains("disabled"));
}

#[tokio::test]
async fn malformed_server_list_fails_collection_access() {
    let registry = MongoRegistry::new(MongoConfig {
        servers: Some("localhost:abc".to_string()),
        ..MongoConfig::default()
    });

    let err = registry
        .collection::<UserAccount, Uuid>("accounts")
        .await
        .expect_err("malformed port must fail");
    assert!(matches!(err, MongoPlugError::Configuration(_)));
    assert_eq!(registry.cached_collections(), 0);
}

struct ReadConcernConfigurer;

impl MapperConfigurer for ReadConcernConfigurer {
    fn configure(&self, mapper: Mapper) -> Mapper {
        mapper.with_read_concern(ReadConcern::local())
    }

    fn configure_collection(
        &self,
        mapper: Mapper,
        collection: &str,
        _entity_type: &'static str,
        _key_type: &'static str,
    ) -> Mapper {
        if collection == "accounts" {
            mapper.with_read_concern(ReadConcern::majority())
        } else {
            mapper
        }
    }
}

#[tokio::test]
async fn configurer_customizes_global_and_per_collection_mappers() {
    let registry =
        MongoRegistry::with_configurer(offline_config(), Arc::new(ReadConcernConfigurer));

    let accounts = registry
        .collection::<UserAccount, Uuid>("accounts")
        .await
        .expect("accounts");
    let audit = registry
        .collection::<AuditEvent, i64>("audit")
        .await
        .expect("audit");

    assert_eq!(
        accounts.mapper().read_concern(),
        Some(&ReadConcern::majority())
    );
    // Collections without a per-collection override keep the global mapper.
    assert_eq!(audit.mapper().read_concern(), Some(&ReadConcern::local()));
}

#[tokio::test]
async fn configured_default_write_concern_reaches_the_handles() {
    let registry = MongoRegistry::new(MongoConfig {
        default_write_concern: Some("MAJORITY".to_string()),
        ..MongoConfig::default()
    });

    let accounts = registry
        .collection::<UserAccount, Uuid>("accounts")
        .await
        .expect("accounts");
    assert!(accounts.mapper().write_concern().is_some());
}
