/// Integration tests for channel-userdb
///
/// These run the public API against a file-backed SQLite database so that
/// several independent pools can share one store, the way several service
/// instances would in production.
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;

use channel_userdb::{
    ChannelUserAttribute, ChannelUserError, ChannelUserStore, DataStore, DataStoreConfig,
    StoreType,
};
use serde_json::json;

/// Temporary database file removed again on drop
struct TempDb {
    path: PathBuf,
}

impl TempDb {
    fn new() -> Self {
        let path = std::env::temp_dir().join(format!(
            "channel_userdb_test_{}.db",
            uuid::Uuid::new_v4()
        ));
        Self { path }
    }

    fn url(&self) -> String {
        format!("sqlite:{}", self.path.display())
    }

    fn connect(&self) -> Arc<dyn DataStore> {
        DataStoreConfig::new(StoreType::Sqlite, self.url())
            .connect()
            .expect("file-backed SQLite store should build")
    }
}

impl Drop for TempDb {
    fn drop(&mut self) {
        for suffix in ["", "-wal", "-shm"] {
            let mut file = self.path.clone().into_os_string();
            file.push(suffix);
            let _ = std::fs::remove_file(file);
        }
    }
}

async fn close(store: &Arc<dyn DataStore>) {
    if let Some(pool) = store.as_sqlite() {
        pool.close().await;
    }
}

#[tokio::test]
async fn test_attributes_survive_reconnect() {
    let db = TempDb::new();

    let data_store = db.connect();
    let users = ChannelUserStore::new(data_store.clone());
    users.init().await.expect("init");

    let created = users.get_or_create("Telegram", "42").await.expect("create");
    assert!(created.created);
    assert_eq!(created.result.channel, "telegram");

    users
        .update_attributes(
            "telegram",
            "42",
            &[
                ChannelUserAttribute::new("locale", "en"),
                ChannelUserAttribute::new("Timezone", "Europe/Paris"),
            ],
        )
        .await
        .expect("update");
    close(&data_store).await;

    let data_store = db.connect();
    let users = ChannelUserStore::new(data_store.clone());
    users.init().await.expect("re-init on existing table");

    let found = users.get_or_create("TELEGRAM", "42").await.expect("get");
    assert!(!found.created);
    assert_eq!(found.result.id, "42");
    assert_eq!(found.result.attributes.get("LOCALE"), Some("en"));
    assert_eq!(found.result.attributes.get("timezone"), Some("Europe/Paris"));
    assert!(found.result.other_channels.is_empty());
    close(&data_store).await;
}

#[tokio::test]
async fn test_json_updates_through_public_api() {
    let db = TempDb::new();
    let data_store = db.connect();
    let users = ChannelUserStore::new(data_store.clone());
    users.init().await.expect("init");

    users.get_or_create("slack", "U123").await.expect("create");

    let rejected = users
        .update_attributes_json("slack", "U123", &json!({"locale": "en"}))
        .await;
    assert!(matches!(rejected, Err(ChannelUserError::Validation(_))));

    users
        .update_attributes_json(
            "Slack",
            "U123",
            &json!([{"key": "Name", "value": "Bob"}, {"key": "name", "value": "Alt"}]),
        )
        .await
        .expect("valid update");

    let user = users
        .get("slack", "U123")
        .await
        .expect("get")
        .expect("user exists");
    assert_eq!(user.attributes.get("NAME"), Some("Bob"));
    assert_eq!(user.attributes.len(), 2);
    close(&data_store).await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_get_or_create_across_instances() {
    let db = TempDb::new();

    // Two independent pools stand in for two service instances
    let first_store = db.connect();
    let first = ChannelUserStore::new(first_store.clone());
    first.init().await.expect("init first");

    let second_store = db.connect();
    let second = ChannelUserStore::new(second_store.clone());
    second.init().await.expect("init second");

    let mut tasks = tokio::task::JoinSet::new();
    for i in 0..24 {
        let users = if i % 2 == 0 {
            first.clone()
        } else {
            second.clone()
        };
        tasks.spawn(async move { users.get_or_create("WhatsApp", "+15550100").await });
    }

    let mut created = 0;
    let mut identities = HashSet::new();
    while let Some(joined) = tasks.join_next().await {
        let outcome = joined
            .expect("task panicked")
            .expect("get_or_create failed");
        if outcome.created {
            created += 1;
        }
        identities.insert((outcome.result.channel, outcome.result.id));
    }

    assert_eq!(created, 1, "exactly one caller must observe creation");
    assert_eq!(
        identities,
        HashSet::from([("whatsapp".to_string(), "+15550100".to_string())])
    );

    close(&first_store).await;
    close(&second_store).await;
}
