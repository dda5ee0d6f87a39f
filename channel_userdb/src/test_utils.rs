//! Test utilities shared by the unit tests of this crate
//!
//! Every helper hands out a fresh in-memory SQLite database, so tests stay
//! isolated from each other without any cleanup.

use std::sync::Arc;

use sqlx::SqlitePool;

use crate::channel_users::ChannelUserStore;
use crate::storage::{DataStore, DataStoreConfig, SqliteDataStore, StoreType};

/// A single-connection pool over a private in-memory database
pub(crate) fn memory_pool() -> SqlitePool {
    let store = memory_data_store();
    store
        .as_sqlite()
        .cloned()
        .expect("in-memory store should be backed by SQLite")
}

/// A data store over a private in-memory database
pub(crate) fn memory_data_store() -> Arc<dyn DataStore> {
    DataStoreConfig::new(StoreType::Sqlite, "sqlite::memory:")
        .connect()
        .expect("in-memory SQLite store should build")
}

/// An initialized repository over a private in-memory database
pub(crate) async fn init_test_store() -> ChannelUserStore {
    let store = ChannelUserStore::new(memory_data_store());
    store
        .init()
        .await
        .expect("Failed to initialize ChannelUserStore");
    store
}

/// Same as [`init_test_store`], also exposing the raw pool for assertions
pub(crate) async fn init_test_store_with_pool() -> (ChannelUserStore, SqlitePool) {
    let pool = memory_pool();
    let store = ChannelUserStore::new(Arc::new(SqliteDataStore::new(pool.clone())));
    store
        .init()
        .await
        .expect("Failed to initialize ChannelUserStore");
    (store, pool)
}
