//! Data store configuration

use std::{env, fmt, str::FromStr, sync::Arc, time::Duration};

use sqlx::postgres::PgPoolOptions;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};

use super::types::{DataStore, PostgresDataStore, SqliteDataStore};
use crate::storage::errors::StorageError;

const ENV_STORE_TYPE: &str = "GENERIC_DATA_STORE_TYPE";
const ENV_STORE_URL: &str = "GENERIC_DATA_STORE_URL";

/// Supported database backends
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreType {
    Sqlite,
    Postgres,
}

impl FromStr for StoreType {
    type Err = StorageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sqlite" => Ok(StoreType::Sqlite),
            "postgres" | "postgresql" => Ok(StoreType::Postgres),
            t => Err(StorageError::Config(format!(
                "Unsupported store type: {t}. Supported types are 'sqlite' and 'postgres'"
            ))),
        }
    }
}

impl fmt::Display for StoreType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreType::Sqlite => write!(f, "sqlite"),
            StoreType::Postgres => write!(f, "postgres"),
        }
    }
}

/// Where and how to reach the backing database
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DataStoreConfig {
    pub store_type: StoreType,
    pub url: String,
}

impl DataStoreConfig {
    pub fn new(store_type: StoreType, url: impl Into<String>) -> Self {
        Self {
            store_type,
            url: url.into(),
        }
    }

    /// Read `GENERIC_DATA_STORE_TYPE` and `GENERIC_DATA_STORE_URL`
    pub fn from_env() -> Result<Self, StorageError> {
        let store_type = env::var(ENV_STORE_TYPE)
            .map_err(|_| StorageError::Config(format!("{ENV_STORE_TYPE} must be set")))?
            .parse::<StoreType>()?;
        let url = env::var(ENV_STORE_URL)
            .map_err(|_| StorageError::Config(format!("{ENV_STORE_URL} must be set")))?;

        Ok(Self { store_type, url })
    }

    /// Build a lazily connecting pool for this configuration.
    ///
    /// No connection is opened until the first query runs.
    pub fn connect(&self) -> Result<Arc<dyn DataStore>, StorageError> {
        tracing::info!(
            "Initializing data store with type: {}, url: {}",
            self.store_type,
            self.url
        );

        let store: Arc<dyn DataStore> = match self.store_type {
            StoreType::Sqlite => {
                let opts = SqliteConnectOptions::from_str(&self.url)
                    .map_err(|e| {
                        StorageError::Config(format!("Failed to parse SQLite connection string: {e}"))
                    })?
                    .create_if_missing(true);

                let pool = if is_sqlite_memory_url(&self.url) {
                    // Every connection to an in-memory database sees its own copy,
                    // so keep exactly one alive for the lifetime of the pool.
                    SqlitePoolOptions::new()
                        .max_connections(1)
                        .idle_timeout(None::<Duration>)
                        .max_lifetime(None::<Duration>)
                        .connect_lazy_with(opts)
                } else {
                    SqlitePoolOptions::new().connect_lazy_with(
                        opts.journal_mode(SqliteJournalMode::Wal)
                            .busy_timeout(Duration::from_secs(5)),
                    )
                };

                Arc::new(SqliteDataStore::new(pool))
            }
            StoreType::Postgres => {
                let pool = PgPoolOptions::new()
                    .connect_lazy(&self.url)
                    .map_err(|e| StorageError::Config(format!("Failed to create Postgres pool: {e}")))?;

                Arc::new(PostgresDataStore::new(pool))
            }
        };

        tracing::info!(
            "Connected to database: type={}, url={}",
            self.store_type,
            self.url
        );

        Ok(store)
    }
}

/// Connect using the environment configuration
pub fn connect_data_store() -> Result<Arc<dyn DataStore>, StorageError> {
    DataStoreConfig::from_env()?.connect()
}

fn is_sqlite_memory_url(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}
