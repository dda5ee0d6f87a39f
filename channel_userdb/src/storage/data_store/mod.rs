mod config;
mod types;

pub use config::{DataStoreConfig, StoreType, connect_data_store};
pub use types::{DataStore, PostgresDataStore, SqliteDataStore};
