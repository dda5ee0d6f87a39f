//! channel_userdb - Channel-scoped user directory for conversational platforms
//!
//! This crate keeps one record per `(channel, user id)` pair, where a channel is a
//! messaging platform such as `slack` or `telegram`. Each record carries an ordered,
//! schema-free list of string attributes with case-insensitive lookup.
//!
//! The repository takes its storage handle explicitly:
//!
//! ```no_run
//! use channel_userdb::{ChannelUserStore, connect_data_store};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let store = ChannelUserStore::new(connect_data_store()?);
//! store.init().await?;
//!
//! let outcome = store.get_or_create("Telegram", "42").await?;
//! assert_eq!(outcome.result.channel, "telegram");
//! # Ok(())
//! # }
//! ```

mod channel_users;
mod config;
mod storage;

#[cfg(test)]
mod test_utils;

pub use channel_users::{
    ChannelUser, ChannelUserAttribute, ChannelUserAttributes, ChannelUserError, ChannelUserStore,
    GetOrCreateResult, decode_attributes, encode_attributes,
};

pub use config::DB_TABLE_PREFIX;

pub use storage::{
    DataStore, DataStoreConfig, PostgresDataStore, SqliteDataStore, StorageError, StoreType,
    connect_data_store,
};
