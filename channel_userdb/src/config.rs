//! Central configuration for the channel_userdb crate

use std::sync::LazyLock;

/// Prefix applied to every table this crate owns
///
/// Default: "srv_"
pub static DB_TABLE_PREFIX: LazyLock<String> =
    LazyLock::new(|| std::env::var("DB_TABLE_PREFIX").unwrap_or_else(|_| "srv_".to_string()));
