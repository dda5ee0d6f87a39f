use std::{env, sync::LazyLock};

use crate::config::DB_TABLE_PREFIX;

/// Channel users table name
pub(crate) static DB_TABLE_CHANNEL_USERS: LazyLock<String> = LazyLock::new(|| {
    env::var("DB_TABLE_CHANNEL_USERS")
        .unwrap_or_else(|_| format!("{}{}", *DB_TABLE_PREFIX, "channel_users"))
});
