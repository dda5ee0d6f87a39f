use chrono::{DateTime, Utc};
use sqlx::{Pool, Postgres};

use crate::channel_users::{errors::ChannelUserError, types::ChannelUserRow};
use crate::storage::validate_postgres_table_schema;

use super::config::DB_TABLE_CHANNEL_USERS;

// PostgreSQL implementations
pub(super) async fn create_tables_postgres(pool: &Pool<Postgres>) -> Result<(), ChannelUserError> {
    let table_name = DB_TABLE_CHANNEL_USERS.as_str();

    sqlx::query(&format!(
        r#"
        CREATE TABLE IF NOT EXISTS {table_name} (
            channel TEXT NOT NULL,
            user_id TEXT NOT NULL,
            attributes TEXT NOT NULL,
            created_at TIMESTAMPTZ NOT NULL,
            updated_at TIMESTAMPTZ NOT NULL,
            PRIMARY KEY (channel, user_id)
        )
        "#
    ))
    .execute(pool)
    .await
    .map_err(|e| ChannelUserError::Storage(e.to_string()))?;

    Ok(())
}

/// Validates that the channel users table schema matches what we expect
pub(super) async fn validate_channel_user_tables_postgres(
    pool: &Pool<Postgres>,
) -> Result<(), ChannelUserError> {
    let table_name = DB_TABLE_CHANNEL_USERS.as_str();

    let expected_columns = [
        ("channel", "text"),
        ("user_id", "text"),
        ("attributes", "text"),
        ("created_at", "timestamp with time zone"),
        ("updated_at", "timestamp with time zone"),
    ];

    validate_postgres_table_schema(pool, table_name, &expected_columns, ChannelUserError::Storage)
        .await
}

pub(super) async fn get_channel_user_postgres(
    pool: &Pool<Postgres>,
    channel: &str,
    user_id: &str,
) -> Result<Option<ChannelUserRow>, ChannelUserError> {
    let table_name = DB_TABLE_CHANNEL_USERS.as_str();

    sqlx::query_as::<_, ChannelUserRow>(&format!(
        r#"
        SELECT channel, user_id, attributes, created_at, updated_at
        FROM {table_name}
        WHERE channel = $1 AND user_id = $2
        LIMIT 1
        "#
    ))
    .bind(channel)
    .bind(user_id)
    .fetch_optional(pool)
    .await
    .map_err(|e| ChannelUserError::Storage(e.to_string()))
}

/// Returns true when this call inserted the row, false when it already existed
pub(super) async fn insert_channel_user_postgres(
    pool: &Pool<Postgres>,
    channel: &str,
    user_id: &str,
    attributes: &str,
    now: DateTime<Utc>,
) -> Result<bool, ChannelUserError> {
    let table_name = DB_TABLE_CHANNEL_USERS.as_str();

    let result = sqlx::query(&format!(
        r#"
        INSERT INTO {table_name} (channel, user_id, attributes, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $4)
        ON CONFLICT (channel, user_id) DO NOTHING
        "#
    ))
    .bind(channel)
    .bind(user_id)
    .bind(attributes)
    .bind(now)
    .execute(pool)
    .await
    .map_err(|e| ChannelUserError::Storage(e.to_string()))?;

    Ok(result.rows_affected() == 1)
}

/// Returns the number of rows touched
pub(super) async fn update_attributes_postgres(
    pool: &Pool<Postgres>,
    channel: &str,
    user_id: &str,
    attributes: &str,
    now: DateTime<Utc>,
) -> Result<u64, ChannelUserError> {
    let table_name = DB_TABLE_CHANNEL_USERS.as_str();

    let result = sqlx::query(&format!(
        r#"
        UPDATE {table_name}
        SET attributes = $1, updated_at = $2
        WHERE channel = $3 AND user_id = $4
        "#
    ))
    .bind(attributes)
    .bind(now)
    .bind(channel)
    .bind(user_id)
    .execute(pool)
    .await
    .map_err(|e| ChannelUserError::Storage(e.to_string()))?;

    Ok(result.rows_affected())
}
