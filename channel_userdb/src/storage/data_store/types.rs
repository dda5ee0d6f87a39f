use sqlx::{Pool, Postgres, Sqlite};

// Types
#[derive(Clone, Debug)]
pub struct SqliteDataStore {
    pool: sqlx::SqlitePool,
}

#[derive(Clone, Debug)]
pub struct PostgresDataStore {
    pool: sqlx::PgPool,
}

impl SqliteDataStore {
    pub fn new(pool: sqlx::SqlitePool) -> Self {
        Self { pool }
    }
}

impl PostgresDataStore {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

/// Handle to the backing SQL database.
///
/// Stores dispatch on whichever accessor returns a pool.
pub trait DataStore: Send + Sync {
    fn as_sqlite(&self) -> Option<&Pool<Sqlite>>;
    fn as_postgres(&self) -> Option<&Pool<Postgres>>;
}

// Store implementations
impl DataStore for SqliteDataStore {
    fn as_sqlite(&self) -> Option<&Pool<Sqlite>> {
        Some(&self.pool)
    }

    fn as_postgres(&self) -> Option<&Pool<Postgres>> {
        None
    }
}

impl DataStore for PostgresDataStore {
    fn as_sqlite(&self) -> Option<&Pool<Sqlite>> {
        None
    }

    fn as_postgres(&self) -> Option<&Pool<Postgres>> {
        Some(&self.pool)
    }
}
