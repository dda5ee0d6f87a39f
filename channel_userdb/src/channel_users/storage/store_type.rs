use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::channel_users::{
    codec::{attributes_from_json, encode_attributes},
    errors::ChannelUserError,
    types::{ChannelUser, ChannelUserAttribute, GetOrCreateResult},
};
use crate::storage::DataStore;

use super::postgres::*;
use super::sqlite::*;

/// Repository of channel users.
///
/// Holds no state besides the injected data store, so clones are cheap and can
/// be shared across tasks. Channels are matched case-insensitively; user ids
/// are matched exactly.
#[derive(Clone)]
pub struct ChannelUserStore {
    store: Arc<dyn DataStore>,
}

impl ChannelUserStore {
    pub fn new(store: Arc<dyn DataStore>) -> Self {
        Self { store }
    }

    /// Initialize the channel users table
    pub async fn init(&self) -> Result<(), ChannelUserError> {
        match (self.store.as_sqlite(), self.store.as_postgres()) {
            (Some(pool), _) => {
                create_tables_sqlite(pool).await?;
                validate_channel_user_tables_sqlite(pool).await?;
                Ok(())
            }
            (_, Some(pool)) => {
                create_tables_postgres(pool).await?;
                validate_channel_user_tables_postgres(pool).await?;
                Ok(())
            }
            _ => Err(ChannelUserError::Storage(
                "Unsupported database type".to_string(),
            )),
        }
    }

    /// Look up a user without creating it
    #[tracing::instrument(skip_all, fields(channel = %channel, user_id = %id))]
    pub async fn get(&self, channel: &str, id: &str) -> Result<Option<ChannelUser>, ChannelUserError> {
        let channel = channel.to_lowercase();
        let result = self.fetch(&channel, id).await;

        match &result {
            Ok(Some(_)) => {
                tracing::debug!(found = true, "Channel user lookup completed");
            }
            Ok(None) => {
                tracing::debug!(found = false, "Channel user lookup completed - not found");
            }
            Err(e) => {
                tracing::error!(error = %e, "Channel user lookup failed");
            }
        }

        result
    }

    /// Return the user for `(channel, id)`, creating it with no attributes if needed.
    ///
    /// Safe under concurrent calls for the same key, including from other
    /// processes sharing the database: exactly one caller sees `created == true`
    /// and every other caller gets the row that caller inserted.
    ///
    /// A freshly created user carries locally generated timestamps rather than
    /// values read back from storage.
    #[tracing::instrument(skip_all, fields(channel = %channel, user_id = %id))]
    pub async fn get_or_create(
        &self,
        channel: &str,
        id: &str,
    ) -> Result<GetOrCreateResult, ChannelUserError> {
        let channel = channel.to_lowercase();

        if let Some(user) = self.fetch(&channel, id).await? {
            tracing::debug!("Found existing channel user");
            return Ok(GetOrCreateResult {
                result: user,
                created: false,
            });
        }

        let now = Utc::now();
        let empty = encode_attributes(&[])?;

        if self.insert_if_absent(&channel, id, &empty, now).await? {
            tracing::info!("Created channel user");
            return Ok(GetOrCreateResult {
                result: ChannelUser::new(channel, id.to_string(), now),
                created: true,
            });
        }

        // A concurrent caller inserted the row between our read and our insert
        tracing::debug!("Channel user was created concurrently, reading it back");
        match self.fetch(&channel, id).await? {
            Some(user) => Ok(GetOrCreateResult {
                result: user,
                created: false,
            }),
            None => Err(ChannelUserError::Storage(format!(
                "Channel user {channel}/{id} conflicted on insert but could not be read back"
            ))),
        }
    }

    /// Replace the whole attribute set of a user.
    ///
    /// Attributes missing from `attributes` are discarded. If no user matches
    /// `(channel, id)` this does nothing and still returns `Ok(())`; callers that
    /// need the user to exist should go through [`Self::get_or_create`] first.
    #[tracing::instrument(skip_all, fields(channel = %channel, user_id = %id, attribute_count = attributes.len()))]
    pub async fn update_attributes(
        &self,
        channel: &str,
        id: &str,
        attributes: &[ChannelUserAttribute],
    ) -> Result<(), ChannelUserError> {
        let channel = channel.to_lowercase();
        let encoded = encode_attributes(attributes)?;
        let now = Utc::now();

        let affected = if let Some(pool) = self.store.as_sqlite() {
            update_attributes_sqlite(pool, &channel, id, &encoded, now).await
        } else if let Some(pool) = self.store.as_postgres() {
            update_attributes_postgres(pool, &channel, id, &encoded, now).await
        } else {
            Err(ChannelUserError::Storage(
                "Unsupported database type".to_string(),
            ))
        }?;

        if affected == 0 {
            tracing::debug!("No channel user matched, attributes left untouched");
        } else {
            tracing::debug!(rows = affected, "Channel user attributes replaced");
        }

        Ok(())
    }

    /// Same as [`Self::update_attributes`] for callers holding untyped JSON.
    ///
    /// Fails with [`ChannelUserError::Validation`] before touching storage when
    /// `attributes` is not an array of `{"key": string, "value": string}` objects.
    pub async fn update_attributes_json(
        &self,
        channel: &str,
        id: &str,
        attributes: &Value,
    ) -> Result<(), ChannelUserError> {
        let attributes = attributes_from_json(attributes).inspect_err(|e| {
            tracing::warn!(channel = %channel, user_id = %id, error = %e, "Rejected attributes update");
        })?;

        self.update_attributes(channel, id, &attributes).await
    }

    async fn fetch(&self, channel: &str, id: &str) -> Result<Option<ChannelUser>, ChannelUserError> {
        let row = if let Some(pool) = self.store.as_sqlite() {
            get_channel_user_sqlite(pool, channel, id).await
        } else if let Some(pool) = self.store.as_postgres() {
            get_channel_user_postgres(pool, channel, id).await
        } else {
            Err(ChannelUserError::Storage(
                "Unsupported database type".to_string(),
            ))
        }?;

        row.map(|row| row.into_channel_user()).transpose()
    }

    async fn insert_if_absent(
        &self,
        channel: &str,
        id: &str,
        attributes: &str,
        now: DateTime<Utc>,
    ) -> Result<bool, ChannelUserError> {
        if let Some(pool) = self.store.as_sqlite() {
            insert_channel_user_sqlite(pool, channel, id, attributes, now).await
        } else if let Some(pool) = self.store.as_postgres() {
            insert_channel_user_postgres(pool, channel, id, attributes, now).await
        } else {
            Err(ChannelUserError::Storage(
                "Unsupported database type".to_string(),
            ))
        }
    }
}
