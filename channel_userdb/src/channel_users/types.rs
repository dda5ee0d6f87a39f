use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::codec::decode_attributes;
use super::errors::ChannelUserError;

/// A single named profile value attached to a channel user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChannelUserAttribute {
    pub key: String,
    pub value: String,
}

impl ChannelUserAttribute {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Ordered list of attributes with case-insensitive lookup.
///
/// Keys are not unique. When several attributes share a key (ignoring case),
/// the one that comes first wins.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct ChannelUserAttributes(Vec<ChannelUserAttribute>);

impl ChannelUserAttributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value of the first attribute whose key matches `key` ignoring case.
    ///
    /// An empty value counts as absent.
    pub fn get(&self, key: &str) -> Option<&str> {
        let wanted = key.to_lowercase();
        self.0
            .iter()
            .find(|attr| attr.key.to_lowercase() == wanted)
            .map(|attr| attr.value.as_str())
            .filter(|value| !value.is_empty())
    }

    pub fn push(&mut self, attribute: ChannelUserAttribute) {
        self.0.push(attribute);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ChannelUserAttribute> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[ChannelUserAttribute] {
        &self.0
    }

    pub fn into_inner(self) -> Vec<ChannelUserAttribute> {
        self.0
    }
}

impl From<Vec<ChannelUserAttribute>> for ChannelUserAttributes {
    fn from(attributes: Vec<ChannelUserAttribute>) -> Self {
        Self(attributes)
    }
}

impl FromIterator<ChannelUserAttribute> for ChannelUserAttributes {
    fn from_iter<I: IntoIterator<Item = ChannelUserAttribute>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for ChannelUserAttributes {
    type Item = ChannelUserAttribute;
    type IntoIter = std::vec::IntoIter<ChannelUserAttribute>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a ChannelUserAttributes {
    type Item = &'a ChannelUserAttribute;
    type IntoIter = std::slice::Iter<'a, ChannelUserAttribute>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// A user as seen by one messaging channel
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChannelUser {
    /// Messaging platform identifier, always lower case
    pub channel: String,
    /// User identifier scoped to `channel`
    pub id: String,
    pub created_on: DateTime<Utc>,
    pub updated_on: DateTime<Utc>,
    pub attributes: ChannelUserAttributes,
    /// Reserved for cross-channel linking; always empty
    pub other_channels: Vec<String>,
}

impl ChannelUser {
    /// A user that has not been read back from storage
    pub(crate) fn new(channel: String, id: String, now: DateTime<Utc>) -> Self {
        Self {
            channel,
            id,
            created_on: now,
            updated_on: now,
            attributes: ChannelUserAttributes::new(),
            other_channels: Vec::new(),
        }
    }
}

/// Outcome of [`ChannelUserStore::get_or_create`](super::ChannelUserStore::get_or_create)
#[derive(Debug, Clone, PartialEq)]
pub struct GetOrCreateResult {
    pub result: ChannelUser,
    /// True only for the call that inserted the row
    pub created: bool,
}

/// Raw row of the channel users table, before the attributes are decoded
#[derive(Debug, Clone, FromRow)]
pub(super) struct ChannelUserRow {
    pub(super) channel: String,
    pub(super) user_id: String,
    pub(super) attributes: String,
    pub(super) created_at: DateTime<Utc>,
    pub(super) updated_at: DateTime<Utc>,
}

impl ChannelUserRow {
    pub(super) fn into_channel_user(self) -> Result<ChannelUser, ChannelUserError> {
        Ok(ChannelUser {
            attributes: decode_attributes(&self.attributes)?,
            channel: self.channel,
            id: self.user_id,
            created_on: self.created_at,
            updated_on: self.updated_at,
            other_channels: Vec::new(),
        })
    }
}
