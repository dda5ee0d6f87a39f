//! Conversion between attribute lists and the single text column they are stored in

use serde::Deserialize;
use serde_json::Value;

use super::errors::ChannelUserError;
use super::types::{ChannelUserAttribute, ChannelUserAttributes};

/// Encode attributes as a JSON array of `{"key", "value"}` objects, keeping order
pub fn encode_attributes(attributes: &[ChannelUserAttribute]) -> Result<String, ChannelUserError> {
    Ok(serde_json::to_string(attributes)?)
}

/// Decode the stored attribute column.
///
/// A blank column decodes to an empty set.
pub fn decode_attributes(encoded: &str) -> Result<ChannelUserAttributes, ChannelUserError> {
    if encoded.trim().is_empty() {
        return Ok(ChannelUserAttributes::new());
    }
    Ok(serde_json::from_str(encoded)?)
}

/// Check that an untyped value is a sequence of attributes
pub(super) fn attributes_from_json(
    value: &Value,
) -> Result<Vec<ChannelUserAttribute>, ChannelUserError> {
    let items = value.as_array().ok_or_else(|| {
        ChannelUserError::Validation(
            "Attributes must be an array of ChannelUserAttribute".to_string(),
        )
    })?;

    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            ChannelUserAttribute::deserialize(item).map_err(|e| {
                ChannelUserError::Validation(format!("Invalid attribute at index {index}: {e}"))
            })
        })
        .collect()
}
