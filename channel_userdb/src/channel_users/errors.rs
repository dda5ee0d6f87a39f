use thiserror::Error;

use crate::storage::StorageError;

#[derive(Clone, Error, Debug)]
pub enum ChannelUserError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

impl From<serde_json::Error> for ChannelUserError {
    fn from(err: serde_json::Error) -> Self {
        ChannelUserError::InvalidData(err.to_string())
    }
}

impl From<StorageError> for ChannelUserError {
    fn from(err: StorageError) -> Self {
        ChannelUserError::Storage(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_serde_json_error() {
        let json_error = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();

        match ChannelUserError::from(json_error) {
            ChannelUserError::InvalidData(msg) => {
                assert!(
                    msg.contains("expected value"),
                    "Error message should contain the original error"
                );
            }
            _ => panic!("Expected InvalidData variant"),
        }
    }

    #[test]
    fn test_from_storage_error() {
        let storage_error = StorageError::Config("GENERIC_DATA_STORE_TYPE must be set".into());

        match ChannelUserError::from(storage_error) {
            ChannelUserError::Storage(msg) => {
                assert!(msg.contains("GENERIC_DATA_STORE_TYPE must be set"));
            }
            _ => panic!("Expected Storage variant"),
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(
            ChannelUserError::Validation("attributes must be an array".into()).to_string(),
            "Validation error: attributes must be an array"
        );
        assert_eq!(
            ChannelUserError::Storage("disk full".into()).to_string(),
            "Storage error: disk full"
        );
        assert_eq!(
            ChannelUserError::InvalidData("bad json".into()).to_string(),
            "Invalid data: bad json"
        );
    }
}
