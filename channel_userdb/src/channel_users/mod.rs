mod codec;
mod errors;
mod storage;
mod types;

pub use codec::{decode_attributes, encode_attributes};
pub use errors::ChannelUserError;
pub use storage::ChannelUserStore;
pub use types::{ChannelUser, ChannelUserAttribute, ChannelUserAttributes, GetOrCreateResult};
