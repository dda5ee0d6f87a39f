//! Look up (or register) a channel user and optionally replace its attributes.
//!
//! ```text
//! demo-channel-users <channel> <user-id> [key=value ...]
//! ```
//!
//! The database is taken from `GENERIC_DATA_STORE_TYPE` / `GENERIC_DATA_STORE_URL`,
//! which may live in a `.env` file.

use channel_userdb::{ChannelUserAttribute, ChannelUserStore, connect_data_store};

mod logging;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    logging::init_tracing(env!("CARGO_CRATE_NAME"));

    let mut args = std::env::args().skip(1);
    let (Some(channel), Some(user_id)) = (args.next(), args.next()) else {
        eprintln!("usage: demo-channel-users <channel> <user-id> [key=value ...]");
        std::process::exit(2);
    };
    let attributes = parse_attributes(args)?;

    let users = ChannelUserStore::new(connect_data_store()?);
    users.init().await?;

    let outcome = users.get_or_create(&channel, &user_id).await?;
    tracing::info!(created = outcome.created, "Resolved {}/{}", channel, user_id);

    let user = if attributes.is_empty() {
        outcome.result
    } else {
        users
            .update_attributes(&channel, &user_id, &attributes)
            .await?;
        users.get_or_create(&channel, &user_id).await?.result
    };

    println!("{}", serde_json::to_string_pretty(&user)?);
    Ok(())
}

fn parse_attributes(
    args: impl Iterator<Item = String>,
) -> Result<Vec<ChannelUserAttribute>, String> {
    args.map(|arg| match arg.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok(ChannelUserAttribute::new(key, value)),
        _ => Err(format!("Expected key=value, got '{arg}'")),
    })
    .collect()
}
