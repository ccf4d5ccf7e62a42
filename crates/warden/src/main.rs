//! Warden process entry point.
//!
//! Startup order matters: the store connection and the full cache load
//! come before the gateway connection, and a failure in either aborts the
//! process — the bot cannot run safely against an unknown state.

mod config;

use config::WardenConfig;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use warden_catalog::CatalogClient;
use warden_database::{establish_connection, WardenRepository};
use warden_journal::MessageJournal;
use warden_social::WardenBot;

fn init_tracing() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,warden=debug"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = WardenConfig::from_env()?;

    let conn = establish_connection()?;
    let store = WardenRepository::new(conn);

    let journal = Arc::new(MessageJournal::load(store).await?);
    info!("Guild state cache loaded");

    let catalog = CatalogClient::new(config.catalog_base_url.clone());

    let mut bot = WardenBot::new(
        config.discord_token.clone(),
        journal,
        catalog,
        config.page_timeout(),
    )
    .await?;

    bot.start().await?;
    Ok(())
}
