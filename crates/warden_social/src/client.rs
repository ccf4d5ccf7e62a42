//! Discord bot client setup and lifecycle management.

use crate::error::{DiscordError, DiscordErrorKind};
use crate::handler::WardenHandler;
use crate::Journal;
use serenity::Client;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, instrument};
use warden_catalog::CatalogClient;

/// Main Discord client for Warden.
///
/// # Example
/// ```no_run
/// use std::sync::Arc;
/// use std::time::Duration;
/// use warden_catalog::CatalogClient;
/// use warden_database::{establish_connection, WardenRepository};
/// use warden_journal::MessageJournal;
/// use warden_social::WardenBot;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let token = std::env::var("DISCORD_TOKEN")?;
///     let store = WardenRepository::new(establish_connection()?);
///     let journal = Arc::new(MessageJournal::load(store).await?);
///     let catalog = CatalogClient::new("https://api.example.edu/rest/v0");
///
///     let mut bot = WardenBot::new(token, journal, catalog, Duration::from_secs(60)).await?;
///     bot.start().await?;
///     Ok(())
/// }
/// ```
pub struct WardenBot {
    client: Client,
}

impl WardenBot {
    /// Create a new bot instance.
    ///
    /// # Errors
    /// Returns an error if the Serenity client fails to initialize (for
    /// example, an invalid token).
    #[instrument(skip_all, fields(token_len = token.len()))]
    pub async fn new(
        token: String,
        journal: Arc<Journal>,
        catalog: CatalogClient,
        page_timeout: Duration,
    ) -> Result<Self, DiscordError> {
        let handler = WardenHandler::new(journal, catalog, page_timeout);
        let intents = WardenHandler::intents();

        info!(?intents, "Building Serenity client");

        let client = Client::builder(&token, intents)
            .event_handler(handler)
            .await
            .map_err(|e| {
                DiscordError::new(DiscordErrorKind::ConnectionFailed(format!(
                    "Failed to build client: {e}"
                )))
            })?;

        Ok(Self { client })
    }

    /// Start the bot, blocking until shutdown or a fatal gateway error.
    #[instrument(skip(self))]
    pub async fn start(&mut self) -> Result<(), DiscordError> {
        info!("Starting Discord gateway connection");

        self.client.start().await.map_err(|e| {
            DiscordError::new(DiscordErrorKind::ConnectionFailed(format!(
                "Client error: {e}"
            )))
        })
    }
}
