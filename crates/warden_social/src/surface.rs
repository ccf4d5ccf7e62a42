//! Serenity-backed message surface.

use crate::embeds::page_controls;
use crate::pagination::{MessageSurface, RenderFailure};
use async_trait::async_trait;
use serenity::builder::{CreateEmbed, EditMessage};
use serenity::http::{Http, HttpError};
use serenity::model::channel::Message;
use std::sync::Arc;

/// A rendered Discord message driven through in-place edits.
pub struct DiscordSurface {
    http: Arc<Http>,
    message: Message,
}

impl DiscordSurface {
    /// Wrap a sent message for session rendering.
    pub fn new(http: Arc<Http>, message: Message) -> Self {
        Self { http, message }
    }

    /// Map a Serenity failure onto the session's render failure split.
    ///
    /// A missing or forbidden message will never become editable again, so
    /// those map to `Stale`; everything else is assumed transient.
    fn classify(err: serenity::Error) -> RenderFailure {
        match &err {
            serenity::Error::Http(HttpError::UnsuccessfulRequest(response))
                if matches!(response.status_code.as_u16(), 403 | 404) =>
            {
                RenderFailure::Stale
            }
            _ => RenderFailure::Transient(err.to_string()),
        }
    }
}

#[async_trait]
impl MessageSurface for DiscordSurface {
    type Page = CreateEmbed;

    async fn show_page(&mut self, page: &CreateEmbed) -> Result<(), RenderFailure> {
        self.message
            .edit(
                &self.http,
                EditMessage::new()
                    .content("")
                    .embed(page.clone())
                    .components(page_controls()),
            )
            .await
            .map_err(Self::classify)
    }

    async fn delete(&mut self) -> Result<(), RenderFailure> {
        self.message
            .delete(&self.http)
            .await
            .map_err(Self::classify)
    }

    async fn strip_controls(&mut self) -> Result<(), RenderFailure> {
        self.message
            .edit(&self.http, EditMessage::new().components(Vec::new()))
            .await
            .map_err(Self::classify)
    }
}
