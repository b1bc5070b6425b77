//! Response delivery and lifetime management.
//!
//! `deliver` sends exactly one message per response and returns immediately;
//! time-bounded variants hand their deletion to a detached timer task. The
//! timer keeps no registry; if the message is gone by the time it fires,
//! the delete is treated as already satisfied.

use std::{sync::Arc, time::Duration};

use {
    serenity::all::{
        ChannelId, CreateEmbed, CreateEmbedAuthor, CreateEmbedFooter, CreateMessage, Http,
        MessageId, Timestamp,
    },
    tokio::task::JoinHandle,
    tracing::debug,
};

use sigil_skills::{Payload, Response};

use crate::error::Error;

/// Send a response to a channel and schedule its deletion when the variant
/// asks for one. Never blocks on the deletion timer.
pub async fn deliver(
    http: &Arc<Http>,
    channel_id: ChannelId,
    response: Response,
) -> Result<MessageId, Error> {
    let create = match response.payload() {
        Payload::Text(text) => CreateMessage::new().content(text),
        Payload::Embed(embed) => CreateMessage::new().embed(to_create_embed(embed)),
    };

    let message = channel_id.send_message(http, create).await?;

    if let Some(delay) = response.deletion_delay() {
        schedule_delete(Arc::clone(http), channel_id, message.id, delay);
    }
    Ok(message.id)
}

/// Detached deletion timer. Returns the task handle so cancellation can be
/// added later; current callers drop it.
pub fn schedule_delete(
    http: Arc<Http>,
    channel_id: ChannelId,
    message_id: MessageId,
    delay: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        if let Err(e) = http
            .delete_message(channel_id, message_id, Some("response expired"))
            .await
        {
            // Already deleted (externally or by another timer) counts as done.
            debug!(%channel_id, %message_id, "scheduled delete was a no-op: {e}");
        }
    })
}

/// Convert the shared embed model into the gateway library's builder.
pub fn to_create_embed(embed: &sigil_common::Embed) -> CreateEmbed {
    let mut create = CreateEmbed::new();
    if let Some(title) = &embed.title {
        create = create.title(title);
    }
    if let Some(description) = &embed.description {
        create = create.description(description);
    }
    for field in &embed.fields {
        create = create.field(&field.name, &field.value, field.inline);
    }
    if let Some(color) = embed.color {
        create = create.color(color);
    }
    if let Some(footer) = &embed.footer {
        create = create.footer(CreateEmbedFooter::new(&footer.text));
    }
    if let Some(timestamp) = &embed.timestamp
        && let Ok(parsed) = Timestamp::parse(timestamp)
    {
        create = create.timestamp(parsed);
    }
    if let Some(author) = &embed.author {
        let mut builder = CreateEmbedAuthor::new(&author.name);
        if let Some(icon) = &author.icon_url {
            builder = builder.icon_url(icon);
        }
        create = create.author(builder);
    }
    if let Some(thumbnail) = &embed.thumbnail {
        create = create.thumbnail(&thumbnail.url);
    }
    if let Some(image) = &embed.image {
        create = create.image(&image.url);
    }
    create
}
