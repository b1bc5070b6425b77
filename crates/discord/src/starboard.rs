//! Starboard: reposting popular messages through a webhook.
//!
//! A reaction-add event triggers a repost when the guild has a starboard
//! configured and the reaction's alias-normalized emoji matches. Two guards
//! keep reposts unique: the original's count rule (a second matching
//! reaction means someone else got there first) and an in-process
//! recently-posted set, which closes the race between concurrent
//! reaction-add events for the same message.

use std::{
    collections::{HashSet, VecDeque},
    sync::Mutex,
};

use {
    serenity::all::{Context, Message, Reaction, ReactionType},
    tracing::{debug, info},
};

use sigil_common::{Embed, embed::color};

use crate::state::SharedState;

/// Unicode emoji → shortcode alias, for the emoji people actually configure
/// on starboards. Custom emoji names are already alias-shaped and pass
/// through unchanged.
pub fn emoji_alias(emoji: &str) -> &str {
    // Presentation selectors don't change which emoji it is.
    let bare = emoji.trim_end_matches('\u{fe0f}');
    match bare {
        "\u{2b50}" => "star",
        "\u{1f31f}" => "star2",
        "\u{2728}" => "sparkles",
        "\u{1f4ab}" => "dizzy",
        "\u{2764}" => "heart",
        "\u{1f525}" => "fire",
        "\u{1f4cc}" => "pushpin",
        "\u{1f44d}" => "thumbsup",
        "\u{1f389}" => "tada",
        _ => emoji,
    }
}

fn reaction_name(reaction: &ReactionType) -> &str {
    match reaction {
        ReactionType::Unicode(name) => name.as_str(),
        ReactionType::Custom { name, .. } => name.as_deref().unwrap_or(""),
        _ => "",
    }
}

/// The original duplicate rule: if the alias-matching reaction already
/// counts more than one, an equivalent reaction landed before this event and
/// the repost already happened (or is happening).
pub fn is_duplicate(reaction_counts: &[(String, u64)], emoji: &str) -> bool {
    reaction_counts
        .iter()
        .rev()
        .find(|(alias, _)| alias == emoji)
        .is_some_and(|(_, count)| *count > 1)
}

/// Bounded set of recently-seen ids. Insertion reports whether the id was
/// new; the oldest entries fall out past the cap.
pub struct RecentSet {
    cap: usize,
    inner: Mutex<(VecDeque<u64>, HashSet<u64>)>,
}

impl Default for RecentSet {
    fn default() -> Self {
        Self::with_capacity(1024)
    }
}

impl RecentSet {
    pub fn with_capacity(cap: usize) -> Self {
        Self {
            cap,
            inner: Mutex::new((VecDeque::new(), HashSet::new())),
        }
    }

    /// Insert an id, returning `true` when it was not already present.
    pub fn insert(&self, id: u64) -> bool {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        let (order, seen) = &mut *inner;
        if !seen.insert(id) {
            return false;
        }
        order.push_back(id);
        if order.len() > self.cap
            && let Some(evicted) = order.pop_front()
        {
            seen.remove(&evicted);
        }
        true
    }
}

/// What the repost embed is built from, extracted from the starred message.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StarboardSource {
    pub author_name: String,
    pub author_avatar: Option<String>,
    pub content: String,
    pub image_url: Option<String>,
    pub thumbnail_url: Option<String>,
    pub message_id: u64,
    pub channel_name: String,
    /// Title/body pairs from the starred message's own embeds.
    pub nested: Vec<(String, String)>,
}

impl StarboardSource {
    fn from_message(message: &Message, channel_name: String) -> Self {
        let first_embed = message.embeds.first();
        Self {
            author_name: message.author.name.clone(),
            author_avatar: message.author.avatar_url(),
            content: message.content.clone(),
            image_url: message
                .attachments
                .first()
                .map(|attachment| attachment.url.clone())
                .or_else(|| {
                    first_embed
                        .and_then(|embed| embed.image.as_ref())
                        .map(|image| image.url.clone())
                }),
            thumbnail_url: first_embed
                .and_then(|embed| embed.thumbnail.as_ref())
                .map(|thumbnail| thumbnail.url.clone()),
            message_id: message.id.get(),
            channel_name,
            nested: message
                .embeds
                .iter()
                .map(|embed| {
                    let title = embed
                        .title
                        .clone()
                        .or_else(|| embed.author.as_ref().map(|author| author.name.clone()))
                        .unwrap_or_else(|| "Embed".into());
                    let mut body = embed.description.clone().unwrap_or_default();
                    for field in &embed.fields {
                        body.push_str(&format!("\n**__{}__**\n{}", field.name, field.value));
                    }
                    (title, body)
                })
                .collect(),
        }
    }
}

/// Build the repost embed.
pub fn starboard_embed(source: &StarboardSource) -> Embed {
    let mut embed = Embed::new()
        .author(&source.author_name, source.author_avatar.clone())
        .description(&source.content)
        .footer(format!(
            "Starboard | {} in #{}",
            source.message_id, source.channel_name
        ))
        .color(color::YELLOW)
        .timestamp_now();
    if let Some(image) = &source.image_url {
        embed = embed.image(image.clone());
    }
    if let Some(thumbnail) = &source.thumbnail_url {
        embed = embed.thumbnail(thumbnail.clone());
    }
    for (title, body) in &source.nested {
        embed = embed.field(title.clone(), body.clone(), false);
    }
    embed
}

/// Handle one guild reaction-add event.
pub async fn handle_reaction(state: &SharedState, ctx: &Context, reaction: &Reaction) {
    let Some(guild_id) = reaction.guild_id else {
        return;
    };
    let starboard = state.config.guild(guild_id.get()).starboard;
    if !starboard.enabled {
        return;
    }
    let Some(webhook) = &starboard.webhook else {
        return;
    };
    if emoji_alias(reaction_name(&reaction.emoji)) != starboard.emoji {
        return;
    }

    let message = match reaction.message(&ctx.http).await {
        Ok(message) => message,
        Err(e) => {
            debug!(message = %reaction.message_id, "starboard fetch failed: {e}");
            return;
        },
    };

    let counts: Vec<(String, u64)> = message
        .reactions
        .iter()
        .map(|r| (emoji_alias(reaction_name(&r.reaction_type)).to_string(), r.count))
        .collect();
    if is_duplicate(&counts, &starboard.emoji) {
        debug!(message = %message.id, "starboard repost suppressed: duplicate reaction");
        return;
    }
    if !state.starboard_posted.insert(message.id.get()) {
        debug!(message = %message.id, "starboard repost suppressed: already posted");
        return;
    }

    // The bot's own reaction marks the message as boarded for readers.
    if let Err(e) = message.react(ctx, reaction.emoji.clone()).await {
        debug!(message = %message.id, "starboard self-react failed: {e}");
    }

    let channel_name = reaction
        .channel_id
        .name(ctx)
        .await
        .unwrap_or_else(|_| "unknown".into());
    let source = StarboardSource::from_message(&message, channel_name);
    state.notifier.send_embed(webhook, starboard_embed(&source)).await;

    info!(
        guild = %guild_id,
        message = %message.id,
        emoji = %starboard.emoji,
        "starboard repost delivered"
    );
}
