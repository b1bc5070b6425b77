//! Guild membership events: bot-list server counts and join/leave logging.

use {
    serenity::all::Context,
    tracing::info,
};

use sigil_common::{DescriptionBuilder, Embed, embed::color};

use crate::{state::SharedState, webhook::server_count_body};

/// Facts reported about a joined or departed guild.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GuildFacts {
    pub name: String,
    pub id: u64,
    pub member_count: u64,
    pub icon_url: Option<String>,
}

/// Embed posted to the logging webhook on guild join/leave.
pub fn guild_log_embed(facts: &GuildFacts, joined: bool) -> Embed {
    let description = DescriptionBuilder::new()
        .field("Name", &facts.name)
        .field("ID", facts.id)
        .field("Members", facts.member_count)
        .build();
    let (title, accent) = if joined {
        ("Guild Joined", color::GREEN)
    } else {
        ("Guild Left", color::RED)
    };
    let mut embed = Embed::new()
        .title(title)
        .description(description)
        .color(accent)
        .footer("Logging")
        .timestamp_now();
    if let Some(icon) = &facts.icon_url {
        embed = embed.thumbnail(icon.clone());
    }
    embed
}

/// Report the current guild count to every configured bot-list directory.
///
/// Each post is independent and best-effort: one directory rejecting the
/// update (expired token, rate limit) never stops the others. Re-sending an
/// unchanged count is safe; frequency is whatever the gateway events drive.
pub async fn update_server_count(state: &SharedState, ctx: &Context) {
    let targets = state.config.bot_lists();
    if targets.is_empty() {
        return;
    }

    let count = ctx.cache.guilds().len();
    let body = server_count_body(count, ctx.shard_id.0, ctx.cache.shard_count());

    for target in &targets {
        state
            .notifier
            .send_json(&target.name, &target.endpoint, Some(target.token()), &body)
            .await;
    }
    info!(count, targets = targets.len(), "server count reported");
}

/// Handle a newly-joined guild: refresh counts, log the join.
pub async fn guild_joined(state: &SharedState, ctx: &Context, facts: GuildFacts) {
    info!(guild = facts.id, name = %facts.name, "joined guild");
    update_server_count(state, ctx).await;
    if let Some(target) = state.config.logging_webhook() {
        state
            .notifier
            .send_embed(&target, guild_log_embed(&facts, true))
            .await;
    }
}

/// Handle leaving a guild: refresh counts, log the departure.
pub async fn guild_left(state: &SharedState, ctx: &Context, facts: GuildFacts) {
    info!(guild = facts.id, name = %facts.name, "left guild");
    update_server_count(state, ctx).await;
    if let Some(target) = state.config.logging_webhook() {
        state
            .notifier
            .send_embed(&target, guild_log_embed(&facts, false))
            .await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn facts() -> GuildFacts {
        GuildFacts {
            name: "Somewhere".into(),
            id: 4242,
            member_count: 120,
            icon_url: Some("https://cdn.example/icon.png".into()),
        }
    }

    #[test]
    fn join_embed_is_green_and_titled() {
        let embed = guild_log_embed(&facts(), true);
        assert_eq!(embed.title.as_deref(), Some("Guild Joined"));
        assert_eq!(embed.color, Some(color::GREEN));
        let description = embed.description.unwrap_or_default();
        assert!(description.contains("**Name** Somewhere"));
        assert!(description.contains("**ID** 4242"));
        assert!(description.contains("**Members** 120"));
    }

    #[test]
    fn leave_embed_is_red_and_titled() {
        let embed = guild_log_embed(&facts(), false);
        assert_eq!(embed.title.as_deref(), Some("Guild Left"));
        assert_eq!(embed.color, Some(color::RED));
        assert_eq!(
            embed.thumbnail.as_ref().map(|t| t.url.as_str()),
            Some("https://cdn.example/icon.png")
        );
    }

    #[test]
    fn missing_icon_leaves_no_thumbnail() {
        let mut plain = facts();
        plain.icon_url = None;
        let embed = guild_log_embed(&plain, true);
        assert!(embed.thumbnail.is_none());
    }
}
