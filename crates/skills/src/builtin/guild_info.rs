//! Answering questions about the current guild.

use {
    async_trait::async_trait,
    serenity::all::{ChannelType, OnlineStatus},
};

use {
    sigil_common::{DescriptionBuilder, Embed, time},
    sigil_nlu::IntentResult,
};

use crate::{
    response::Response,
    skill::{Skill, SkillError, SkillEvent},
};

/// The guild facts the skill reports, captured from the cache in one read.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GuildSnapshot {
    pub name: String,
    pub id: u64,
    pub created_unix: i64,
    pub owner_id: u64,
    pub humans: usize,
    pub bots: usize,
    pub online: usize,
    pub total_members: u64,
    pub text_channels: usize,
    pub voice_channels: usize,
    pub categories: usize,
    pub roles: Vec<String>,
    pub icon_url: Option<String>,
}

fn property_line(guild: &GuildSnapshot, property: &str, now: i64) -> String {
    let name = &guild.name;
    match property {
        "name" => format!("This guild is **{name}**."),
        "id" => format!("The id for {name} is **{}**.", guild.id),
        "created" => format!(
            "{name} was created **{}** (<t:{}:F>).",
            time::relative(guild.created_unix, now),
            guild.created_unix
        ),
        "owner" => format!("**<@{}>** is the owner of {name}.", guild.owner_id),
        "members" => format!("{name} has **{}** members.", guild.total_members),
        "membersHumans" => format!("{name} has **{}** humans.", guild.humans),
        "membersBots" => format!("{name} has **{}** bots.", guild.bots),
        "channels" => format!(
            "{name} has **{}** channels.",
            guild.text_channels + guild.voice_channels
        ),
        "channelsText" => format!("{name} has **{}** text channels.", guild.text_channels),
        "channelsVoice" => format!("{name} has **{}** voice channels.", guild.voice_channels),
        "roles" => format!("{name} has **{}** roles.", guild.roles.len()),
        _ => format!("I'm not sure what property `{property}` is for a guild."),
    }
}

fn info_embed(guild: &GuildSnapshot, now: i64) -> Embed {
    let overview = DescriptionBuilder::new()
        .field("Name", &guild.name)
        .field("ID", guild.id)
        .field(
            "Created",
            format!(
                "{} (<t:{}:F>)",
                time::relative(guild.created_unix, now),
                guild.created_unix
            ),
        )
        .field("Owner", format!("<@{}>", guild.owner_id))
        .build();
    let members = DescriptionBuilder::new()
        .field("Humans", guild.humans)
        .field("Bots", guild.bots)
        .field("Online", guild.online)
        .field("Total", guild.total_members)
        .build();
    let channels = DescriptionBuilder::new()
        .field("Text", guild.text_channels)
        .field("Voice", guild.voice_channels)
        .field("Categories", guild.categories)
        .build();
    let roles = DescriptionBuilder::new()
        .field("Total", guild.roles.len())
        .field("List", guild.roles.join(", "))
        .build();

    let mut embed = Embed::new()
        .title("Guild Info")
        .field("Overview", overview, false)
        .field("Members", members, true)
        .field("Channels", channels, true)
        .field("Roles", roles, true)
        .footer("Moderation")
        .timestamp_now();
    if let Some(icon) = &guild.icon_url {
        embed = embed.thumbnail(icon.clone());
    }
    embed
}

/// Reports facts about the guild: a one-line answer for a requested
/// property, or a full overview embed when none was given.
pub struct GuildInfoSkill;

#[async_trait]
impl Skill for GuildInfoSkill {
    fn intent(&self) -> &'static str {
        "skill.moderation.guildInfo"
    }

    fn guild_only(&self) -> bool {
        true
    }

    async fn on_trigger(
        &self,
        event: &SkillEvent<'_>,
        intent: &IntentResult,
    ) -> Result<Response, SkillError> {
        let guild_id = event
            .message
            .guild_id
            .ok_or_else(|| SkillError::Other("guild info intent without a guild".into()))?;

        let snapshot = {
            let guild = event
                .ctx
                .cache
                .guild(guild_id)
                .ok_or_else(|| SkillError::Other(format!("guild {guild_id} not in cache")))?;

            let (bots, humans) = guild
                .members
                .values()
                .fold((0, 0), |(bots, humans), member| {
                    if member.user.bot {
                        (bots + 1, humans)
                    } else {
                        (bots, humans + 1)
                    }
                });
            let count_kind = |kind: ChannelType| {
                guild
                    .channels
                    .values()
                    .filter(|channel| channel.kind == kind)
                    .count()
            };
            let mut roles: Vec<String> =
                guild.roles.values().map(|role| role.name.clone()).collect();
            roles.sort_unstable();

            GuildSnapshot {
                name: guild.name.clone(),
                id: guild_id.get(),
                created_unix: guild_id.created_at().unix_timestamp(),
                owner_id: guild.owner_id.get(),
                humans,
                bots,
                online: guild
                    .presences
                    .values()
                    .filter(|presence| presence.status == OnlineStatus::Online)
                    .count(),
                total_members: guild.member_count,
                text_channels: count_kind(ChannelType::Text),
                voice_channels: count_kind(ChannelType::Voice),
                categories: count_kind(ChannelType::Category),
                roles,
                icon_url: guild.icon_url(),
            }
        };

        let now = time::unix_now();
        match intent.string_param("guildProperty") {
            Some(property) => Ok(Response::volatile(property_line(&snapshot, property, now))),
            None => Ok(Response::volatile(info_embed(&snapshot, now))),
        }
    }
}
