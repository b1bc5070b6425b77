//! Bragging rights: member rankings by join order or account age.

use async_trait::async_trait;

use {
    sigil_common::{DescriptionBuilder, Embed, time},
    sigil_nlu::IntentResult,
};

use crate::{
    response::Response,
    skill::{Skill, SkillError, SkillEvent},
};

const NO_PROPERTY: &str = "I'm not sure what the property you want to rank members by is.";

/// How many members to show from each end of the ranking.
const NOTABLE_EACH_END: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankEntry {
    pub name: String,
    pub user_id: u64,
    pub joined_unix: i64,
    pub created_unix: i64,
}

fn rank_by_join(mut entries: Vec<RankEntry>) -> Vec<RankEntry> {
    entries.sort_by_key(|entry| entry.joined_unix);
    entries
}

/// Snowflake ids are creation-ordered, so sorting by id sorts by account age.
fn rank_by_creation(mut entries: Vec<RankEntry>) -> Vec<RankEntry> {
    entries.sort_by_key(|entry| entry.user_id);
    entries
}

fn rank_embed(
    title: &str,
    ranked: &[RankEntry],
    requester_id: u64,
    now: i64,
    describe: impl Fn(&RankEntry, i64) -> String,
) -> Embed {
    let mut notable_positions: Vec<usize> = (0..ranked.len().min(NOTABLE_EACH_END))
        .chain(ranked.len().saturating_sub(NOTABLE_EACH_END)..ranked.len())
        .collect();
    notable_positions.sort_unstable();
    notable_positions.dedup();

    let mut notable = DescriptionBuilder::new();
    for position in notable_positions {
        notable = notable.field(
            &format!("`{}.`", position + 1),
            describe(&ranked[position], now),
        );
    }

    let mut embed = Embed::new()
        .title(title)
        .field("Notable", notable.build(), false)
        .footer("Rank")
        .timestamp_now();

    if let Some(position) = ranked.iter().position(|entry| entry.user_id == requester_id) {
        embed = embed.field(
            "You",
            format!("`{}.` {}", position + 1, describe(&ranked[position], now)),
            true,
        );
    }
    embed
}

fn describe_join(entry: &RankEntry, now: i64) -> String {
    format!(
        "**{}** joined **{}**",
        entry.name,
        time::relative(entry.joined_unix, now)
    )
}

fn describe_creation(entry: &RankEntry, now: i64) -> String {
    format!(
        "**{}** was created **{}**",
        entry.name,
        time::relative(entry.created_unix, now)
    )
}

/// Ranks guild members by join time or account creation time.
pub struct RankSkill;

#[async_trait]
impl Skill for RankSkill {
    fn intent(&self) -> &'static str {
        "skill.rank"
    }

    fn guild_only(&self) -> bool {
        true
    }

    async fn on_trigger(
        &self,
        event: &SkillEvent<'_>,
        intent: &IntentResult,
    ) -> Result<Response, SkillError> {
        let Some(property) = intent.string_param("memberProperty") else {
            return Ok(Response::volatile(NO_PROPERTY));
        };

        let guild_id = event
            .message
            .guild_id
            .ok_or_else(|| SkillError::Other("rank intent without a guild".into()))?;

        let entries: Vec<RankEntry> = {
            let guild = event
                .ctx
                .cache
                .guild(guild_id)
                .ok_or_else(|| SkillError::Other(format!("guild {guild_id} not in cache")))?;
            guild
                .members
                .values()
                .map(|member| RankEntry {
                    name: member.display_name().to_string(),
                    user_id: member.user.id.get(),
                    joined_unix: member
                        .joined_at
                        .map(|at| at.unix_timestamp())
                        .unwrap_or_default(),
                    created_unix: member.user.id.created_at().unix_timestamp(),
                })
                .collect()
        };

        let requester_id = event.message.author.id.get();
        let now = time::unix_now();
        let embed = match property {
            "join" => rank_embed(
                "Guild Join Rankings",
                &rank_by_join(entries),
                requester_id,
                now,
                describe_join,
            ),
            "created" => rank_embed(
                "Account Creation Rankings",
                &rank_by_creation(entries),
                requester_id,
                now,
                describe_creation,
            ),
            other => {
                return Ok(Response::volatile(format!(
                    "I'm not sure what property `{other}` is for members."
                )));
            },
        };
        Ok(Response::volatile(embed))
    }
}
