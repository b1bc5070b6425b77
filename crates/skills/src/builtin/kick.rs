//! Kicking mentioned members.

use {
    async_trait::async_trait,
    serenity::all::{CreateMessage, Permissions, User},
    tracing::{debug, warn},
};

use {
    sigil_common::{DescriptionBuilder, Embed},
    sigil_nlu::IntentResult,
};

use crate::{
    response::Response,
    skill::{Skill, SkillError, SkillEvent},
};

const NO_TARGETS: &str = "Who do you want me to kick? Mention them in your request.";
const NONE_KICKED: &str =
    "I couldn't kick anyone. Check that my role is above theirs and try again.";
const DEFAULT_REASON: &str = "No reason provided";

/// Cap on listing names individually in the confirmation.
const NAME_LIST_LIMIT: usize = 200;

fn kick_summary(names: &[String]) -> String {
    let joined = names.join(", ");
    let who = if joined.len() < NAME_LIST_LIMIT {
        joined
    } else {
        format!("{} people", names.len())
    };
    let verb = if names.len() == 1 { "was" } else { "were" };
    format!("\u{2705} ***{who} {verb} kicked!***")
}

fn kick_audit_embed(who: &str, reason: &str, blame_id: u64) -> Embed {
    let description = DescriptionBuilder::new()
        .field("Who", who)
        .field("Reason", reason)
        .field("Blame", format!("<@{blame_id}>"))
        .build();
    Embed::new()
        .title("Members Kicked")
        .description(description)
        .footer("Auditing")
        .timestamp_now()
}

fn display_name(user: &User) -> String {
    user.global_name.clone().unwrap_or_else(|| user.name.clone())
}

/// Kicks every member mentioned in the triggering message, DMing each human
/// target first. The DM is best-effort: the kick goes through whether or not
/// it lands.
pub struct KickSkill;

#[async_trait]
impl Skill for KickSkill {
    fn intent(&self) -> &'static str {
        "skill.moderation.kick"
    }

    fn guild_only(&self) -> bool {
        true
    }

    fn required_self_permissions(&self) -> Permissions {
        Permissions::KICK_MEMBERS
    }

    fn required_user_permissions(&self) -> Permissions {
        Permissions::KICK_MEMBERS
    }

    async fn on_trigger(
        &self,
        event: &SkillEvent<'_>,
        intent: &IntentResult,
    ) -> Result<Response, SkillError> {
        let guild_id = event
            .message
            .guild_id
            .ok_or_else(|| SkillError::Other("kick intent without a guild".into()))?;

        let (guild_name, bot_id) = {
            let bot_id = event.ctx.cache.current_user().id;
            let name = event
                .ctx
                .cache
                .guild(guild_id)
                .map(|guild| guild.name.clone())
                .unwrap_or_else(|| "this server".into());
            (name, bot_id)
        };

        let targets: Vec<User> = event
            .message
            .mentions
            .iter()
            .filter(|user| user.id != bot_id)
            .cloned()
            .collect();
        if targets.is_empty() {
            return Ok(Response::volatile(NO_TARGETS));
        }

        let reason = intent
            .string_param("reason")
            .unwrap_or(DEFAULT_REASON)
            .to_string();

        // The request message goes away before the kicks start.
        if let Err(e) = event
            .ctx
            .http
            .delete_message(event.message.channel_id, event.message.id, Some("kick request"))
            .await
        {
            debug!(message = %event.message.id, "could not remove kick request: {e}");
        }

        let mut kicked: Vec<String> = Vec::new();
        for user in &targets {
            if !user.bot {
                let notice = CreateMessage::new().content(format!(
                    "***You have been kicked from {guild_name} for \"{reason}\"!***"
                ));
                if let Err(e) = user.direct_message(event.ctx, notice).await {
                    debug!(user = %user.id, "kick notice DM failed: {e}");
                }
            }
            match guild_id
                .kick_with_reason(&event.ctx.http, user.id, &reason)
                .await
            {
                Ok(()) => kicked.push(display_name(user)),
                Err(e) => warn!(user = %user.id, guild = %guild_id, "kick failed: {e}"),
            }
        }

        if kicked.is_empty() {
            return Ok(Response::persistent(NONE_KICKED));
        }

        if event.guild_config.auditing.kicks
            && let Some(target) = &event.guild_config.auditing.webhook
        {
            let joined = kicked.join(", ");
            let who = if joined.len() < NAME_LIST_LIMIT {
                joined
            } else {
                format!("{} people", kicked.len())
            };
            let embed = kick_audit_embed(&who, &reason, event.message.author.id.get());
            event.audit.audit(target, embed).await;
        }

        Ok(Response::persistent(kick_summary(&kicked)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_target_reads_singular() {
        let summary = kick_summary(&["troublemaker".into()]);
        assert_eq!(summary, "\u{2705} ***troublemaker was kicked!***");
    }

    #[test]
    fn several_targets_read_plural() {
        let summary = kick_summary(&["a".into(), "b".into()]);
        assert!(summary.contains("a, b were kicked!"));
    }

    #[test]
    fn long_name_lists_collapse_to_a_count() {
        let names: Vec<String> = (0..40).map(|i| format!("member-number-{i}")).collect();
        let summary = kick_summary(&names);
        assert!(summary.contains("40 people were kicked!"));
        assert!(!summary.contains("member-number-0"));
    }

    #[test]
    fn audit_embed_carries_who_reason_blame() {
        let embed = kick_audit_embed("troublemaker", "spamming", 777);
        assert_eq!(embed.title.as_deref(), Some("Members Kicked"));
        let description = embed.description.unwrap_or_default();
        assert!(description.contains("**Who** troublemaker"));
        assert!(description.contains("**Reason** spamming"));
        assert!(description.contains("**Blame** <@777>"));
    }
}
