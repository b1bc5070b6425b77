//! Bulk deletion of recent messages.

use {
    async_trait::async_trait,
    serenity::all::{ChannelId, GetMessages, MessageId, Permissions},
    tracing::debug,
};

use {
    sigil_common::{DescriptionBuilder, Embed, time},
    sigil_nlu::IntentResult,
};

use crate::{
    duration::{CutoffError, purge_cutoff},
    response::Response,
    skill::{Skill, SkillError, SkillEvent},
};

const INVALID_DURATION: &str =
    "That is an invalid time duration, try being less vague with abbreviations.";
const TOO_FAR: &str = "You can only purge up to 14 days!";
const IN_FUTURE: &str = "You can't purge the future!";

/// Discord bulk deletion takes at most 100 ids per call.
const BULK_DELETE_CHUNK: usize = 100;

fn purge_summary_embed(total: usize, since: &str) -> Embed {
    let (title, tail) = if total > BULK_DELETE_CHUNK {
        ("Purge Running", "queued for deletion!")
    } else {
        ("Purge Completed", "deleted!")
    };
    Embed::new()
        .title(title)
        .description(format!("\u{2705} {total} messages since {since} {tail}"))
        .footer("Moderation")
        .timestamp_now()
}

fn purge_failed_embed() -> Embed {
    Embed::new()
        .title("Purge Failed")
        .description("\u{274C} There must be at least two messages to purge!")
        .footer("Moderation")
        .timestamp_now()
}

fn purge_audit_embed(total: usize, channel_id: u64, blame_id: u64) -> Embed {
    let description = DescriptionBuilder::new()
        .field("Total", format!("{total} messages"))
        .field("Channel", format!("<#{channel_id}>"))
        .field("Blame", format!("<@{blame_id}>"))
        .build();
    Embed::new()
        .title("Messages Purged")
        .description(description)
        .footer("Auditing")
        .timestamp_now()
}

/// Deletes every message newer than a requested cutoff, at most 14 days back.
pub struct PurgeSkill;

impl PurgeSkill {
    /// Walk the channel history newest-first, collecting ids until the
    /// cutoff. The triggering message itself is included.
    async fn collect_since(
        event: &SkillEvent<'_>,
        channel_id: ChannelId,
        cutoff: i64,
    ) -> Result<Vec<MessageId>, SkillError> {
        let mut ids = vec![event.message.id];
        let mut before = event.message.id;

        loop {
            let batch = channel_id
                .messages(&event.ctx.http, GetMessages::new().before(before).limit(100))
                .await?;
            let Some(oldest) = batch.last() else {
                break;
            };
            before = oldest.id;

            let mut reached_cutoff = false;
            for message in &batch {
                if message.id.created_at().unix_timestamp() < cutoff {
                    reached_cutoff = true;
                    break;
                }
                ids.push(message.id);
            }
            if reached_cutoff {
                break;
            }
        }
        Ok(ids)
    }

    async fn delete_all(
        event: &SkillEvent<'_>,
        channel_id: ChannelId,
        ids: &[MessageId],
    ) -> Result<(), SkillError> {
        for chunk in ids.chunks(BULK_DELETE_CHUNK) {
            // The bulk endpoint wants 2..=100 ids; a trailing single message
            // goes through the plain delete call.
            if let [only] = chunk {
                event
                    .ctx
                    .http
                    .delete_message(channel_id, *only, Some("purge"))
                    .await?;
            } else {
                let body = serde_json::json!({ "messages": chunk });
                event
                    .ctx
                    .http
                    .delete_messages(channel_id, &body, Some("purge"))
                    .await?;
            }
        }
        Ok(())
    }
}

#[async_trait]
impl Skill for PurgeSkill {
    fn intent(&self) -> &'static str {
        "skill.moderation.purge"
    }

    fn guild_only(&self) -> bool {
        true
    }

    fn required_self_permissions(&self) -> Permissions {
        Permissions::MANAGE_MESSAGES | Permissions::READ_MESSAGE_HISTORY
    }

    fn required_user_permissions(&self) -> Permissions {
        Permissions::MANAGE_MESSAGES
    }

    async fn on_trigger(
        &self,
        event: &SkillEvent<'_>,
        intent: &IntentResult,
    ) -> Result<Response, SkillError> {
        let Some(duration) = intent.duration_param("duration") else {
            return Ok(Response::volatile(INVALID_DURATION));
        };

        let origin = event.message.id.created_at().unix_timestamp();
        let cutoff = match purge_cutoff(origin, &duration) {
            Ok(cutoff) => cutoff,
            Err(CutoffError::UnknownUnit) => return Ok(Response::volatile(INVALID_DURATION)),
            Err(CutoffError::TooFarPast) => return Ok(Response::volatile(TOO_FAR)),
            Err(CutoffError::InFuture) => return Ok(Response::volatile(IN_FUTURE)),
        };

        let channel_id = event.message.channel_id;
        let ids = Self::collect_since(event, channel_id, cutoff).await?;

        if ids.len() <= 2 {
            if let Err(e) = event
                .ctx
                .http
                .delete_message(channel_id, event.message.id, Some("failed purge request"))
                .await
            {
                debug!(message = %event.message.id, "could not remove purge request: {e}");
            }
            return Ok(Response::volatile(purge_failed_embed()));
        }

        let total = ids.len();
        Self::delete_all(event, channel_id, &ids).await?;

        if event.guild_config.auditing.purge
            && let Some(target) = &event.guild_config.auditing.webhook
        {
            let embed = purge_audit_embed(
                total,
                channel_id.get(),
                event.message.author.id.get(),
            );
            event.audit.audit(target, embed).await;
        }

        let since = time::relative(cutoff, time::unix_now());
        Ok(Response::volatile(purge_summary_embed(total, &since)))
    }
}
