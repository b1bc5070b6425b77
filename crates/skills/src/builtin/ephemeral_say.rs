//! Say something that disappears.

use std::time::Duration;

use {
    async_trait::async_trait,
    serenity::all::Permissions,
    tracing::debug,
};

use {
    sigil_common::Embed,
    sigil_nlu::{DurationParam, IntentResult},
};

use crate::{
    response::Response,
    skill::{Skill, SkillError, SkillEvent},
};

/// How long validation notices stay up.
const NOTICE_TTL: Duration = Duration::from_secs(5);

/// Longest a message may stay up before vanishing.
const MAX_EPHEMERAL_SECS: i64 = 30;

const INVALID_DURATION: &str =
    "That is an invalid time duration, specify how many seconds you want your message to last.";
const OVER_LIMIT: &str = "You can only say something ephemerally for less than 30 seconds!";
const NOT_POSITIVE: &str = "You can only say something ephemerally for a positive amount of time!";

#[derive(Debug, PartialEq, Eq)]
enum WindowError {
    NotSeconds,
    NotPositive,
    TooLong,
}

/// Validate the requested window: seconds only, in (0, 30].
fn ephemeral_window(duration: &DurationParam) -> Result<Duration, WindowError> {
    if duration.unit != "s" {
        return Err(WindowError::NotSeconds);
    }
    if duration.amount <= 0 {
        return Err(WindowError::NotPositive);
    }
    if duration.amount > MAX_EPHEMERAL_SECS {
        return Err(WindowError::TooLong);
    }
    Ok(Duration::from_secs(duration.amount as u64))
}

fn ephemeral_embed(
    author: &str,
    avatar_url: Option<String>,
    text: &str,
    expires: chrono::DateTime<chrono::Utc>,
) -> Embed {
    Embed::new()
        .author(author, avatar_url)
        .description(text)
        .footer("Ephemeral Say")
        .timestamp_at(expires)
}

/// Repeats the user's message in an embed that deletes itself after the
/// requested number of seconds. The original request is removed immediately,
/// which is why the bot needs Manage Messages.
pub struct EphemeralSaySkill;

#[async_trait]
impl Skill for EphemeralSaySkill {
    fn intent(&self) -> &'static str {
        "skill.ephemeral_say"
    }

    fn guild_only(&self) -> bool {
        true
    }

    fn required_self_permissions(&self) -> Permissions {
        Permissions::MANAGE_MESSAGES
    }

    async fn on_trigger(
        &self,
        event: &SkillEvent<'_>,
        intent: &IntentResult,
    ) -> Result<Response, SkillError> {
        let Some(duration) = intent.duration_param("duration") else {
            return Ok(Response::ephemeral(INVALID_DURATION, NOTICE_TTL));
        };

        let window = match ephemeral_window(&duration) {
            Ok(window) => window,
            Err(WindowError::NotSeconds | WindowError::TooLong) => {
                return Ok(Response::ephemeral(OVER_LIMIT, NOTICE_TTL));
            },
            Err(WindowError::NotPositive) => {
                return Ok(Response::ephemeral(NOT_POSITIVE, NOTICE_TTL));
            },
        };

        let text = intent.string_param("message").unwrap_or_default().to_string();

        // The request itself vanishes first; the embed carries the content.
        if let Err(e) = event
            .ctx
            .http
            .delete_message(event.message.channel_id, event.message.id, Some("ephemeral say"))
            .await
        {
            debug!(message = %event.message.id, "could not remove ephemeral say request: {e}");
        }

        let expires = chrono::Utc::now() + chrono::Duration::seconds(duration.amount);
        let embed = ephemeral_embed(
            &event.message.author.name,
            event.message.author.avatar_url(),
            &text,
            expires,
        );
        Ok(Response::ephemeral(embed, window))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn duration(amount: i64, unit: &str) -> DurationParam {
        DurationParam {
            amount,
            unit: unit.into(),
        }
    }

    #[test]
    fn seconds_within_bounds_are_accepted() {
        assert_eq!(
            ephemeral_window(&duration(10, "s")),
            Ok(Duration::from_secs(10))
        );
        assert_eq!(
            ephemeral_window(&duration(30, "s")),
            Ok(Duration::from_secs(30))
        );
        assert_eq!(
            ephemeral_window(&duration(1, "s")),
            Ok(Duration::from_secs(1))
        );
    }

    #[test]
    fn non_second_units_are_rejected() {
        assert_eq!(ephemeral_window(&duration(1, "min")), Err(WindowError::NotSeconds));
        assert_eq!(ephemeral_window(&duration(1, "h")), Err(WindowError::NotSeconds));
    }

    #[test]
    fn more_than_thirty_seconds_is_rejected() {
        assert_eq!(ephemeral_window(&duration(31, "s")), Err(WindowError::TooLong));
        assert_eq!(ephemeral_window(&duration(600, "s")), Err(WindowError::TooLong));
    }

    #[test]
    fn zero_and_negative_amounts_are_rejected() {
        assert_eq!(ephemeral_window(&duration(0, "s")), Err(WindowError::NotPositive));
        assert_eq!(ephemeral_window(&duration(-3, "s")), Err(WindowError::NotPositive));
    }

    #[test]
    fn embed_carries_the_message_and_expiry() {
        let expires = chrono::Utc::now();
        let embed = ephemeral_embed("someone", None, "hi", expires);
        assert_eq!(embed.description.as_deref(), Some("hi"));
        assert_eq!(
            embed.author.as_ref().map(|a| a.name.as_str()),
            Some("someone")
        );
        assert_eq!(
            embed.footer.as_ref().map(|f| f.text.as_str()),
            Some("Ephemeral Say")
        );
        assert!(embed.timestamp.is_some());
    }

    #[test]
    fn validation_notices_are_short_lived() {
        // The notices themselves vanish quickly rather than cluttering chat.
        assert!(NOTICE_TTL <= Duration::from_secs(5));
    }
}
