//! The response model: what a skill produced and how long it should live.

use std::time::Duration;

use sigil_common::Embed;

/// How long a volatile response stays up before deletion.
pub const VOLATILE_DELETE_AFTER: Duration = Duration::from_secs(10);

/// A message body: plain text or an embed.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Text(String),
    Embed(Embed),
}

impl From<String> for Payload {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for Payload {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<Embed> for Payload {
    fn from(embed: Embed) -> Self {
        Self::Embed(embed)
    }
}

/// A skill's reply, tagged with its delivery lifetime.
///
/// Consumed exactly once by the delivery layer; the scheduled deletion task
/// is the only part that outlives the triggering event.
#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    /// Sent once, never auto-deleted.
    Persistent(Payload),
    /// Deleted after [`VOLATILE_DELETE_AFTER`].
    Volatile(Payload),
    /// Deleted after exactly the given duration. Callers validate bounds.
    Ephemeral(Payload, Duration),
}

impl Response {
    pub fn persistent(payload: impl Into<Payload>) -> Self {
        Self::Persistent(payload.into())
    }

    pub fn volatile(payload: impl Into<Payload>) -> Self {
        Self::Volatile(payload.into())
    }

    pub fn ephemeral(payload: impl Into<Payload>, after: Duration) -> Self {
        Self::Ephemeral(payload.into(), after)
    }

    pub fn payload(&self) -> &Payload {
        match self {
            Self::Persistent(p) | Self::Volatile(p) | Self::Ephemeral(p, _) => p,
        }
    }

    /// Delay before the delivered message should be deleted, if any.
    pub fn deletion_delay(&self) -> Option<Duration> {
        match self {
            Self::Persistent(_) => None,
            Self::Volatile(_) => Some(VOLATILE_DELETE_AFTER),
            Self::Ephemeral(_, after) => Some(*after),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn persistent_is_never_deleted() {
        assert_eq!(Response::persistent("hello").deletion_delay(), None);
    }

    #[test]
    fn volatile_waits_the_default_delay() {
        let delay = Response::volatile("gone soon")
            .deletion_delay()
            .unwrap_or_default();
        assert_eq!(delay, VOLATILE_DELETE_AFTER);
        // Volatile waits a bounded time, it is not immediate deletion.
        assert!(delay >= Duration::from_secs(10));
    }

    #[test]
    fn ephemeral_uses_the_exact_caller_duration() {
        let response = Response::ephemeral("vanishes", Duration::from_secs(25));
        assert_eq!(response.deletion_delay(), Some(Duration::from_secs(25)));
    }

    #[test]
    fn payload_is_shared_across_variants() {
        let embed = Embed::new().title("hi");
        let response = Response::volatile(embed.clone());
        assert_eq!(response.payload(), &Payload::Embed(embed));
        assert_eq!(
            Response::persistent("text").payload(),
            &Payload::Text("text".into())
        );
    }
}
