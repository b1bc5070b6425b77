use std::{collections::HashMap, sync::Arc};

use {
    async_trait::async_trait,
    serenity::all::{Context, Message, Permissions},
};

use {
    sigil_common::Embed,
    sigil_config::{GuildConfig, WebhookTarget},
    sigil_nlu::IntentResult,
};

use crate::{gate::PermissionSnapshot, response::Response};

/// Errors a skill can surface to the dispatcher.
///
/// Validation problems are not errors: skills turn those into short-lived
/// user-visible responses themselves.
#[derive(Debug, thiserror::Error)]
pub enum SkillError {
    #[error("discord api: {0}")]
    Discord(#[from] serenity::Error),

    #[error("{0}")]
    Other(String),
}

/// Best-effort delivery of audit embeds through a guild's audit webhook.
///
/// Implemented by the webhook notifier in `sigil-discord`; failures are
/// logged there and never reach the skill.
#[async_trait]
pub trait AuditSink: Send + Sync {
    async fn audit(&self, target: &WebhookTarget, embed: Embed);
}

/// Everything a skill invocation sees: the gateway context, the triggering
/// message, a permission snapshot, and the guild's configuration snapshot
/// (taken once per event, never cached across a response).
pub struct SkillEvent<'a> {
    pub ctx: &'a Context,
    pub message: &'a Message,
    pub perms: PermissionSnapshot,
    pub guild_config: GuildConfig,
    pub audit: &'a dyn AuditSink,
}

/// A handler bound to one classified intent.
#[async_trait]
pub trait Skill: Send + Sync {
    /// The intent key this skill answers to.
    fn intent(&self) -> &'static str;

    /// Whether the skill only makes sense inside a guild.
    fn guild_only(&self) -> bool {
        false
    }

    /// Permissions the bot itself needs in the event's channel.
    fn required_self_permissions(&self) -> Permissions {
        Permissions::empty()
    }

    /// Permissions the invoking user needs.
    fn required_user_permissions(&self) -> Permissions {
        Permissions::empty()
    }

    /// Handle the intent and produce one response.
    async fn on_trigger(
        &self,
        event: &SkillEvent<'_>,
        intent: &IntentResult,
    ) -> Result<Response, SkillError>;
}

/// Registration of a second skill under an already-taken intent key.
#[derive(Debug, thiserror::Error)]
#[error("a skill is already registered for intent `{0}`")]
pub struct DuplicateIntent(pub String);

/// Intent key → handler map, populated at startup and read-only afterwards.
#[derive(Default)]
pub struct SkillRegistry {
    skills: HashMap<&'static str, Arc<dyn Skill>>,
}

impl SkillRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a skill. Exactly one skill may own an intent key.
    pub fn register(&mut self, skill: Arc<dyn Skill>) -> Result<(), DuplicateIntent> {
        let intent = skill.intent();
        if self.skills.contains_key(intent) {
            return Err(DuplicateIntent(intent.to_string()));
        }
        self.skills.insert(intent, skill);
        Ok(())
    }

    pub fn get(&self, intent: &str) -> Option<&Arc<dyn Skill>> {
        self.skills.get(intent)
    }

    pub fn len(&self) -> usize {
        self.skills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }

    /// Registered intent keys, sorted for stable logging.
    pub fn intents(&self) -> Vec<&'static str> {
        let mut intents: Vec<_> = self.skills.keys().copied().collect();
        intents.sort_unstable();
        intents
    }
}
