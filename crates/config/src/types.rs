use std::collections::HashMap;

use {
    secrecy::{ExposeSecret, Secret},
    serde::{Deserialize, Serialize},
};

/// Top-level configuration file.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BotConfig {
    /// Discord bot token.
    #[serde(serialize_with = "serialize_secret")]
    pub token: Secret<String>,

    /// NLU collaborator settings.
    pub nlu: NluConfig,

    /// Global webhook that receives operational log embeds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logging_webhook: Option<WebhookTarget>,

    /// Bot-list directories that receive periodic server-count updates.
    pub bot_lists: Vec<BotListTarget>,

    /// Per-guild settings, keyed by guild snowflake id.
    pub guilds: HashMap<String, GuildConfig>,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            token: Secret::new(String::new()),
            nlu: NluConfig::default(),
            logging_webhook: None,
            bot_lists: Vec::new(),
            guilds: HashMap::new(),
        }
    }
}

impl std::fmt::Debug for BotConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BotConfig")
            .field("token", &"[REDACTED]")
            .field("nlu", &self.nlu)
            .field("logging_webhook", &self.logging_webhook)
            .field("bot_lists", &self.bot_lists)
            .field("guilds", &self.guilds)
            .finish()
    }
}

/// NLU intent-classification service settings.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NluConfig {
    /// Base URL of the detect-intent endpoint.
    pub endpoint: String,

    /// Bearer token for the NLU service.
    #[serde(serialize_with = "serialize_secret")]
    pub token: Secret<String>,

    /// Language code sent with each query.
    pub language: String,
}

impl Default for NluConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            token: Secret::new(String::new()),
            language: "en".into(),
        }
    }
}

impl std::fmt::Debug for NluConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NluConfig")
            .field("endpoint", &self.endpoint)
            .field("token", &"[REDACTED]")
            .field("language", &self.language)
            .finish()
    }
}

/// A named Discord webhook. The URL carries its own token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookTarget {
    pub name: String,
    pub url: String,
}

/// A bot-list directory endpoint for server-count reporting.
#[derive(Clone, Serialize, Deserialize)]
pub struct BotListTarget {
    pub name: String,
    pub endpoint: String,
    /// API token sent in the Authorization header.
    #[serde(serialize_with = "serialize_secret")]
    pub token: Secret<String>,
}

impl std::fmt::Debug for BotListTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BotListTarget")
            .field("name", &self.name)
            .field("endpoint", &self.endpoint)
            .field("token", &"[REDACTED]")
            .finish()
    }
}

impl BotListTarget {
    pub fn token(&self) -> &str {
        self.token.expose_secret()
    }
}

/// Settings for a single guild, snapshotted per event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuildConfig {
    pub starboard: StarboardConfig,
    pub auditing: AuditingConfig,
}

/// Starboard settings for one guild.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StarboardConfig {
    pub enabled: bool,

    /// Alias name of the emoji that triggers a repost (e.g. "star").
    pub emoji: String,

    /// Webhook the repost is delivered through.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub webhook: Option<WebhookTarget>,
}

impl Default for StarboardConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            emoji: "star".into(),
            webhook: None,
        }
    }
}

/// Per-moderation-action audit toggles for one guild.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditingConfig {
    pub kicks: bool,
    pub purge: bool,

    /// Webhook audit embeds are delivered through.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub webhook: Option<WebhookTarget>,
}

fn serialize_secret<S: serde::Serializer>(
    secret: &Secret<String>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(secret.expose_secret())
}
