//! Configuration for sigil.
//!
//! A TOML file describes the bot account, the NLU endpoint, the global
//! logging webhook, bot-list targets, and per-guild settings (starboard,
//! auditing). The store hands out owned snapshots so each gateway event sees
//! one consistent view; external edits become visible on `reload`.

pub mod store;
pub mod types;

pub use {
    store::{ConfigStore, Error},
    types::{
        AuditingConfig, BotConfig, BotListTarget, GuildConfig, NluConfig, StarboardConfig,
        WebhookTarget,
    },
};
