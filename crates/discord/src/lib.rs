//! Discord gateway integration for sigil.
//!
//! Connects to the Discord Gateway via a persistent WebSocket using the
//! serenity library. Inbound messages are classified by the NLU collaborator
//! and dispatched to skills; responses are delivered with their configured
//! lifetimes, and side channels (starboard, guild join/leave audit, bot-list
//! server counts) go out through fire-and-forget webhooks.

pub mod client;
pub mod error;
pub mod handler;
pub mod messaging;
pub mod server;
pub mod starboard;
pub mod state;
pub mod webhook;

pub use {
    client::run,
    error::Error,
    state::{BotState, SharedState},
    webhook::{WebhookIdentity, WebhookNotifier},
};
