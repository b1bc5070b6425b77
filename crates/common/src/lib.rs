//! Shared types for sigil.
//!
//! Holds the pieces that both the skill layer and the delivery/webhook layer
//! need without pulling in the gateway library: the embed payload model, the
//! description builder used by informational embeds, and time helpers.

pub mod describe;
pub mod embed;
pub mod time;

pub use {
    describe::DescriptionBuilder,
    embed::{Embed, EmbedField},
};
