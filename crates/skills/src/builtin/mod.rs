//! Built-in skills.

pub mod ephemeral_say;
pub mod guild_info;
pub mod kick;
pub mod purge;
pub mod rank;

use std::sync::Arc;

use crate::skill::{DuplicateIntent, SkillRegistry};

pub use {
    ephemeral_say::EphemeralSaySkill, guild_info::GuildInfoSkill, kick::KickSkill,
    purge::PurgeSkill, rank::RankSkill,
};

/// A registry pre-populated with every built-in skill.
pub fn default_registry() -> Result<SkillRegistry, DuplicateIntent> {
    let mut registry = SkillRegistry::new();
    registry.register(Arc::new(EphemeralSaySkill))?;
    registry.register(Arc::new(GuildInfoSkill))?;
    registry.register(Arc::new(KickSkill))?;
    registry.register(Arc::new(PurgeSkill))?;
    registry.register(Arc::new(RankSkill))?;
    Ok(registry)
}
