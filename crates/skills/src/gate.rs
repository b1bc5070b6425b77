//! Precondition checks that run before a skill is invoked.

use serenity::all::Permissions;

use crate::skill::Skill;

/// Permissions observed for one event, computed once by the gateway handler.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionSnapshot {
    pub is_guild: bool,
    /// The bot's own permissions in the event's channel.
    pub self_permissions: Permissions,
    /// The invoking user's permissions in the event's channel.
    pub user_permissions: Permissions,
}

impl PermissionSnapshot {
    /// Snapshot for a direct-message event.
    pub fn direct_message() -> Self {
        Self::default()
    }

    pub fn guild(self_permissions: Permissions, user_permissions: Permissions) -> Self {
        Self {
            is_guild: true,
            self_permissions,
            user_permissions,
        }
    }
}

/// Why dispatch refused to invoke a skill.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    GuildOnly,
    MissingSelfPermission(Permissions),
    MissingUserPermission(Permissions),
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::GuildOnly => write!(f, "That only works in a server!"),
            Self::MissingSelfPermission(perms) => write!(
                f,
                "I need the {} permission to do that!",
                permission_names(*perms)
            ),
            Self::MissingUserPermission(perms) => write!(
                f,
                "You need the {} permission to do that!",
                permission_names(*perms)
            ),
        }
    }
}

/// Check a skill's preconditions against the event's permission snapshot.
///
/// Order matters: guild context first, then the bot's own permissions, then
/// the invoking user's. The first failure wins and the skill is never run.
pub fn gate(skill: &dyn Skill, snapshot: &PermissionSnapshot) -> Result<(), Rejection> {
    if skill.guild_only() && !snapshot.is_guild {
        return Err(Rejection::GuildOnly);
    }

    let missing_self = skill.required_self_permissions() - snapshot.self_permissions;
    if !missing_self.is_empty() {
        return Err(Rejection::MissingSelfPermission(missing_self));
    }

    let missing_user = skill.required_user_permissions() - snapshot.user_permissions;
    if !missing_user.is_empty() {
        return Err(Rejection::MissingUserPermission(missing_user));
    }

    Ok(())
}

/// Human-readable names for a permission set: "Manage Messages, Kick Members".
pub fn permission_names(perms: Permissions) -> String {
    let names: Vec<String> = perms
        .iter_names()
        .map(|(name, _)| {
            name.split('_')
                .map(|word| {
                    let mut chars = word.chars();
                    match chars.next() {
                        Some(first) => first.to_uppercase().collect::<String>()
                            + &chars.as_str().to_lowercase(),
                        None => String::new(),
                    }
                })
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect();
    names.join(", ")
}
