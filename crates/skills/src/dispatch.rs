//! Routing a classified intent to its skill under the gate's preconditions.

use tracing::{debug, error, info};

use sigil_nlu::IntentResult;

use crate::{
    gate::{self, PermissionSnapshot, Rejection},
    response::Response,
    skill::{SkillEvent, SkillRegistry},
};

/// What the user sees when a skill fails unexpectedly.
pub const GENERIC_FAILURE: &str = "Something went wrong while doing that, sorry. Try again later!";

/// Whether a skill would run for an intent, before actually running it.
#[derive(Debug, PartialEq, Eq)]
pub enum GateOutcome {
    /// No skill owns the intent key; unknown intents are expected NLU noise.
    Unknown,
    /// A precondition failed; the skill must not run.
    Rejected(Rejection),
    Allowed,
}

/// Resolves intents against the registry and invokes skills.
pub struct Dispatcher {
    registry: SkillRegistry,
}

impl Dispatcher {
    pub fn new(registry: SkillRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &SkillRegistry {
        &self.registry
    }

    /// The gate decision for an intent, without side effects.
    pub fn gate_for(&self, intent: &str, snapshot: &PermissionSnapshot) -> GateOutcome {
        let Some(skill) = self.registry.get(intent) else {
            return GateOutcome::Unknown;
        };
        match gate::gate(skill.as_ref(), snapshot) {
            Ok(()) => GateOutcome::Allowed,
            Err(rejection) => GateOutcome::Rejected(rejection),
        }
    }

    /// Dispatch a classified intent.
    ///
    /// Returns `None` when no skill is registered for the intent (a silent
    /// no-op), and otherwise exactly one response: the rejection notice, the
    /// skill's own response, or a generic failure notice when the skill
    /// errored. The skill runs at most once.
    pub async fn dispatch(
        &self,
        event: &SkillEvent<'_>,
        intent: &IntentResult,
    ) -> Option<Response> {
        let skill = match self.registry.get(&intent.intent) {
            Some(skill) => skill,
            None => {
                debug!(intent = %intent.intent, "no skill registered for intent");
                return None;
            },
        };

        if let Err(rejection) = gate::gate(skill.as_ref(), &event.perms) {
            info!(intent = %intent.intent, %rejection, "skill gated");
            // Rejections never expire: the user should see what was missing.
            return Some(Response::persistent(rejection.to_string()));
        }

        match skill.on_trigger(event, intent).await {
            Ok(response) => Some(response),
            Err(e) => {
                error!(
                    intent = %intent.intent,
                    user = %event.message.author.id,
                    channel = %event.message.channel_id,
                    error = %e,
                    "skill failed"
                );
                Some(Response::persistent(GENERIC_FAILURE))
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::skill::{Skill, SkillError},
        async_trait::async_trait,
        serenity::all::Permissions,
        std::sync::Arc,
    };

    struct ModerationSkill;

    #[async_trait]
    impl Skill for ModerationSkill {
        fn intent(&self) -> &'static str {
            "skill.moderation.test"
        }

        fn guild_only(&self) -> bool {
            true
        }

        fn required_self_permissions(&self) -> Permissions {
            Permissions::MANAGE_MESSAGES
        }

        fn required_user_permissions(&self) -> Permissions {
            Permissions::MANAGE_MESSAGES
        }

        async fn on_trigger(
            &self,
            _event: &SkillEvent<'_>,
            _intent: &IntentResult,
        ) -> Result<Response, SkillError> {
            unreachable!("gate tests never trigger the skill")
        }
    }

    fn dispatcher() -> Dispatcher {
        let mut registry = SkillRegistry::new();
        registry
            .register(Arc::new(ModerationSkill))
            .unwrap_or_else(|e| panic!("register failed: {e}"));
        Dispatcher::new(registry)
    }

    #[test]
    fn unknown_intents_are_silently_ignored() {
        let d = dispatcher();
        let snapshot = PermissionSnapshot::guild(Permissions::all(), Permissions::all());
        assert_eq!(d.gate_for("skill.nonsense", &snapshot), GateOutcome::Unknown);
    }

    #[test]
    fn guild_only_skill_never_runs_from_dms() {
        let d = dispatcher();
        assert_eq!(
            d.gate_for("skill.moderation.test", &PermissionSnapshot::direct_message()),
            GateOutcome::Rejected(Rejection::GuildOnly)
        );
    }

    #[test]
    fn missing_bot_permission_rejects_before_the_skill_runs() {
        let d = dispatcher();
        let snapshot = PermissionSnapshot::guild(Permissions::empty(), Permissions::all());
        assert_eq!(
            d.gate_for("skill.moderation.test", &snapshot),
            GateOutcome::Rejected(Rejection::MissingSelfPermission(
                Permissions::MANAGE_MESSAGES
            ))
        );
    }

    #[test]
    fn missing_user_permission_rejects_before_the_skill_runs() {
        let d = dispatcher();
        let snapshot = PermissionSnapshot::guild(Permissions::all(), Permissions::empty());
        assert_eq!(
            d.gate_for("skill.moderation.test", &snapshot),
            GateOutcome::Rejected(Rejection::MissingUserPermission(
                Permissions::MANAGE_MESSAGES
            ))
        );
    }

    #[test]
    fn satisfied_preconditions_allow_the_skill() {
        let d = dispatcher();
        let snapshot = PermissionSnapshot::guild(Permissions::all(), Permissions::all());
        assert_eq!(
            d.gate_for("skill.moderation.test", &snapshot),
            GateOutcome::Allowed
        );
    }

    #[test]
    fn rejections_become_one_persistent_message() {
        // A rejection maps to a single persistent response: visible until the
        // user acts on it, never auto-deleted.
        let rejection = Rejection::GuildOnly;
        let response = Response::persistent(rejection.to_string());
        assert_eq!(response.deletion_delay(), None);
        assert_eq!(
            response.payload(),
            &crate::response::Payload::Text("That only works in a server!".into())
        );
    }
}
