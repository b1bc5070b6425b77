//! Skill dispatch for sigil.
//!
//! A skill is a handler bound to one classified intent. The registry maps
//! intent keys to handlers (populated once at startup, read-only after), the
//! gate enforces guild-only and permission preconditions before a handler
//! runs, and the dispatcher ties the two together and contains handler
//! failures so one skill can never take down event processing.

pub mod builtin;
pub mod dispatch;
pub mod duration;
pub mod gate;
pub mod response;
pub mod skill;

pub use {
    dispatch::{Dispatcher, GateOutcome},
    gate::{PermissionSnapshot, Rejection},
    response::{Payload, Response, VOLATILE_DELETE_AFTER},
    skill::{AuditSink, DuplicateIntent, Skill, SkillError, SkillEvent, SkillRegistry},
};
