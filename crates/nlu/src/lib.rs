//! Natural-language intent classification for sigil.
//!
//! The classifier itself is an external collaborator; this crate owns the
//! `IntentResult` data model, typed parameter accessors, and a reqwest-based
//! client for a detect-intent REST endpoint. The `NluClient` trait is the
//! seam the gateway handler is written against.

pub mod client;
pub mod intent;

pub use {
    client::{Error, HttpNluClient, NluClient},
    intent::{DurationParam, IntentResult},
};
