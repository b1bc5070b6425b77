//! Bold-name description lines for informational embeds.

use std::fmt::Display;

/// Composes `**Name** value` lines, the house format for guild-info,
/// logging, and audit embed bodies.
#[derive(Debug, Default)]
pub struct DescriptionBuilder {
    lines: Vec<String>,
}

impl DescriptionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, name: &str, value: impl Display) -> Self {
        self.lines.push(format!("**{name}** {value}"));
        self
    }

    pub fn build(self) -> String {
        self.lines.join("\n")
    }
}
