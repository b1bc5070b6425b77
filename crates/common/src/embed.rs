//! Discord embed payload model.
//!
//! Serialized as-is into webhook execute bodies, and converted to the gateway
//! library's builders in `sigil-discord` for the normal chat path. Field names
//! match the Discord embed object so the webhook path needs no mapping.

use serde::{Deserialize, Serialize};

/// Discord embed description character limit.
pub const MAX_DESCRIPTION_LEN: usize = 4096;
/// Discord embed field value character limit.
pub const MAX_FIELD_VALUE_LEN: usize = 1024;

/// Embed accent colors used across the bot.
pub mod color {
    pub const BLURPLE: u32 = 0x5865F2;
    pub const GREEN: u32 = 0x57F287;
    pub const RED: u32 = 0xED4245;
    pub const YELLOW: u32 = 0xFEE75C;
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Embed {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<EmbedField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer: Option<EmbedFooter>,
    /// RFC 3339 timestamp shown in the embed footer area.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<EmbedAuthor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<EmbedImage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<EmbedImage>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    #[serde(default)]
    pub inline: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmbedFooter {
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmbedAuthor {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmbedImage {
    pub url: String,
}

impl Embed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the description, truncating at the Discord limit.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(clamp(description.into(), MAX_DESCRIPTION_LEN));
        self
    }

    /// Append a field, truncating the value at the Discord limit.
    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>, inline: bool) -> Self {
        self.fields.push(EmbedField {
            name: name.into(),
            value: clamp(value.into(), MAX_FIELD_VALUE_LEN),
            inline,
        });
        self
    }

    pub fn color(mut self, color: u32) -> Self {
        self.color = Some(color);
        self
    }

    pub fn footer(mut self, text: impl Into<String>) -> Self {
        self.footer = Some(EmbedFooter { text: text.into() });
        self
    }

    /// Stamp the embed with the current time.
    pub fn timestamp_now(self) -> Self {
        self.timestamp_at(chrono::Utc::now())
    }

    pub fn timestamp_at(mut self, at: chrono::DateTime<chrono::Utc>) -> Self {
        self.timestamp = Some(at.to_rfc3339_opts(chrono::SecondsFormat::Secs, true));
        self
    }

    pub fn author(mut self, name: impl Into<String>, icon_url: Option<String>) -> Self {
        self.author = Some(EmbedAuthor {
            name: name.into(),
            icon_url,
        });
        self
    }

    pub fn thumbnail(mut self, url: impl Into<String>) -> Self {
        self.thumbnail = Some(EmbedImage { url: url.into() });
        self
    }

    pub fn image(mut self, url: impl Into<String>) -> Self {
        self.image = Some(EmbedImage { url: url.into() });
        self
    }
}

/// Truncate `text` to at most `max` bytes on a char boundary, appending an
/// ellipsis when anything was cut.
pub fn clamp(text: String, max: usize) -> String {
    if text.len() <= max {
        return text;
    }
    let budget = max.saturating_sub(3);
    let mut end = budget;
    while end > 0 && !text.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &text[..end])
}
