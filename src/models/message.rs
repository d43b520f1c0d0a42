use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::content::Part;
use super::role::Role;

/// One role-tagged group of content parts in the conversation.
///
/// `created` is local bookkeeping for the rendering surface and never goes on
/// the wire; request payloads carry only `role` and `parts`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    #[serde(skip)]
    pub created: i64,
    pub parts: Vec<Part>,
}

impl Turn {
    /// Create a new user turn with the current timestamp
    pub fn user() -> Self {
        Turn {
            role: Role::User,
            created: Utc::now().timestamp(),
            parts: Vec::new(),
        }
    }

    /// Create a new model turn with the current timestamp
    pub fn model() -> Self {
        Turn {
            role: Role::Model,
            created: Utc::now().timestamp(),
            parts: Vec::new(),
        }
    }

    /// Add any Part to the turn
    pub fn with_part(mut self, part: Part) -> Self {
        self.parts.push(part);
        self
    }

    /// Add a sequence of parts to the turn, keeping their order
    pub fn with_parts<I: IntoIterator<Item = Part>>(mut self, parts: I) -> Self {
        self.parts.extend(parts);
        self
    }

    /// Add text content to the turn
    pub fn with_text<S: Into<String>>(self, text: S) -> Self {
        self.with_part(Part::text(text))
    }

    /// Add inline base64 media to the turn
    pub fn with_inline_data<S: Into<String>, T: Into<String>>(
        self,
        data: S,
        mime_type: T,
    ) -> Self {
        self.with_part(Part::inline_data(data, mime_type))
    }

    /// Concatenated text of all Text parts, for display summaries
    pub fn text(&self) -> String {
        self.parts
            .iter()
            .filter_map(Part::as_text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}
