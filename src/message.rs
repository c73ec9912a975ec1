use chrono::{DateTime, Local};
use serde::Deserialize;
use uuid::Uuid;

/// Label shown for a citation record that carries no usable source field.
pub const UNKNOWN_SOURCE: &str = "Unknown Source";

/// The sender of a conversation turn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

/// A citation attached to an assistant message. The answer service sends
/// these either as plain strings or as objects with a `source` field.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SourceRef {
    Label(String),
    Record { source: Option<String> },
}

impl SourceRef {
    pub fn label(&self) -> &str {
        match self {
            SourceRef::Label(label) => label,
            SourceRef::Record { source } => source.as_deref().unwrap_or(UNKNOWN_SOURCE),
        }
    }
}

/// One turn of the conversation
#[derive(Debug, Clone)]
pub struct Message {
    pub id: Uuid,
    pub role: Role,
    pub content: String,
    pub sources: Vec<SourceRef>,
    pub created_at: DateTime<Local>,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content, Vec::new())
    }

    pub fn assistant(content: impl Into<String>, sources: Vec<SourceRef>) -> Self {
        Self::new(Role::Assistant, content, sources)
    }

    fn new(role: Role, content: impl Into<String>, sources: Vec<SourceRef>) -> Self {
        Self {
            id: Uuid::now_v7(),
            role,
            content: content.into(),
            sources,
            created_at: Local::now(),
        }
    }

    /// Hour:minute stamp shown under each message
    pub fn timestamp(&self) -> String {
        self.created_at.format("%H:%M").to_string()
    }
}
