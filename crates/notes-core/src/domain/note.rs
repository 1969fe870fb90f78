//! Note Entity
//!
//! A short, user-owned text record with an optional label.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Prefix of identifiers handed out to notes that the server has not confirmed yet.
pub const PROVISIONAL_PREFIX: &str = "pending-";

/// A validated note as held in the local collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    /// Opaque identifier (server UUID, or `pending-…` while unconfirmed)
    pub id: String,
    /// Owner user id
    pub user_id: String,
    /// Trimmed body, 1..=1000 chars
    pub text: String,
    /// Trimmed label, never blank when present
    pub label: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Note {
    /// Build an unconfirmed note for immediate display.
    pub fn provisional(owner_id: &str, valid: &ValidNote) -> Self {
        Self {
            id: format!("{}{}", PROVISIONAL_PREFIX, uuid::Uuid::new_v4()),
            user_id: owner_id.to_string(),
            text: valid.text.clone(),
            label: valid.label.clone(),
            created_at: Utc::now(),
        }
    }

    /// True until the server row replaces this note.
    pub fn is_provisional(&self) -> bool {
        self.id.starts_with(PROVISIONAL_PREFIX)
    }

    pub fn has_label(&self, label: &str) -> bool {
        self.label.as_deref() == Some(label)
    }
}

/// Raw user input from the note form
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NoteInput {
    pub text: String,
    pub label: Option<String>,
}

impl NoteInput {
    pub fn new(text: impl Into<String>, label: Option<&str>) -> Self {
        Self {
            text: text.into(),
            label: label.map(str::to_string),
        }
    }
}

/// Input that passed the schema; only this shape is ever sent to the remote table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidNote {
    pub text: String,
    pub label: Option<String>,
}

/// A row exactly as the remote table returns it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteRow {
    pub id: String,
    pub user_id: String,
    pub text: String,
    #[serde(default)]
    pub label: Option<String>,
    pub created_at: String,
}
