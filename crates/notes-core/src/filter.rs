//! Search and Label Filtering
//!
//! Client-side view over the note collection. Labels are not stored as
//! entities; the set shown in the filter menu is derived from the notes.

use std::collections::BTreeSet;

use crate::domain::Note;

/// Active search term and label filter
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NoteFilter {
    /// Case-insensitive substring matched against note text; empty matches all
    pub search: String,
    /// Exact label match; `None` matches all
    pub label: Option<String>,
}

impl NoteFilter {
    pub fn new(search: impl Into<String>, label: Option<&str>) -> Self {
        Self {
            search: search.into(),
            label: label.map(str::to_string),
        }
    }

    pub fn is_active(&self) -> bool {
        !self.search.is_empty() || self.label.is_some()
    }

    /// Select `label`, or clear the label filter if it is already selected.
    pub fn toggle_label(&mut self, label: &str) {
        if self.label.as_deref() == Some(label) {
            self.label = None;
        } else {
            self.label = Some(label.to_string());
        }
    }

    pub fn matches(&self, note: &Note) -> bool {
        self.matches_search(note) && self.matches_label(note)
    }

    fn matches_search(&self, note: &Note) -> bool {
        self.search.is_empty() || note.text.to_lowercase().contains(&self.search.to_lowercase())
    }

    fn matches_label(&self, note: &Note) -> bool {
        match &self.label {
            Some(label) => note.has_label(label),
            None => true,
        }
    }

    /// Notes passing the filter, order preserved.
    pub fn apply<'a>(&self, notes: &'a [Note]) -> Vec<&'a Note> {
        notes.iter().filter(|note| self.matches(note)).collect()
    }
}

/// Each distinct non-blank label once, in ascending order.
pub fn collect_labels(notes: &[Note]) -> Vec<String> {
    notes
        .iter()
        .filter_map(|note| note.label.as_deref())
        .filter(|label| !label.trim().is_empty())
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
