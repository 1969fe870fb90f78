//! Note Cache
//!
//! The local copy of the signed-in user's notes, newest first. It has a
//! single writer (the sync controller); everything else reads from it.

use crate::domain::Note;
use crate::filter::{collect_labels, NoteFilter};

#[derive(Debug, Clone, PartialEq)]
pub struct NoteCache {
    notes: Vec<Note>,
    loading: bool,
}

impl Default for NoteCache {
    fn default() -> Self {
        Self::new()
    }
}

impl NoteCache {
    /// Empty cache, still waiting for the first fetch
    pub fn new() -> Self {
        Self {
            notes: Vec::new(),
            loading: true,
        }
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    pub fn contains(&self, id: &str) -> bool {
        self.notes.iter().any(|note| note.id == id)
    }

    /// Take the server's collection as-is. Any local optimistic state is discarded.
    pub fn replace_all(&mut self, notes: Vec<Note>) {
        self.notes = notes;
    }

    pub fn clear(&mut self) {
        self.notes.clear();
    }

    pub fn push_front(&mut self, note: Note) {
        self.notes.insert(0, note);
    }

    /// Swap a provisional note for the confirmed server row.
    ///
    /// If a refetch already brought in the confirmed row, the provisional
    /// entry is just dropped. If the provisional entry is gone too, the
    /// confirmed row goes to the front.
    pub fn confirm(&mut self, provisional_id: &str, confirmed: Note) {
        let already_present = self.contains(&confirmed.id);
        match self.notes.iter().position(|note| note.id == provisional_id) {
            Some(idx) if already_present => {
                self.notes.remove(idx);
            }
            Some(idx) => self.notes[idx] = confirmed,
            None if already_present => {}
            None => self.push_front(confirmed),
        }
    }

    /// Remove a note by id, returning it if it was present.
    pub fn remove(&mut self, id: &str) -> Option<Note> {
        let idx = self.notes.iter().position(|note| note.id == id)?;
        Some(self.notes.remove(idx))
    }

    /// Distinct labels in use, alphabetical
    pub fn labels(&self) -> Vec<String> {
        collect_labels(&self.notes)
    }

    /// Notes passing `filter`, cloned for rendering
    pub fn visible(&self, filter: &NoteFilter) -> Vec<Note> {
        filter.apply(&self.notes).into_iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn note(id: &str, label: Option<&str>) -> Note {
        Note {
            id: id.to_string(),
            user_id: "owner".to_string(),
            text: format!("Note {}", id),
            label: label.map(str::to_string),
            created_at: Utc::now(),
        }
    }

    fn ids(cache: &NoteCache) -> Vec<&str> {
        cache.notes().iter().map(|n| n.id.as_str()).collect()
    }

    #[test]
    fn test_new_cache_is_loading() {
        let cache = NoteCache::new();
        assert!(cache.is_loading());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_push_front_and_remove() {
        let mut cache = NoteCache::new();
        cache.replace_all(vec![note("b", None), note("c", None)]);
        cache.push_front(note("a", None));
        assert_eq!(ids(&cache), vec!["a", "b", "c"]);

        let removed = cache.remove("b").unwrap();
        assert_eq!(removed.id, "b");
        assert_eq!(ids(&cache), vec!["a", "c"]);
        assert!(cache.remove("missing").is_none());
    }

    #[test]
    fn test_confirm_replaces_in_place() {
        let mut cache = NoteCache::new();
        cache.replace_all(vec![note("pending-1", None), note("old", None)]);
        cache.confirm("pending-1", note("real", None));
        assert_eq!(ids(&cache), vec!["real", "old"]);
    }

    #[test]
    fn test_confirm_after_refetch_does_not_duplicate() {
        let mut cache = NoteCache::new();
        cache.replace_all(vec![note("pending-1", None), note("real", None)]);
        cache.confirm("pending-1", note("real", None));
        assert_eq!(ids(&cache), vec!["real"]);

        // provisional already wiped by a refetch that included the row
        cache.confirm("pending-1", note("real", None));
        assert_eq!(ids(&cache), vec!["real"]);
    }

    #[test]
    fn test_confirm_without_provisional_inserts_front() {
        let mut cache = NoteCache::new();
        cache.replace_all(vec![note("old", None)]);
        cache.confirm("pending-1", note("real", None));
        assert_eq!(ids(&cache), vec!["real", "old"]);
    }

    #[test]
    fn test_labels_follow_collection() {
        let mut cache = NoteCache::new();
        cache.replace_all(vec![note("1", Some("errands")), note("2", Some("work"))]);
        assert_eq!(cache.labels(), vec!["errands", "work"]);
        cache.remove("1");
        assert_eq!(cache.labels(), vec!["work"]);
    }
}
