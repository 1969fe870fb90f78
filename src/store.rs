//! Global Application State Store
//!
//! Uses Leptos reactive_stores for fine-grained reactivity. The note cache
//! field is written only by the sync controller, through [`NoteStore`].

use leptos::prelude::*;
use reactive_stores::Store;

use notes_core::{NoteCache, NoteFilter, NoteState, NoteSync, SupabaseClient};

use crate::notify::Toaster;

/// Global application state with field-level reactivity
#[derive(Clone, Debug, Default, Store)]
pub struct AppState {
    /// Signed-in user's notes and the loading flag
    pub cache: NoteCache,
    /// Free-text search
    pub search: String,
    /// Label filter (None = all labels)
    pub active_label: Option<String>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            cache: NoteCache::new(),
            ..Default::default()
        }
    }
}

/// Type alias for the store
pub type AppStore = Store<AppState>;

/// Get the app store from context
pub fn use_app_store() -> AppStore {
    expect_context::<AppStore>()
}

/// The store as the controller's state holder
#[derive(Clone, Copy)]
pub struct NoteStore(pub AppStore);

impl NoteState for NoteStore {
    fn read<T>(&self, f: impl FnOnce(&NoteCache) -> T) -> T {
        self.0.cache().with_untracked(f)
    }

    fn write(&self, f: impl FnOnce(&mut NoteCache)) {
        self.0.cache().update(f)
    }
}

/// Controller used by every component
pub type AppSync = NoteSync<SupabaseClient, NoteStore, Toaster>;

pub fn use_sync() -> AppSync {
    expect_context::<AppSync>()
}

// ========================
// Store Helper Functions
// ========================

/// Current search + label filter (tracked)
pub fn store_filter(store: &AppStore) -> NoteFilter {
    NoteFilter::new(store.search().get(), store.active_label().get().as_deref())
}

/// Select a label, or clear it if it is already the active one
pub fn store_toggle_label(store: &AppStore, label: &str) {
    store.active_label().update(|active| {
        let mut filter = NoteFilter::new("", active.as_deref());
        filter.toggle_label(label);
        *active = filter.label;
    });
}

pub fn store_set_label(store: &AppStore, label: &str) {
    store.active_label().set(Some(label.to_string()));
}

pub fn store_clear_label(store: &AppStore) {
    store.active_label().set(None);
}
