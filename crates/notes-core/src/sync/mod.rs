//! Optimistic Note Sync
//!
//! [`NoteSync`] is the only writer of the note collection. Mutations are
//! applied locally first, then sent to the backend:
//!
//! - create: a provisional note goes to the front, and is swapped for the
//!   server row on success or removed on failure;
//! - delete: the note disappears at once; on failure the whole collection is
//!   refetched from the server;
//! - change notifications from the realtime channel call [`NoteSync::refresh`].
//!
//! Every failure is logged and reported through the [`Notifier`] before it is
//! returned, so callers only decide what to do with their own UI state.


use std::sync::Arc;

use parking_lot::RwLock;

use crate::backend::{AuthService, NotesRepository};
use crate::cache::NoteCache;
use crate::domain::{Note, NoteError, NoteInput, NoteResult, User};
use crate::filter::NoteFilter;
use crate::schema::{validate_input, validate_row, validate_rows};

const FETCH_FAILED: &str = "Failed to fetch notes. Please refresh the page.";
const ADD_FAILED: &str = "Failed to add note. Please try again.";
const DELETE_FAILED: &str = "Failed to delete note. Please try again.";
const SIGN_IN_TO_ADD: &str = "Please sign in to add notes";
const SIGN_IN_TO_DELETE: &str = "Please sign in to delete notes";

/// Where the note collection lives.
///
/// The UI backs this with its reactive store; tests use [`SharedCache`].
pub trait NoteState {
    fn read<T>(&self, f: impl FnOnce(&NoteCache) -> T) -> T;

    fn write(&self, f: impl FnOnce(&mut NoteCache));
}

/// Plain shared cache, for non-reactive callers
pub type SharedCache = Arc<RwLock<NoteCache>>;

impl NoteState for SharedCache {
    fn read<T>(&self, f: impl FnOnce(&NoteCache) -> T) -> T {
        f(&(**self).read())
    }

    fn write(&self, f: impl FnOnce(&mut NoteCache)) {
        f(&mut (**self).write())
    }
}

/// User-visible notifications
pub trait Notifier {
    fn success(&self, message: &str);

    fn error(&self, message: &str);
}

/// Optimistic controller over one backend, one state holder and one notifier
#[derive(Clone)]
pub struct NoteSync<B, S, N> {
    backend: B,
    state: S,
    notifier: N,
}

impl<B, S, N> NoteSync<B, S, N>
where
    B: AuthService + NotesRepository,
    S: NoteState,
    N: Notifier,
{
    pub fn new(backend: B, state: S, notifier: N) -> Self {
        Self {
            backend,
            state,
            notifier,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn state(&self) -> &S {
        &self.state
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    fn user(&self) -> Option<User> {
        self.backend.current_user()
    }

    /// Replace the collection with the server's copy.
    ///
    /// Signed out, the collection is simply emptied. The loading flag is
    /// cleared either way.
    pub async fn refresh(&self) -> NoteResult<()> {
        let Some(user) = self.user() else {
            self.state.write(|cache| {
                cache.clear();
                cache.set_loading(false);
            });
            return Ok(());
        };

        let fetched = match self.backend.fetch_notes(&user.id).await {
            Ok(rows) => validate_rows(rows).map_err(NoteError::from),
            Err(e) => Err(NoteError::from(e)),
        };

        match fetched {
            Ok(notes) => {
                log::debug!("Loaded {} notes", notes.len());
                self.state.write(|cache| {
                    cache.replace_all(notes);
                    cache.set_loading(false);
                });
                Ok(())
            }
            Err(e) => {
                log::error!("Error fetching notes: {}", e);
                self.state.write(|cache| cache.set_loading(false));
                self.notifier.error(FETCH_FAILED);
                Err(e)
            }
        }
    }

    /// Validate, show immediately, then persist.
    ///
    /// Validation failures are reported with the rule's message and never
    /// reach the backend. A failed write removes the provisional note.
    pub async fn add_note(&self, input: NoteInput) -> NoteResult<Note> {
        let Some(user) = self.user() else {
            self.notifier.error(SIGN_IN_TO_ADD);
            return Err(NoteError::Unauthenticated);
        };

        let valid = match validate_input(&input) {
            Ok(valid) => valid,
            Err(e) => {
                self.notifier.error(&e.to_string());
                return Err(e.into());
            }
        };

        let provisional = Note::provisional(&user.id, &valid);
        let provisional_id = provisional.id.clone();
        self.state.write(|cache| cache.push_front(provisional));

        let confirmed = match self.backend.insert_note(&user.id, &valid).await {
            Ok(row) => validate_row(row).map_err(NoteError::from),
            Err(e) => Err(NoteError::from(e)),
        };

        match confirmed {
            Ok(note) => {
                self.state.write(|cache| cache.confirm(&provisional_id, note.clone()));
                Ok(note)
            }
            Err(e) => {
                log::error!("Error adding note: {}", e);
                self.state.write(|cache| {
                    cache.remove(&provisional_id);
                });
                self.notifier.error(ADD_FAILED);
                Err(e)
            }
        }
    }

    /// Remove locally, then on the server. A failed delete restores the
    /// server's collection by refetching.
    pub async fn delete_note(&self, id: &str) -> NoteResult<()> {
        let Some(user) = self.user() else {
            self.notifier.error(SIGN_IN_TO_DELETE);
            return Err(NoteError::Unauthenticated);
        };

        self.state.write(|cache| {
            cache.remove(id);
        });

        if let Err(e) = self.backend.delete_note(&user.id, id).await {
            log::error!("Error deleting note {}: {}", id, e);
            // the refetch reports its own failure
            let _ = self.refresh().await;
            self.notifier.error(DELETE_FAILED);
            return Err(e.into());
        }
        Ok(())
    }

    pub fn notes(&self) -> Vec<Note> {
        self.state.read(|cache| cache.notes().to_vec())
    }

    pub fn labels(&self) -> Vec<String> {
        self.state.read(NoteCache::labels)
    }

    pub fn visible(&self, filter: &NoteFilter) -> Vec<Note> {
        self.state.read(|cache| cache.visible(filter))
    }

    pub fn is_loading(&self) -> bool {
        self.state.read(NoteCache::is_loading)
    }
}
