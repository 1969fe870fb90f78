//! Don't Forget core
//!
//! Layered like this:
//! - domain: notes, users, sessions, errors
//! - schema / filter / cache: validation, search and the local collection
//! - backend: collaborator traits and an in-memory implementation
//! - supabase: the hosted backend over HTTP
//! - realtime: change-notification channel frames
//! - sync: the optimistic controller tying it together
//!
//! Nothing here depends on a browser; the UI crate supplies the reactive
//! state, notifications and websocket transport.

pub mod backend;
pub mod cache;
pub mod config;
pub mod domain;
pub mod filter;
pub mod realtime;
pub mod schema;
pub mod supabase;
pub mod sync;

pub use backend::{AuthService, MemoryBackend, NotesRepository};
pub use cache::NoteCache;
pub use config::SupabaseConfig;
pub use domain::{
    AuthError, ConfigError, Note, NoteError, NoteInput, NoteResult, RemoteError, Session,
    SignUpOutcome, User, ValidationError,
};
pub use filter::NoteFilter;
pub use realtime::{ChannelEvent, NotesChannel};
pub use supabase::SupabaseClient;
pub use sync::{NoteState, NoteSync, Notifier, SharedCache};
