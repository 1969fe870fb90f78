//! Backend Layer
//!
//! Collaborator interfaces for authentication and the notes table, plus an
//! in-process implementation. The hosted implementation lives in
//! [`crate::supabase`].

mod memory;
mod traits;

pub use memory::MemoryBackend;
pub use traits::{AuthService, NotesRepository};
