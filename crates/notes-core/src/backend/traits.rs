//! Backend Layer - Core Traits
//!
//! Futures are `?Send`: in the browser everything runs on one thread and the
//! HTTP futures are not `Send`.

use async_trait::async_trait;

use crate::domain::{AuthResult, NoteRow, RemoteResult, SignUpOutcome, User, ValidNote};

/// Authentication collaborator
#[async_trait(?Send)]
pub trait AuthService {
    async fn sign_in(&self, email: &str, password: &str) -> AuthResult<User>;

    async fn sign_up(&self, email: &str, password: &str) -> AuthResult<SignUpOutcome>;

    async fn sign_out(&self) -> AuthResult<()>;

    /// The signed-in user, if any
    fn current_user(&self) -> Option<User>;
}

/// Owner-scoped access to the notes table
#[async_trait(?Send)]
pub trait NotesRepository {
    /// All rows owned by `owner_id`, newest first
    async fn fetch_notes(&self, owner_id: &str) -> RemoteResult<Vec<NoteRow>>;

    /// Insert a note for `owner_id` and return the stored row
    async fn insert_note(&self, owner_id: &str, note: &ValidNote) -> RemoteResult<NoteRow>;

    /// Delete the row matching both `id` and `owner_id`
    async fn delete_note(&self, owner_id: &str, id: &str) -> RemoteResult<()>;
}
