//! Domain Layer
//!
//! Notes, users and the error taxonomy shared by every other module.
//! Nothing in here talks to the network.

mod error;
mod note;
mod user;

pub use error::{
    AuthError, AuthResult, ConfigError, NoteError, NoteResult, RemoteError, RemoteResult,
    ValidationError,
};
pub use note::{Note, NoteInput, NoteRow, ValidNote, PROVISIONAL_PREFIX};
pub use user::{Session, SignUpOutcome, User};
