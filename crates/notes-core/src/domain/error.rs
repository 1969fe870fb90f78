//! Error taxonomy
//!
//! Validation errors never reach the network. Remote errors are logged and
//! turned into a generic notification by the caller. Auth errors keep the
//! "already registered" case apart so the sign-up form can react to it.

use thiserror::Error;

/// A note (or note row) violated the schema. `Display` is the user-facing message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Note text is required")]
    TextRequired,

    #[error("Note is too long")]
    TextTooLong,

    #[error("Label is too long")]
    LabelTooLong,

    #[error("Malformed note row: {0}")]
    MalformedRow(String),
}

/// Failure talking to the hosted backend
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RemoteError {
    #[error("Request failed with status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Network error: {0}")]
    Transport(String),

    #[error("Unexpected response: {0}")]
    Decode(String),
}

pub type RemoteResult<T> = Result<T, RemoteError>;

impl From<reqwest::Error> for RemoteError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            RemoteError::Decode(err.to_string())
        } else {
            RemoteError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for RemoteError {
    fn from(err: serde_json::Error) -> Self {
        RemoteError::Decode(err.to_string())
    }
}

/// Sign-in / sign-up / sign-out failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("This email is already registered. Please sign in instead.")]
    AlreadyRegistered,

    #[error("{0}")]
    Rejected(String),

    #[error(transparent)]
    Remote(#[from] RemoteError),
}

pub type AuthResult<T> = Result<T, AuthError>;

/// An auth failure met while authorizing a table request. A rejected
/// session reads as 401.
impl From<AuthError> for RemoteError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Remote(remote) => remote,
            other => RemoteError::Status {
                status: 401,
                message: other.to_string(),
            },
        }
    }
}

/// Errors returned by note operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NoteError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Not signed in")]
    Unauthenticated,

    #[error(transparent)]
    Remote(#[from] RemoteError),
}

pub type NoteResult<T> = Result<T, NoteError>;

/// Missing or malformed backend configuration
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing configuration value: {0}")]
    Missing(&'static str),

    #[error("Invalid project URL: {0}")]
    InvalidUrl(String),
}
