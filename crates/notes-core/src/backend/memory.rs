//! In-memory Backend
//!
//! Accounts and rows kept in process. Calls are counted, failures can be
//! injected and a hook can look at the caller's state mid-call.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use parking_lot::Mutex;

use super::traits::{AuthService, NotesRepository};
use crate::domain::{
    AuthError, AuthResult, NoteRow, RemoteError, RemoteResult, SignUpOutcome, User, ValidNote,
};

#[derive(Debug)]
struct Account {
    password: String,
    user: User,
}

/// Runs at the start of a mutating call, with the call's name
#[derive(Clone)]
struct CallHook(Arc<dyn Fn(&str) + Send + Sync>);

impl fmt::Debug for CallHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CallHook")
    }
}

#[derive(Debug, Default)]
struct Inner {
    accounts: HashMap<String, Account>,
    current: Option<User>,
    /// Newest first
    rows: Vec<NoteRow>,
    fail_fetch: bool,
    fail_insert: bool,
    fail_delete: bool,
    fetch_calls: usize,
    insert_calls: usize,
    delete_calls: usize,
    hook: Option<CallHook>,
}

/// Shared, cloneable in-memory backend
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend with one account already signed in
    pub fn signed_in(email: &str) -> Self {
        let backend = Self::new();
        let user = backend.register(email, "password");
        backend.inner.lock().current = Some(user);
        backend
    }

    /// Create an account without signing in
    pub fn register(&self, email: &str, password: &str) -> User {
        let user = User {
            id: uuid::Uuid::new_v4().to_string(),
            email: Some(email.to_string()),
        };
        self.inner.lock().accounts.insert(
            email.to_lowercase(),
            Account {
                password: password.to_string(),
                user: user.clone(),
            },
        );
        user
    }

    /// Store a row directly, as another session would.
    pub fn seed(&self, owner_id: &str, text: &str, label: Option<&str>) -> NoteRow {
        let row = NoteRow {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: owner_id.to_string(),
            text: text.to_string(),
            label: label.map(str::to_string),
            created_at: Utc::now().to_rfc3339_opts(SecondsFormat::Micros, false),
        };
        self.inner.lock().rows.insert(0, row.clone());
        row
    }

    pub fn rows_for(&self, owner_id: &str) -> Vec<NoteRow> {
        self.inner
            .lock()
            .rows
            .iter()
            .filter(|row| row.user_id == owner_id)
            .cloned()
            .collect()
    }

    pub fn fail_fetch(&self, fail: bool) {
        self.inner.lock().fail_fetch = fail;
    }

    pub fn fail_insert(&self, fail: bool) {
        self.inner.lock().fail_insert = fail;
    }

    pub fn fail_delete(&self, fail: bool) {
        self.inner.lock().fail_delete = fail;
    }

    pub fn fetch_calls(&self) -> usize {
        self.inner.lock().fetch_calls
    }

    pub fn insert_calls(&self) -> usize {
        self.inner.lock().insert_calls
    }

    pub fn delete_calls(&self) -> usize {
        self.inner.lock().delete_calls
    }

    /// Call `hook` with "insert" or "delete" while that call is in flight.
    pub fn on_call(&self, hook: impl Fn(&str) + Send + Sync + 'static) {
        self.inner.lock().hook = Some(CallHook(Arc::new(hook)));
    }

    fn run_hook(&self, call: &str) {
        // cloned out so the hook may call back into the backend
        let hook = self.inner.lock().hook.clone();
        if let Some(CallHook(hook)) = hook {
            hook(call);
        }
    }

    fn unavailable() -> RemoteError {
        RemoteError::Status {
            status: 503,
            message: "backend unavailable".to_string(),
        }
    }
}

fn created_at_key(row: &NoteRow) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(&row.created_at)
        .ok()
        .map(|t| t.with_timezone(&Utc))
}

#[async_trait(?Send)]
impl AuthService for MemoryBackend {
    async fn sign_in(&self, email: &str, password: &str) -> AuthResult<User> {
        let mut inner = self.inner.lock();
        let user = match inner.accounts.get(&email.to_lowercase()) {
            Some(account) if account.password == password => account.user.clone(),
            _ => return Err(AuthError::Rejected("Invalid login credentials".to_string())),
        };
        inner.current = Some(user.clone());
        Ok(user)
    }

    async fn sign_up(&self, email: &str, password: &str) -> AuthResult<SignUpOutcome> {
        if self.inner.lock().accounts.contains_key(&email.to_lowercase()) {
            return Err(AuthError::AlreadyRegistered);
        }
        let user = self.register(email, password);
        self.inner.lock().current = Some(user.clone());
        Ok(SignUpOutcome::SignedIn(user))
    }

    async fn sign_out(&self) -> AuthResult<()> {
        self.inner.lock().current = None;
        Ok(())
    }

    fn current_user(&self) -> Option<User> {
        self.inner.lock().current.clone()
    }
}

#[async_trait(?Send)]
impl NotesRepository for MemoryBackend {
    async fn fetch_notes(&self, owner_id: &str) -> RemoteResult<Vec<NoteRow>> {
        let mut inner = self.inner.lock();
        inner.fetch_calls += 1;
        if inner.fail_fetch {
            return Err(Self::unavailable());
        }
        let mut rows: Vec<NoteRow> = inner
            .rows
            .iter()
            .filter(|row| row.user_id == owner_id)
            .cloned()
            .collect();
        // stable: equal timestamps keep newest-inserted first
        rows.sort_by(|a, b| created_at_key(b).cmp(&created_at_key(a)));
        Ok(rows)
    }

    async fn insert_note(&self, owner_id: &str, note: &ValidNote) -> RemoteResult<NoteRow> {
        self.run_hook("insert");
        {
            let mut inner = self.inner.lock();
            inner.insert_calls += 1;
            if inner.fail_insert {
                return Err(Self::unavailable());
            }
        }
        Ok(self.seed(owner_id, &note.text, note.label.as_deref()))
    }

    async fn delete_note(&self, owner_id: &str, id: &str) -> RemoteResult<()> {
        self.run_hook("delete");
        let mut inner = self.inner.lock();
        inner.delete_calls += 1;
        if inner.fail_delete {
            return Err(Self::unavailable());
        }
        inner
            .rows
            .retain(|row| !(row.id == id && row.user_id == owner_id));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_sign_up_twice_is_already_registered() {
        let backend = MemoryBackend::new();
        backend.sign_up("a@example.com", "pw").await.unwrap();
        let err = backend.sign_up("A@example.com", "pw").await.unwrap_err();
        assert_eq!(err, AuthError::AlreadyRegistered);
    }

    #[tokio::test]
    async fn test_sign_in_checks_password() {
        let backend = MemoryBackend::new();
        backend.register("a@example.com", "secret");
        assert!(matches!(
            backend.sign_in("a@example.com", "wrong").await,
            Err(AuthError::Rejected(_))
        ));
        let user = backend.sign_in("a@example.com", "secret").await.unwrap();
        assert_eq!(backend.current_user(), Some(user));
        backend.sign_out().await.unwrap();
        assert_eq!(backend.current_user(), None);
    }

    #[tokio::test]
    async fn test_rows_are_owner_scoped() {
        let backend = MemoryBackend::new();
        let mine = backend.seed("me", "mine", None);
        backend.seed("other", "theirs", None);

        let rows = backend.fetch_notes("me").await.unwrap();
        assert_eq!(rows, vec![mine.clone()]);

        // delete must match the owner too
        backend.delete_note("other", &mine.id).await.unwrap();
        assert_eq!(backend.rows_for("me").len(), 1);
        backend.delete_note("me", &mine.id).await.unwrap();
        assert!(backend.rows_for("me").is_empty());
    }
}
