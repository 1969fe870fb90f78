//! Hosted Backend Client
//!
//! Thin HTTP client for the auth service and the notes table. One
//! [`SupabaseClient`] implements both [`AuthService`](crate::backend::AuthService)
//! and [`NotesRepository`](crate::backend::NotesRepository); the session it
//! holds supplies the bearer token for table requests.

mod auth;
mod error;
mod rest;
#[cfg(test)]
mod tests;

use std::sync::Arc;

use parking_lot::RwLock;
use reqwest::{Method, RequestBuilder, Response};

use crate::config::{SupabaseConfig, SESSION_REFRESH_LEEWAY_SECS};
use crate::domain::{RemoteError, RemoteResult, Session};

pub use error::{classify_auth_failure, ApiErrorBody};

/// Called whenever the session is set, refreshed or cleared
pub type SessionListener = Arc<dyn Fn(Option<&Session>) + Send + Sync>;

struct ClientInner {
    http: reqwest::Client,
    config: SupabaseConfig,
    session: RwLock<Option<Session>>,
    listener: RwLock<Option<SessionListener>>,
}

/// Cloneable handle to the hosted backend
#[derive(Clone)]
pub struct SupabaseClient {
    inner: Arc<ClientInner>,
}

impl std::fmt::Debug for SupabaseClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SupabaseClient")
            .field("url", &self.inner.config.url)
            .field("signed_in", &self.inner.session.read().is_some())
            .finish()
    }
}

impl SupabaseClient {
    pub fn new(config: SupabaseConfig) -> Self {
        Self {
            inner: Arc::new(ClientInner {
                http: reqwest::Client::new(),
                config,
                session: RwLock::new(None),
                listener: RwLock::new(None),
            }),
        }
    }

    pub fn config(&self) -> &SupabaseConfig {
        &self.inner.config
    }

    pub fn session(&self) -> Option<Session> {
        self.inner.session.read().clone()
    }

    pub fn set_session_listener(&self, listener: SessionListener) {
        *self.inner.listener.write() = Some(listener);
    }

    /// Adopt a session persisted by an earlier visit.
    pub fn restore_session(&self, session: Session) {
        *self.inner.session.write() = Some(session);
    }

    fn store_session(&self, session: Option<Session>) {
        *self.inner.session.write() = session.clone();
        let listener = self.inner.listener.read().clone();
        if let Some(listener) = listener {
            listener(session.as_ref());
        }
    }

    /// Access token of the current session, refreshed if it is about to
    /// expire. Falls back to the anon key only when signed out; a session
    /// that cannot be refreshed fails the call instead.
    pub async fn access_token(&self) -> RemoteResult<String> {
        let now = chrono::Utc::now().timestamp();
        match self.session() {
            Some(session) if session.is_expired(now, SESSION_REFRESH_LEEWAY_SECS) => {
                match self.refresh_session().await {
                    Ok(refreshed) => Ok(refreshed.access_token),
                    Err(e) => {
                        log::warn!("Session refresh failed: {}", e);
                        Err(e.into())
                    }
                }
            }
            Some(session) => Ok(session.access_token),
            None => Ok(self.inner.config.anon_key.clone()),
        }
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        self.inner
            .http
            .request(method, url)
            .header("apikey", &self.inner.config.anon_key)
    }

    async fn authorized(&self, method: Method, url: &str) -> RemoteResult<RequestBuilder> {
        let token = self.access_token().await?;
        Ok(self.request(method, url).bearer_auth(token))
    }
}

/// Turn a non-success response into [`RemoteError::Status`].
async fn ensure_success(response: Response) -> RemoteResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(RemoteError::Status {
        status: status.as_u16(),
        message: ApiErrorBody::parse(&body).message_or(status.canonical_reason().unwrap_or("error")),
    })
}
