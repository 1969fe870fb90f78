//! Auth service endpoints

use async_trait::async_trait;
use reqwest::{Method, Response};
use serde::{Deserialize, Serialize};

use super::SupabaseClient;
use crate::backend::AuthService;
use crate::domain::{AuthError, AuthResult, RemoteError, Session, SignUpOutcome, User};

use super::error::classify_auth_failure;

#[derive(Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct RefreshArgs<'a> {
    refresh_token: &'a str,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    expires_at: Option<i64>,
    user: User,
}

impl TokenResponse {
    fn into_session(self) -> Session {
        let expires_at = self.expires_at.unwrap_or_else(|| {
            chrono::Utc::now().timestamp() + self.expires_in.unwrap_or(3600)
        });
        Session {
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            expires_at,
            user: self.user,
        }
    }
}

/// Sign-up answers with a session when confirmation is off, else just the user.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SignUpResponse {
    Session(TokenResponse),
    User(User),
}

async fn auth_response(response: Response) -> AuthResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(classify_auth_failure(status.as_u16(), &body))
}

impl SupabaseClient {
    async fn token_grant<T: Serialize + ?Sized>(&self, grant_type: &str, body: &T) -> AuthResult<Session> {
        let url = self.config().auth_url("token");
        let response = self
            .request(Method::POST, &url)
            .query(&[("grant_type", grant_type)])
            .json(body)
            .send()
            .await
            .map_err(RemoteError::from)?;
        let token: TokenResponse = auth_response(response)
            .await?
            .json()
            .await
            .map_err(RemoteError::from)?;
        Ok(token.into_session())
    }

    /// Exchange the refresh token for a new session.
    ///
    /// On rejection the local session is dropped; a transport failure keeps it.
    pub async fn refresh_session(&self) -> AuthResult<Session> {
        let Some(current) = self.session() else {
            return Err(AuthError::Rejected("No session to refresh".to_string()));
        };
        let args = RefreshArgs {
            refresh_token: &current.refresh_token,
        };
        match self.token_grant("refresh_token", &args).await {
            Ok(session) => {
                log::debug!("Session refreshed for {}", session.user.id);
                self.store_session(Some(session.clone()));
                Ok(session)
            }
            Err(err @ AuthError::Rejected(_)) => {
                self.store_session(None);
                Err(err)
            }
            Err(err) => Err(err),
        }
    }
}

#[async_trait(?Send)]
impl AuthService for SupabaseClient {
    async fn sign_in(&self, email: &str, password: &str) -> AuthResult<User> {
        let session = self
            .token_grant("password", &Credentials { email, password })
            .await?;
        let user = session.user.clone();
        log::info!("Signed in as {}", user.id);
        self.store_session(Some(session));
        Ok(user)
    }

    async fn sign_up(&self, email: &str, password: &str) -> AuthResult<SignUpOutcome> {
        let url = self.config().auth_url("signup");
        let response = self
            .request(Method::POST, &url)
            .json(&Credentials { email, password })
            .send()
            .await
            .map_err(RemoteError::from)?;
        let parsed: SignUpResponse = auth_response(response)
            .await?
            .json()
            .await
            .map_err(RemoteError::from)?;

        match parsed {
            SignUpResponse::Session(token) => {
                let session = token.into_session();
                let user = session.user.clone();
                self.store_session(Some(session));
                Ok(SignUpOutcome::SignedIn(user))
            }
            SignUpResponse::User(user) => Ok(SignUpOutcome::ConfirmationSent(user)),
        }
    }

    async fn sign_out(&self) -> AuthResult<()> {
        if self.session().is_some() {
            let url = self.config().auth_url("logout");
            // the local session goes regardless of what the server says
            match self.authorized(Method::POST, &url).await {
                Ok(request) => match request.send().await {
                    Ok(response) if !response.status().is_success() => {
                        log::warn!("Sign-out returned status {}", response.status());
                    }
                    Err(e) => log::warn!("Sign-out request failed: {}", e),
                    Ok(_) => {}
                },
                Err(e) => log::warn!("Skipping server sign-out: {}", e),
            }
        }
        self.store_session(None);
        Ok(())
    }

    fn current_user(&self) -> Option<User> {
        self.session().map(|session| session.user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_up_response_with_session() {
        let body = r#"{
            "access_token": "jwt",
            "token_type": "bearer",
            "expires_in": 3600,
            "expires_at": 1700003600,
            "refresh_token": "refresh",
            "user": {"id": "2b0e4a7c-1111-4c22-8e33-444455556666", "email": "a@example.com", "role": "authenticated"}
        }"#;
        let parsed: SignUpResponse = serde_json::from_str(body).unwrap();
        let SignUpResponse::Session(token) = parsed else {
            panic!("expected a session");
        };
        let session = token.into_session();
        assert_eq!(session.expires_at, 1_700_003_600);
        assert_eq!(session.user.email.as_deref(), Some("a@example.com"));
    }

    #[test]
    fn test_sign_up_response_awaiting_confirmation() {
        let body = r#"{"id": "2b0e4a7c-1111-4c22-8e33-444455556666", "email": "a@example.com", "confirmation_sent_at": "2024-05-01T12:00:00Z"}"#;
        let parsed: SignUpResponse = serde_json::from_str(body).unwrap();
        assert!(matches!(parsed, SignUpResponse::User(_)));
    }

    #[test]
    fn test_missing_expires_at_uses_expires_in() {
        let token = TokenResponse {
            access_token: "a".to_string(),
            refresh_token: "r".to_string(),
            expires_in: Some(60),
            expires_at: None,
            user: User {
                id: "u".to_string(),
                email: None,
            },
        };
        let before = chrono::Utc::now().timestamp();
        let session = token.into_session();
        assert!(session.expires_at >= before + 60);
    }
}
