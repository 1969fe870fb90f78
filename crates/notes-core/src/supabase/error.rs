//! Error payloads
//!
//! The auth service and the REST layer use different error shapes; this
//! reads whichever fields are present.

use serde::Deserialize;

use crate::domain::{AuthError, RemoteError};

const ALREADY_EXISTS_CODE: &str = "user_already_exists";

/// Union of the error bodies returned by the hosted services
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ApiErrorBody {
    /// REST: string code (`"23505"`); auth: numeric HTTP code or string code
    #[serde(default)]
    pub code: Option<serde_json::Value>,
    #[serde(default)]
    pub error_code: Option<String>,
    #[serde(default)]
    pub msg: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub error_description: Option<String>,
}

impl ApiErrorBody {
    /// Lenient parse; anything that is not JSON becomes a bare message.
    pub fn parse(body: &str) -> Self {
        serde_json::from_str(body).unwrap_or_else(|_| Self {
            message: Some(body.trim().to_string()).filter(|m| !m.is_empty()),
            ..Self::default()
        })
    }

    pub fn message(&self) -> Option<&str> {
        self.msg
            .as_deref()
            .or(self.message.as_deref())
            .or(self.error_description.as_deref())
            .or(self.error.as_deref())
    }

    pub fn message_or(&self, fallback: &str) -> String {
        self.message().unwrap_or(fallback).to_string()
    }

    fn string_code(&self) -> Option<&str> {
        self.error_code
            .as_deref()
            .or_else(|| self.code.as_ref().and_then(|c| c.as_str()))
    }

    pub fn is_already_registered(&self) -> bool {
        if self.string_code() == Some(ALREADY_EXISTS_CODE) {
            return true;
        }
        self.message()
            .map(|m| {
                let m = m.to_lowercase();
                m.contains(ALREADY_EXISTS_CODE) || m.contains("already registered")
            })
            .unwrap_or(false)
    }
}

/// Map a failed auth response to an [`AuthError`].
///
/// Server-side failures (5xx) are remote errors; everything else is a
/// rejection carrying the service's message.
pub fn classify_auth_failure(status: u16, body: &str) -> AuthError {
    let parsed = ApiErrorBody::parse(body);
    if parsed.is_already_registered() {
        return AuthError::AlreadyRegistered;
    }
    if status >= 500 {
        return AuthError::Remote(RemoteError::Status {
            status,
            message: parsed.message_or("Authentication service unavailable"),
        });
    }
    AuthError::Rejected(parsed.message_or("Authentication failed"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_already_registered_by_error_code() {
        let body = r#"{"code":422,"error_code":"user_already_exists","msg":"User already registered"}"#;
        assert_eq!(classify_auth_failure(422, body), AuthError::AlreadyRegistered);
    }

    #[test]
    fn test_already_registered_by_string_code() {
        let body = r#"{"code":"user_already_exists","message":"exists"}"#;
        assert_eq!(classify_auth_failure(400, body), AuthError::AlreadyRegistered);
    }

    #[test]
    fn test_already_registered_by_message() {
        let body = r#"{"msg":"User already registered"}"#;
        assert_eq!(classify_auth_failure(400, body), AuthError::AlreadyRegistered);
    }

    #[test]
    fn test_generic_rejection_keeps_message() {
        let body = r#"{"error":"invalid_grant","error_description":"Invalid login credentials"}"#;
        assert_eq!(
            classify_auth_failure(400, body),
            AuthError::Rejected("Invalid login credentials".to_string())
        );
    }

    #[test]
    fn test_empty_body_falls_back() {
        assert_eq!(
            classify_auth_failure(401, ""),
            AuthError::Rejected("Authentication failed".to_string())
        );
    }

    #[test]
    fn test_server_errors_are_remote() {
        assert!(matches!(
            classify_auth_failure(503, "upstream down"),
            AuthError::Remote(RemoteError::Status { status: 503, .. })
        ));
    }

    #[test]
    fn test_rest_error_message() {
        let body = r#"{"code":"42501","message":"permission denied for table notes","details":null,"hint":null}"#;
        let parsed = ApiErrorBody::parse(body);
        assert_eq!(parsed.message(), Some("permission denied for table notes"));
        assert!(!parsed.is_already_registered());
    }
}
