//! SupabaseClient Tests
//!
//! Runs the client against a throwaway HTTP server on localhost that
//! records what it was sent.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use parking_lot::{Mutex, RwLock};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};

    use crate::backend::{AuthService, NotesRepository};
    use crate::cache::NoteCache;
    use crate::config::SupabaseConfig;
    use crate::domain::{Note, NoteError, RemoteError, Session, User};
    use crate::supabase::SupabaseClient;
    use crate::sync::{NoteState, NoteSync, Notifier, SharedCache};

    const OWNER_ID: &str = "2b0e4a7c-1111-4c22-8e33-444455556666";
    const NOTE_ID: &str = "6f1c1a52-7a0e-4a39-9d0b-0c7f4b8a9e11";

    /// Requests seen by the server, as `METHOD path | bearer`
    type Seen = Arc<Mutex<Vec<String>>>;

    async fn read_request(stream: &mut TcpStream) -> Option<(String, String, String)> {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];
        let header_end = loop {
            let n = stream.read(&mut chunk).await.ok()?;
            if n == 0 {
                return None;
            }
            buf.extend_from_slice(&chunk[..n]);
            if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                break pos + 4;
            }
        };

        let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
        let mut lines = head.lines();
        let mut request_line = lines.next()?.split_whitespace();
        let method = request_line.next()?.to_string();
        let path = request_line.next()?.to_string();

        let mut authorization = String::new();
        let mut content_length = 0usize;
        for line in lines {
            let Some((name, value)) = line.split_once(':') else {
                continue;
            };
            match name.trim().to_ascii_lowercase().as_str() {
                "authorization" => authorization = value.trim().to_string(),
                "content-length" => content_length = value.trim().parse().unwrap_or(0),
                _ => {}
            }
        }

        let mut body_read = buf.len() - header_end;
        while body_read < content_length {
            let n = stream.read(&mut chunk).await.ok()?;
            if n == 0 {
                break;
            }
            body_read += n;
        }
        Some((method, path, authorization))
    }

    /// Serve the auth token endpoint with `token_reply`; the notes table
    /// answers as it would for a caller who can see no rows.
    async fn serve(token_reply: (u16, &'static str)) -> (String, Seen) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        let seen: Seen = Arc::new(Mutex::new(Vec::new()));

        let log = seen.clone();
        tokio::spawn(async move {
            loop {
                let Ok((mut stream, _)) = listener.accept().await else {
                    return;
                };
                let Some((method, path, authorization)) = read_request(&mut stream).await else {
                    continue;
                };
                log.lock().push(format!("{} {} | {}", method, path, authorization));

                let (status, body) = if path.starts_with("/auth/v1/token") {
                    token_reply
                } else if method == "GET" {
                    (200, "[]")
                } else {
                    (204, "")
                };
                let response = format!(
                    "HTTP/1.1 {} Stub\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                );
                let _ = stream.write_all(response.as_bytes()).await;
                let _ = stream.shutdown().await;
            }
        });

        (url, seen)
    }

    fn session(expires_at: i64) -> Session {
        Session {
            access_token: "user-jwt".to_string(),
            refresh_token: "refresh".to_string(),
            expires_at,
            user: User {
                id: OWNER_ID.to_string(),
                email: Some("me@example.com".to_string()),
            },
        }
    }

    fn client(url: &str, session: Option<Session>) -> SupabaseClient {
        let client = SupabaseClient::new(SupabaseConfig::new(url, "anon").unwrap());
        if let Some(session) = session {
            client.restore_session(session);
        }
        client
    }

    fn table_requests(seen: &Seen) -> Vec<String> {
        seen.lock()
            .iter()
            .filter(|line| line.contains("/rest/v1/"))
            .cloned()
            .collect()
    }

    #[derive(Clone, Default)]
    struct RecordingNotifier {
        errors: Arc<Mutex<Vec<String>>>,
    }

    impl Notifier for RecordingNotifier {
        fn success(&self, _message: &str) {}

        fn error(&self, message: &str) {
            self.errors.lock().push(message.to_string());
        }
    }

    fn existing_note() -> Note {
        Note {
            id: NOTE_ID.to_string(),
            user_id: OWNER_ID.to_string(),
            text: "Buy milk".to_string(),
            label: None,
            created_at: chrono::Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_signed_out_requests_use_anon_key() {
        let (url, seen) = serve((503, "{}")).await;
        let client = client(&url, None);

        assert_eq!(client.access_token().await.unwrap(), "anon");
        client.fetch_notes(OWNER_ID).await.unwrap();
        assert!(table_requests(&seen)[0].ends_with("| Bearer anon"));
    }

    #[tokio::test]
    async fn test_live_session_token_is_sent() {
        let (url, seen) = serve((503, "{}")).await;
        let far_future = chrono::Utc::now().timestamp() + 3600;
        let client = client(&url, Some(session(far_future)));

        client.fetch_notes(OWNER_ID).await.unwrap();
        let requests = table_requests(&seen);
        assert_eq!(requests.len(), 1);
        assert!(requests[0].starts_with("GET /rest/v1/notes?"));
        assert!(requests[0].ends_with("| Bearer user-jwt"));
    }

    #[tokio::test]
    async fn test_failed_refresh_fails_the_request() {
        let (url, seen) = serve((503, r#"{"msg":"upstream unavailable"}"#)).await;
        let client = client(&url, Some(session(0)));

        let err = client.fetch_notes(OWNER_ID).await.unwrap_err();
        assert!(matches!(err, RemoteError::Status { status: 503, .. }));
        let err = client.delete_note(OWNER_ID, NOTE_ID).await.unwrap_err();
        assert!(matches!(err, RemoteError::Status { status: 503, .. }));

        // nothing went to the table as the anon role
        assert!(table_requests(&seen).is_empty());
        // a server-side failure keeps the session for a later retry
        assert!(client.session().is_some());
    }

    #[tokio::test]
    async fn test_rejected_refresh_signs_out() {
        let (url, seen) = serve((
            400,
            r#"{"error":"invalid_grant","error_description":"Invalid Refresh Token"}"#,
        ))
        .await;
        let client = client(&url, Some(session(0)));

        let err = client.fetch_notes(OWNER_ID).await.unwrap_err();
        assert!(matches!(err, RemoteError::Status { status: 401, .. }));
        assert!(table_requests(&seen).is_empty());
        assert!(client.session().is_none());
        assert_eq!(client.current_user(), None);
    }

    #[tokio::test]
    async fn test_expired_session_keeps_notes_and_reports_failures() {
        let (url, seen) = serve((503, r#"{"msg":"upstream unavailable"}"#)).await;
        let client = client(&url, Some(session(0)));
        let notifier = RecordingNotifier::default();
        let state: SharedCache = Arc::new(RwLock::new(NoteCache::new()));
        state.write(|cache| cache.replace_all(vec![existing_note()]));
        let sync = NoteSync::new(client, state.clone(), notifier.clone());

        assert!(sync.refresh().await.is_err());
        assert_eq!(sync.notes(), vec![existing_note()]);

        let err = sync.delete_note(NOTE_ID).await.unwrap_err();
        assert!(matches!(err, NoteError::Remote(_)));
        assert!(table_requests(&seen).is_empty());
        assert_eq!(
            *notifier.errors.lock(),
            vec![
                "Failed to fetch notes. Please refresh the page.",
                "Failed to fetch notes. Please refresh the page.",
                "Failed to delete note. Please try again.",
            ]
        );
    }
}
