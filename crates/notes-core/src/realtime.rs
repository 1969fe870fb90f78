//! Realtime Channel Protocol
//!
//! Builds and reads the JSON frames of the change-notification channel
//! (Phoenix channel messages). The transport lives with the caller; this
//! module only knows what to send and how to interpret what comes back.
//!
//! Every insert/update/delete on the owner's rows surfaces as
//! [`ChannelEvent::Change`]; the caller answers with a full refetch.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::config::{NOTES_CHANNEL, NOTES_TABLE};

const PHOENIX_TOPIC: &str = "phoenix";

/// Wait before each rejoin attempt; the last value repeats.
const REJOIN_DELAYS_MS: [u32; 4] = [1_000, 2_000, 5_000, 10_000];

/// Delay before the `attempt`-th consecutive rejoin (0-based)
pub fn rejoin_delay_ms(attempt: u32) -> u32 {
    let last = REJOIN_DELAYS_MS.len() - 1;
    REJOIN_DELAYS_MS[(attempt as usize).min(last)]
}

/// A Phoenix channel message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelFrame {
    pub topic: String,
    pub event: String,
    #[serde(default)]
    pub payload: Value,
    #[serde(rename = "ref", default)]
    pub reference: Option<String>,
}

/// Kind of row change reported by the channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Insert,
    Update,
    Delete,
}

impl ChangeKind {
    fn parse(kind: &str) -> Option<Self> {
        match kind.to_ascii_uppercase().as_str() {
            "INSERT" => Some(ChangeKind::Insert),
            "UPDATE" => Some(ChangeKind::Update),
            "DELETE" => Some(ChangeKind::Delete),
            _ => None,
        }
    }
}

/// What an incoming frame means for the subscriber
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelEvent {
    /// The join was accepted
    Joined,
    /// The join (or a later push) was refused
    JoinRejected(String),
    /// A row changed; refetch
    Change(ChangeKind),
    /// The server closed or errored the channel
    Closed,
    /// Heartbeat replies, presence, system messages
    Ignored,
}

impl ChannelEvent {
    /// The subscription is dead and must be rebuilt with a fresh token.
    ///
    /// An expired access token shows up as a refused join or a server close.
    pub fn requires_rejoin(&self) -> bool {
        matches!(self, ChannelEvent::JoinRejected(_) | ChannelEvent::Closed)
    }
}

/// Subscription state for the owner's notes channel
#[derive(Debug, Clone)]
pub struct NotesChannel {
    topic: String,
    owner_id: String,
    next_ref: u64,
    join_ref: Option<String>,
}

impl NotesChannel {
    pub fn new(owner_id: &str) -> Self {
        Self {
            topic: format!("realtime:{}", NOTES_CHANNEL),
            owner_id: owner_id.to_string(),
            next_ref: 1,
            join_ref: None,
        }
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    fn make_ref(&mut self) -> String {
        let reference = self.next_ref.to_string();
        self.next_ref += 1;
        reference
    }

    fn frame(&mut self, topic: &str, event: &str, payload: Value) -> Result<String, serde_json::Error> {
        let frame = ChannelFrame {
            topic: topic.to_string(),
            event: event.to_string(),
            payload,
            reference: Some(self.make_ref()),
        };
        serde_json::to_string(&frame)
    }

    /// Join frame subscribing to every change on the owner's rows
    pub fn join_frame(&mut self, access_token: Option<&str>) -> Result<String, serde_json::Error> {
        let mut payload = json!({
            "config": {
                "broadcast": { "self": false },
                "presence": { "key": "" },
                "postgres_changes": [{
                    "event": "*",
                    "schema": "public",
                    "table": NOTES_TABLE,
                    "filter": format!("user_id=eq.{}", self.owner_id),
                }],
            },
        });
        if let Some(token) = access_token {
            payload["access_token"] = Value::String(token.to_string());
        }
        let topic = self.topic.clone();
        let frame = self.frame(&topic, "phx_join", payload)?;
        self.join_ref = Some((self.next_ref - 1).to_string());
        Ok(frame)
    }

    pub fn heartbeat_frame(&mut self) -> Result<String, serde_json::Error> {
        self.frame(PHOENIX_TOPIC, "heartbeat", json!({}))
    }

    pub fn leave_frame(&mut self) -> Result<String, serde_json::Error> {
        let topic = self.topic.clone();
        self.frame(&topic, "phx_leave", json!({}))
    }

    /// Interpret a text frame from the socket.
    pub fn parse(&self, text: &str) -> ChannelEvent {
        let frame: ChannelFrame = match serde_json::from_str(text) {
            Ok(frame) => frame,
            Err(e) => {
                log::debug!("Ignoring unreadable realtime frame: {}", e);
                return ChannelEvent::Ignored;
            }
        };
        if frame.topic != self.topic {
            return ChannelEvent::Ignored;
        }

        match frame.event.as_str() {
            "phx_reply" if frame.reference.is_some() && frame.reference == self.join_ref => {
                let status = frame.payload["status"].as_str().unwrap_or_default();
                if status == "ok" {
                    ChannelEvent::Joined
                } else {
                    let reason = frame.payload["response"]["reason"]
                        .as_str()
                        .unwrap_or(status)
                        .to_string();
                    ChannelEvent::JoinRejected(reason)
                }
            }
            "postgres_changes" => {
                let data = &frame.payload["data"];
                let kind = data["type"]
                    .as_str()
                    .or_else(|| data["eventType"].as_str())
                    .and_then(ChangeKind::parse);
                match kind {
                    Some(kind) => ChannelEvent::Change(kind),
                    None => ChannelEvent::Ignored,
                }
            }
            "phx_close" | "phx_error" => ChannelEvent::Closed,
            "system" if frame.payload["status"].as_str() == Some("error") => {
                let message = frame.payload["message"].as_str().unwrap_or("error").to_string();
                ChannelEvent::JoinRejected(message)
            }
            _ => ChannelEvent::Ignored,
        }
    }
}
