use crate::connection::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Trait for getting the wire name of an event
pub trait EventType {
    fn event_type(&self) -> &'static str;
}

/// A stored, end-to-end encrypted message. The server never looks inside
/// `encrypted_content`, `iv` or `sender_public_key`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub sender_id: UserId,
    pub receiver_id: UserId,
    pub encrypted_content: String,
    pub iv: String,
    pub sender_public_key: String,
    pub timestamp: DateTime<Utc>,
    pub is_delivered: bool,
    pub is_read: bool,
}

/// The opaque part of a message as supplied by the sending client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedPayload {
    pub encrypted_content: String,
    pub iv: String,
    pub sender_public_key: String,
}

/// Events pushed from the server to a connected client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", content = "data")]
pub enum Event {
    /// Handshake accepted
    #[serde(rename = "connected")]
    Connected { status: String },
    #[serde(rename = "new_message")]
    NewMessage(Message),
    #[serde(rename = "user_typing")]
    UserTyping { sender_id: UserId },
    /// Handshake rejected; the transport is closed right after
    #[serde(rename = "error")]
    AuthError { message: String, reason: String },
    /// The account behind this connection is gone
    #[serde(rename = "force_logout")]
    ForceLogout { reason: String },
}

impl Event {
    pub fn connected() -> Self {
        Event::Connected {
            status: "success".to_string(),
        }
    }
}

impl EventType for Event {
    fn event_type(&self) -> &'static str {
        match self {
            Event::Connected { .. } => "connected",
            Event::NewMessage(_) => "new_message",
            Event::UserTyping { .. } => "user_typing",
            Event::AuthError { .. } => "error",
            Event::ForceLogout { .. } => "force_logout",
        }
    }
}

/// Events a client may send over its connection.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ClientEvent {
    /// Handshake frame carrying the bearer credential
    Auth { token: String },
    /// Typing indicator addressed to `receiver_id`
    Typing {
        #[serde(default)]
        sender_id: Option<UserId>,
        #[serde(default)]
        receiver_id: Option<UserId>,
    },
}
