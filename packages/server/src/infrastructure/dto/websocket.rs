//! WebSocket event DTOs and their domain conversions.
//!
//! Wire shapes are shared with the browser and CLI clients, so everything
//! here derives both `Serialize` and `Deserialize`.

use serde::{Deserialize, Serialize};

use crate::domain::{Identity, MessageRecord};

/// Inbound client events, tagged by `type`.
///
/// Unknown or malformed payloads fail deserialization and are silently
/// discarded by the socket handler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ClientEvent {
    Join {
        #[serde(default)]
        user: String,
    },
    Message {
        #[serde(default)]
        text: String,
        #[serde(default = "default_recipient")]
        to: String,
    },
    Rename {
        #[serde(default)]
        user: String,
    },
    History {
        #[serde(default)]
        channel: String,
    },
    Leave,
}

fn default_recipient() -> String {
    "all".to_string()
}

/// Discriminator for outbound events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    Message,
    UserList,
    Joined,
    Renamed,
    History,
}

/// Chat or system message event; also the stored-history wire shape
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageEvent {
    pub r#type: EventType,
    pub user: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub text: String,
    pub private: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_user: Option<String>,
    pub ts: String,
}

/// One entry of a `user_list` event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserEntry {
    pub id: String,
    pub user: String,
    /// `null` when the identity has no avatar
    pub avatar: Option<String>,
}

/// Roster of currently-active identities
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserListEvent {
    pub r#type: EventType,
    pub users: Vec<UserEntry>,
}

impl UserListEvent {
    pub fn new(identities: Vec<Identity>) -> Self {
        Self {
            r#type: EventType::UserList,
            users: identities.into_iter().map(UserEntry::from).collect(),
        }
    }
}

/// Join acknowledgement sent to the requester only
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinedEvent {
    pub r#type: EventType,
    pub user: String,
    pub id: String,
    pub ts: String,
}

/// Rename acknowledgement sent to the requester only
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenamedEvent {
    pub r#type: EventType,
    pub old: String,
    pub user: String,
    pub ts: String,
}

/// Snapshot of one conversation channel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEvent {
    pub r#type: EventType,
    pub channel: String,
    pub messages: Vec<MessageEvent>,
}

impl HistoryEvent {
    pub fn new(channel: String, records: Vec<MessageRecord>) -> Self {
        Self {
            r#type: EventType::History,
            channel,
            messages: records.into_iter().map(MessageEvent::from).collect(),
        }
    }
}

// ========================================
// Domain Entity -> DTO
// ========================================

impl From<MessageRecord> for MessageEvent {
    fn from(record: MessageRecord) -> Self {
        Self {
            r#type: EventType::Message,
            user: record.sender_name,
            user_id: record.sender_id.map(|id| id.into_string()),
            text: record.text,
            private: record.private,
            to: record.recipient_id.map(|id| id.into_string()),
            to_user: record.recipient_name,
            ts: record.ts,
        }
    }
}

impl From<Identity> for UserEntry {
    fn from(identity: Identity) -> Self {
        Self {
            id: identity.id.into_string(),
            user: identity.display_name,
            avatar: identity.avatar,
        }
    }
}
