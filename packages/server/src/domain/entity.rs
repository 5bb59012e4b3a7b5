//! Domain entities: identities and message records.

use super::value_object::IdentityId;

/// Sender name used on system-authored messages
pub const SYSTEM_SENDER: &str = "_system";

/// One chat participant.
///
/// The id is immutable once assigned; display name and avatar mutate through
/// the registry. A participant may have any number of live connections,
/// including zero (inactive).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: IdentityId,
    /// Empty until the first join
    pub display_name: String,
    /// URL/path of the uploaded avatar, if any
    pub avatar: Option<String>,
}

impl Identity {
    /// Create a fresh identity with no name and no avatar
    pub fn new(id: IdentityId) -> Self {
        Self {
            id,
            display_name: String::new(),
            avatar: None,
        }
    }
}

/// One stored chat or system message. Immutable once appended to history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageRecord {
    pub sender_name: String,
    /// Absent on system messages
    pub sender_id: Option<IdentityId>,
    pub text: String,
    pub private: bool,
    /// Recipient identity, set on direct messages only
    pub recipient_id: Option<IdentityId>,
    pub recipient_name: Option<String>,
    /// ISO 8601 UTC
    pub ts: String,
}

impl MessageRecord {
    /// Build a public chat message
    pub fn public_chat(sender_name: String, sender_id: IdentityId, text: String, ts: String) -> Self {
        Self {
            sender_name,
            sender_id: Some(sender_id),
            text,
            private: false,
            recipient_id: None,
            recipient_name: None,
            ts,
        }
    }

    /// Build a direct chat message
    pub fn direct_chat(
        sender_name: String,
        sender_id: IdentityId,
        text: String,
        recipient_id: IdentityId,
        recipient_name: String,
        ts: String,
    ) -> Self {
        Self {
            sender_name,
            sender_id: Some(sender_id),
            text,
            private: true,
            recipient_id: Some(recipient_id),
            recipient_name: Some(recipient_name),
            ts,
        }
    }

    /// Build a system-authored message
    pub fn system(text: String, ts: String) -> Self {
        Self {
            sender_name: SYSTEM_SENDER.to_string(),
            sender_id: None,
            text,
            private: false,
            recipient_id: None,
            recipient_name: None,
            ts,
        }
    }

    /// True for system-authored messages
    pub fn is_system(&self) -> bool {
        self.sender_name == SYSTEM_SENDER
    }
}
