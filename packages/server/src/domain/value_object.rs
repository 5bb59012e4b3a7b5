//! Value objects for the chat hub.

use uuid::Uuid;

/// Opaque handle for one live transport session.
///
/// Minted by the UI layer when a WebSocket upgrade is accepted; the core
/// never touches the underlying socket, only this token.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(String);

impl ConnectionId {
    /// Mint a fresh connection id
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Stable, process-lifetime token for one chat participant.
///
/// Identities survive reconnects (the registry re-binds them by source
/// address) and are never deleted, only inactive while no connection maps
/// to them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IdentityId(String);

impl IdentityId {
    /// Validate an externally supplied identity id.
    ///
    /// Accepts lowercase hex strings of at least 8 characters, the shape
    /// produced by [`IdentityIdFactory::generate`].
    pub fn new(value: String) -> Result<Self, super::RegistryError> {
        if value.len() >= 8 && value.chars().all(|c| c.is_ascii_hexdigit()) {
            Ok(Self(value))
        } else {
            Err(super::RegistryError::InvalidIdentityId(value))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for IdentityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Factory for identity ids
pub struct IdentityIdFactory;

impl IdentityIdFactory {
    /// Generate a fresh random identity id (32 hex characters)
    pub fn generate() -> IdentityId {
        IdentityId(Uuid::new_v4().simple().to_string())
    }
}

/// Conversation channel key.
///
/// Either the public channel `all` or the canonical key of a direct
/// conversation. The direct key sorts the two identity ids
/// lexicographically before joining them, so both directions of a DM map
/// to the same log.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChannelKey(String);

/// Name of the public broadcast channel
pub const PUBLIC_CHANNEL: &str = "all";

impl ChannelKey {
    /// The public broadcast channel
    pub fn public() -> Self {
        Self(PUBLIC_CHANNEL.to_string())
    }

    /// Canonical key for the direct conversation between two identities
    pub fn direct(a: &IdentityId, b: &IdentityId) -> Self {
        let (low, high) = if a.as_str() <= b.as_str() {
            (a, b)
        } else {
            (b, a)
        };
        Self(format!("dm:{}|{}", low.as_str(), high.as_str()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ChannelKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_identity_id_is_valid_hex() {
        // given:

        // when:
        let id = IdentityIdFactory::generate();

        // then:
        assert_eq!(id.as_str().len(), 32);
        assert!(id.as_str().chars().all(|c| c.is_ascii_hexdigit()));
        // the factory output round-trips through validation
        assert!(IdentityId::new(id.as_str().to_string()).is_ok());
    }

    #[test]
    fn test_generated_identity_ids_are_unique() {
        // given:

        // when:
        let id1 = IdentityIdFactory::generate();
        let id2 = IdentityIdFactory::generate();

        // then:
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_identity_id_rejects_short_values() {
        // given:
        let value = "abc123".to_string(); // 6 chars, below the minimum

        // when:
        let result = IdentityId::new(value);

        // then:
        assert!(result.is_err());
    }

    #[test]
    fn test_identity_id_rejects_non_hex_values() {
        // given:
        let value = "not-hex-at-all".to_string();

        // when:
        let result = IdentityId::new(value);

        // then:
        assert!(result.is_err());
    }

    #[test]
    fn test_direct_channel_key_is_order_independent() {
        // given:
        let a = IdentityId::new("aaaaaaaa".to_string()).unwrap();
        let b = IdentityId::new("bbbbbbbb".to_string()).unwrap();

        // when:
        let key_ab = ChannelKey::direct(&a, &b);
        let key_ba = ChannelKey::direct(&b, &a);

        // then:
        assert_eq!(key_ab, key_ba);
        assert_eq!(key_ab.as_str(), "dm:aaaaaaaa|bbbbbbbb");
    }

    #[test]
    fn test_public_channel_key() {
        // given:

        // when:
        let key = ChannelKey::public();

        // then:
        assert_eq!(key.as_str(), "all");
    }
}
