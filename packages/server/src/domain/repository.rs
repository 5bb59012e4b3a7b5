//! Store trait definitions.
//!
//! The domain layer defines the interfaces it needs for state access; the
//! infrastructure layer provides the concrete implementations (dependency
//! inversion). Use cases depend on these traits only.

use std::net::IpAddr;

use async_trait::async_trait;

use super::{ChannelKey, ConnectionId, Identity, IdentityId, MessageRecord};

/// Connection/identity registry.
///
/// Owns three tables that mutate as a unit behind one lock: the connection
/// table, the source-address bindings and the identity attributes. An
/// identity is *active* while at least one live connection maps to it;
/// identities are never deleted.
#[async_trait]
pub trait IdentityRegistry: Send + Sync {
    /// Bind a new connection.
    ///
    /// Reuses the identity already bound to `source_ip`, or mints a fresh
    /// one and binds it. Repeated calls from the same address never mint a
    /// second identity.
    async fn connect(&self, connection: ConnectionId, source_ip: IpAddr) -> Identity;

    /// Remove a connection binding.
    ///
    /// Returns the identity the connection belonged to, or `None` if the
    /// connection was unknown (repeated disconnects are a no-op). The
    /// identity itself is kept.
    async fn disconnect(&self, connection: &ConnectionId) -> Option<IdentityId>;

    /// Assign a display name, resolving collisions against the names of the
    /// other currently-active identities. Returns the final name.
    async fn set_display_name(&self, identity: &IdentityId, desired: &str) -> String;

    /// Set or clear the avatar reference
    async fn set_avatar(&self, identity: &IdentityId, avatar: Option<String>);

    /// One entry per distinct identity with at least one live connection,
    /// sorted by identity id for deterministic ordering
    async fn list_active(&self) -> Vec<Identity>;

    /// First active identity whose current display name equals `name`
    /// (smallest identity id wins on ties)
    async fn resolve_display_name(&self, name: &str) -> Option<IdentityId>;

    /// True iff at least one live connection maps to this identity
    async fn is_active(&self, identity: &IdentityId) -> bool;

    /// All live connections currently bound to this identity
    async fn connections_for(&self, identity: &IdentityId) -> Vec<ConnectionId>;

    /// Current display name, `None` for unknown identities
    async fn name_for(&self, identity: &IdentityId) -> Option<String>;

    /// Identity bound to a source address, if any. Used by the avatar
    /// upload surface, which is keyed by caller address.
    async fn identity_for_address(&self, source_ip: IpAddr) -> Option<IdentityId>;
}

/// Append-only, size-bounded message log keyed by conversation channel.
#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Append to the channel's log, creating the channel on first use.
    /// After the append the log is truncated to the most recent entries
    /// within the store's limit.
    async fn append(&self, channel: &ChannelKey, message: MessageRecord);

    /// Snapshot copy of the channel's log; empty for unknown channels.
    /// Never hands out a live reference to internal storage.
    async fn read(&self, channel: &ChannelKey) -> Vec<MessageRecord>;
}
