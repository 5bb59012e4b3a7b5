//! InMemory IdentityRegistry implementation.
//!
//! The connection table, the source-address bindings and the identity
//! attributes are read-modify-written as a unit (e.g. the uniqueness check
//! and the assignment in `set_display_name`), so all three live behind one
//! mutex.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::net::IpAddr;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    ConnectionId, Identity, IdentityId, IdentityIdFactory, IdentityRegistry,
    dedupe_display_name, sanitize_display_name,
};

#[derive(Default)]
struct RegistryInner {
    /// Live connection -> identity
    connections: HashMap<ConnectionId, IdentityId>,
    /// Source address -> identity; created lazily, never overwritten
    ip_bindings: HashMap<IpAddr, IdentityId>,
    /// Identity attributes; entries are never removed
    identities: HashMap<IdentityId, Identity>,
}

impl RegistryInner {
    /// Distinct identities with at least one live connection, in id order
    fn active_ids(&self) -> BTreeSet<&IdentityId> {
        self.connections.values().collect()
    }
}

/// In-memory IdentityRegistry implementation
pub struct InMemoryIdentityRegistry {
    inner: Mutex<RegistryInner>,
}

impl InMemoryIdentityRegistry {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(RegistryInner::default()),
        }
    }
}

impl Default for InMemoryIdentityRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IdentityRegistry for InMemoryIdentityRegistry {
    async fn connect(&self, connection: ConnectionId, source_ip: IpAddr) -> Identity {
        let mut inner = self.inner.lock().await;

        let identity_id = match inner.ip_bindings.get(&source_ip) {
            Some(existing) => existing.clone(),
            None => {
                let fresh = IdentityIdFactory::generate();
                inner.ip_bindings.insert(source_ip, fresh.clone());
                tracing::debug!("Minted identity '{}' for address {}", fresh, source_ip);
                fresh
            }
        };

        let identity = inner
            .identities
            .entry(identity_id.clone())
            .or_insert_with(|| Identity::new(identity_id.clone()))
            .clone();
        inner.connections.insert(connection, identity_id);
        identity
    }

    async fn disconnect(&self, connection: &ConnectionId) -> Option<IdentityId> {
        let mut inner = self.inner.lock().await;
        inner.connections.remove(connection)
    }

    async fn set_display_name(&self, identity: &IdentityId, desired: &str) -> String {
        let mut inner = self.inner.lock().await;

        let base = sanitize_display_name(desired);
        // Collide against the names of the *other* active identities; the
        // identity being renamed may keep its own current name.
        let taken: HashSet<String> = inner
            .active_ids()
            .into_iter()
            .filter(|id| *id != identity)
            .filter_map(|id| inner.identities.get(id))
            .map(|i| i.display_name.clone())
            .filter(|name| !name.is_empty())
            .collect();
        let final_name = dedupe_display_name(&base, &taken);

        if let Some(entry) = inner.identities.get_mut(identity) {
            entry.display_name = final_name.clone();
        } else {
            tracing::warn!("set_display_name on unknown identity '{}'", identity);
        }
        final_name
    }

    async fn set_avatar(&self, identity: &IdentityId, avatar: Option<String>) {
        let mut inner = self.inner.lock().await;
        if let Some(entry) = inner.identities.get_mut(identity) {
            entry.avatar = avatar;
        } else {
            tracing::warn!("set_avatar on unknown identity '{}'", identity);
        }
    }

    async fn list_active(&self) -> Vec<Identity> {
        let inner = self.inner.lock().await;
        inner
            .active_ids()
            .into_iter()
            .filter_map(|id| inner.identities.get(id))
            .cloned()
            .collect()
    }

    async fn resolve_display_name(&self, name: &str) -> Option<IdentityId> {
        let inner = self.inner.lock().await;
        // BTreeSet iteration makes the tie-break deterministic: the
        // smallest matching identity id wins.
        inner
            .active_ids()
            .into_iter()
            .find(|id| {
                inner
                    .identities
                    .get(*id)
                    .is_some_and(|i| !i.display_name.is_empty() && i.display_name == name)
            })
            .cloned()
    }

    async fn is_active(&self, identity: &IdentityId) -> bool {
        let inner = self.inner.lock().await;
        inner.connections.values().any(|id| id == identity)
    }

    async fn connections_for(&self, identity: &IdentityId) -> Vec<ConnectionId> {
        let inner = self.inner.lock().await;
        let mut connections: Vec<ConnectionId> = inner
            .connections
            .iter()
            .filter(|(_, id)| *id == identity)
            .map(|(conn, _)| conn.clone())
            .collect();
        connections.sort();
        connections
    }

    async fn name_for(&self, identity: &IdentityId) -> Option<String> {
        let inner = self.inner.lock().await;
        inner
            .identities
            .get(identity)
            .map(|i| i.display_name.clone())
    }

    async fn identity_for_address(&self, source_ip: IpAddr) -> Option<IdentityId> {
        let inner = self.inner.lock().await;
        inner.ip_bindings.get(&source_ip).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ip(last: u8) -> IpAddr {
        IpAddr::from([127, 0, 0, last])
    }

    fn conn() -> ConnectionId {
        ConnectionId::generate()
    }

    #[tokio::test]
    async fn test_connect_mints_one_identity_per_address() {
        // given:
        let registry = InMemoryIdentityRegistry::new();

        // when:
        let first = registry.connect(conn(), ip(1)).await;
        let second = registry.connect(conn(), ip(2)).await;

        // then:
        assert_ne!(first.id, second.id);
    }

    #[tokio::test]
    async fn test_connect_reuses_the_address_binding() {
        // given:
        let registry = InMemoryIdentityRegistry::new();
        let first = registry.connect(conn(), ip(1)).await;

        // when:
        let second = registry.connect(conn(), ip(1)).await;

        // then:
        assert_eq!(first.id, second.id);
    }

    #[tokio::test]
    async fn test_reconnect_inherits_name_and_avatar() {
        // given:
        let registry = InMemoryIdentityRegistry::new();
        let connection = conn();
        let identity = registry.connect(connection.clone(), ip(1)).await;
        registry.set_display_name(&identity.id, "Sam").await;
        registry
            .set_avatar(&identity.id, Some("/avatars/sam.png".to_string()))
            .await;
        registry.disconnect(&connection).await;

        // when:
        let rejoined = registry.connect(conn(), ip(1)).await;

        // then:
        assert_eq!(rejoined.id, identity.id);
        assert_eq!(rejoined.display_name, "Sam");
        assert_eq!(rejoined.avatar.as_deref(), Some("/avatars/sam.png"));
    }

    #[tokio::test]
    async fn test_disconnect_returns_identity_and_is_idempotent() {
        // given:
        let registry = InMemoryIdentityRegistry::new();
        let connection = conn();
        let identity = registry.connect(connection.clone(), ip(1)).await;

        // when:
        let first = registry.disconnect(&connection).await;
        let second = registry.disconnect(&connection).await;

        // then:
        assert_eq!(first, Some(identity.id.clone()));
        assert_eq!(second, None);
        // the identity itself survives
        assert_eq!(registry.name_for(&identity.id).await, Some(String::new()));
    }

    #[tokio::test]
    async fn test_colliding_names_get_the_smallest_free_suffix() {
        // given:
        let registry = InMemoryIdentityRegistry::new();
        let a = registry.connect(conn(), ip(1)).await;
        let b = registry.connect(conn(), ip(2)).await;
        let c = registry.connect(conn(), ip(3)).await;

        // when:
        let name_a = registry.set_display_name(&a.id, "Sam").await;
        let name_b = registry.set_display_name(&b.id, "Sam").await;
        let name_c = registry.set_display_name(&c.id, "Sam").await;

        // then:
        assert_eq!(name_a, "Sam");
        assert_eq!(name_b, "Sam#2");
        assert_eq!(name_c, "Sam#3");
    }

    #[tokio::test]
    async fn test_inactive_names_do_not_collide() {
        // given:
        let registry = InMemoryIdentityRegistry::new();
        let gone_conn = conn();
        let gone = registry.connect(gone_conn.clone(), ip(1)).await;
        registry.set_display_name(&gone.id, "Sam").await;
        registry.disconnect(&gone_conn).await;
        let b = registry.connect(conn(), ip(2)).await;

        // when:
        let name = registry.set_display_name(&b.id, "Sam").await;

        // then:
        // only names of currently-active identities are reserved
        assert_eq!(name, "Sam");
    }

    #[tokio::test]
    async fn test_renaming_to_own_name_keeps_it_unsuffixed() {
        // given:
        let registry = InMemoryIdentityRegistry::new();
        let a = registry.connect(conn(), ip(1)).await;
        registry.set_display_name(&a.id, "Sam").await;

        // when:
        let renamed = registry.set_display_name(&a.id, "Sam").await;

        // then:
        assert_eq!(renamed, "Sam");
    }

    #[tokio::test]
    async fn test_empty_name_gets_placeholder() {
        // given:
        let registry = InMemoryIdentityRegistry::new();
        let a = registry.connect(conn(), ip(1)).await;

        // when:
        let name = registry.set_display_name(&a.id, "").await;

        // then:
        assert_eq!(name, "Guest");
    }

    #[tokio::test]
    async fn test_list_active_dedupes_multi_connection_identities() {
        // given:
        let registry = InMemoryIdentityRegistry::new();
        // two tabs from the same address, one from another
        let a = registry.connect(conn(), ip(1)).await;
        registry.connect(conn(), ip(1)).await;
        let b = registry.connect(conn(), ip(2)).await;

        // when:
        let active = registry.list_active().await;

        // then:
        assert_eq!(active.len(), 2);
        let ids: Vec<_> = active.iter().map(|i| i.id.clone()).collect();
        assert!(ids.contains(&a.id));
        assert!(ids.contains(&b.id));
    }

    #[tokio::test]
    async fn test_list_active_excludes_disconnected_identities() {
        // given:
        let registry = InMemoryIdentityRegistry::new();
        let gone_conn = conn();
        registry.connect(gone_conn.clone(), ip(1)).await;
        let stays = registry.connect(conn(), ip(2)).await;

        // when:
        registry.disconnect(&gone_conn).await;
        let active = registry.list_active().await;

        // then:
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, stays.id);
    }

    #[tokio::test]
    async fn test_resolve_display_name_only_matches_active_identities() {
        // given:
        let registry = InMemoryIdentityRegistry::new();
        let gone_conn = conn();
        let gone = registry.connect(gone_conn.clone(), ip(1)).await;
        registry.set_display_name(&gone.id, "Sam").await;
        registry.disconnect(&gone_conn).await;

        // when:
        let resolved = registry.resolve_display_name("Sam").await;

        // then:
        assert_eq!(resolved, None);
    }

    #[tokio::test]
    async fn test_resolve_display_name_finds_active_identity() {
        // given:
        let registry = InMemoryIdentityRegistry::new();
        let a = registry.connect(conn(), ip(1)).await;
        registry.set_display_name(&a.id, "Sam").await;

        // when:
        let resolved = registry.resolve_display_name("Sam").await;

        // then:
        assert_eq!(resolved, Some(a.id));
    }

    #[tokio::test]
    async fn test_connections_for_lists_all_tabs() {
        // given:
        let registry = InMemoryIdentityRegistry::new();
        let c1 = conn();
        let c2 = conn();
        let identity = registry.connect(c1.clone(), ip(1)).await;
        registry.connect(c2.clone(), ip(1)).await;

        // when:
        let connections = registry.connections_for(&identity.id).await;

        // then:
        assert_eq!(connections.len(), 2);
        assert!(connections.contains(&c1));
        assert!(connections.contains(&c2));
    }

    #[tokio::test]
    async fn test_is_active_tracks_remaining_connections() {
        // given:
        let registry = InMemoryIdentityRegistry::new();
        let c1 = conn();
        let c2 = conn();
        let identity = registry.connect(c1.clone(), ip(1)).await;
        registry.connect(c2.clone(), ip(1)).await;

        // when / then:
        registry.disconnect(&c1).await;
        assert!(registry.is_active(&identity.id).await);
        registry.disconnect(&c2).await;
        assert!(!registry.is_active(&identity.id).await);
    }

    #[tokio::test]
    async fn test_identity_for_address_requires_a_binding() {
        // given:
        let registry = InMemoryIdentityRegistry::new();
        let identity = registry.connect(conn(), ip(1)).await;

        // when / then:
        assert_eq!(
            registry.identity_for_address(ip(1)).await,
            Some(identity.id)
        );
        assert_eq!(registry.identity_for_address(ip(9)).await, None);
    }
}
