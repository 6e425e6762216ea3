use super::*;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Process-wide map from peer id to its connection and membership.
/// Exclusively owns every [`Peer`]; everything else holds ids.
#[derive(Debug, Default)]
pub struct Registry {
    peers: RwLock<HashMap<PeerId, Peer>>,
}

impl Registry {
    /// Registers a freshly accepted connection under a new id.
    pub async fn register(&self, connection: Connection) -> PeerId {
        let id = PeerId::default();
        self.peers
            .write()
            .await
            .insert(id, Peer::new(id, connection));
        id
    }
    /// Removes a peer. Only the first caller for a given id gets it back.
    pub async fn remove(&self, id: PeerId) -> Option<Peer> {
        self.peers.write().await.remove(&id)
    }
    pub async fn connection(&self, id: PeerId) -> Option<Connection> {
        self.peers
            .read()
            .await
            .get(&id)
            .map(|p| p.connection().clone())
    }
    pub async fn membership(&self, id: PeerId) -> Option<Membership> {
        self.peers
            .read()
            .await
            .get(&id)
            .and_then(|p| p.membership().cloned())
    }
    /// Records a successful join on the peer.
    /// False if the peer is gone or already belongs to a room.
    pub async fn enter(&self, id: PeerId, room: &str, username: &str) -> bool {
        self.peers
            .write()
            .await
            .get_mut(&id)
            .map(|p| p.enter(room, username))
            .unwrap_or(false)
    }
    pub async fn len(&self) -> usize {
        self.peers.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    #[tokio::test]
    async fn register_then_remove_once() {
        let registry = Registry::default();
        let (conn, _rx) = Connection::pair();
        let id = registry.register(conn).await;
        assert_eq!(registry.len().await, 1);
        assert!(registry.remove(id).await.is_some());
        assert!(registry.remove(id).await.is_none());
        assert_eq!(registry.len().await, 0);
    }
    #[tokio::test]
    async fn enter_records_membership() {
        let registry = Registry::default();
        let (conn, _rx) = Connection::pair();
        let id = registry.register(conn).await;
        assert_eq!(registry.membership(id).await, None);
        assert!(registry.enter(id, "r1", "alice").await);
        assert!(!registry.enter(id, "r1", "alice").await);
        assert_eq!(
            registry.membership(id).await,
            Some(Membership {
                room: "r1".into(),
                username: "alice".into(),
            })
        );
    }
    #[tokio::test]
    async fn unknown_peer_has_nothing() {
        let registry = Registry::default();
        let id = PeerId::default();
        assert!(registry.connection(id).await.is_none());
        assert!(!registry.enter(id, "r1", "alice").await);
    }
}
