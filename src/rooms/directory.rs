use super::*;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::sync::RwLock;

/// Shared handle to one room. Holding its lock serializes that room.
pub type RoomHandle = Arc<Mutex<Room>>;

/// Maps room names to live rooms.
///
/// Rooms are created on first join and dropped as soon as they empty. The
/// directory lock is only held to look up, insert or remove entries, never
/// while waiting on a room that someone else holds for long.
#[derive(Debug, Default)]
pub struct Directory {
    rooms: RwLock<HashMap<String, RoomHandle>>,
}

impl Directory {
    /// Returns the room named `name`, creating it if absent.
    pub async fn open(&self, name: &str) -> RoomHandle {
        if let Some(room) = self.get(name).await {
            return room;
        }
        self.rooms
            .write()
            .await
            .entry(name.to_string())
            .or_insert_with(|| {
                log::debug!("[{}] room created", name);
                Arc::new(Mutex::new(Room::new(name)))
            })
            .clone()
    }
    pub async fn get(&self, name: &str) -> Option<RoomHandle> {
        self.rooms.read().await.get(name).cloned()
    }
    /// Drops `name` if it has no members left. Once dropped, the room is
    /// marked closed so a joiner still holding its handle starts over.
    /// `closed` runs before the locks are released, so nothing done for a
    /// later room of the same name can precede it.
    pub async fn close_if_empty(&self, name: &str, closed: impl FnOnce()) -> bool {
        let mut rooms = self.rooms.write().await;
        let Some(handle) = rooms.get(name).cloned() else {
            return false;
        };
        let mut room = handle.lock().await;
        if !room.is_empty() || room.is_closed() {
            return false;
        }
        room.close();
        rooms.remove(name);
        closed();
        log::debug!("[{}] room destroyed", name);
        true
    }
    pub async fn len(&self) -> usize {
        self.rooms.read().await.len()
    }
    /// Room names with their member counts.
    pub async fn census(&self) -> Vec<(String, usize)> {
        let handles = self
            .rooms
            .read()
            .await
            .iter()
            .map(|(name, handle)| (name.clone(), handle.clone()))
            .collect::<Vec<_>>();
        let mut census = Vec::with_capacity(handles.len());
        for (name, handle) in handles {
            census.push((name, handle.lock().await.len()));
        }
        census
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::peers::Connection;
    use crate::peers::PeerId;
    #[tokio::test]
    async fn open_is_idempotent() {
        let directory = Directory::default();
        let a = directory.open("r1").await;
        let b = directory.open("r1").await;
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(directory.len().await, 1);
    }
    #[tokio::test]
    async fn occupied_rooms_stay_open() {
        let directory = Directory::default();
        let room = directory.open("r1").await;
        let (conn, _rx) = Connection::pair();
        room.lock()
            .await
            .admit(PeerId::default(), "alice", conn)
            .unwrap();
        assert!(!directory.close_if_empty("r1", || panic!("occupied")).await);
        assert_eq!(directory.census().await, vec![("r1".to_string(), 1)]);
    }
    #[tokio::test]
    async fn empty_rooms_close_once() {
        let directory = Directory::default();
        let room = directory.open("r1").await;
        let mut calls = 0;
        assert!(directory.close_if_empty("r1", || calls += 1).await);
        assert!(!directory.close_if_empty("r1", || calls += 1).await);
        assert_eq!(calls, 1);
        assert!(room.lock().await.is_closed());
        assert!(directory.get("r1").await.is_none());
        let fresh = directory.open("r1").await;
        assert!(!Arc::ptr_eq(&room, &fresh));
        assert!(!fresh.lock().await.is_closed());
    }
}
