use super::*;
use std::collections::BTreeMap;
use tokio::sync::Mutex;

/// In-process mirror of room occupancy.
/// A failing variant rejects every call, for exercising error paths.
#[derive(Debug, Default)]
pub struct MemorySink {
    rooms: Mutex<BTreeMap<String, usize>>,
    failing: bool,
}

impl MemorySink {
    pub fn failing() -> Self {
        Self {
            rooms: Mutex::default(),
            failing: true,
        }
    }
    pub async fn get(&self, room: &str) -> Option<usize> {
        self.rooms.lock().await.get(room).copied()
    }
    pub async fn rooms(&self) -> BTreeMap<String, usize> {
        self.rooms.lock().await.clone()
    }
}

#[async_trait::async_trait]
impl PresenceSink for MemorySink {
    async fn upsert(&self, room: &str, members: usize) -> anyhow::Result<()> {
        anyhow::ensure!(!self.failing, "presence store unavailable");
        self.rooms.lock().await.insert(room.to_string(), members);
        Ok(())
    }
    async fn delete(&self, room: &str) -> anyhow::Result<()> {
        anyhow::ensure!(!self.failing, "presence store unavailable");
        self.rooms.lock().await.remove(room);
        Ok(())
    }
}
