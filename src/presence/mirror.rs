use super::*;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;

/// One occupancy change bound for the sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    Upsert(String, usize),
    Delete(String),
}

/// Fire-and-forget front for a [`PresenceSink`].
///
/// Changes are queued and applied one at a time by a single task, in the
/// order they were pushed, so a room's delete always lands after its last
/// upsert. The task ends once every handle is dropped.
#[derive(Debug, Clone)]
pub struct Mirror {
    tx: UnboundedSender<Change>,
}

impl Mirror {
    pub fn spawn(sink: Arc<dyn PresenceSink>) -> Self {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel::<Change>();
        tokio::spawn(async move {
            while let Some(change) = rx.recv().await {
                Self::apply(sink.as_ref(), change).await;
            }
        });
        Self { tx }
    }
    pub fn upsert(&self, room: &str, members: usize) {
        self.push(Change::Upsert(room.to_string(), members));
    }
    pub fn delete(&self, room: &str) {
        self.push(Change::Delete(room.to_string()));
    }
    fn push(&self, change: Change) {
        if let Err(e) = self.tx.send(change) {
            log::warn!("presence mirror stopped, dropping {:?}", e.0);
        }
    }
    async fn apply(sink: &dyn PresenceSink, change: Change) {
        match change {
            Change::Upsert(room, members) => {
                if let Err(e) = sink.upsert(&room, members).await {
                    log::warn!("[{}] presence upsert failed: {}", room, e);
                }
            }
            Change::Delete(room) => {
                if let Err(e) = sink.delete(&room).await {
                    log::warn!("[{}] presence delete failed: {}", room, e);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    /// Memory sink whose upserts lag behind its deletes.
    struct Sluggish(MemorySink);

    #[async_trait::async_trait]
    impl PresenceSink for Sluggish {
        async fn upsert(&self, room: &str, members: usize) -> anyhow::Result<()> {
            tokio::time::sleep(Duration::from_millis(30)).await;
            self.0.upsert(room, members).await
        }
        async fn delete(&self, room: &str) -> anyhow::Result<()> {
            self.0.delete(room).await
        }
    }

    #[tokio::test]
    async fn changes_apply_in_push_order() {
        let sink = Arc::new(Sluggish(MemorySink::default()));
        let mirror = Mirror::spawn(sink.clone());
        mirror.upsert("r", 1);
        mirror.upsert("r", 2);
        mirror.delete("r");
        mirror.upsert("s", 3);
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(sink.0.get("r").await, None);
        assert_eq!(sink.0.get("s").await, Some(3));
    }
}
