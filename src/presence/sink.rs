/// External store of room names and member counts, used for discovery.
#[async_trait::async_trait]
pub trait PresenceSink: Send + Sync {
    /// Called after any membership change of a room that still has members.
    async fn upsert(&self, room: &str, members: usize) -> anyhow::Result<()>;
    /// Called once a room has emptied and been dropped.
    async fn delete(&self, room: &str) -> anyhow::Result<()>;
}
