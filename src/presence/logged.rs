use super::*;

/// Sink used when no external store is configured. Only logs.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

#[async_trait::async_trait]
impl PresenceSink for LogSink {
    async fn upsert(&self, room: &str, members: usize) -> anyhow::Result<()> {
        log::debug!("[presence] {} has {} members", room, members);
        Ok(())
    }
    async fn delete(&self, room: &str) -> anyhow::Result<()> {
        log::debug!("[presence] {} removed", room);
        Ok(())
    }
}
