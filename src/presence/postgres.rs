use super::*;
use std::sync::Arc;
use tokio_postgres::Client;

/// Table mirroring live rooms.
#[rustfmt::skip]
pub const ROOMS: &str = "rooms";

/// Presence mirror in a PostgreSQL table, one row per live room.
pub struct PostgresSink {
    db: Arc<Client>,
}

impl PostgresSink {
    /// Connects to `url` and makes sure the table exists.
    pub async fn connect(url: &str) -> anyhow::Result<Self> {
        log::info!("connecting to presence database");
        let tls = tokio_postgres::tls::NoTls;
        let (client, connection) = tokio_postgres::connect(url, tls).await?;
        tokio::spawn(async move {
            if let Err(e) = connection.await {
                log::error!("presence database connection closed: {}", e);
            }
        });
        client
            .execute("SET client_min_messages TO WARNING", &[])
            .await?;
        client.batch_execute(Self::creates()).await?;
        Ok(Self {
            db: Arc::new(client),
        })
    }
    fn creates() -> &'static str {
        const_format::concatcp!(
            "CREATE TABLE IF NOT EXISTS ",
            ROOMS,
            " (
                name        TEXT PRIMARY KEY,
                members     INTEGER NOT NULL,
                updated_at  TIMESTAMPTZ NOT NULL DEFAULT now()
            );"
        )
    }
    fn upserts() -> &'static str {
        const_format::concatcp!(
            "INSERT INTO ",
            ROOMS,
            " (name, members, updated_at) VALUES ($1, $2, now())
              ON CONFLICT (name) DO UPDATE
              SET members = EXCLUDED.members, updated_at = EXCLUDED.updated_at"
        )
    }
    fn deletes() -> &'static str {
        const_format::concatcp!("DELETE FROM ", ROOMS, " WHERE name = $1")
    }
}

#[async_trait::async_trait]
impl PresenceSink for PostgresSink {
    async fn upsert(&self, room: &str, members: usize) -> anyhow::Result<()> {
        let members = i32::try_from(members)?;
        self.db.execute(Self::upserts(), &[&room, &members]).await?;
        Ok(())
    }
    async fn delete(&self, room: &str) -> anyhow::Result<()> {
        self.db.execute(Self::deletes(), &[&room]).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn statements_name_the_table() {
        assert!(PostgresSink::creates().contains("CREATE TABLE IF NOT EXISTS rooms"));
        assert!(PostgresSink::upserts().starts_with("INSERT INTO rooms"));
        assert!(PostgresSink::upserts().contains("ON CONFLICT (name)"));
        assert_eq!(PostgresSink::deletes(), "DELETE FROM rooms WHERE name = $1");
    }
}
