//! Voice Room Server Binary
//!
//! Serves the `/ws` signaling endpoint plus static client files.
//! Configure with flags or BIND_ADDR, STATIC_DIR, LOG_DIR, DB_URL, WORKERS.

use clap::Parser;
use voxroom::hosting::Config;
use voxroom::hosting::Server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();
    voxroom::log(&config.logs)?;
    voxroom::kys();
    Server::run(config).await
}
