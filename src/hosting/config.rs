use std::path::PathBuf;

/// Server configuration, from flags or the environment.
#[derive(Debug, Clone, clap::Parser)]
#[command(name = "voxroom", about = "Rendezvous and signaling relay for voice rooms")]
pub struct Config {
    /// Address to listen on.
    #[arg(long, env = "BIND_ADDR", default_value = "0.0.0.0:8000")]
    pub bind: String,
    /// Directory served for every path other than the socket endpoint.
    #[arg(long, env = "STATIC_DIR", default_value = "public")]
    pub assets: PathBuf,
    /// Directory for timestamped log files.
    #[arg(long, env = "LOG_DIR", default_value = "logs")]
    pub logs: PathBuf,
    /// PostgreSQL URL for the room presence mirror. Logged only when unset.
    #[arg(long, env = "DB_URL")]
    pub database: Option<String>,
    /// HTTP worker threads.
    #[arg(long, env = "WORKERS", default_value_t = 4)]
    pub workers: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    #[test]
    fn flags_override_defaults() {
        let config = Config::try_parse_from([
            "voxroom",
            "--bind",
            "127.0.0.1:9000",
            "--assets",
            "www",
            "--workers",
            "2",
        ])
        .unwrap();
        assert_eq!(config.bind, "127.0.0.1:9000");
        assert_eq!(config.assets, PathBuf::from("www"));
        assert_eq!(config.workers, 2);
    }
    #[test]
    fn rejects_bad_worker_count() {
        assert!(Config::try_parse_from(["voxroom", "--workers", "many"]).is_err());
    }
}
