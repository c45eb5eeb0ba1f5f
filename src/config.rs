use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;

const DEFAULT_SERVER_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub server_addr: std::net::SocketAddr,
    pub log_filter: String,
}

impl AppConfig {
    /// `DUES_DB_PATH`, `DUES_SERVER_ADDR`, `DUES_LOG`; all optional
    pub fn from_env() -> Result<Self> {
        let db_path = env::var("DUES_DB_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_db_path());

        let server_addr = env::var("DUES_SERVER_ADDR")
            .unwrap_or_else(|_| DEFAULT_SERVER_ADDR.to_string())
            .parse::<std::net::SocketAddr>()
            .context("DUES_SERVER_ADDR must be a socket address like 127.0.0.1:3000")?;

        let log_filter = env::var("DUES_LOG").unwrap_or_else(|_| DEFAULT_LOG_FILTER.to_string());

        Ok(Self {
            db_path,
            server_addr,
            log_filter,
        })
    }
}

fn default_db_path() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("payment-dues").join("dues.db"))
        .unwrap_or_else(|| PathBuf::from("payment_dues.db"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_db_path_names_database_file() {
        let path = default_db_path();
        let name = path.file_name().and_then(|name| name.to_str());
        assert!(matches!(name, Some("dues.db") | Some("payment_dues.db")));
    }
}
