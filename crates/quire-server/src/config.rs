//! Server configuration for Quire.
//!
//! Loads configuration from environment variables with sensible defaults.
//! All settings can be overridden via `QUIRE_*` environment variables.

use std::net::SocketAddr;
use std::path::PathBuf;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind the HTTP listener to.
    pub bind_addr: SocketAddr,
    /// Directory holding one file per document.
    pub documents_dir: PathBuf,
    /// Path of the credentials file (username → password hash).
    pub credentials_path: PathBuf,
    /// Session time-to-live in seconds.
    pub session_ttl_secs: i64,
    /// Seconds between expired-session sweeps.
    pub session_sweep_interval_secs: u64,
    /// Log level filter (e.g., `info`, `debug`, `warn`).
    pub log_level: String,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `PORT` — port to bind on (binds to `0.0.0.0`)
    /// - `QUIRE_BIND_ADDR` — full bind address (overrides `PORT`, default: `127.0.0.1:8300`)
    /// - `QUIRE_DATA_DIR` — documents directory (default: `./data`)
    /// - `QUIRE_CREDENTIALS_FILE` — credentials file path (default: `./users.json`)
    /// - `QUIRE_SESSION_TTL` — session lifetime in seconds (default: `3600`)
    /// - `QUIRE_SWEEP_INTERVAL` — seconds between session sweeps (default: `300`)
    /// - `QUIRE_LOG_LEVEL` — log filter (default: `info`)
    #[must_use]
    pub fn from_env() -> Self {
        // Priority: QUIRE_BIND_ADDR > PORT > default 127.0.0.1:8300
        let bind_addr = if let Ok(addr) = std::env::var("QUIRE_BIND_ADDR") {
            addr.parse()
                .unwrap_or_else(|_| SocketAddr::from(([127, 0, 0, 1], 8300)))
        } else if let Ok(port_str) = std::env::var("PORT") {
            let port: u16 = port_str.parse().unwrap_or(8300);
            SocketAddr::from(([0, 0, 0, 0], port))
        } else {
            SocketAddr::from(([127, 0, 0, 1], 8300))
        };

        let documents_dir = std::env::var("QUIRE_DATA_DIR")
            .map_or_else(|_| PathBuf::from("./data"), PathBuf::from);

        let credentials_path = std::env::var("QUIRE_CREDENTIALS_FILE")
            .map_or_else(|_| PathBuf::from("./users.json"), PathBuf::from);

        let session_ttl_secs = std::env::var("QUIRE_SESSION_TTL")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(3600);

        let session_sweep_interval_secs = std::env::var("QUIRE_SWEEP_INTERVAL")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(300);

        let log_level = std::env::var("QUIRE_LOG_LEVEL").unwrap_or_else(|_| "info".to_owned());

        Self {
            bind_addr,
            documents_dir,
            credentials_path,
            session_ttl_secs,
            session_sweep_interval_secs,
            log_level,
        }
    }
}
