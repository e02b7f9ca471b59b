//! Server configuration

use std::net::SocketAddr;
use std::path::PathBuf;

use crate::sqlite::SqliteConfig;

/// Configuration for the run server
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address the HTTP listener binds to
    pub bind: SocketAddr,
    /// Database holding the runs
    pub database: SqliteConfig,
    /// JSON document loaded into an empty store at startup
    pub seed_file: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 8080)),
            database: SqliteConfig::default(),
            seed_file: None,
        }
    }
}
