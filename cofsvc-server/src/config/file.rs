//! TOML file configuration structures.
//!
//! These structs directly map to the `cofsvc-config.toml` file format.
//! Every section is optional and falls back to its defaults.

use serde::Deserialize;
use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

/// Root configuration structure as read from the TOML file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub orders: OrdersConfig,
}

/// Server configuration section.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ServerConfig {
    /// The address and port to listen on (e.g., "0.0.0.0:8080").
    #[serde(default = "default_listen_addr")]
    pub listen: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen_addr(),
        }
    }
}

fn default_listen_addr() -> SocketAddr {
    SocketAddr::from((Ipv4Addr::UNSPECIFIED, 8080))
}

/// Where catalog records are stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogBackend {
    #[default]
    Memory,
    /// PostgreSQL; the connection string comes from `DATABASE_URL`.
    Postgres,
}

/// Catalog configuration section.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CatalogConfig {
    #[serde(default)]
    pub backend: CatalogBackend,
    /// Names written to the catalog at startup, each under a fresh id.
    #[serde(default = "default_seed")]
    pub seed: Vec<String>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            backend: CatalogBackend::default(),
            seed: default_seed(),
        }
    }
}

fn default_seed() -> Vec<String> {
    ["A", "B", "C", "D"].map(String::from).to_vec()
}

/// Order stream configuration section.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OrdersConfig {
    /// Milliseconds between two orders of one stream.
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
    /// Seconds between SSE keep-alive comments.
    #[serde(default = "default_keep_alive_secs")]
    pub keep_alive_secs: u64,
}

impl Default for OrdersConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
            keep_alive_secs: default_keep_alive_secs(),
        }
    }
}

impl OrdersConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn keep_alive(&self) -> Duration {
        Duration::from_secs(self.keep_alive_secs)
    }
}

fn default_interval_ms() -> u64 {
    1000
}

fn default_keep_alive_secs() -> u64 {
    15
}
