//! Site configuration types.
//!
//! `SiteConfig` represents the top-level `agora.toml` that controls the
//! server address, document directories, and the visitor simulator.
//! All fields have sensible defaults so the site runs with no config file.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Top-level configuration for the Agora demo site.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    #[serde(default)]
    pub server: ServerConfig,

    /// Absolute base URL used in generated sitemap entries.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Directory holding `welcome.md` and the `guides/` subdirectory.
    #[serde(default = "default_docs_dir")]
    pub docs_dir: PathBuf,

    /// Directory of static assets served at the site root.
    #[serde(default = "default_public_dir")]
    pub public_dir: PathBuf,

    #[serde(default)]
    pub visitors: VisitorConfig,
}

/// Listen address for the HTTP server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

/// Settings for the synthetic visitor simulator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisitorConfig {
    /// Whether the simulator spawns bots at all.
    #[serde(default = "default_visitors_enabled")]
    pub enabled: bool,

    /// Seconds between bot spawns.
    #[serde(default = "default_spawn_interval_secs")]
    pub spawn_interval_secs: u64,

    /// Lower bound of the randomized pause before each bot post.
    #[serde(default = "default_pause_min_ms")]
    pub pause_min_ms: u64,

    /// Upper bound of the randomized pause before each bot post.
    #[serde(default = "default_pause_max_ms")]
    pub pause_max_ms: u64,

    /// Probability that a bot leaves after any given post.
    ///
    /// Must stay strictly above zero so every bot terminates almost surely.
    /// The default is 3/7.
    #[serde(default = "default_stop_probability")]
    pub stop_probability: f64,
}

fn default_base_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_docs_dir() -> PathBuf {
    PathBuf::from("docs")
}

fn default_public_dir() -> PathBuf {
    PathBuf::from("public")
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_visitors_enabled() -> bool {
    true
}

fn default_spawn_interval_secs() -> u64 {
    16
}

fn default_pause_min_ms() -> u64 {
    1600
}

fn default_pause_max_ms() -> u64 {
    3200
}

fn default_stop_probability() -> f64 {
    3.0 / 7.0
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            base_url: default_base_url(),
            docs_dir: default_docs_dir(),
            public_dir: default_public_dir(),
            visitors: VisitorConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for VisitorConfig {
    fn default() -> Self {
        Self {
            enabled: default_visitors_enabled(),
            spawn_interval_secs: default_spawn_interval_secs(),
            pause_min_ms: default_pause_min_ms(),
            pause_max_ms: default_pause_max_ms(),
            stop_probability: default_stop_probability(),
        }
    }
}
