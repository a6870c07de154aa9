//! Site configuration loader.
//!
//! Reads `agora.toml` from the given path and deserializes it into
//! [`SiteConfig`]. Falls back to defaults when the file is missing or
//! malformed -- the demo must come up with no config at all.

use std::path::Path;

use agora_types::config::SiteConfig;

/// Load the site configuration from `path`.
///
/// - Missing file: returns [`SiteConfig::default()`] silently.
/// - Unreadable or unparsable file: logs a warning and returns the default.
pub async fn load_site_config(path: &Path) -> SiteConfig {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("no config at {}, using defaults", path.display());
            return SiteConfig::default();
        }
        Err(err) => {
            tracing::warn!("failed to read {}: {err}, using defaults", path.display());
            return SiteConfig::default();
        }
    };

    match toml::from_str::<SiteConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!("failed to parse {}: {err}, using defaults", path.display());
            SiteConfig::default()
        }
    }
}
