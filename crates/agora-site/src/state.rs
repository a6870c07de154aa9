//! Application state shared by all HTTP handlers.
//!
//! One bus, one registry, one docs library -- constructed once at startup
//! and passed around by handle, never reached through globals.

use std::sync::{Arc, OnceLock};

use agora_core::bus::ChannelBus;
use agora_core::registry::ConnectionRegistry;
use agora_render::docs::DocsLibrary;
use agora_types::config::SiteConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<SiteConfig>,
    pub bus: Arc<ChannelBus>,
    pub registry: Arc<ConnectionRegistry>,
    pub docs: Arc<DocsLibrary>,
    /// Sitemap XML, generated on first request and kept for the process
    /// lifetime.
    pub sitemap: Arc<OnceLock<String>>,
}

impl AppState {
    pub fn new(config: SiteConfig) -> Self {
        let docs = Arc::new(DocsLibrary::new(config.docs_dir.clone()));
        Self {
            config: Arc::new(config),
            bus: Arc::new(ChannelBus::new()),
            registry: Arc::new(ConnectionRegistry::new()),
            docs,
            sitemap: Arc::new(OnceLock::new()),
        }
    }
}
