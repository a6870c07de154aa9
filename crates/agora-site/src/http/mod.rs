//! HTTP layer for the Agora site.
//!
//! Axum-based routes for the rendered pages, the sitemap, static assets,
//! and the chat WebSocket endpoint.

pub mod error;
pub mod handlers;
pub mod router;
