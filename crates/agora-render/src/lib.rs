//! Rendering collaborators for the Agora demo site.
//!
//! Markdown-to-HTML rendering with a table of contents, the docs library
//! (document id -> cached rendered page), and sitemap XML generation.

pub mod docs;
pub mod markdown;
pub mod sitemap;
