//! Sitemap XML generation.
//!
//! Produces a static `<urlset>` listing: the site root first, then one entry
//! per published guide with its file modification date. Guides whose name
//! contains "basics" are ranked slightly higher, mirroring the docs landing
//! flow. The site caches the generated document for the process lifetime.

use std::path::Path;
use std::time::SystemTime;

use chrono::{DateTime, Utc};
use walkdir::WalkDir;

use agora_types::error::RenderError;

/// Generate the sitemap XML for the site rooted at `base_url`.
pub fn generate(base_url: &str, docs_dir: &Path) -> Result<String, RenderError> {
    let base = base_url.trim_end_matches('/');

    let mut xml = String::new();
    xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    xml.push_str("<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n");

    // Site root, dated by the welcome page when it exists.
    let welcome_modified = std::fs::metadata(docs_dir.join("welcome.md"))
        .and_then(|m| m.modified())
        .ok();
    push_url(&mut xml, base, welcome_modified, "1.0");

    for entry in WalkDir::new(docs_dir.join("guides"))
        .max_depth(1)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
    {
        let Some(name) = entry.file_name().to_str() else {
            continue;
        };
        let Some(id) = name.strip_suffix(".md") else {
            continue;
        };
        if id.to_lowercase().contains("sidebar") {
            continue;
        }

        let modified = entry.metadata().ok().and_then(|m| m.modified().ok());
        let priority = if id.to_lowercase().contains("basics") {
            "0.9"
        } else {
            "0.8"
        };
        push_url(&mut xml, &format!("{base}/docs/{id}"), modified, priority);
    }

    xml.push_str("</urlset>\n");
    Ok(xml)
}

fn push_url(xml: &mut String, loc: &str, modified: Option<SystemTime>, priority: &str) {
    xml.push_str(" <url>\n");
    xml.push_str(&format!("  <loc>{loc}</loc>\n"));
    if let Some(modified) = modified {
        xml.push_str(&format!("  <lastmod>{}</lastmod>\n", format_lastmod(modified)));
    }
    xml.push_str(&format!("  <priority>{priority}</priority>\n"));
    xml.push_str(" </url>\n");
}

fn format_lastmod(modified: SystemTime) -> String {
    DateTime::<Utc>::from(modified).format("%Y-%m-%d").to_string()
}
