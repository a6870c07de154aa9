//! Docs library: document id -> rendered page, with an mtime-keyed cache.
//!
//! Guides live as markdown files under `<docs_dir>/guides/`; the welcome
//! page is `<docs_dir>/welcome.md`. Rendered pages are cached per path and
//! re-rendered only when the file's modification time changes.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use dashmap::DashMap;
use walkdir::WalkDir;

use agora_types::error::RenderError;

use crate::markdown::{render_markdown, RenderedPage};

/// Renders and caches the site's markdown documents.
pub struct DocsLibrary {
    docs_dir: PathBuf,
    cache: DashMap<PathBuf, CachedPage>,
}

struct CachedPage {
    rendered: Arc<RenderedPage>,
    modified: SystemTime,
}

/// A document id is a single safe path segment: no separators, no dots.
pub fn valid_doc_id(id: &str) -> bool {
    !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

fn is_fresh(cached: SystemTime, current: SystemTime) -> bool {
    cached == current
}

impl DocsLibrary {
    pub fn new(docs_dir: impl Into<PathBuf>) -> Self {
        Self {
            docs_dir: docs_dir.into(),
            cache: DashMap::new(),
        }
    }

    pub fn guides_dir(&self) -> PathBuf {
        self.docs_dir.join("guides")
    }

    /// Render the guide with the given id.
    ///
    /// Returns `Ok(None)` for unknown documents and for ids that fail
    /// validation -- an invalid id is "not found", never a path lookup.
    pub async fn render(&self, id: &str) -> Result<Option<Arc<RenderedPage>>, RenderError> {
        if !valid_doc_id(id) {
            return Ok(None);
        }
        self.render_file(self.guides_dir().join(format!("{id}.md")))
            .await
    }

    /// Render the welcome page shown on the home route.
    pub async fn render_welcome(&self) -> Result<Option<Arc<RenderedPage>>, RenderError> {
        self.render_file(self.docs_dir.join("welcome.md")).await
    }

    async fn render_file(&self, path: PathBuf) -> Result<Option<Arc<RenderedPage>>, RenderError> {
        let metadata = match tokio::fs::metadata(&path).await {
            Ok(metadata) => metadata,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        let modified = metadata.modified()?;

        if let Some(entry) = self.cache.get(&path) {
            if is_fresh(entry.modified, modified) {
                return Ok(Some(entry.rendered.clone()));
            }
        }

        let source = tokio::fs::read_to_string(&path).await?;
        let rendered = Arc::new(render_markdown(&source));
        tracing::debug!(path = %path.display(), "rendered markdown page");
        self.cache.insert(
            path,
            CachedPage {
                rendered: rendered.clone(),
                modified,
            },
        );
        Ok(Some(rendered))
    }

    /// Ids of every published guide, sorted, sidebar fragments excluded.
    pub fn list_guides(&self) -> Vec<String> {
        let mut ids: Vec<String> = WalkDir::new(self.guides_dir())
            .max_depth(1)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .filter_map(|entry| {
                let name = entry.file_name().to_str()?;
                let id = name.strip_suffix(".md")?;
                if id.to_lowercase().contains("sidebar") {
                    None
                } else {
                    Some(id.to_string())
                }
            })
            .collect();
        ids.sort();
        ids
    }

    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }
}

impl std::fmt::Debug for DocsLibrary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocsLibrary")
            .field("docs_dir", &self.docs_dir)
            .field("cached_pages", &self.cache.len())
            .finish()
    }
}
