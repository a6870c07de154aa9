//! Sitemap endpoint.

use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;

use agora_render::sitemap;

use crate::http::error::AppError;
use crate::state::AppState;

/// GET /sitemap.xml - Static sitemap, generated once per process.
pub async fn sitemap(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let xml = match state.sitemap.get() {
        Some(cached) => cached.clone(),
        None => {
            let generated = sitemap::generate(&state.config.base_url, &state.config.docs_dir)?;
            state.sitemap.get_or_init(|| generated).clone()
        }
    };

    Ok(([(header::CONTENT_TYPE, "application/xml")], xml))
}
