//! Rendered documentation pages.

use askama::Template;
use axum::extract::{Path, State};
use axum::response::Html;

use crate::http::error::AppError;
use crate::state::AppState;

#[derive(Template)]
#[template(path = "guides_index.html")]
struct GuidesIndexTemplate {
    guides: Vec<String>,
}

#[derive(Template)]
#[template(path = "guide.html")]
struct GuideTemplate {
    title: String,
    body: String,
}

/// GET /docs - List of published guides.
pub async fn index(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let template = GuidesIndexTemplate {
        guides: state.docs.list_guides(),
    };
    Ok(Html(template.render()?))
}

/// GET /docs/{id} - One rendered guide, or 404.
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Html<String>, AppError> {
    let Some(page) = state.docs.render(&id).await? else {
        return Err(AppError::NotFound);
    };

    let template = GuideTemplate {
        title: page.title.clone().unwrap_or_else(|| id.clone()),
        body: page.html.clone(),
    };
    Ok(Html(template.render()?))
}
