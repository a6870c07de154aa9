//! Home page: rendered welcome document plus the live chat widget.

use askama::Template;
use axum::extract::State;
use axum::response::Html;

use crate::http::error::AppError;
use crate::state::AppState;

#[derive(Template)]
#[template(path = "home.html")]
struct HomeTemplate {
    welcome_html: String,
    online_count: usize,
}

/// GET / - Welcome page with the chat widget.
pub async fn index(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let welcome_html = state
        .docs
        .render_welcome()
        .await?
        .map(|page| page.html.clone())
        .unwrap_or_else(|| "<h1>Welcome to Agora</h1>".to_string());

    let template = HomeTemplate {
        welcome_html,
        online_count: state.registry.online_count(),
    };
    Ok(Html(template.render()?))
}
