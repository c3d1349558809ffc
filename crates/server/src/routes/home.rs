//! Customer management page.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use tracing::instrument;

use crate::state::AppState;

/// The single page: add form plus customer table, filled in by `customers.js`.
#[derive(Template, WebTemplate)]
#[template(path = "index.html")]
pub struct HomeTemplate {
    /// Whether the sheet backend is configured; an unconfigured server shows a notice.
    pub configured: bool,
    pub sheet_name: String,
}

/// Render the page shell. Customer data is loaded client-side.
#[instrument(skip(state))]
pub async fn home(State(state): State<AppState>) -> HomeTemplate {
    HomeTemplate {
        configured: state.customers().is_configured(),
        sheet_name: state.sheet_name().to_owned(),
    }
}
