//! Route definitions for quote import previews.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::import;
use crate::state::AppState;

/// Import routes mounted at `/import`.
///
/// ```text
/// GET    /template   -> download_template
/// POST   /csv        -> preview_csv
/// POST   /email      -> preview_email
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/template", get(import::download_template))
        .route("/csv", post(import::preview_csv))
        .route("/email", post(import::preview_email))
}
