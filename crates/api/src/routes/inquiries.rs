//! Route definitions for price inquiries.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::inquiries;
use crate::state::AppState;

/// Inquiry routes mounted at `/inquiries`.
///
/// ```text
/// GET    /           -> list_inquiries
/// POST   /preview    -> preview_inquiry
/// POST   /send       -> send_inquiry
/// GET    /{id}       -> get_inquiry
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(inquiries::list_inquiries))
        .route("/preview", post(inquiries::preview_inquiry))
        .route("/send", post(inquiries::send_inquiry))
        .route("/{id}", get(inquiries::get_inquiry))
}
