//! Route definitions for quotes.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::quotes;
use crate::state::AppState;

/// Quote routes mounted at `/quotes`.
///
/// ```text
/// GET    /                     -> list_quotes
/// POST   /                     -> create_quote
/// POST   /batch                -> batch_create_quotes
/// POST   /search               -> search_quotes
/// GET    /compare              -> compare_quotes
/// POST   /migrate-vendor-ids   -> migrate_vendor_ids
/// GET    /{id}                 -> get_quote
/// PUT    /{id}                 -> update_quote
/// DELETE /{id}                 -> delete_quote
/// GET    /{id}/line-items      -> list_line_items
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(quotes::list_quotes).post(quotes::create_quote))
        .route("/batch", post(quotes::batch_create_quotes))
        .route("/search", post(quotes::search_quotes))
        .route("/compare", get(quotes::compare_quotes))
        .route("/migrate-vendor-ids", post(quotes::migrate_vendor_ids))
        .route(
            "/{id}",
            get(quotes::get_quote)
                .put(quotes::update_quote)
                .delete(quotes::delete_quote),
        )
        .route("/{id}/line-items", get(quotes::list_line_items))
}
