//! Route definitions for the quote form catalogs: custom fields and fee
//! types.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::{custom_fields, fee_types};
use crate::state::AppState;

/// Custom field routes mounted at `/custom-fields`.
///
/// ```text
/// GET    /                         -> list_custom_fields
/// POST   /                         -> create_custom_field
/// GET    /vendor/{vendor_type}     -> list_for_vendor_type
/// GET    /{id}                     -> get_custom_field
/// PUT    /{id}                     -> update_custom_field
/// DELETE /{id}                     -> delete_custom_field
/// ```
pub fn custom_fields_router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(custom_fields::list_custom_fields).post(custom_fields::create_custom_field),
        )
        .route(
            "/vendor/{vendor_type}",
            get(custom_fields::list_for_vendor_type),
        )
        .route(
            "/{id}",
            get(custom_fields::get_custom_field)
                .put(custom_fields::update_custom_field)
                .delete(custom_fields::delete_custom_field),
        )
}

/// Fee type routes mounted at `/fee-types`.
///
/// ```text
/// GET    /        -> list_fee_types (?includeInactive=true)
/// POST   /        -> create_fee_type
/// PUT    /{id}    -> update_fee_type
/// ```
pub fn fee_types_router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(fee_types::list_fee_types).post(fee_types::create_fee_type),
        )
        .route("/{id}", put(fee_types::update_fee_type))
}
