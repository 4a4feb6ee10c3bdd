pub mod catalog;
pub mod health;
pub mod import;
pub mod inquiries;
pub mod quotes;
pub mod vendors;

use axum::routing::get;
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /quotes                              list, create
/// /quotes/batch                        commit imported quotes (POST)
/// /quotes/search                       search by criteria (POST)
/// /quotes/compare                      side-by-side comparison
/// /quotes/migrate-vendor-ids           link legacy quotes to vendors (POST)
/// /quotes/{id}                         get, update, delete
/// /quotes/{id}/line-items              line items of a quote
///
/// /vendors                             list, create
/// /vendors/{id}                        get, update, delete
/// /vendors/{id}/contacts               contacts of a vendor
///
/// /custom-fields                       list, create
/// /custom-fields/vendor/{vendor_type}  definitions for one vendor type
/// /custom-fields/{id}                  get, update, delete
///
/// /fee-types                           list, create
/// /fee-types/{id}                      update
///
/// /inquiries                           history
/// /inquiries/preview                   compose subject and body (POST)
/// /inquiries/send                      record and send (POST)
/// /inquiries/{id}                      get with recipients
///
/// /import/template                     CSV template download
/// /import/csv                          CSV preview (POST)
/// /import/email                        pasted email preview (POST)
///
/// /dashboard                           summary figures
/// /currencies                          conversion rate table
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/quotes", quotes::router())
        .nest("/vendors", vendors::router())
        .nest("/custom-fields", catalog::custom_fields_router())
        .nest("/fee-types", catalog::fee_types_router())
        .nest("/inquiries", inquiries::router())
        .nest("/import", import::router())
        .route("/dashboard", get(handlers::dashboard::get_dashboard))
        .route("/currencies", get(handlers::currencies::list_currencies))
}
