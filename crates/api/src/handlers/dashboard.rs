//! Dashboard summary handler.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use quotedesk_core::dashboard::summarize;
use quotedesk_db::repositories::{QuoteRepo, VendorRepo};

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/dashboard
///
/// Quote validity counts, expiring quotes, average price, vendor counts, type
/// distribution and top vendors, computed over every stored quote.
pub async fn get_dashboard(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let (quotes, vendor_created_at) = futures::try_join!(
        QuoteRepo::list(&state.pool),
        VendorRepo::list_created_at(&state.pool),
    )?;

    let summary = summarize(&quotes, &vendor_created_at, Utc::now());
    Ok(Json(DataResponse { data: summary }))
}
