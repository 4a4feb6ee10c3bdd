//! Currency rate table handler.

use axum::response::IntoResponse;
use axum::Json;
use quotedesk_core::currency::{rate_table, RateEntry, BASE_CURRENCY};
use serde::Serialize;

use crate::response::DataResponse;

#[derive(Debug, Serialize)]
pub struct CurrencyTable {
    pub base: &'static str,
    pub rates: Vec<RateEntry>,
}

/// GET /api/v1/currencies
///
/// The fixed conversion rates, in units of the base currency.
pub async fn list_currencies() -> impl IntoResponse {
    Json(DataResponse {
        data: CurrencyTable {
            base: BASE_CURRENCY,
            rates: rate_table(),
        },
    })
}
