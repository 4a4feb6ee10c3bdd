//! Handlers for the quote import flow: template download and previews.
//!
//! Previews never store anything; the client commits the accepted quotes
//! through `POST /quotes/batch`.

use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use quotedesk_core::import::{csv_template, parse_csv, parse_email};
use serde::Deserialize;

use crate::response::DataResponse;

/// Request body carrying pasted or uploaded text.
#[derive(Debug, Deserialize)]
pub struct ImportText {
    #[serde(default)]
    pub text: String,
}

/// GET /api/v1/import/template
///
/// The CSV template, with a UTF-8 byte order mark so spreadsheet programs
/// detect the encoding.
pub async fn download_template() -> impl IntoResponse {
    (
        [
            (CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                CONTENT_DISPOSITION,
                "attachment; filename=\"quote_import_template.csv\"",
            ),
        ],
        format!("\u{feff}{}", csv_template()),
    )
}

/// POST /api/v1/import/csv
pub async fn preview_csv(Json(input): Json<ImportText>) -> impl IntoResponse {
    let preview = parse_csv(&input.text);
    tracing::info!(
        quotes = preview.quotes.len(),
        errors = preview.errors.len(),
        "CSV import preview",
    );
    Json(DataResponse { data: preview })
}

/// POST /api/v1/import/email
pub async fn preview_email(Json(input): Json<ImportText>) -> impl IntoResponse {
    let preview = parse_email(&input.text, Utc::now().date_naive());
    tracing::info!(
        quotes = preview.quotes.len(),
        errors = preview.errors.len(),
        "Email import preview",
    );
    Json(DataResponse { data: preview })
}
