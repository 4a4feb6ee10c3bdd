//! Handlers for quotes and their line items.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use quotedesk_core::error::CoreError;
use quotedesk_core::form_validation::{FieldErrors, ValidityIssue};
use quotedesk_core::quote_query::{compare, sort_by_base_total, QuoteFilter};
use quotedesk_core::quote_rules::{validate_custom_values, validate_line_items, validate_new_quote};
use quotedesk_core::types::DbId;
use quotedesk_core::vendor_type::VendorType;
use quotedesk_db::models::custom_field::CustomField;
use quotedesk_db::models::line_item::LineItemInput;
use quotedesk_db::models::quote::{
    BatchCreateQuotes, CreateQuote, QuoteDetail, QuoteSearch, UpdateQuote,
};
use quotedesk_db::repositories::{CustomFieldRepo, QuoteRepo};
use quotedesk_db::DbPool;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::query::CompareParams;
use crate::response::{DataResponse, SuccessResponse};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn require_vendor_type(vendor_type: Option<VendorType>) -> Result<VendorType, CoreError> {
    vendor_type.ok_or_else(|| {
        let mut errors = FieldErrors::new();
        errors.push("vendorType", ValidityIssue::ValueMissing);
        CoreError::Validation(errors.to_string())
    })
}

/// Check custom field values against the definitions for `vendor_type`.
async fn check_custom_values(
    pool: &DbPool,
    vendor_type: VendorType,
    values: Option<&serde_json::Value>,
) -> AppResult<()> {
    let definitions = CustomFieldRepo::list_by_vendor_type(pool, vendor_type).await?;
    let rules: Vec<_> = definitions.iter().map(CustomField::rule).collect();
    validate_custom_values(&rules, values.unwrap_or(&serde_json::Value::Null))?;
    Ok(())
}

fn item_drafts(items: &[LineItemInput]) -> Vec<quotedesk_core::quote_rules::LineItemDraft<'_>> {
    items.iter().map(LineItemInput::draft).collect()
}

// ---------------------------------------------------------------------------
// CRUD
// ---------------------------------------------------------------------------

/// GET /api/v1/quotes
///
/// All quotes, lowest stored total first, narrowed by the optional filter
/// query.
pub async fn list_quotes(
    State(state): State<AppState>,
    Query(filter): Query<QuoteFilter>,
) -> AppResult<impl IntoResponse> {
    let quotes = QuoteRepo::list(&state.pool).await?;
    Ok(Json(DataResponse {
        data: filter.apply(quotes),
    }))
}

/// POST /api/v1/quotes
pub async fn create_quote(
    State(state): State<AppState>,
    Json(input): Json<CreateQuote>,
) -> AppResult<impl IntoResponse> {
    let vendor_type = require_vendor_type(input.vendor_type)?;
    validate_new_quote(&input.header(), &input.item_drafts())?;
    check_custom_values(&state.pool, vendor_type, input.custom_fields.as_ref()).await?;

    let quote = QuoteRepo::create(&state.pool, &input).await?;

    tracing::info!(
        quote_id = quote.quote.id,
        vendor = %quote.quote.vendor_name,
        line_items = quote.line_items.len(),
        "Quote created",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: quote })))
}

/// GET /api/v1/quotes/{id}
pub async fn get_quote(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let quote = QuoteRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::not_found("Quote", id))?;
    Ok(Json(DataResponse { data: quote }))
}

/// PUT /api/v1/quotes/{id}
///
/// Partial update. A `lineItems` array replaces every stored item.
pub async fn update_quote(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateQuote>,
) -> AppResult<impl IntoResponse> {
    let existing = QuoteRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::not_found("Quote", id))?;

    if let Some(name) = &input.vendor_name {
        let mut errors = FieldErrors::new();
        errors.require_text("vendorName", Some(name));
        errors.into_result()?;
    }
    if let Some(items) = &input.line_items {
        validate_line_items(&item_drafts(items))?;
    }
    if input.custom_fields.is_some() {
        let vendor_type = input.vendor_type.unwrap_or(existing.quote.vendor_type);
        check_custom_values(&state.pool, vendor_type, input.custom_fields.as_ref()).await?;
    }

    let quote = QuoteRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::not_found("Quote", id))?;

    tracing::info!(quote_id = id, "Quote updated");

    Ok(Json(DataResponse { data: quote }))
}

/// DELETE /api/v1/quotes/{id}
pub async fn delete_quote(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if !QuoteRepo::delete(&state.pool, id).await? {
        return Err(AppError::not_found("Quote", id));
    }
    tracing::info!(quote_id = id, "Quote deleted");
    Ok(Json(SuccessResponse::ok()))
}

/// GET /api/v1/quotes/{id}/line-items
pub async fn list_line_items(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let quote = QuoteRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::not_found("Quote", id))?;
    Ok(Json(DataResponse {
        data: quote.line_items,
    }))
}

// ---------------------------------------------------------------------------
// Batch, search, compare
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct BatchCreateResponse {
    pub success: bool,
    pub created: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
    pub quotes: Vec<QuoteDetail>,
}

/// POST /api/v1/quotes/batch
///
/// Commit imported quotes. Incomplete entries are skipped and reported; the
/// rest are stored in one transaction.
pub async fn batch_create_quotes(
    State(state): State<AppState>,
    Json(input): Json<BatchCreateQuotes>,
) -> AppResult<impl IntoResponse> {
    if input.quotes.is_empty() {
        return Err(AppError::BadRequest("Invalid quotes array".into()));
    }

    let mut errors = Vec::new();
    let mut creates: Vec<CreateQuote> = Vec::with_capacity(input.quotes.len());
    for (index, entry) in input.quotes.into_iter().enumerate() {
        match entry.into_create() {
            Some(create) => creates.push(create),
            None => errors.push(format!("Quote {}: Missing required fields", index + 1)),
        }
    }

    let quotes = QuoteRepo::create_many(&state.pool, &creates).await?;

    tracing::info!(
        created = quotes.len(),
        skipped = errors.len(),
        "Batch created quotes",
    );

    Ok((
        StatusCode::CREATED,
        Json(BatchCreateResponse {
            success: true,
            created: quotes.len(),
            errors: (!errors.is_empty()).then_some(errors),
            quotes,
        }),
    ))
}

/// POST /api/v1/quotes/search
///
/// Column criteria run in SQL. Price bounds and ordering use the
/// base-currency total, cheapest first.
pub async fn search_quotes(
    State(state): State<AppState>,
    Json(criteria): Json<QuoteSearch>,
) -> AppResult<impl IntoResponse> {
    let vendor_type = VendorType::parse_filter(criteria.vendor_type.as_deref().unwrap_or("all"))?;
    let quotes = QuoteRepo::search(&state.pool, vendor_type, &criteria).await?;

    let price_bounds = QuoteFilter {
        min_price: criteria.min_price,
        max_price: criteria.max_price,
        ..Default::default()
    };
    let mut quotes = price_bounds.apply(quotes);
    sort_by_base_total(&mut quotes);

    tracing::debug!(found = quotes.len(), "Quote search");

    Ok(Json(DataResponse { data: quotes }))
}

/// GET /api/v1/quotes/compare
pub async fn compare_quotes(
    State(state): State<AppState>,
    Query(params): Query<CompareParams>,
) -> AppResult<impl IntoResponse> {
    let quotes = QuoteRepo::list(&state.pool).await?;
    let selected = params.filter().apply(quotes);
    Ok(Json(DataResponse {
        data: compare(selected, params.sort_by, params.order),
    }))
}

#[derive(Debug, Serialize)]
pub struct MigrateVendorIdsResponse {
    pub success: bool,
    pub migrated: u64,
    pub total: i64,
}

/// POST /api/v1/quotes/migrate-vendor-ids
///
/// Link quotes without a vendor id to the vendor of the same name and type.
pub async fn migrate_vendor_ids(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let report = QuoteRepo::migrate_vendor_ids(&state.pool).await?;

    tracing::info!(
        migrated = report.migrated,
        total = report.total,
        "Linked quotes to vendors",
    );

    Ok(Json(MigrateVendorIdsResponse {
        success: true,
        migrated: report.migrated,
        total: report.total,
    }))
}
