//! Handlers for the fee type catalog.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use quotedesk_core::error::CoreError;
use quotedesk_core::quote_rules::normalize_fee_type_name;
use quotedesk_core::types::DbId;
use quotedesk_core::vendor_type::FeeCategory;
use quotedesk_db::models::fee_type::{CreateFeeType, UpdateFeeType};
use quotedesk_db::repositories::FeeTypeRepo;

use crate::error::{AppError, AppResult};
use crate::query::IncludeInactiveParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/fee-types
///
/// Active fee types by name; `?includeInactive=true` lists all of them.
pub async fn list_fee_types(
    State(state): State<AppState>,
    Query(params): Query<IncludeInactiveParams>,
) -> AppResult<impl IntoResponse> {
    let fee_types = FeeTypeRepo::list(&state.pool, params.include_inactive).await?;
    Ok(Json(DataResponse { data: fee_types }))
}

/// POST /api/v1/fee-types
pub async fn create_fee_type(
    State(state): State<AppState>,
    Json(input): Json<CreateFeeType>,
) -> AppResult<impl IntoResponse> {
    let name = normalize_fee_type_name(input.name.as_deref())?;
    let category: FeeCategory = input
        .category
        .as_deref()
        .ok_or_else(|| CoreError::Validation("Missing required fields (name, category)".into()))?
        .parse()?;
    let description = input
        .description
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty());

    let fee_type = FeeTypeRepo::create(&state.pool, &name, category, description).await?;

    tracing::info!(fee_type_id = fee_type.id, name = %fee_type.name, "Fee type created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: fee_type })))
}

/// PUT /api/v1/fee-types/{id}
///
/// Rename, describe or toggle a fee type. Fee types are never deleted;
/// deactivating hides them from the default list.
pub async fn update_fee_type(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(mut input): Json<UpdateFeeType>,
) -> AppResult<impl IntoResponse> {
    if input.name.is_some() {
        input.name = Some(normalize_fee_type_name(input.name.as_deref())?);
    }

    let fee_type = FeeTypeRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::not_found("Fee type", id))?;

    tracing::info!(fee_type_id = id, is_active = fee_type.is_active, "Fee type updated");

    Ok(Json(DataResponse { data: fee_type }))
}
