//! Handlers for user-defined custom field definitions.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use quotedesk_core::error::CoreError;
use quotedesk_core::form_validation::FieldErrors;
use quotedesk_core::quote_rules::{validate_field_definition, validate_select_options};
use quotedesk_core::types::DbId;
use quotedesk_core::vendor_type::VendorType;
use quotedesk_db::models::custom_field::{CreateCustomField, UpdateCustomField};
use quotedesk_db::repositories::CustomFieldRepo;

use crate::error::{AppError, AppResult};
use crate::response::{DataResponse, SuccessResponse};
use crate::state::AppState;

/// GET /api/v1/custom-fields
pub async fn list_custom_fields(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let fields = CustomFieldRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: fields }))
}

/// GET /api/v1/custom-fields/vendor/{vendor_type}
pub async fn list_for_vendor_type(
    State(state): State<AppState>,
    Path(vendor_type): Path<String>,
) -> AppResult<impl IntoResponse> {
    let vendor_type: VendorType = vendor_type.parse()?;
    let fields = CustomFieldRepo::list_by_vendor_type(&state.pool, vendor_type).await?;
    Ok(Json(DataResponse { data: fields }))
}

/// GET /api/v1/custom-fields/{id}
pub async fn get_custom_field(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let field = CustomFieldRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::not_found("Custom field", id))?;
    Ok(Json(DataResponse { data: field }))
}

/// POST /api/v1/custom-fields
///
/// `name`, `fieldType` and `vendorType` are required; a `select` field needs
/// at least one option.
pub async fn create_custom_field(
    State(state): State<AppState>,
    Json(input): Json<CreateCustomField>,
) -> AppResult<impl IntoResponse> {
    validate_field_definition(
        input.name.as_deref(),
        input.field_type,
        input.options.as_deref(),
    )?;
    if input.vendor_type.is_none() {
        return Err(AppError::Core(CoreError::Validation(
            "Missing required fields (name, fieldType, vendorType)".into(),
        )));
    }

    let field = CustomFieldRepo::create(&state.pool, &input).await?;

    tracing::info!(field_id = field.id, name = %field.name, "Custom field created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: field })))
}

/// PUT /api/v1/custom-fields/{id}
///
/// The select-options rule is checked against the field as it will be
/// after the update.
pub async fn update_custom_field(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateCustomField>,
) -> AppResult<impl IntoResponse> {
    let existing = CustomFieldRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::not_found("Custom field", id))?;
    if let Some(name) = &input.name {
        let mut errors = FieldErrors::new();
        errors.require_text("name", Some(name));
        errors.into_result()?;
    }
    validate_select_options(
        Some(input.field_type.unwrap_or(existing.field_type)),
        Some(input.options.as_deref().unwrap_or(existing.options.as_slice())),
    )?;

    let field = CustomFieldRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::not_found("Custom field", id))?;

    tracing::info!(field_id = id, "Custom field updated");

    Ok(Json(DataResponse { data: field }))
}

/// DELETE /api/v1/custom-fields/{id}
///
/// Values already stored on quotes are left in place.
pub async fn delete_custom_field(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if !CustomFieldRepo::delete(&state.pool, id).await? {
        return Err(AppError::not_found("Custom field", id));
    }
    tracing::info!(field_id = id, "Custom field deleted");
    Ok(Json(SuccessResponse::ok()))
}
