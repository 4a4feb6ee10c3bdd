//! Handlers for vendors and their contacts.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use quotedesk_core::error::CoreError;
use quotedesk_core::form_validation::from_validator;
use quotedesk_core::quote_query::VendorListQuery;
use quotedesk_core::types::DbId;
use quotedesk_db::models::vendor::{CreateVendor, UpdateVendor};
use quotedesk_db::models::vendor_contact::ContactInput;
use quotedesk_db::repositories::VendorRepo;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::response::{DataResponse, SuccessResponse};
use crate::state::AppState;

/// Run derive-based validation and report failures with localized messages.
pub(crate) fn validate_input<T: Validate>(input: &T) -> Result<(), CoreError> {
    match input.validate() {
        Ok(()) => Ok(()),
        Err(errors) => from_validator(&errors).into_result(),
    }
}

fn normalize_contacts(contacts: &mut [ContactInput]) {
    for contact in contacts {
        contact.normalize();
    }
}

fn trim(value: &mut Option<String>) {
    if let Some(v) = value {
        *v = v.trim().to_string();
    }
}

/// GET /api/v1/vendors
///
/// Supports `?search=&type=&sort=name|type|rating&dir=asc|desc`.
pub async fn list_vendors(
    State(state): State<AppState>,
    Query(params): Query<VendorListQuery>,
) -> AppResult<impl IntoResponse> {
    let vendors = VendorRepo::list(&state.pool).await?;
    Ok(Json(DataResponse {
        data: params.apply(vendors),
    }))
}

/// POST /api/v1/vendors
pub async fn create_vendor(
    State(state): State<AppState>,
    Json(mut input): Json<CreateVendor>,
) -> AppResult<impl IntoResponse> {
    trim(&mut input.name);
    normalize_contacts(&mut input.contacts);
    validate_input(&input)?;

    let vendor = VendorRepo::create(&state.pool, &input).await?;

    tracing::info!(
        vendor_id = vendor.vendor.id,
        name = %vendor.vendor.name,
        contacts = vendor.contacts.len(),
        "Vendor created",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: vendor })))
}

/// GET /api/v1/vendors/{id}
pub async fn get_vendor(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let vendor = VendorRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::not_found("Vendor", id))?;
    Ok(Json(DataResponse { data: vendor }))
}

/// PUT /api/v1/vendors/{id}
///
/// A `contacts` array replaces every stored contact.
pub async fn update_vendor(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(mut input): Json<UpdateVendor>,
) -> AppResult<impl IntoResponse> {
    trim(&mut input.name);
    if let Some(contacts) = input.contacts.as_mut() {
        normalize_contacts(contacts);
    }
    validate_input(&input)?;

    let vendor = VendorRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::not_found("Vendor", id))?;

    tracing::info!(vendor_id = id, "Vendor updated");

    Ok(Json(DataResponse { data: vendor }))
}

/// DELETE /api/v1/vendors/{id}
///
/// Contacts go with the vendor; its quotes keep their vendor name but lose
/// the link.
pub async fn delete_vendor(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if !VendorRepo::delete(&state.pool, id).await? {
        return Err(AppError::not_found("Vendor", id));
    }
    tracing::info!(vendor_id = id, "Vendor deleted");
    Ok(Json(SuccessResponse::ok()))
}

/// GET /api/v1/vendors/{id}/contacts
pub async fn list_contacts(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let vendor = VendorRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::not_found("Vendor", id))?;
    Ok(Json(DataResponse {
        data: vendor.contacts,
    }))
}
