//! Handlers for composing, sending and reviewing price inquiries.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use quotedesk_core::inquiry::{compose_content, recipient_email, InquiryForm};
use quotedesk_core::naming::{keys_to_camel, keys_to_snake};
use quotedesk_core::types::DbId;
use quotedesk_db::models::inquiry::{CreateInquiry, Inquiry, NewRecipient, SendInquiry, SentStatus};
use quotedesk_db::repositories::{InquiryRepo, VendorRepo};
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn present(mut inquiry: Inquiry) -> Inquiry {
    inquiry.inquiry_data = keys_to_camel(std::mem::take(&mut inquiry.inquiry_data));
    inquiry
}

// ---------------------------------------------------------------------------
// Preview
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct InquiryPreview {
    pub subject: String,
    pub content: String,
}

/// POST /api/v1/inquiries/preview
///
/// Compose the subject and body for the form without storing anything.
pub async fn preview_inquiry(Json(form): Json<InquiryForm>) -> AppResult<impl IntoResponse> {
    let content = compose_content(&form)?;
    Ok(Json(DataResponse {
        data: InquiryPreview {
            subject: form.subject_or_default(),
            content,
        },
    }))
}

// ---------------------------------------------------------------------------
// Send
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct RecipientSummary {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendInquiryResponse {
    pub success: bool,
    pub inquiry_id: DbId,
    pub sent_to: usize,
    pub recipients: Vec<RecipientSummary>,
    pub message: String,
}

/// POST /api/v1/inquiries/send
///
/// Each selected vendor of the form's vendor type is addressed at its primary
/// contact's email, or the first contact that has one; vendors without any
/// email are skipped. The inquiry is recorded with one row per recipient
/// before any mail goes out. With SMTP each row then records whether its
/// mail was delivered; without it the recipients are only logged.
pub async fn send_inquiry(
    State(state): State<AppState>,
    Json(input): Json<SendInquiry>,
) -> AppResult<impl IntoResponse> {
    if input.vendor_ids.is_empty() {
        return Err(AppError::BadRequest("Invalid vendor IDs".into()));
    }

    let form = &input.inquiry_data;
    let vendor_type = form.target()?;

    let vendors = VendorRepo::find_by_ids(&state.pool, &input.vendor_ids).await?;
    let targets: Vec<(DbId, String, String)> = vendors
        .iter()
        .filter(|v| vendor_type.map_or(true, |vt| v.vendor.vendor_type == vt))
        .filter_map(|v| {
            recipient_email(&v.contacts)
                .map(|email| (v.vendor.id, v.vendor.name.clone(), email.to_string()))
        })
        .collect();

    if targets.is_empty() {
        return Err(AppError::BadRequest(
            "No vendors with valid email addresses found".into(),
        ));
    }

    let subject = non_blank(input.subject.as_deref())
        .map(str::to_string)
        .unwrap_or_else(|| form.subject_or_default());
    let content = match non_blank(input.content.as_deref()) {
        Some(content) => content.to_string(),
        None => compose_content(form)?,
    };

    let inquiry_data = serde_json::to_value(form)
        .map_err(|e| AppError::InternalError(format!("Failed to encode inquiry form: {e}")))?;

    // With SMTP the rows stay pending until delivery is known.
    let (initial_status, initial_sent_at) = match &state.mailer {
        Some(_) => (SentStatus::Pending, None),
        None => (SentStatus::Sent, Some(Utc::now())),
    };
    let recipients: Vec<NewRecipient> = targets
        .into_iter()
        .map(|(vendor_id, vendor_name, email)| NewRecipient {
            vendor_id,
            vendor_name,
            email,
            sent_status: initial_status,
            sent_at: initial_sent_at,
        })
        .collect();

    let mut detail = InquiryRepo::create(
        &state.pool,
        &CreateInquiry {
            subject,
            content,
            inquiry_data: keys_to_snake(inquiry_data),
        },
        &recipients,
    )
    .await?;

    match &state.mailer {
        Some(mailer) => {
            let sends = detail.recipients.iter().map(|r| {
                mailer.send(&r.email, &detail.inquiry.subject, &detail.inquiry.content)
            });
            let results = futures::future::join_all(sends).await;
            let outcomes: Vec<(DbId, SentStatus)> = detail
                .recipients
                .iter()
                .zip(results)
                .map(|(recipient, result)| match result {
                    Ok(()) => (recipient.id, SentStatus::Sent),
                    Err(e) => {
                        tracing::warn!(
                            inquiry_id = detail.inquiry.id,
                            email = %recipient.email,
                            error = %e,
                            "Inquiry email failed",
                        );
                        (recipient.id, SentStatus::Failed)
                    }
                })
                .collect();
            detail.recipients =
                InquiryRepo::record_delivery(&state.pool, &outcomes, Utc::now()).await?;
        }
        None => {
            for recipient in &detail.recipients {
                tracing::info!(
                    inquiry_id = detail.inquiry.id,
                    vendor = %recipient.vendor_name,
                    email = %recipient.email,
                    "Inquiry recipient (not mailed)",
                );
            }
        }
    }

    let sent_to = detail
        .recipients
        .iter()
        .filter(|r| r.sent_status == SentStatus::Sent.as_str())
        .count();
    let failed = detail.recipients.len() - sent_to;
    let message = match (&state.mailer, failed) {
        (None, _) => "Inquiry logged successfully. Configure SMTP to email vendors.".to_string(),
        (Some(_), 0) => format!("Inquiry sent to {sent_to} vendors"),
        (Some(_), failed) => format!("Inquiry sent to {sent_to} vendors, {failed} failed"),
    };

    tracing::info!(
        inquiry_id = detail.inquiry.id,
        sent_to,
        failed,
        "Inquiry recorded",
    );

    Ok(Json(SendInquiryResponse {
        success: true,
        inquiry_id: detail.inquiry.id,
        sent_to,
        recipients: detail
            .recipients
            .into_iter()
            .map(|r| RecipientSummary {
                name: r.vendor_name,
                email: r.email,
            })
            .collect(),
        message,
    }))
}

// ---------------------------------------------------------------------------
// History
// ---------------------------------------------------------------------------

/// GET /api/v1/inquiries
pub async fn list_inquiries(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let inquiries: Vec<Inquiry> = InquiryRepo::list(&state.pool)
        .await?
        .into_iter()
        .map(present)
        .collect();
    Ok(Json(DataResponse { data: inquiries }))
}

/// GET /api/v1/inquiries/{id}
pub async fn get_inquiry(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let mut detail = InquiryRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::not_found("Inquiry", id))?;
    detail.inquiry = present(detail.inquiry);
    Ok(Json(DataResponse { data: detail }))
}
