//! Inquiry and inquiry recipient models.

use quotedesk_core::types::{DbId, Timestamp};
use quotedesk_core::inquiry::InquiryForm;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `inquiries` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Inquiry {
    pub id: DbId,
    pub subject: String,
    pub content: String,
    /// The submitted form, stored with snake_case keys.
    pub inquiry_data: serde_json::Value,
    pub created_at: Timestamp,
}

/// A row from the `inquiry_vendors` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InquiryRecipient {
    pub id: DbId,
    pub inquiry_id: DbId,
    pub vendor_id: Option<DbId>,
    pub vendor_name: String,
    pub email: String,
    pub sent_status: String,
    pub sent_at: Option<Timestamp>,
}

/// An inquiry with every vendor it was addressed to.
#[derive(Debug, Clone, Serialize)]
pub struct InquiryDetail {
    #[serde(flatten)]
    pub inquiry: Inquiry,
    pub recipients: Vec<InquiryRecipient>,
}

/// Delivery state of one recipient. Rows start `Pending` while mail is in
/// flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SentStatus {
    Pending,
    Sent,
    Failed,
}

impl SentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Sent => "sent",
            Self::Failed => "failed",
        }
    }
}

/// Insert payload for an inquiry.
#[derive(Debug, Clone)]
pub struct CreateInquiry {
    pub subject: String,
    pub content: String,
    pub inquiry_data: serde_json::Value,
}

/// Insert payload for one recipient row.
#[derive(Debug, Clone)]
pub struct NewRecipient {
    pub vendor_id: DbId,
    pub vendor_name: String,
    pub email: String,
    pub sent_status: SentStatus,
    pub sent_at: Option<Timestamp>,
}

/// Body of `POST /inquiries/send`.
///
/// `content` is the (possibly edited) preview; when absent the body is
/// composed from `inquiry_data`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendInquiry {
    #[serde(default)]
    pub vendor_ids: Vec<DbId>,
    pub subject: Option<String>,
    pub content: Option<String>,
    #[serde(default)]
    pub inquiry_data: InquiryForm,
}
