//! Fee type model and DTOs.

use quotedesk_core::types::{DbId, Timestamp};
use quotedesk_core::vendor_type::FeeCategory;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `fee_types` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeType {
    pub id: DbId,
    pub name: String,
    #[sqlx(try_from = "String")]
    pub category: FeeCategory,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a fee type. `category` is the Chinese label and is
/// parsed into [`FeeCategory`] by the handler.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFeeType {
    pub name: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
}

/// DTO for updating a fee type. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFeeType {
    pub name: Option<String>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
}
