//! Custom field definition model and DTOs.

use quotedesk_core::quote_rules::CustomFieldRule;
use quotedesk_core::types::{DbId, Timestamp};
use quotedesk_core::vendor_type::{FieldType, VendorType};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `custom_fields` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomField {
    pub id: DbId,
    pub name: String,
    #[sqlx(try_from = "String")]
    pub field_type: FieldType,
    #[sqlx(try_from = "String")]
    pub vendor_type: VendorType,
    pub options: Vec<String>,
    pub is_required: bool,
    #[serde(rename = "order")]
    pub display_order: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl CustomField {
    pub fn rule(&self) -> CustomFieldRule {
        CustomFieldRule {
            id: self.id,
            name: self.name.clone(),
            field_type: self.field_type,
            options: self.options.clone(),
            is_required: self.is_required,
        }
    }
}

/// DTO for creating a custom field. `order` defaults to 1 and `isRequired`
/// to false.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCustomField {
    pub name: Option<String>,
    pub field_type: Option<FieldType>,
    pub vendor_type: Option<VendorType>,
    pub options: Option<Vec<String>>,
    pub is_required: Option<bool>,
    #[serde(rename = "order")]
    pub display_order: Option<i32>,
}

/// DTO for updating a custom field. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCustomField {
    pub name: Option<String>,
    pub field_type: Option<FieldType>,
    pub vendor_type: Option<VendorType>,
    pub options: Option<Vec<String>>,
    pub is_required: Option<bool>,
    #[serde(rename = "order")]
    pub display_order: Option<i32>,
}
