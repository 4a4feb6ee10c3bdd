//! Vendor contact model and input DTO.

use quotedesk_core::inquiry::ContactView;
use quotedesk_core::types::DbId;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `vendor_contacts` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorContact {
    pub id: DbId,
    pub vendor_id: DbId,
    pub name: String,
    pub title: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub is_primary: bool,
    #[serde(rename = "order")]
    pub display_order: i32,
}

impl ContactView for VendorContact {
    fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    fn is_primary(&self) -> bool {
        self.is_primary
    }
}

/// A contact as submitted with a vendor. Contacts are always written as a
/// full set for their vendor.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ContactInput {
    #[serde(default)]
    pub name: String,
    pub title: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub phone: Option<String>,
    #[serde(default)]
    pub is_primary: bool,
}

impl ContactInput {
    /// Trim text and turn blank optional values into `None`.
    pub fn normalize(&mut self) {
        self.name = self.name.trim().to_string();
        for field in [&mut self.title, &mut self.email, &mut self.phone] {
            *field = field
                .take()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty());
        }
    }
}
