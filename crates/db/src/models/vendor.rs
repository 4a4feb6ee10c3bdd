//! Vendor entity model and DTOs.

use quotedesk_core::quote_query::VendorView;
use quotedesk_core::types::{DbId, Timestamp};
use quotedesk_core::vendor_type::VendorType;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::models::vendor_contact::{ContactInput, VendorContact};

/// Rating given to vendors created without one.
pub const DEFAULT_RATING: f64 = 5.0;

/// A row from the `vendors` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Vendor {
    pub id: DbId,
    pub name: String,
    #[serde(rename = "type")]
    #[sqlx(try_from = "String")]
    pub vendor_type: VendorType,
    pub address: Option<String>,
    pub rating: f64,
    pub notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A vendor with its contacts, as returned by the API.
#[derive(Debug, Clone, Serialize)]
pub struct VendorDetail {
    #[serde(flatten)]
    pub vendor: Vendor,
    pub contacts: Vec<VendorContact>,
}

impl VendorView for VendorDetail {
    fn name(&self) -> &str {
        &self.vendor.name
    }

    fn vendor_type(&self) -> VendorType {
        self.vendor.vendor_type
    }

    fn rating(&self) -> f64 {
        self.vendor.rating
    }

    fn contact_terms(&self) -> Vec<&str> {
        self.contacts
            .iter()
            .flat_map(|c| {
                [Some(c.name.as_str()), c.email.as_deref(), c.phone.as_deref()]
                    .into_iter()
                    .flatten()
            })
            .collect()
    }
}

/// DTO for creating a vendor.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateVendor {
    #[validate(required, length(min = 1))]
    pub name: Option<String>,
    #[serde(rename = "type")]
    #[validate(required)]
    pub vendor_type: Option<VendorType>,
    pub address: Option<String>,
    #[validate(range(min = 0.0, max = 5.0))]
    pub rating: Option<f64>,
    pub notes: Option<String>,
    #[serde(default)]
    #[validate(nested)]
    pub contacts: Vec<ContactInput>,
}

/// DTO for updating a vendor. All fields are optional; when `contacts` is
/// present the stored contacts are replaced.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateVendor {
    #[validate(length(min = 1))]
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub vendor_type: Option<VendorType>,
    pub address: Option<String>,
    #[validate(range(min = 0.0, max = 5.0))]
    pub rating: Option<f64>,
    pub notes: Option<String>,
    #[validate(nested)]
    pub contacts: Option<Vec<ContactInput>>,
}
