//! Quote entity model and DTOs.

use chrono::NaiveDate;
use quotedesk_core::currency::total_in_base;
use quotedesk_core::quote_query::{blank_as_none, QuoteView};
use quotedesk_core::quote_rules::{LineItemDraft, QuoteHeaderDraft};
use quotedesk_core::types::{DbId, Timestamp};
use quotedesk_core::vendor_type::VendorType;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::line_item::{LineItem, LineItemInput};

/// A row from the `quotes` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub id: DbId,
    pub vendor_id: Option<DbId>,
    pub vendor_name: String,
    #[sqlx(try_from = "String")]
    pub vendor_type: VendorType,
    pub valid_until: NaiveDate,
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub carrier: Option<String>,
    pub transit_time: Option<String>,
    pub container_size: Option<String>,
    pub pickup_location: Option<String>,
    pub delivery_location: Option<String>,
    pub truck_type: Option<String>,
    pub customs_type: Option<String>,
    pub product_category: Option<String>,
    pub notes: Option<String>,
    pub custom_fields: serde_json::Value,
    pub inquiry_id: Option<DbId>,
    /// Unconverted sum of line item costs.
    pub total_cost_display: f64,
    pub base_currency: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A quote with its ordered line items, as returned by the API.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteDetail {
    #[serde(flatten)]
    pub quote: Quote,
    pub line_items: Vec<LineItem>,
}

impl QuoteView for QuoteDetail {
    fn vendor_type(&self) -> VendorType {
        self.quote.vendor_type
    }

    fn vendor_name(&self) -> &str {
        &self.quote.vendor_name
    }

    fn origin(&self) -> Option<&str> {
        self.quote.origin.as_deref()
    }

    fn destination(&self) -> Option<&str> {
        self.quote.destination.as_deref()
    }

    fn container_size(&self) -> Option<&str> {
        self.quote.container_size.as_deref()
    }

    fn notes(&self) -> Option<&str> {
        self.quote.notes.as_deref()
    }

    fn valid_until(&self) -> NaiveDate {
        self.quote.valid_until
    }

    fn base_total(&self) -> f64 {
        total_in_base(&self.line_items)
    }
}

/// DTO for creating a quote. Required fields are checked by
/// `quote_rules::validate_new_quote` before the insert.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateQuote {
    pub vendor_id: Option<DbId>,
    pub vendor_name: Option<String>,
    pub vendor_type: Option<VendorType>,
    pub valid_until: Option<NaiveDate>,
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub carrier: Option<String>,
    pub transit_time: Option<String>,
    pub container_size: Option<String>,
    pub pickup_location: Option<String>,
    pub delivery_location: Option<String>,
    pub truck_type: Option<String>,
    pub customs_type: Option<String>,
    pub product_category: Option<String>,
    pub notes: Option<String>,
    pub custom_fields: Option<serde_json::Value>,
    pub inquiry_id: Option<DbId>,
    #[serde(default)]
    pub line_items: Vec<LineItemInput>,
}

impl CreateQuote {
    pub fn header(&self) -> QuoteHeaderDraft<'_> {
        QuoteHeaderDraft {
            vendor_id: self.vendor_id,
            vendor_name: self.vendor_name.as_deref(),
            valid_until: self.valid_until,
        }
    }

    pub fn item_drafts(&self) -> Vec<LineItemDraft<'_>> {
        self.line_items.iter().map(LineItemInput::draft).collect()
    }
}

/// DTO for updating a quote. All fields are optional; when `line_items` is
/// present the stored items are replaced wholesale.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateQuote {
    pub vendor_id: Option<DbId>,
    pub vendor_name: Option<String>,
    pub vendor_type: Option<VendorType>,
    pub valid_until: Option<NaiveDate>,
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub carrier: Option<String>,
    pub transit_time: Option<String>,
    pub container_size: Option<String>,
    pub pickup_location: Option<String>,
    pub delivery_location: Option<String>,
    pub truck_type: Option<String>,
    pub customs_type: Option<String>,
    pub product_category: Option<String>,
    pub notes: Option<String>,
    pub custom_fields: Option<serde_json::Value>,
    pub inquiry_id: Option<DbId>,
    pub line_items: Option<Vec<LineItemInput>>,
}

/// Column-level criteria for `POST /quotes/search`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteSearch {
    /// A vendor type or `all`.
    pub vendor_type: Option<String>,
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub container_size: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub min_price: Option<f64>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub max_price: Option<f64>,
}

// ---------------------------------------------------------------------------
// Batch import
// ---------------------------------------------------------------------------

/// Description given to the single line item of an imported quote.
pub const IMPORTED_ITEM_DESCRIPTION: &str = "匯入報價";

/// One entry of `POST /quotes/batch`, as produced by the CSV and email
/// import previews. Every field is optional so that one bad entry does not
/// reject the whole batch.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchQuote {
    pub vendor_id: Option<DbId>,
    pub vendor_name: Option<String>,
    pub vendor_type: Option<String>,
    /// A number or a numeric string.
    pub price: Option<serde_json::Value>,
    pub currency: Option<String>,
    pub valid_until: Option<String>,
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub carrier: Option<String>,
    pub transit_time: Option<String>,
    pub container_size: Option<String>,
    pub pickup_location: Option<String>,
    pub delivery_location: Option<String>,
    pub truck_type: Option<String>,
    pub customs_type: Option<String>,
    pub product_category: Option<String>,
    pub notes: Option<String>,
    pub custom_fields: Option<serde_json::Value>,
}

/// Body of `POST /quotes/batch`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BatchCreateQuotes {
    #[serde(default)]
    pub quotes: Vec<BatchQuote>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_price(value: &serde_json::Value) -> Option<f64> {
    let price = match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().replace(',', "").parse().ok(),
        _ => None,
    }?;
    (price.is_finite() && price > 0.0).then_some(price)
}

impl BatchQuote {
    /// Turn the entry into a quote with one line item carrying its price.
    ///
    /// Returns `None` when vendor name, vendor type, price, currency or
    /// validity date is missing or unusable.
    pub fn into_create(self) -> Option<CreateQuote> {
        let vendor_name = non_blank(self.vendor_name)?;
        let vendor_type: VendorType = non_blank(self.vendor_type)?.to_lowercase().parse().ok()?;
        let price = self.price.as_ref().and_then(parse_price)?;
        let currency = non_blank(self.currency)?.to_uppercase();
        let valid_until = non_blank(self.valid_until)
            .and_then(|d| NaiveDate::parse_from_str(&d.replace('/', "-"), "%Y-%m-%d").ok())?;

        Some(CreateQuote {
            vendor_id: self.vendor_id,
            vendor_name: Some(vendor_name),
            vendor_type: Some(vendor_type),
            valid_until: Some(valid_until),
            origin: non_blank(self.origin),
            destination: non_blank(self.destination),
            carrier: non_blank(self.carrier),
            transit_time: non_blank(self.transit_time),
            container_size: non_blank(self.container_size),
            pickup_location: non_blank(self.pickup_location),
            delivery_location: non_blank(self.delivery_location),
            truck_type: non_blank(self.truck_type),
            customs_type: non_blank(self.customs_type),
            product_category: non_blank(self.product_category),
            notes: non_blank(self.notes),
            custom_fields: self.custom_fields,
            inquiry_id: None,
            line_items: vec![LineItemInput {
                fee_type_id: None,
                description: Some(IMPORTED_ITEM_DESCRIPTION.to_string()),
                cost: Some(price),
                currency: Some(currency),
                remarks: None,
            }],
        })
    }
}
