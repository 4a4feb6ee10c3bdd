//! Quote line item model and input DTO.

use quotedesk_core::currency::CostLine;
use quotedesk_core::quote_rules::LineItemDraft;
use quotedesk_core::types::DbId;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `quote_line_items` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    #[serde(rename = "itemId")]
    pub id: DbId,
    pub quote_id: DbId,
    pub fee_type_id: Option<DbId>,
    pub description: String,
    pub cost: f64,
    pub currency: String,
    pub remarks: Option<String>,
    #[serde(rename = "order")]
    pub display_order: i32,
}

impl CostLine for LineItem {
    fn cost(&self) -> f64 {
        self.cost
    }

    fn currency(&self) -> &str {
        &self.currency
    }
}

/// A line item as submitted with a quote. Items are always written as a
/// full set; their position in the list becomes `display_order`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItemInput {
    pub fee_type_id: Option<DbId>,
    /// Older clients send the text as `descriptionLegacy`.
    #[serde(alias = "descriptionLegacy", alias = "description_legacy")]
    pub description: Option<String>,
    pub cost: Option<f64>,
    pub currency: Option<String>,
    pub remarks: Option<String>,
}

impl LineItemInput {
    pub fn draft(&self) -> LineItemDraft<'_> {
        LineItemDraft {
            description: self.description.as_deref(),
            cost: self.cost,
            currency: self.currency.as_deref(),
        }
    }
}

impl CostLine for LineItemInput {
    fn cost(&self) -> f64 {
        self.cost.unwrap_or_default()
    }

    fn currency(&self) -> &str {
        self.currency.as_deref().unwrap_or_default()
    }
}
