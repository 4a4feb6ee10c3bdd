//! Shared query parameter types for API handlers.

use quotedesk_core::quote_query::{blank_as_none, CompareSort, QuoteFilter, SortOrder};
use serde::Deserialize;

/// Query parameters for list endpoints that support an `includeInactive` flag.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncludeInactiveParams {
    #[serde(default)]
    pub include_inactive: bool,
}

/// `GET /quotes/compare` parameters: the quote filter plus ordering.
///
/// The filter fields mirror [`QuoteFilter`].
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompareParams {
    pub vendor_type: Option<String>,
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub container_size: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub min_price: Option<f64>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub max_price: Option<f64>,
    #[serde(alias = "search")]
    pub search_term: Option<String>,
    #[serde(default)]
    pub sort_by: CompareSort,
    #[serde(default)]
    pub order: SortOrder,
}

impl CompareParams {
    pub fn filter(&self) -> QuoteFilter {
        QuoteFilter {
            vendor_type: self.vendor_type.clone(),
            origin: self.origin.clone(),
            destination: self.destination.clone(),
            container_size: self.container_size.clone(),
            min_price: self.min_price,
            max_price: self.max_price,
            search_term: self.search_term.clone(),
        }
    }
}
