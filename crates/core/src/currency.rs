//! Fixed-rate currency conversion.
//!
//! All comparisons and dashboard figures are expressed in the base currency
//! (TWD). Rates are static; there is no live rate source.

use std::collections::BTreeSet;

use serde::Serialize;

// ---------------------------------------------------------------------------
// Rate table
// ---------------------------------------------------------------------------

/// The currency every total is converted into.
pub const BASE_CURRENCY: &str = "TWD";

/// Currency reported as `base_currency` on a quote whose line items mix
/// several currencies.
pub const MIXED_CURRENCY_FALLBACK: &str = "USD";

/// Currency assumed for imported quotes that do not name one.
pub const DEFAULT_IMPORT_CURRENCY: &str = "USD";

/// `(code, units of TWD per unit, symbol)`.
const RATES: [(&str, f64, &str); 4] = [
    ("TWD", 1.0, "NT$"),
    ("USD", 31.0, "$"),
    ("CNY", 4.3, "¥"),
    ("EUR", 33.5, "€"),
];

/// One row of the public rate table.
#[derive(Debug, Clone, Serialize)]
pub struct RateEntry {
    pub code: &'static str,
    pub rate: f64,
    pub symbol: &'static str,
}

/// The full rate table, base currency first.
pub fn rate_table() -> Vec<RateEntry> {
    RATES
        .iter()
        .map(|&(code, rate, symbol)| RateEntry { code, rate, symbol })
        .collect()
}

/// Whether `code` is one of the supported currencies.
pub fn is_supported(code: &str) -> bool {
    RATES.iter().any(|(c, _, _)| *c == code)
}

fn rate_of(code: &str) -> Option<f64> {
    RATES.iter().find(|(c, _, _)| *c == code).map(|(_, r, _)| *r)
}

// ---------------------------------------------------------------------------
// Conversion
// ---------------------------------------------------------------------------

/// Convert `amount` in `currency` to the base currency.
///
/// Unknown currencies are treated as already being in the base currency.
pub fn convert_to_base(amount: f64, currency: &str) -> f64 {
    match rate_of(currency) {
        Some(rate) => amount * rate,
        None => {
            tracing::warn!(currency, "Unknown currency, using rate 1.0");
            amount
        }
    }
}

/// Convert a base-currency amount into `target`.
pub fn convert_from_base(amount_base: f64, target: &str) -> f64 {
    match rate_of(target) {
        Some(rate) => amount_base / rate,
        None => {
            tracing::warn!(currency = target, "Unknown currency, using rate 1.0");
            amount_base
        }
    }
}

/// Display symbol for a currency code; unknown codes are returned unchanged.
pub fn currency_symbol(code: &str) -> &str {
    RATES
        .iter()
        .find(|(c, _, _)| *c == code)
        .map(|(_, _, s)| *s)
        .unwrap_or(code)
}

// ---------------------------------------------------------------------------
// Line item totals
// ---------------------------------------------------------------------------

/// Anything that carries a cost in some currency.
pub trait CostLine {
    fn cost(&self) -> f64;
    fn currency(&self) -> &str;
}

impl CostLine for (f64, &str) {
    fn cost(&self) -> f64 {
        self.0
    }

    fn currency(&self) -> &str {
        self.1
    }
}

/// Sum heterogeneous line items into one base-currency total.
pub fn total_in_base<L: CostLine>(items: &[L]) -> f64 {
    items
        .iter()
        .map(|item| convert_to_base(item.cost(), item.currency()))
        .sum()
}

/// The total persisted on the quote row alongside its line items.
///
/// `total` is the unconverted sum of costs. `base_currency` is the shared
/// currency when all items agree, otherwise [`MIXED_CURRENCY_FALLBACK`].
pub fn stored_total<L: CostLine>(items: &[L]) -> (f64, String) {
    let total = items.iter().map(CostLine::cost).sum();
    let currencies: BTreeSet<&str> = items.iter().map(CostLine::currency).collect();
    let base = if currencies.len() == 1 {
        currencies
            .into_iter()
            .next()
            .unwrap_or(MIXED_CURRENCY_FALLBACK)
            .to_string()
    } else {
        MIXED_CURRENCY_FALLBACK.to_string()
    };
    (total, base)
}
