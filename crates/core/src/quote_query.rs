//! Filtering, comparison and sorting over quote and vendor lists.
//!
//! Persistence types plug in through [`QuoteView`] and [`VendorView`].

use std::cmp::Ordering;

use chrono::NaiveDate;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};

use crate::vendor_type::VendorType;

// ---------------------------------------------------------------------------
// Views
// ---------------------------------------------------------------------------

/// Read access to the quote attributes used for filtering and aggregation.
pub trait QuoteView {
    fn vendor_type(&self) -> VendorType;
    fn vendor_name(&self) -> &str;
    fn origin(&self) -> Option<&str>;
    fn destination(&self) -> Option<&str>;
    fn container_size(&self) -> Option<&str>;
    fn notes(&self) -> Option<&str>;
    fn valid_until(&self) -> NaiveDate;
    /// Sum of the line items converted to the base currency.
    fn base_total(&self) -> f64;
}

/// Read access to the vendor attributes used for filtering and sorting.
pub trait VendorView {
    fn name(&self) -> &str;
    fn vendor_type(&self) -> VendorType;
    fn rating(&self) -> f64;
    /// Every searchable contact string (names, emails, phones).
    fn contact_terms(&self) -> Vec<&str>;
}

fn contains_ci(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Deserialize an optional amount given as a number or a numeric string.
///
/// A blank string (`?minPrice=`) means no bound.
pub fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Amount {
        Number(f64),
        Text(String),
    }

    match Option::<Amount>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Amount::Number(n)) => Ok(Some(n)),
        Some(Amount::Text(raw)) => {
            let raw = raw.trim();
            if raw.is_empty() {
                return Ok(None);
            }
            raw.parse()
                .map(Some)
                .map_err(|_| de::Error::custom(format!("invalid amount '{raw}'")))
        }
    }
}

// ---------------------------------------------------------------------------
// Quote filter
// ---------------------------------------------------------------------------

/// Quote list filter (`?vendorType=&origin=&...`). Blank values are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteFilter {
    /// `shipping`, `trucking`, `customs`, or `all`.
    pub vendor_type: Option<String>,
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub container_size: Option<String>,
    /// Minimum base-currency total.
    #[serde(default, deserialize_with = "blank_as_none")]
    pub min_price: Option<f64>,
    /// Maximum base-currency total.
    #[serde(default, deserialize_with = "blank_as_none")]
    pub max_price: Option<f64>,
    #[serde(alias = "search")]
    pub search_term: Option<String>,
}

impl QuoteFilter {
    /// Whether any criterion is set.
    pub fn is_active(&self) -> bool {
        self.vendor_type_filter().is_some()
            || non_blank(&self.origin).is_some()
            || non_blank(&self.destination).is_some()
            || non_blank(&self.container_size).is_some()
            || self.min_price.is_some()
            || self.max_price.is_some()
            || non_blank(&self.search_term).is_some()
    }

    /// Parsed vendor type; unknown values are treated as `all`.
    fn vendor_type_filter(&self) -> Option<VendorType> {
        self.vendor_type
            .as_deref()
            .and_then(|v| VendorType::parse_filter(v).ok().flatten())
    }

    pub fn matches<Q: QuoteView>(&self, quote: &Q) -> bool {
        if let Some(vt) = self.vendor_type_filter() {
            if quote.vendor_type() != vt {
                return false;
            }
        }
        // Location filters only apply when the quote has the attribute.
        if let (Some(wanted), Some(have)) = (non_blank(&self.origin), quote.origin()) {
            if !contains_ci(have, &wanted.to_lowercase()) {
                return false;
            }
        }
        if let (Some(wanted), Some(have)) = (non_blank(&self.destination), quote.destination()) {
            if !contains_ci(have, &wanted.to_lowercase()) {
                return false;
            }
        }
        if let Some(size) = non_blank(&self.container_size) {
            if quote.container_size() != Some(size) {
                return false;
            }
        }

        let total = quote.base_total();
        if self.min_price.is_some_and(|min| total < min) {
            return false;
        }
        if self.max_price.is_some_and(|max| total > max) {
            return false;
        }

        if let Some(term) = non_blank(&self.search_term) {
            let needle = term.to_lowercase();
            return contains_ci(quote.vendor_name(), &needle)
                || quote.origin().is_some_and(|s| contains_ci(s, &needle))
                || quote.destination().is_some_and(|s| contains_ci(s, &needle))
                || quote.notes().is_some_and(|s| contains_ci(s, &needle));
        }
        true
    }

    pub fn apply<Q: QuoteView>(&self, quotes: Vec<Q>) -> Vec<Q> {
        quotes.into_iter().filter(|q| self.matches(q)).collect()
    }
}

// ---------------------------------------------------------------------------
// Comparison
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CompareSort {
    #[default]
    Price,
    ValidUntil,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Asc => ordering,
            Self::Desc => ordering.reverse(),
        }
    }
}

/// A quote together with its base-currency total.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparedQuote<Q> {
    #[serde(flatten)]
    pub quote: Q,
    pub total_base: f64,
}

/// Min / average / max of base-currency totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PriceStats {
    pub min: f64,
    pub avg: f64,
    pub max: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Comparison<Q> {
    pub stats: PriceStats,
    pub quotes: Vec<ComparedQuote<Q>>,
}

/// Order quotes cheapest first by base-currency total. Equal totals keep
/// their incoming order.
pub fn sort_by_base_total<Q: QuoteView>(quotes: &mut [Q]) {
    quotes.sort_by(|a, b| a.base_total().total_cmp(&b.base_total()));
}

/// Price statistics over a set of totals. All zero for an empty set.
pub fn price_stats(totals: &[f64]) -> PriceStats {
    if totals.is_empty() {
        return PriceStats::default();
    }
    let min = totals.iter().copied().fold(f64::INFINITY, f64::min);
    let max = totals.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let avg = totals.iter().sum::<f64>() / totals.len() as f64;
    PriceStats { min, avg, max }
}

/// Rank quotes side by side by base-currency total or by validity date.
pub fn compare<Q: QuoteView>(quotes: Vec<Q>, sort_by: CompareSort, order: SortOrder) -> Comparison<Q> {
    let mut entries: Vec<ComparedQuote<Q>> = quotes
        .into_iter()
        .map(|quote| {
            let total_base = quote.base_total();
            ComparedQuote { quote, total_base }
        })
        .collect();

    entries.sort_by(|a, b| {
        let ordering = match sort_by {
            CompareSort::Price => a.total_base.total_cmp(&b.total_base),
            CompareSort::ValidUntil => a.quote.valid_until().cmp(&b.quote.valid_until()),
        };
        order.apply(ordering)
    });

    let totals: Vec<f64> = entries.iter().map(|e| e.total_base).collect();
    Comparison {
        stats: price_stats(&totals),
        quotes: entries,
    }
}

// ---------------------------------------------------------------------------
// Vendor list
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VendorSort {
    #[default]
    Name,
    Type,
    Rating,
}

/// Vendor list query (`?search=&type=&sort=&dir=`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VendorListQuery {
    pub search: Option<String>,
    #[serde(rename = "type")]
    pub vendor_type: Option<String>,
    #[serde(default)]
    pub sort: VendorSort,
    #[serde(default)]
    pub dir: SortOrder,
}

impl VendorListQuery {
    pub fn matches<V: VendorView>(&self, vendor: &V) -> bool {
        let type_filter = self
            .vendor_type
            .as_deref()
            .and_then(|v| VendorType::parse_filter(v).ok().flatten());
        if type_filter.is_some_and(|vt| vendor.vendor_type() != vt) {
            return false;
        }
        match non_blank(&self.search) {
            None => true,
            Some(term) => {
                let needle = term.to_lowercase();
                contains_ci(vendor.name(), &needle)
                    || vendor
                        .contact_terms()
                        .into_iter()
                        .any(|t| contains_ci(t, &needle))
            }
        }
    }

    /// Filter then sort.
    pub fn apply<V: VendorView>(&self, vendors: Vec<V>) -> Vec<V> {
        let mut kept: Vec<V> = vendors.into_iter().filter(|v| self.matches(v)).collect();
        kept.sort_by(|a, b| {
            let ordering = match self.sort {
                VendorSort::Name => a.name().to_lowercase().cmp(&b.name().to_lowercase()),
                VendorSort::Type => a.vendor_type().as_str().cmp(b.vendor_type().as_str()),
                VendorSort::Rating => a.rating().total_cmp(&b.rating()),
            };
            self.dir.apply(ordering)
        });
        kept
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Serialize)]
    struct Q {
        vt: VendorType,
        name: &'static str,
        origin: Option<&'static str>,
        destination: Option<&'static str>,
        size: Option<&'static str>,
        notes: Option<&'static str>,
        valid: NaiveDate,
        total: f64,
    }

    impl QuoteView for Q {
        fn vendor_type(&self) -> VendorType {
            self.vt
        }
        fn vendor_name(&self) -> &str {
            self.name
        }
        fn origin(&self) -> Option<&str> {
            self.origin
        }
        fn destination(&self) -> Option<&str> {
            self.destination
        }
        fn container_size(&self) -> Option<&str> {
            self.size
        }
        fn notes(&self) -> Option<&str> {
            self.notes
        }
        fn valid_until(&self) -> NaiveDate {
            self.valid
        }
        fn base_total(&self) -> f64 {
            self.total
        }
    }

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, d).unwrap()
    }

    fn sample() -> Vec<Q> {
        vec![
            Q {
                vt: VendorType::Shipping,
                name: "Evergreen",
                origin: Some("Keelung Port"),
                destination: Some("Ningbo Port"),
                size: Some("40HQ"),
                notes: None,
                valid: date(20),
                total: 37_200.0,
            },
            Q {
                vt: VendorType::Trucking,
                name: "Taiwan Trucking",
                origin: None,
                destination: None,
                size: None,
                notes: Some("24h service"),
                valid: date(10),
                total: 3_500.0,
            },
            Q {
                vt: VendorType::Shipping,
                name: "Yang Ming",
                origin: Some("Kaohsiung Port"),
                destination: Some("Ningbo Port"),
                size: Some("20GP"),
                notes: None,
                valid: date(15),
                total: 20_000.0,
            },
        ]
    }

    #[test]
    fn empty_filter_keeps_everything() {
        let filter = QuoteFilter::default();
        assert!(!filter.is_active());
        assert_eq!(filter.apply(sample()).len(), 3);
    }

    #[test]
    fn blank_price_bounds_are_ignored() {
        let filter: QuoteFilter =
            serde_json::from_value(serde_json::json!({"minPrice": "", "maxPrice": " 5000 "}))
                .unwrap();
        assert_eq!(filter.min_price, None);
        assert_eq!(filter.max_price, Some(5000.0));

        let filter: QuoteFilter =
            serde_json::from_value(serde_json::json!({"minPrice": 100})).unwrap();
        assert_eq!(filter.min_price, Some(100.0));

        let bad = serde_json::from_value::<QuoteFilter>(serde_json::json!({"minPrice": "cheap"}));
        assert!(bad.is_err());
    }

    #[test]
    fn base_total_sort_is_stable() {
        let mut quotes = sample();
        quotes[2].total = 37_200.0;
        sort_by_base_total(&mut quotes);
        let names: Vec<_> = quotes.iter().map(|q| q.name).collect();
        assert_eq!(names, vec!["Taiwan Trucking", "Evergreen", "Yang Ming"]);
    }

    #[test]
    fn vendor_type_all_is_no_filter() {
        let filter = QuoteFilter {
            vendor_type: Some("all".into()),
            ..Default::default()
        };
        assert_eq!(filter.apply(sample()).len(), 3);
    }

    #[test]
    fn origin_filter_skips_quotes_without_origin() {
        let filter = QuoteFilter {
            origin: Some("keelung".into()),
            ..Default::default()
        };
        let names: Vec<_> = filter.apply(sample()).iter().map(|q| q.name).collect();
        // Trucking quote has no origin and is therefore not excluded.
        assert_eq!(names, vec!["Evergreen", "Taiwan Trucking"]);
    }

    #[test]
    fn price_bounds_use_base_total() {
        let filter = QuoteFilter {
            min_price: Some(10_000.0),
            max_price: Some(30_000.0),
            ..Default::default()
        };
        let names: Vec<_> = filter.apply(sample()).iter().map(|q| q.name).collect();
        assert_eq!(names, vec!["Yang Ming"]);
    }

    #[test]
    fn search_term_checks_notes() {
        let filter = QuoteFilter {
            search_term: Some("24H".into()),
            ..Default::default()
        };
        let names: Vec<_> = filter.apply(sample()).iter().map(|q| q.name).collect();
        assert_eq!(names, vec!["Taiwan Trucking"]);
    }

    #[test]
    fn container_size_is_exact() {
        let filter = QuoteFilter {
            container_size: Some("40HQ".into()),
            ..Default::default()
        };
        assert_eq!(filter.apply(sample()).len(), 1);
    }

    #[test]
    fn compare_by_price_ascending() {
        let cmp = compare(sample(), CompareSort::Price, SortOrder::Asc);
        let names: Vec<_> = cmp.quotes.iter().map(|c| c.quote.name).collect();
        assert_eq!(names, vec!["Taiwan Trucking", "Yang Ming", "Evergreen"]);
        assert_eq!(cmp.stats.min, 3_500.0);
        assert_eq!(cmp.stats.max, 37_200.0);
        assert!((cmp.stats.avg - 20_233.333_333).abs() < 1e-3);
    }

    #[test]
    fn compare_by_validity_descending() {
        let cmp = compare(sample(), CompareSort::ValidUntil, SortOrder::Desc);
        let names: Vec<_> = cmp.quotes.iter().map(|c| c.quote.name).collect();
        assert_eq!(names, vec!["Evergreen", "Yang Ming", "Taiwan Trucking"]);
    }

    #[test]
    fn compare_empty_is_all_zero() {
        let cmp = compare(Vec::<Q>::new(), CompareSort::Price, SortOrder::Asc);
        assert_eq!(cmp.stats, PriceStats::default());
        assert!(cmp.quotes.is_empty());
    }

    struct V {
        name: &'static str,
        vt: VendorType,
        rating: f64,
        contacts: Vec<&'static str>,
    }

    impl VendorView for V {
        fn name(&self) -> &str {
            self.name
        }
        fn vendor_type(&self) -> VendorType {
            self.vt
        }
        fn rating(&self) -> f64 {
            self.rating
        }
        fn contact_terms(&self) -> Vec<&str> {
            self.contacts.clone()
        }
    }

    fn vendors() -> Vec<V> {
        vec![
            V {
                name: "beta Logistics",
                vt: VendorType::Trucking,
                rating: 4.0,
                contacts: vec!["Chen", "chen@beta.tw"],
            },
            V {
                name: "Alpha Lines",
                vt: VendorType::Shipping,
                rating: 4.5,
                contacts: vec!["Lin", "02-1234"],
            },
        ]
    }

    #[test]
    fn vendor_search_covers_contacts() {
        let query = VendorListQuery {
            search: Some("BETA.TW".into()),
            ..Default::default()
        };
        let kept = query.apply(vendors());
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].name, "beta Logistics");
    }

    #[test]
    fn vendor_sort_name_is_case_insensitive() {
        let kept = VendorListQuery::default().apply(vendors());
        assert_eq!(kept[0].name, "Alpha Lines");
    }

    #[test]
    fn vendor_sort_rating_desc() {
        let query = VendorListQuery {
            sort: VendorSort::Rating,
            dir: SortOrder::Desc,
            ..Default::default()
        };
        assert_eq!(query.apply(vendors())[0].rating, 4.5);
    }

    #[test]
    fn vendor_type_filter() {
        let query = VendorListQuery {
            vendor_type: Some("trucking".into()),
            ..Default::default()
        };
        assert_eq!(query.apply(vendors()).len(), 1);
    }
}
