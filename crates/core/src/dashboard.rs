//! Dashboard aggregation over the full quote and vendor lists.

use std::collections::HashMap;

use chrono::{Months, NaiveTime};
use serde::Serialize;

use crate::quote_query::QuoteView;
use crate::types::Timestamp;
use crate::vendor_type::VendorType;

/// Quotes expiring within this many days are flagged.
pub const EXPIRING_SOON_DAYS: f64 = 7.0;
/// Maximum number of expiring quotes listed.
pub const EXPIRING_SOON_LIMIT: usize = 5;
/// Number of vendors in the top-vendors ranking.
pub const TOP_VENDOR_LIMIT: usize = 5;

const SECS_PER_DAY: f64 = 86_400.0;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeShare {
    pub vendor_type: VendorType,
    pub label: &'static str,
    pub count: usize,
    /// Rounded share of all quotes, 0..=100.
    pub percent: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VendorQuoteCount {
    pub name: String,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpiringQuote<Q> {
    #[serde(flatten)]
    pub quote: Q,
    pub days_until_expiry: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary<Q> {
    pub total_quotes: usize,
    pub valid_quotes: usize,
    pub expired_quotes: usize,
    /// Mean base-currency total per quote.
    pub average_price: f64,
    pub vendor_count: usize,
    pub new_vendors_this_month: usize,
    pub type_distribution: Vec<TypeShare>,
    pub top_vendors: Vec<VendorQuoteCount>,
    pub expiring_soon: Vec<ExpiringQuote<Q>>,
}

/// Fractional days from `now` until the start (UTC) of the quote's
/// validity date. Negative once that moment has passed.
fn days_until(quote_valid_until: chrono::NaiveDate, now: Timestamp) -> f64 {
    let expiry = quote_valid_until.and_time(NaiveTime::MIN).and_utc();
    (expiry - now).num_seconds() as f64 / SECS_PER_DAY
}

/// Build the dashboard from every quote and the creation time of every vendor.
pub fn summarize<Q: QuoteView + Clone>(
    quotes: &[Q],
    vendor_created_at: &[Timestamp],
    now: Timestamp,
) -> DashboardSummary<Q> {
    let total_quotes = quotes.len();
    let valid_quotes = quotes
        .iter()
        .filter(|q| days_until(q.valid_until(), now) > 0.0)
        .count();

    let expiring_soon = quotes
        .iter()
        .filter_map(|q| {
            let days = days_until(q.valid_until(), now);
            (days > 0.0 && days <= EXPIRING_SOON_DAYS).then(|| ExpiringQuote {
                quote: q.clone(),
                days_until_expiry: days.ceil() as i64,
            })
        })
        .take(EXPIRING_SOON_LIMIT)
        .collect();

    let average_price = if quotes.is_empty() {
        0.0
    } else {
        quotes.iter().map(QuoteView::base_total).sum::<f64>() / total_quotes as f64
    };

    let month_ago = now.checked_sub_months(Months::new(1)).unwrap_or(now);
    let new_vendors_this_month = vendor_created_at.iter().filter(|c| **c > month_ago).count();

    let type_distribution = VendorType::ALL
        .iter()
        .map(|&vt| {
            let count = quotes.iter().filter(|q| q.vendor_type() == vt).count();
            let percent = if total_quotes == 0 {
                0
            } else {
                (count as f64 / total_quotes as f64 * 100.0).round() as u32
            };
            TypeShare {
                vendor_type: vt,
                label: vt.label(),
                count,
                percent,
            }
        })
        .collect();

    DashboardSummary {
        total_quotes,
        valid_quotes,
        expired_quotes: total_quotes - valid_quotes,
        average_price,
        vendor_count: vendor_created_at.len(),
        new_vendors_this_month,
        type_distribution,
        top_vendors: top_vendors(quotes),
        expiring_soon,
    }
}

/// Quote counts per vendor name, highest first. Ties keep first-seen order.
pub fn top_vendors<Q: QuoteView>(quotes: &[Q]) -> Vec<VendorQuoteCount> {
    let mut counts: Vec<VendorQuoteCount> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();
    for quote in quotes {
        let name = quote.vendor_name();
        match index.get(name) {
            Some(&i) => counts[i].count += 1,
            None => {
                index.insert(name, counts.len());
                counts.push(VendorQuoteCount {
                    name: name.to_string(),
                    count: 1,
                });
            }
        }
    }
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts.truncate(TOP_VENDOR_LIMIT);
    counts
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, TimeZone, Utc};

    use super::*;

    #[derive(Debug, Clone, Serialize)]
    struct Q {
        vt: VendorType,
        name: &'static str,
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
            None
        }
        fn destination(&self) -> Option<&str> {
            None
        }
        fn container_size(&self) -> Option<&str> {
            None
        }
        fn notes(&self) -> Option<&str> {
            None
        }
        fn valid_until(&self) -> NaiveDate {
            self.valid
        }
        fn base_total(&self) -> f64 {
            self.total
        }
    }

    fn now() -> Timestamp {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    fn q(vt: VendorType, name: &'static str, m: u32, d: u32, total: f64) -> Q {
        Q {
            vt,
            name,
            valid: NaiveDate::from_ymd_opt(2025, m, d).unwrap(),
            total,
        }
    }

    #[test]
    fn empty_dashboard_is_zeroed() {
        let summary = summarize::<Q>(&[], &[], now());
        assert_eq!(summary.total_quotes, 0);
        assert_eq!(summary.average_price, 0.0);
        assert!(summary.type_distribution.iter().all(|t| t.percent == 0));
        assert!(summary.top_vendors.is_empty());
    }

    #[test]
    fn splits_valid_and_expired() {
        let quotes = [
            q(VendorType::Shipping, "A", 6, 1, 10.0), // today at 00:00, already past
            q(VendorType::Shipping, "A", 5, 20, 10.0),
            q(VendorType::Trucking, "B", 7, 30, 10.0),
        ];
        let summary = summarize(&quotes, &[], now());
        assert_eq!(summary.valid_quotes, 1);
        assert_eq!(summary.expired_quotes, 2);
    }

    #[test]
    fn expiring_soon_uses_ceiling_days() {
        let quotes = [
            q(VendorType::Shipping, "A", 6, 3, 10.0), // 1.5 days → 2
            q(VendorType::Shipping, "A", 6, 8, 10.0), // 6.5 days → 7
            q(VendorType::Shipping, "A", 6, 9, 10.0), // 7.5 days, excluded
        ];
        let summary = summarize(&quotes, &[], now());
        let days: Vec<i64> = summary
            .expiring_soon
            .iter()
            .map(|e| e.days_until_expiry)
            .collect();
        assert_eq!(days, vec![2, 7]);
    }

    #[test]
    fn distribution_and_average() {
        let quotes = [
            q(VendorType::Shipping, "A", 7, 1, 100.0),
            q(VendorType::Shipping, "A", 7, 1, 200.0),
            q(VendorType::Customs, "C", 7, 1, 300.0),
        ];
        let summary = summarize(&quotes, &[], now());
        assert_eq!(summary.average_price, 200.0);
        let percents: Vec<u32> = summary.type_distribution.iter().map(|t| t.percent).collect();
        assert_eq!(percents, vec![67, 0, 33]);
    }

    #[test]
    fn counts_new_vendors_within_a_month() {
        let created = [
            Utc.with_ymd_and_hms(2025, 5, 15, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2025, 4, 15, 0, 0, 0).unwrap(),
        ];
        let summary = summarize::<Q>(&[], &created, now());
        assert_eq!(summary.vendor_count, 2);
        assert_eq!(summary.new_vendors_this_month, 1);
    }

    #[test]
    fn top_vendors_ranked_with_stable_ties() {
        let quotes = [
            q(VendorType::Shipping, "B", 7, 1, 1.0),
            q(VendorType::Shipping, "A", 7, 1, 1.0),
            q(VendorType::Shipping, "C", 7, 1, 1.0),
            q(VendorType::Shipping, "C", 7, 1, 1.0),
        ];
        let top = top_vendors(&quotes);
        let names: Vec<&str> = top.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["C", "B", "A"]);
    }
}
