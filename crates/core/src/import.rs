//! Bulk quote import from CSV files and pasted vendor emails.
//!
//! Both parsers produce an [`ImportPreview`]: the quotes that passed the row
//! rules plus a list of human-readable errors. Nothing is stored here; the
//! client reviews the preview and commits it through the batch endpoint.

use std::collections::HashMap;
use std::sync::LazyLock;

use chrono::{Days, NaiveDate};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::currency::{CostLine, DEFAULT_IMPORT_CURRENCY};
use crate::naming::snake_to_camel;
use crate::vendor_type::VendorType;

/// Imported quotes are valid for this many days when the source does not say.
pub const EMAIL_VALIDITY_DAYS: u64 = 30;

/// Header row of the downloadable template.
pub const TEMPLATE_HEADERS: [&str; 16] = [
    "廠商類型",
    "廠商名稱",
    "價格",
    "幣別",
    "有效期限",
    "起運港",
    "目的港",
    "船公司",
    "航程時間",
    "櫃型",
    "取貨地點",
    "送達地點",
    "車型",
    "報關類型",
    "產品類別",
    "備註",
];

const TEMPLATE_ROWS: [[&str; 16]; 3] = [
    [
        "shipping", "長榮海運", "1200", "USD", "2025-12-31", "基隆港", "寧波港", "EVERGREEN",
        "3-5天", "40HQ", "", "", "", "", "", "含基本港雜費",
    ],
    [
        "trucking", "台灣拖車", "3500", "TWD", "2025-12-31", "", "", "", "", "", "桃園龜山",
        "基隆港", "40ft", "", "", "24小時服務",
    ],
    [
        "customs", "佳鑫報關行", "2500", "TWD", "2025-12-31", "", "", "", "", "", "", "", "",
        "出口報關", "電子產品", "含簽審文件",
    ],
];

const EMAIL_PARSE_FAILED: &str =
    "無法從郵件中提取完整的報價資訊。請確保包含廠商名稱和價格。";

/// A quote recovered from an import source, ready for review.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportedQuote {
    pub vendor_type: VendorType,
    pub vendor_name: String,
    pub price: f64,
    pub currency: String,
    pub valid_until: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub carrier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transit_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container_size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pickup_location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub truck_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customs_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl ImportedQuote {
    fn new(vendor_type: VendorType, vendor_name: String, price: f64, valid_until: NaiveDate) -> Self {
        Self {
            vendor_type,
            vendor_name,
            price,
            currency: DEFAULT_IMPORT_CURRENCY.to_string(),
            valid_until,
            origin: None,
            destination: None,
            carrier: None,
            transit_time: None,
            container_size: None,
            pickup_location: None,
            delivery_location: None,
            truck_type: None,
            customs_type: None,
            product_category: None,
            notes: None,
        }
    }
}

impl CostLine for ImportedQuote {
    fn cost(&self) -> f64 {
        self.price
    }

    fn currency(&self) -> &str {
        &self.currency
    }
}

/// Result of parsing an import source.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ImportPreview {
    pub quotes: Vec<ImportedQuote>,
    pub errors: Vec<String>,
}

// ---------------------------------------------------------------------------
// CSV
// ---------------------------------------------------------------------------

/// The downloadable CSV template, without a byte order mark.
pub fn csv_template() -> String {
    std::iter::once(TEMPLATE_HEADERS)
        .chain(TEMPLATE_ROWS)
        .map(|row| row.join(","))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Template columns paired with their camelCase aliases.
const COLUMN_ALIASES: [(&str, &str); 16] = [
    ("廠商類型", "vendorType"),
    ("廠商名稱", "vendorName"),
    ("價格", "price"),
    ("幣別", "currency"),
    ("有效期限", "validUntil"),
    ("起運港", "origin"),
    ("目的港", "destination"),
    ("船公司", "carrier"),
    ("航程時間", "transitTime"),
    ("櫃型", "containerSize"),
    ("取貨地點", "pickupLocation"),
    ("送達地點", "deliveryLocation"),
    ("車型", "truckType"),
    ("報關類型", "customsType"),
    ("產品類別", "productCategory"),
    ("備註", "notes"),
];

/// One data row with lookup by template column name or alias.
struct Row<'a> {
    columns: &'a HashMap<String, usize>,
    record: &'a csv::StringRecord,
}

impl Row<'_> {
    /// First non-empty value among the column and its alias.
    fn get(&self, column: &str) -> Option<String> {
        let alias = COLUMN_ALIASES
            .iter()
            .find(|(zh, _)| *zh == column)
            .map(|(_, camel)| *camel);
        [Some(column), alias]
            .into_iter()
            .flatten()
            .filter_map(|name| self.columns.get(name))
            .filter_map(|&i| self.record.get(i))
            .map(str::trim)
            .find(|v| !v.is_empty())
            .map(str::to_string)
    }
}

/// Parse CSV text in the template layout.
///
/// Rows are numbered as a spreadsheet shows them, so the first data row is
/// row 2. A row is rejected on its first failing rule.
pub fn parse_csv(text: &str) -> ImportPreview {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let mut preview = ImportPreview::default();

    let columns: HashMap<String, usize> = match reader.headers() {
        Ok(headers) => headers
            .iter()
            .enumerate()
            .map(|(i, h)| (snake_to_camel(h.trim()), i))
            .collect(),
        Err(e) => {
            preview.errors.push(format!("行 1: {e}"));
            return preview;
        }
    };

    let mut row_num = 1;
    for result in reader.records() {
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                row_num += 1;
                preview.errors.push(format!("行 {row_num}: {e}"));
                continue;
            }
        };
        if record.iter().all(|field| field.trim().is_empty()) {
            continue;
        }
        row_num += 1;

        let row = Row {
            columns: &columns,
            record: &record,
        };
        match parse_row(&row) {
            Ok(quote) => preview.quotes.push(quote),
            Err(reason) => preview.errors.push(format!("行 {row_num}: {reason}")),
        }
    }

    tracing::debug!(
        imported = preview.quotes.len(),
        rejected = preview.errors.len(),
        "Parsed CSV import"
    );
    preview
}

fn parse_row(row: &Row<'_>) -> Result<ImportedQuote, &'static str> {
    let vendor_type = row
        .get("廠商類型")
        .and_then(|v| match v.to_lowercase().as_str() {
            "shipping" => Some(VendorType::Shipping),
            "trucking" => Some(VendorType::Trucking),
            "customs" => Some(VendorType::Customs),
            _ => None,
        })
        .ok_or("廠商類型無效")?;

    let vendor_name = row.get("廠商名稱").ok_or("缺少廠商名稱")?;

    let price = row
        .get("價格")
        .and_then(|p| p.replace(',', "").parse::<f64>().ok())
        .filter(|p| p.is_finite() && *p > 0.0)
        .ok_or("價格無效")?;

    let valid_until = row.get("有效期限").ok_or("缺少有效期限")?;
    let valid_until = parse_date(&valid_until).ok_or("有效期限格式無效")?;

    let mut quote = ImportedQuote::new(vendor_type, vendor_name, price, valid_until);
    if let Some(currency) = row.get("幣別") {
        quote.currency = currency.to_uppercase();
    }

    match vendor_type {
        VendorType::Shipping => {
            quote.origin = row.get("起運港");
            quote.destination = row.get("目的港");
            quote.carrier = row.get("船公司");
            quote.transit_time = row.get("航程時間");
            quote.container_size = row.get("櫃型");
        }
        VendorType::Trucking => {
            quote.pickup_location = row.get("取貨地點");
            quote.delivery_location = row.get("送達地點");
            quote.truck_type = row.get("車型");
        }
        VendorType::Customs => {
            quote.customs_type = row.get("報關類型");
            quote.product_category = row.get("產品類別");
        }
    }
    quote.notes = row.get("備註");

    Ok(quote)
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(value, "%Y/%m/%d"))
        .ok()
}

// ---------------------------------------------------------------------------
// Email text
// ---------------------------------------------------------------------------

static VENDOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:廠商|供應商|Vendor|Company)[:：]\s*(.+)").expect("valid regex")
});
static ROUTE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\S+?\s?(?:港|Port))\s*(?:to|→|->|至)\s*(\S+?\s?(?:港|Port))")
        .expect("valid regex")
});
/// Group 1 is a currency code, group 2 a dollar sign, group 3 the amount.
static PRICE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:\b(USD|TWD|CNY|EUR))?\s*(\$)?\s*(\d+(?:,\d{3})*(?:\.\d+)?)")
        .expect("valid regex")
});
static CURRENCY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(USD|TWD|CNY|EUR)\b").expect("valid regex"));
static CONTAINER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(20GP|40GP|40HQ|45HQ)").expect("valid regex"));

/// Pull a single shipping quote out of free-form email text.
///
/// `today` anchors the default validity window.
pub fn parse_email(text: &str, today: NaiveDate) -> ImportPreview {
    let mut vendor_name: Option<String> = None;
    let mut price: Option<f64> = None;
    let mut currency: Option<String> = None;
    let mut origin = None;
    let mut destination = None;
    let mut container_size = None;

    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if let Some(caps) = VENDOR_RE.captures(line) {
            vendor_name = Some(caps[1].trim().to_string());
        }

        if let Some(caps) = ROUTE_RE.captures(line) {
            origin = Some(caps[1].trim().to_string());
            destination = Some(caps[2].trim().to_string());
        }

        let anchored = PRICE_RE
            .captures_iter(line)
            .find(|caps| caps.get(1).is_some() || caps.get(2).is_some());
        if let Some(caps) = anchored {
            if let Ok(amount) = caps[3].replace(',', "").parse::<f64>() {
                price = Some(amount);
            }
            let code = caps
                .get(1)
                .map(|m| m.as_str().to_string())
                .or_else(|| CURRENCY_RE.captures(line).map(|c| c[1].to_string()));
            if let Some(code) = code {
                currency = Some(code.to_uppercase());
            }
        }

        if let Some(m) = CONTAINER_RE.find(line) {
            container_size = Some(m.as_str().to_string());
        }
    }

    let mut preview = ImportPreview::default();
    match (vendor_name, price) {
        (Some(name), Some(price)) if !name.is_empty() && price != 0.0 => {
            let valid_until = today
                .checked_add_days(Days::new(EMAIL_VALIDITY_DAYS))
                .unwrap_or(today);
            let mut quote = ImportedQuote::new(VendorType::Shipping, name, price, valid_until);
            if let Some(code) = currency {
                quote.currency = code;
            }
            quote.origin = origin;
            quote.destination = destination;
            quote.container_size = container_size;
            preview.quotes.push(quote);
        }
        _ => {
            tracing::debug!("Email text did not contain a vendor name and price");
            preview.errors.push(EMAIL_PARSE_FAILED.to_string());
        }
    }
    preview
}
