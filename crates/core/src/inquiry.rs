//! Price inquiry composition: the email body sent to vendors and the choice
//! of address for each vendor.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::vendor_type::VendorType;

/// Subject used when the form leaves it blank.
pub const DEFAULT_SUBJECT: &str = "報價詢問";

const CLOSING: &str = "請提供您的最佳報價，謝謝！";

/// The inquiry form as submitted by the client.
///
/// `vendor_type` is one of the vendor types or `"all"`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InquiryForm {
    pub subject: Option<String>,
    pub vendor_type: Option<String>,
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub container_size: Option<String>,
    pub cargo_type: Option<String>,
    pub pickup_location: Option<String>,
    pub delivery_location: Option<String>,
    pub customs_type: Option<String>,
    pub product_category: Option<String>,
    pub quantity: Option<String>,
    pub target_date: Option<String>,
    pub additional_info: Option<String>,
}

impl InquiryForm {
    /// The vendor types the inquiry addresses; `None` means every type.
    pub fn target(&self) -> Result<Option<VendorType>, CoreError> {
        VendorType::parse_filter(self.vendor_type.as_deref().unwrap_or("all"))
    }

    /// The subject line, falling back to [`DEFAULT_SUBJECT`].
    pub fn subject_or_default(&self) -> String {
        non_empty(&self.subject).unwrap_or(DEFAULT_SUBJECT).to_string()
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn section(out: &mut String, heading: &str, lines: &[(&str, &Option<String>)]) {
    let _ = writeln!(out, "{heading}");
    for (label, value) in lines {
        if let Some(value) = non_empty(value) {
            let _ = writeln!(out, "{label}: {value}");
        }
    }
    out.push('\n');
}

/// Build the inquiry body from the form.
///
/// One section per addressed vendor type, then quantity, target date and any
/// additional notes, closing with a request for the best price. A form
/// without a vendor type gets no type sections.
pub fn compose_content(form: &InquiryForm) -> Result<String, CoreError> {
    let target = form.target()?;
    let has_type = non_empty(&form.vendor_type).is_some();
    let includes = |vt: VendorType| has_type && target.map_or(true, |t| t == vt);

    let mut out = String::new();
    if includes(VendorType::Shipping) {
        section(
            &mut out,
            "📦 海運資訊：",
            &[
                ("起運港", &form.origin),
                ("目的港", &form.destination),
                ("櫃型", &form.container_size),
                ("貨物類型", &form.cargo_type),
            ],
        );
    }
    if includes(VendorType::Trucking) {
        section(
            &mut out,
            "🚛 拖車資訊：",
            &[
                ("取貨地點", &form.pickup_location),
                ("送達地點", &form.delivery_location),
            ],
        );
    }
    if includes(VendorType::Customs) {
        section(
            &mut out,
            "📋 報關資訊：",
            &[
                ("報關類型", &form.customs_type),
                ("產品類別", &form.product_category),
            ],
        );
    }

    if let Some(quantity) = non_empty(&form.quantity) {
        let _ = writeln!(out, "數量: {quantity}");
    }
    if let Some(date) = non_empty(&form.target_date) {
        let _ = writeln!(out, "目標日期: {date}");
    }
    if let Some(info) = non_empty(&form.additional_info) {
        let _ = writeln!(out, "\n補充說明:\n{info}");
    }
    let _ = write!(out, "\n{CLOSING}");

    Ok(out)
}

// ---------------------------------------------------------------------------
// Recipients
// ---------------------------------------------------------------------------

/// What recipient selection needs from a vendor contact.
pub trait ContactView {
    fn email(&self) -> Option<&str>;
    fn is_primary(&self) -> bool;
}

/// The address an inquiry goes to: the primary contact's email, otherwise the
/// first contact that has one.
pub fn recipient_email<C: ContactView>(contacts: &[C]) -> Option<&str> {
    let usable = |c: &&C| c.email().is_some_and(|e| !e.trim().is_empty());
    contacts
        .iter()
        .filter(usable)
        .find(|c| c.is_primary())
        .or_else(|| contacts.iter().find(usable))
        .and_then(|c| c.email())
        .map(str::trim)
}
