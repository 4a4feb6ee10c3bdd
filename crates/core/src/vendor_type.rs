//! Closed vocabularies shared by quotes, vendors, custom fields and fee types.
//!
//! All of these are stored as TEXT columns; the enums here are the single
//! source of truth for the accepted values.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// VendorType
// ---------------------------------------------------------------------------

/// The three service categories a vendor (and its quotes) can belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VendorType {
    Shipping,
    Trucking,
    Customs,
}

impl VendorType {
    pub const ALL: [VendorType; 3] = [Self::Shipping, Self::Trucking, Self::Customs];

    /// Stable string representation matching serde's `rename_all = "lowercase"`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Shipping => "shipping",
            Self::Trucking => "trucking",
            Self::Customs => "customs",
        }
    }

    /// Display label used in generated documents.
    pub fn label(self) -> &'static str {
        match self {
            Self::Shipping => "海運",
            Self::Trucking => "拖車",
            Self::Customs => "報關",
        }
    }

    /// Parse a filter value where `"all"` (or an empty string) means no filter.
    pub fn parse_filter(value: &str) -> Result<Option<Self>, CoreError> {
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") {
            return Ok(None);
        }
        trimmed.parse().map(Some)
    }
}

impl FromStr for VendorType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "shipping" => Ok(Self::Shipping),
            "trucking" => Ok(Self::Trucking),
            "customs" => Ok(Self::Customs),
            other => Err(CoreError::Validation(format!(
                "Invalid vendor type '{other}'. Must be one of: shipping, trucking, customs"
            ))),
        }
    }
}

impl fmt::Display for VendorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// FieldType
// ---------------------------------------------------------------------------

/// Input type of a user-defined custom field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Number,
    Select,
    Date,
    Textarea,
}

impl FieldType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Number => "number",
            Self::Select => "select",
            Self::Date => "date",
            Self::Textarea => "textarea",
        }
    }
}

impl FromStr for FieldType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(Self::Text),
            "number" => Ok(Self::Number),
            "select" => Ok(Self::Select),
            "date" => Ok(Self::Date),
            "textarea" => Ok(Self::Textarea),
            other => Err(CoreError::Validation(format!(
                "Invalid field type '{other}'"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// FeeCategory
// ---------------------------------------------------------------------------

/// Category of a fee type. Stored and exchanged as the Chinese label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeeCategory {
    #[serde(rename = "海運")]
    Shipping,
    #[serde(rename = "拖車")]
    Trucking,
    #[serde(rename = "報關")]
    Customs,
}

impl FeeCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Shipping => "海運",
            Self::Trucking => "拖車",
            Self::Customs => "報關",
        }
    }
}

impl FromStr for FeeCategory {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "海運" => Ok(Self::Shipping),
            "拖車" => Ok(Self::Trucking),
            "報關" => Ok(Self::Customs),
            _ => Err(CoreError::Validation(
                "Invalid category. Must be one of: 海運, 拖車, 報關".to_string(),
            )),
        }
    }
}

// ---------------------------------------------------------------------------
// Row decoding
// ---------------------------------------------------------------------------

/// `TryFrom<String>` lets the persistence layer decode TEXT columns straight
/// into these enums.
macro_rules! try_from_string {
    ($($ty:ty),+) => {
        $(
            impl TryFrom<String> for $ty {
                type Error = CoreError;

                fn try_from(value: String) -> Result<Self, Self::Error> {
                    value.parse()
                }
            }
        )+
    };
}

try_from_string!(VendorType, FieldType, FeeCategory);
