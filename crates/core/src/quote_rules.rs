//! Input rules for quotes, line items, custom fields and fee types.
//!
//! The functions take borrowed views of the incoming DTOs so they stay free
//! of any persistence types. Each returns a [`CoreError::Validation`] whose
//! message lists every failing field.

use chrono::NaiveDate;
use serde_json::Value;

use crate::error::CoreError;
use crate::form_validation::{FieldErrors, InputKind, ValidityIssue};
use crate::types::DbId;
use crate::vendor_type::FieldType;

// ---------------------------------------------------------------------------
// Line items
// ---------------------------------------------------------------------------

/// The parts of an incoming line item that are checked.
#[derive(Debug, Clone, Copy)]
pub struct LineItemDraft<'a> {
    pub description: Option<&'a str>,
    pub cost: Option<f64>,
    pub currency: Option<&'a str>,
}

/// Validate a full set of line items for a quote.
///
/// The set must be non-empty. Each item needs a description and a currency,
/// and a cost strictly greater than zero. Item labels are 1-based.
pub fn validate_line_items(items: &[LineItemDraft<'_>]) -> Result<(), CoreError> {
    if items.is_empty() {
        return Err(CoreError::Validation(
            "lineItems must be a non-empty array".to_string(),
        ));
    }

    let mut errors = FieldErrors::new();
    for (index, item) in items.iter().enumerate() {
        let label = format!("Line item {}", index + 1);
        errors.require_text(&format!("{label} description"), item.description);
        errors.require_text(&format!("{label} currency"), item.currency);
        match item.cost {
            None => errors.push(format!("{label} cost"), ValidityIssue::ValueMissing),
            Some(cost) if !cost.is_finite() => errors.push(
                format!("{label} cost"),
                ValidityIssue::TypeMismatch(InputKind::Other),
            ),
            Some(cost) if cost <= 0.0 => {
                errors.push(format!("{label} cost"), ValidityIssue::NotPositive)
            }
            Some(_) => {}
        }
    }
    errors.into_result()
}

// ---------------------------------------------------------------------------
// Quote header
// ---------------------------------------------------------------------------

/// Required top-level fields of a new quote.
#[derive(Debug, Clone, Copy)]
pub struct QuoteHeaderDraft<'a> {
    pub vendor_id: Option<DbId>,
    pub vendor_name: Option<&'a str>,
    pub valid_until: Option<NaiveDate>,
}

/// Validate the header of a new quote (vendor type is enforced by its type).
pub fn validate_new_quote(
    header: &QuoteHeaderDraft<'_>,
    items: &[LineItemDraft<'_>],
) -> Result<(), CoreError> {
    let mut errors = FieldErrors::new();
    if header.vendor_id.is_none() {
        errors.push("vendorId", ValidityIssue::ValueMissing);
    }
    errors.require_text("vendorName", header.vendor_name);
    if header.valid_until.is_none() {
        errors.push("validUntil", ValidityIssue::ValueMissing);
    }
    errors.into_result()?;
    validate_line_items(items)
}

// ---------------------------------------------------------------------------
// Custom fields
// ---------------------------------------------------------------------------

/// A custom field definition, as far as value validation is concerned.
#[derive(Debug, Clone)]
pub struct CustomFieldRule {
    pub id: DbId,
    pub name: String,
    pub field_type: FieldType,
    pub options: Vec<String>,
    pub is_required: bool,
}

/// Validate a custom field definition before it is stored.
pub fn validate_field_definition(
    name: Option<&str>,
    field_type: Option<FieldType>,
    options: Option<&[String]>,
) -> Result<(), CoreError> {
    let mut errors = FieldErrors::new();
    errors.require_text("name", name);
    if field_type.is_none() {
        errors.push("fieldType", ValidityIssue::ValueMissing);
    }
    errors.into_result()?;
    validate_select_options(field_type, options)
}

/// A `select` field must carry at least one non-blank option.
pub fn validate_select_options(
    field_type: Option<FieldType>,
    options: Option<&[String]>,
) -> Result<(), CoreError> {
    if field_type == Some(FieldType::Select) {
        let has_option = options.is_some_and(|opts| opts.iter().any(|o| !o.trim().is_empty()));
        if !has_option {
            return Err(CoreError::Validation(
                "Select field type requires at least one option".to_string(),
            ));
        }
    }
    Ok(())
}

/// Check a quote's `customFields` map against the definitions for its
/// vendor type. Keys are the field ids rendered as strings.
///
/// Unknown keys are ignored so that values survive a definition being
/// deleted.
pub fn validate_custom_values(rules: &[CustomFieldRule], values: &Value) -> Result<(), CoreError> {
    let map = match values {
        Value::Object(map) => Some(map),
        Value::Null => None,
        _ => {
            return Err(CoreError::Validation(
                "customFields must be an object".to_string(),
            ))
        }
    };

    let mut errors = FieldErrors::new();
    for rule in rules {
        let value = map.and_then(|m| m.get(&rule.id.to_string()));
        let present = value.is_some_and(|v| !is_blank(v));
        if !present {
            if rule.is_required {
                errors.push(rule.name.as_str(), ValidityIssue::ValueMissing);
            }
            continue;
        }
        let Some(value) = value else { continue };
        match rule.field_type {
            FieldType::Number if as_number(value).is_none() => errors.push(
                rule.name.as_str(),
                ValidityIssue::TypeMismatch(InputKind::Other),
            ),
            FieldType::Select => {
                let chosen = value.as_str().unwrap_or_default();
                if !rule.options.iter().any(|o| o == chosen) {
                    errors.push(rule.name.as_str(), ValidityIssue::PatternMismatch);
                }
            }
            FieldType::Date => {
                let parsed = value
                    .as_str()
                    .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok());
                if parsed.is_none() {
                    errors.push(rule.name.as_str(), ValidityIssue::TypeMismatch(InputKind::Other));
                }
            }
            _ => {}
        }
    }
    errors.into_result()
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Fee types
// ---------------------------------------------------------------------------

/// Trim a fee type name, rejecting blank names.
pub fn normalize_fee_type_name(name: Option<&str>) -> Result<String, CoreError> {
    let mut errors = FieldErrors::new();
    errors.require_text("name", name);
    errors.into_result()?;
    Ok(name.unwrap_or_default().trim().to_string())
}
