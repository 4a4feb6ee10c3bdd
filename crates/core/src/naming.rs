//! camelCase / snake_case key translation for free-form JSON.
//!
//! Typed entities get their wire names from serde attributes. This module
//! covers the untyped payloads (inquiry form data, import rows) that are
//! stored as JSONB and must round-trip between the two conventions.

use serde_json::{Map, Value};

/// Storage columns whose wire name does not follow the generic rule.
const WIRE_OVERRIDES: [(&str, &str); 7] = [
    ("quote_id", "id"),
    ("contact_id", "id"),
    ("item_id", "itemId"),
    ("display_order", "order"),
    ("fee_type_id", "feeTypeId"),
    ("vendor_id", "vendorId"),
    ("inquiry_id", "inquiryId"),
];

/// `pickup_location` → `pickupLocation`. Only `_` followed by a lowercase
/// ASCII letter is folded; other underscores are kept.
pub fn snake_to_camel(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let mut chars = key.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '_' {
            if let Some(&next) = chars.peek() {
                if next.is_ascii_lowercase() {
                    out.push(next.to_ascii_uppercase());
                    chars.next();
                    continue;
                }
            }
        }
        out.push(c);
    }
    out
}

/// `pickupLocation` → `pickup_location`.
pub fn camel_to_snake(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    for c in key.chars() {
        if c.is_ascii_uppercase() {
            out.push('_');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// Wire name of a storage column, honouring the primary-key overrides.
pub fn wire_key(column: &str) -> String {
    WIRE_OVERRIDES
        .iter()
        .find(|(col, _)| *col == column)
        .map(|(_, wire)| (*wire).to_string())
        .unwrap_or_else(|| snake_to_camel(column))
}

/// Recursively rename every object key with [`wire_key`].
pub fn keys_to_camel(value: Value) -> Value {
    map_keys(value, &wire_key)
}

/// Recursively rename every object key with [`camel_to_snake`].
pub fn keys_to_snake(value: Value) -> Value {
    map_keys(value, &camel_to_snake)
}

fn map_keys(value: Value, rename: &dyn Fn(&str) -> String) -> Value {
    match value {
        Value::Array(items) => Value::Array(items.into_iter().map(|v| map_keys(v, rename)).collect()),
        Value::Object(obj) => {
            let mut out = Map::with_capacity(obj.len());
            for (k, v) in obj {
                out.insert(rename(&k), map_keys(v, rename));
            }
            Value::Object(out)
        }
        other => other,
    }
}
