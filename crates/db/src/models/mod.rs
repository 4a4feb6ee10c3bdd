//! Row models and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for patches
//!
//! Everything serializes with camelCase keys; storage stays snake_case.

pub mod custom_field;
pub mod fee_type;
pub mod inquiry;
pub mod line_item;
pub mod quote;
pub mod vendor;
pub mod vendor_contact;
