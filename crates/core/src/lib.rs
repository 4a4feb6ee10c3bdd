//! Domain logic for the freight quote desk.
//!
//! Everything in this crate is pure: no I/O, no database access. The `db`
//! and `api` crates build on these types and functions.

pub mod currency;
pub mod dashboard;
pub mod error;
pub mod form_validation;
pub mod import;
pub mod inquiry;
pub mod naming;
pub mod quote_query;
pub mod quote_rules;
pub mod types;
pub mod vendor_type;
