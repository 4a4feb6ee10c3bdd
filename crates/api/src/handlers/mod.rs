//! Request handlers, one submodule per resource.
//!
//! Handlers delegate to the repositories in `quotedesk_db` and the pure
//! rules in `quotedesk_core`, and map errors via [`crate::error::AppError`].

pub mod currencies;
pub mod custom_fields;
pub mod dashboard;
pub mod fee_types;
pub mod import;
pub mod inquiries;
pub mod quotes;
pub mod vendors;
