//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument. Child tables that are only
//! written together with their parent take the parent's transaction instead.

pub mod custom_field_repo;
pub mod fee_type_repo;
pub mod inquiry_repo;
pub mod line_item_repo;
pub mod quote_repo;
pub mod vendor_contact_repo;
pub mod vendor_repo;

pub use custom_field_repo::CustomFieldRepo;
pub use fee_type_repo::FeeTypeRepo;
pub use inquiry_repo::InquiryRepo;
pub use line_item_repo::LineItemRepo;
pub use quote_repo::{QuoteRepo, VendorLinkReport};
pub use vendor_contact_repo::VendorContactRepo;
pub use vendor_repo::VendorRepo;
