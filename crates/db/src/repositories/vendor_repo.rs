//! Repository for the `vendors` table and its contacts.

use std::collections::HashMap;

use quotedesk_core::types::{DbId, Timestamp};
use quotedesk_core::vendor_type::VendorType;
use sqlx::PgPool;

use crate::models::vendor::{CreateVendor, UpdateVendor, Vendor, VendorDetail, DEFAULT_RATING};
use crate::models::vendor_contact::VendorContact;
use crate::repositories::VendorContactRepo;

const COLUMNS: &str = "id, name, vendor_type, address, rating, notes, created_at, updated_at";

/// Provides CRUD operations for vendors, always returning them with their
/// contacts.
pub struct VendorRepo;

impl VendorRepo {
    /// All vendors ordered by name.
    pub async fn list(pool: &PgPool) -> Result<Vec<VendorDetail>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM vendors ORDER BY name ASC, id ASC");
        let vendors = sqlx::query_as::<_, Vendor>(&query).fetch_all(pool).await?;
        Self::with_contacts(pool, vendors).await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<VendorDetail>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM vendors WHERE id = $1");
        let vendor = sqlx::query_as::<_, Vendor>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;
        match vendor {
            Some(vendor) => {
                let contacts = VendorContactRepo::list_by_vendor(pool, vendor.id).await?;
                Ok(Some(VendorDetail { vendor, contacts }))
            }
            None => Ok(None),
        }
    }

    /// Vendors among `ids`, ordered by name. Unknown ids are skipped.
    pub async fn find_by_ids(pool: &PgPool, ids: &[DbId]) -> Result<Vec<VendorDetail>, sqlx::Error> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let query = format!("SELECT {COLUMNS} FROM vendors WHERE id = ANY($1) ORDER BY name, id");
        let vendors = sqlx::query_as::<_, Vendor>(&query)
            .bind(ids)
            .fetch_all(pool)
            .await?;
        Self::with_contacts(pool, vendors).await
    }

    /// Creation times of every vendor, for dashboard counts.
    pub async fn list_created_at(pool: &PgPool) -> Result<Vec<Timestamp>, sqlx::Error> {
        sqlx::query_scalar("SELECT created_at FROM vendors")
            .fetch_all(pool)
            .await
    }

    /// Insert a vendor and its contacts. Rating defaults to 5.0.
    pub async fn create(pool: &PgPool, input: &CreateVendor) -> Result<VendorDetail, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let query = format!(
            "INSERT INTO vendors (name, vendor_type, address, rating, notes) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {COLUMNS}"
        );
        let vendor = sqlx::query_as::<_, Vendor>(&query)
            .bind(input.name.as_deref().map(str::trim))
            .bind(input.vendor_type.map(VendorType::as_str))
            .bind(&input.address)
            .bind(input.rating.unwrap_or(DEFAULT_RATING))
            .bind(&input.notes)
            .fetch_one(&mut *tx)
            .await?;
        let contacts = VendorContactRepo::insert_all(&mut tx, vendor.id, &input.contacts).await?;
        tx.commit().await?;
        Ok(VendorDetail { vendor, contacts })
    }

    /// Update a vendor. Only non-`None` fields are applied; when `contacts`
    /// is present the stored contacts are replaced.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateVendor,
    ) -> Result<Option<VendorDetail>, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let query = format!(
            "UPDATE vendors SET
                name = COALESCE($2, name),
                vendor_type = COALESCE($3, vendor_type),
                address = COALESCE($4, address),
                rating = COALESCE($5, rating),
                notes = COALESCE($6, notes)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let vendor = sqlx::query_as::<_, Vendor>(&query)
            .bind(id)
            .bind(input.name.as_deref().map(str::trim))
            .bind(input.vendor_type.map(VendorType::as_str))
            .bind(&input.address)
            .bind(input.rating)
            .bind(&input.notes)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(vendor) = vendor else {
            return Ok(None);
        };

        let contacts = match &input.contacts {
            Some(contacts) => {
                VendorContactRepo::delete_by_vendor(&mut tx, id).await?;
                let created = VendorContactRepo::insert_all(&mut tx, id, contacts).await?;
                tx.commit().await?;
                created
            }
            None => {
                tx.commit().await?;
                VendorContactRepo::list_by_vendor(pool, id).await?
            }
        };

        Ok(Some(VendorDetail { vendor, contacts }))
    }

    /// Delete a vendor. Its contacts go with it; its quotes keep their
    /// vendor name and lose the link. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM vendors WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn with_contacts(
        pool: &PgPool,
        vendors: Vec<Vendor>,
    ) -> Result<Vec<VendorDetail>, sqlx::Error> {
        let ids: Vec<DbId> = vendors.iter().map(|v| v.id).collect();
        let mut grouped: HashMap<DbId, Vec<VendorContact>> = HashMap::new();
        for contact in VendorContactRepo::list_by_vendors(pool, &ids).await? {
            grouped.entry(contact.vendor_id).or_default().push(contact);
        }
        Ok(vendors
            .into_iter()
            .map(|vendor| {
                let contacts = grouped.remove(&vendor.id).unwrap_or_default();
                VendorDetail { vendor, contacts }
            })
            .collect())
    }
}
