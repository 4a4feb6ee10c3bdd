//! Repository for the `vendor_contacts` table.

use quotedesk_core::types::DbId;
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::vendor_contact::{ContactInput, VendorContact};

const COLUMNS: &str = "id, vendor_id, name, title, email, phone, is_primary, display_order";

/// Contacts are written as a full set inside their vendor's transaction.
pub struct VendorContactRepo;

impl VendorContactRepo {
    pub async fn list_by_vendor(
        pool: &PgPool,
        vendor_id: DbId,
    ) -> Result<Vec<VendorContact>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM vendor_contacts WHERE vendor_id = $1 ORDER BY display_order, id"
        );
        sqlx::query_as::<_, VendorContact>(&query)
            .bind(vendor_id)
            .fetch_all(pool)
            .await
    }

    pub async fn list_by_vendors(
        pool: &PgPool,
        vendor_ids: &[DbId],
    ) -> Result<Vec<VendorContact>, sqlx::Error> {
        if vendor_ids.is_empty() {
            return Ok(Vec::new());
        }
        let query = format!(
            "SELECT {COLUMNS} FROM vendor_contacts \
             WHERE vendor_id = ANY($1) \
             ORDER BY vendor_id, display_order, id"
        );
        sqlx::query_as::<_, VendorContact>(&query)
            .bind(vendor_ids)
            .fetch_all(pool)
            .await
    }

    pub async fn insert_all(
        tx: &mut Transaction<'_, Postgres>,
        vendor_id: DbId,
        contacts: &[ContactInput],
    ) -> Result<Vec<VendorContact>, sqlx::Error> {
        let query = format!(
            "INSERT INTO vendor_contacts \
                (vendor_id, name, title, email, phone, is_primary, display_order) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {COLUMNS}"
        );
        let mut created = Vec::with_capacity(contacts.len());
        for (index, contact) in contacts.iter().enumerate() {
            let row = sqlx::query_as::<_, VendorContact>(&query)
                .bind(vendor_id)
                .bind(&contact.name)
                .bind(&contact.title)
                .bind(&contact.email)
                .bind(&contact.phone)
                .bind(contact.is_primary)
                .bind(index as i32)
                .fetch_one(&mut **tx)
                .await?;
            created.push(row);
        }
        Ok(created)
    }

    pub async fn delete_by_vendor(
        tx: &mut Transaction<'_, Postgres>,
        vendor_id: DbId,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM vendor_contacts WHERE vendor_id = $1")
            .bind(vendor_id)
            .execute(&mut **tx)
            .await?;
        Ok(result.rows_affected())
    }
}
