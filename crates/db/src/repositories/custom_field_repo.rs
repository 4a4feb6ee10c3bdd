//! Repository for the `custom_fields` table.

use quotedesk_core::types::DbId;
use quotedesk_core::vendor_type::{FieldType, VendorType};
use sqlx::PgPool;

use crate::models::custom_field::{CreateCustomField, CustomField, UpdateCustomField};

const COLUMNS: &str = "id, name, field_type, vendor_type, options, is_required, display_order, \
    created_at, updated_at";

/// Provides CRUD operations for custom field definitions.
pub struct CustomFieldRepo;

impl CustomFieldRepo {
    /// All definitions, grouped by vendor type and in display order.
    pub async fn list(pool: &PgPool) -> Result<Vec<CustomField>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM custom_fields ORDER BY vendor_type, display_order, id"
        );
        sqlx::query_as::<_, CustomField>(&query).fetch_all(pool).await
    }

    /// Definitions that apply to one vendor type, in display order.
    pub async fn list_by_vendor_type(
        pool: &PgPool,
        vendor_type: VendorType,
    ) -> Result<Vec<CustomField>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM custom_fields WHERE vendor_type = $1 ORDER BY display_order, id"
        );
        sqlx::query_as::<_, CustomField>(&query)
            .bind(vendor_type.as_str())
            .fetch_all(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<CustomField>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM custom_fields WHERE id = $1");
        sqlx::query_as::<_, CustomField>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Insert a definition. `display_order` defaults to 1, `is_required` to
    /// false and `options` to empty.
    pub async fn create(
        pool: &PgPool,
        input: &CreateCustomField,
    ) -> Result<CustomField, sqlx::Error> {
        let query = format!(
            "INSERT INTO custom_fields \
                (name, field_type, vendor_type, options, is_required, display_order) \
             VALUES ($1, $2, $3, COALESCE($4, '{{}}'::TEXT[]), COALESCE($5, false), COALESCE($6, 1)) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CustomField>(&query)
            .bind(input.name.as_deref().map(str::trim))
            .bind(input.field_type.map(FieldType::as_str))
            .bind(input.vendor_type.map(VendorType::as_str))
            .bind(&input.options)
            .bind(input.is_required)
            .bind(input.display_order)
            .fetch_one(pool)
            .await
    }

    /// Update a definition. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateCustomField,
    ) -> Result<Option<CustomField>, sqlx::Error> {
        let query = format!(
            "UPDATE custom_fields SET
                name = COALESCE($2, name),
                field_type = COALESCE($3, field_type),
                vendor_type = COALESCE($4, vendor_type),
                options = COALESCE($5, options),
                is_required = COALESCE($6, is_required),
                display_order = COALESCE($7, display_order)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CustomField>(&query)
            .bind(id)
            .bind(input.name.as_deref().map(str::trim))
            .bind(input.field_type.map(FieldType::as_str))
            .bind(input.vendor_type.map(VendorType::as_str))
            .bind(&input.options)
            .bind(input.is_required)
            .bind(input.display_order)
            .fetch_optional(pool)
            .await
    }

    /// Delete a definition. Values already stored on quotes are kept.
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM custom_fields WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
