//! Repository for the `fee_types` table.

use quotedesk_core::types::DbId;
use quotedesk_core::vendor_type::FeeCategory;
use sqlx::PgPool;

use crate::models::fee_type::{FeeType, UpdateFeeType};

const COLUMNS: &str = "id, name, category, description, is_active, created_at, updated_at";

/// Fee types are never deleted, only deactivated.
pub struct FeeTypeRepo;

impl FeeTypeRepo {
    /// Fee types ordered by name. Inactive ones are included only on request.
    pub async fn list(pool: &PgPool, include_inactive: bool) -> Result<Vec<FeeType>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM fee_types WHERE ($1 OR is_active) ORDER BY name, id"
        );
        sqlx::query_as::<_, FeeType>(&query)
            .bind(include_inactive)
            .fetch_all(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<FeeType>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM fee_types WHERE id = $1");
        sqlx::query_as::<_, FeeType>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Insert an active fee type. A duplicate name within a category
    /// violates `uq_fee_types_name_category`.
    pub async fn create(
        pool: &PgPool,
        name: &str,
        category: FeeCategory,
        description: Option<&str>,
    ) -> Result<FeeType, sqlx::Error> {
        let query = format!(
            "INSERT INTO fee_types (name, category, description, is_active) \
             VALUES ($1, $2, $3, true) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, FeeType>(&query)
            .bind(name)
            .bind(category.as_str())
            .bind(description)
            .fetch_one(pool)
            .await
    }

    /// Rename, describe or toggle a fee type. Only non-`None` fields are
    /// applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateFeeType,
    ) -> Result<Option<FeeType>, sqlx::Error> {
        let query = format!(
            "UPDATE fee_types SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                is_active = COALESCE($4, is_active)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, FeeType>(&query)
            .bind(id)
            .bind(input.name.as_deref().map(str::trim))
            .bind(&input.description)
            .bind(input.is_active)
            .fetch_optional(pool)
            .await
    }
}
