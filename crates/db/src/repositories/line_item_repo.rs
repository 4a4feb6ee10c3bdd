//! Repository for the `quote_line_items` table.

use quotedesk_core::types::DbId;
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::line_item::{LineItem, LineItemInput};

const COLUMNS: &str =
    "id, quote_id, fee_type_id, description, cost, currency, remarks, display_order";

/// Line items are only ever written as part of their quote's transaction.
pub struct LineItemRepo;

impl LineItemRepo {
    /// Items of one quote in display order.
    pub async fn list_by_quote(pool: &PgPool, quote_id: DbId) -> Result<Vec<LineItem>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM quote_line_items WHERE quote_id = $1 ORDER BY display_order, id"
        );
        sqlx::query_as::<_, LineItem>(&query)
            .bind(quote_id)
            .fetch_all(pool)
            .await
    }

    /// Items of several quotes, grouped by quote and in display order.
    pub async fn list_by_quotes(
        pool: &PgPool,
        quote_ids: &[DbId],
    ) -> Result<Vec<LineItem>, sqlx::Error> {
        if quote_ids.is_empty() {
            return Ok(Vec::new());
        }
        let query = format!(
            "SELECT {COLUMNS} FROM quote_line_items \
             WHERE quote_id = ANY($1) \
             ORDER BY quote_id, display_order, id"
        );
        sqlx::query_as::<_, LineItem>(&query)
            .bind(quote_ids)
            .fetch_all(pool)
            .await
    }

    /// Insert a full set of items; each item's list position becomes its
    /// `display_order`.
    pub async fn insert_all(
        tx: &mut Transaction<'_, Postgres>,
        quote_id: DbId,
        items: &[LineItemInput],
    ) -> Result<Vec<LineItem>, sqlx::Error> {
        let query = format!(
            "INSERT INTO quote_line_items \
                (quote_id, fee_type_id, description, cost, currency, remarks, display_order) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {COLUMNS}"
        );
        let mut created = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            let row = sqlx::query_as::<_, LineItem>(&query)
                .bind(quote_id)
                .bind(item.fee_type_id)
                .bind(item.description.as_deref().map(str::trim))
                .bind(item.cost)
                .bind(item.currency.as_deref().map(str::trim))
                .bind(&item.remarks)
                .bind(index as i32)
                .fetch_one(&mut **tx)
                .await?;
            created.push(row);
        }
        Ok(created)
    }

    /// Remove every item of a quote. Returns the number of rows removed.
    pub async fn delete_by_quote(
        tx: &mut Transaction<'_, Postgres>,
        quote_id: DbId,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM quote_line_items WHERE quote_id = $1")
            .bind(quote_id)
            .execute(&mut **tx)
            .await?;
        Ok(result.rows_affected())
    }
}
