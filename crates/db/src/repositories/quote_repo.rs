//! Repository for the `quotes` table and, through [`LineItemRepo`], its
//! line items.

use std::collections::HashMap;

use quotedesk_core::currency::stored_total;
use quotedesk_core::types::DbId;
use quotedesk_core::vendor_type::VendorType;
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::line_item::LineItem;
use crate::models::quote::{CreateQuote, Quote, QuoteDetail, QuoteSearch, UpdateQuote};
use crate::repositories::LineItemRepo;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, vendor_id, vendor_name, vendor_type, valid_until, \
    origin, destination, carrier, transit_time, container_size, \
    pickup_location, delivery_location, truck_type, \
    customs_type, product_category, notes, custom_fields, inquiry_id, \
    total_cost_display, base_currency, created_at, updated_at";

/// Outcome of linking legacy quotes to vendor rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VendorLinkReport {
    /// Quotes that gained a vendor id.
    pub migrated: u64,
    /// Quotes that had no vendor id beforehand.
    pub total: i64,
}

/// Provides CRUD operations for quotes. Every write keeps the quote row and
/// its line items consistent inside one transaction.
pub struct QuoteRepo;

impl QuoteRepo {
    /// All quotes with their line items, lowest stored total first and
    /// newest first within equal totals.
    pub async fn list(pool: &PgPool) -> Result<Vec<QuoteDetail>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM quotes
             ORDER BY total_cost_display ASC NULLS LAST, created_at DESC, id DESC"
        );
        let quotes = sqlx::query_as::<_, Quote>(&query).fetch_all(pool).await?;
        Self::with_items(pool, quotes).await
    }

    /// Find a quote by ID, with its line items.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<QuoteDetail>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM quotes WHERE id = $1");
        let quote = sqlx::query_as::<_, Quote>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;
        match quote {
            Some(quote) => {
                let line_items = LineItemRepo::list_by_quote(pool, quote.id).await?;
                Ok(Some(QuoteDetail { quote, line_items }))
            }
            None => Ok(None),
        }
    }

    /// Insert a quote and its line items.
    ///
    /// The stored total and base currency are derived from the items.
    pub async fn create(pool: &PgPool, input: &CreateQuote) -> Result<QuoteDetail, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let detail = Self::create_inner(&mut tx, input).await?;
        tx.commit().await?;
        Ok(detail)
    }

    /// Insert several quotes in a single transaction. Either all are stored
    /// or none are.
    pub async fn create_many(
        pool: &PgPool,
        inputs: &[CreateQuote],
    ) -> Result<Vec<QuoteDetail>, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let mut created = Vec::with_capacity(inputs.len());
        for input in inputs {
            created.push(Self::create_inner(&mut tx, input).await?);
        }
        tx.commit().await?;
        tracing::debug!(count = created.len(), "Inserted quote batch");
        Ok(created)
    }

    async fn create_inner(
        tx: &mut Transaction<'_, Postgres>,
        input: &CreateQuote,
    ) -> Result<QuoteDetail, sqlx::Error> {
        let (total, base_currency) = stored_total(&input.line_items);
        let query = format!(
            "INSERT INTO quotes \
                (vendor_id, vendor_name, vendor_type, valid_until, \
                 origin, destination, carrier, transit_time, container_size, \
                 pickup_location, delivery_location, truck_type, \
                 customs_type, product_category, notes, custom_fields, inquiry_id, \
                 total_cost_display, base_currency) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, \
                     COALESCE($16, '{{}}'::jsonb), $17, $18, $19) \
             RETURNING {COLUMNS}"
        );
        let quote = sqlx::query_as::<_, Quote>(&query)
            .bind(input.vendor_id)
            .bind(input.vendor_name.as_deref().map(str::trim))
            .bind(input.vendor_type.map(VendorType::as_str))
            .bind(input.valid_until)
            .bind(&input.origin)
            .bind(&input.destination)
            .bind(&input.carrier)
            .bind(&input.transit_time)
            .bind(&input.container_size)
            .bind(&input.pickup_location)
            .bind(&input.delivery_location)
            .bind(&input.truck_type)
            .bind(&input.customs_type)
            .bind(&input.product_category)
            .bind(&input.notes)
            .bind(&input.custom_fields)
            .bind(input.inquiry_id)
            .bind(total)
            .bind(&base_currency)
            .fetch_one(&mut **tx)
            .await?;

        let line_items = LineItemRepo::insert_all(tx, quote.id, &input.line_items).await?;
        Ok(QuoteDetail { quote, line_items })
    }

    /// Update a quote. Only non-`None` fields in `input` are applied, so an
    /// optional column can be overwritten but not cleared. When `line_items`
    /// is present the items are replaced and the stored total recomputed.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateQuote,
    ) -> Result<Option<QuoteDetail>, sqlx::Error> {
        let totals = input.line_items.as_deref().map(|items| stored_total(items));

        let mut tx = pool.begin().await?;
        let query = format!(
            "UPDATE quotes SET
                vendor_id = COALESCE($2, vendor_id),
                vendor_name = COALESCE($3, vendor_name),
                vendor_type = COALESCE($4, vendor_type),
                valid_until = COALESCE($5, valid_until),
                origin = COALESCE($6, origin),
                destination = COALESCE($7, destination),
                carrier = COALESCE($8, carrier),
                transit_time = COALESCE($9, transit_time),
                container_size = COALESCE($10, container_size),
                pickup_location = COALESCE($11, pickup_location),
                delivery_location = COALESCE($12, delivery_location),
                truck_type = COALESCE($13, truck_type),
                customs_type = COALESCE($14, customs_type),
                product_category = COALESCE($15, product_category),
                notes = COALESCE($16, notes),
                custom_fields = COALESCE($17, custom_fields),
                inquiry_id = COALESCE($18, inquiry_id),
                total_cost_display = COALESCE($19, total_cost_display),
                base_currency = COALESCE($20, base_currency)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let quote = sqlx::query_as::<_, Quote>(&query)
            .bind(id)
            .bind(input.vendor_id)
            .bind(input.vendor_name.as_deref().map(str::trim))
            .bind(input.vendor_type.map(VendorType::as_str))
            .bind(input.valid_until)
            .bind(&input.origin)
            .bind(&input.destination)
            .bind(&input.carrier)
            .bind(&input.transit_time)
            .bind(&input.container_size)
            .bind(&input.pickup_location)
            .bind(&input.delivery_location)
            .bind(&input.truck_type)
            .bind(&input.customs_type)
            .bind(&input.product_category)
            .bind(&input.notes)
            .bind(&input.custom_fields)
            .bind(input.inquiry_id)
            .bind(totals.as_ref().map(|(total, _)| *total))
            .bind(totals.as_ref().map(|(_, currency)| currency.as_str()))
            .fetch_optional(&mut *tx)
            .await?;

        let Some(quote) = quote else {
            return Ok(None);
        };

        let line_items = match &input.line_items {
            Some(items) => {
                LineItemRepo::delete_by_quote(&mut tx, id).await?;
                let created = LineItemRepo::insert_all(&mut tx, id, items).await?;
                tx.commit().await?;
                created
            }
            None => {
                tx.commit().await?;
                LineItemRepo::list_by_quote(pool, id).await?
            }
        };

        Ok(Some(QuoteDetail { quote, line_items }))
    }

    /// Delete a quote and, by cascade, its line items. Returns `true` if a
    /// row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM quotes WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Quotes matching the column criteria of a search, in insertion order.
    /// Price bounds and price ordering are left to the caller because they
    /// apply to the converted total.
    ///
    /// Origin and destination match as literal substrings.
    pub async fn search(
        pool: &PgPool,
        vendor_type: Option<VendorType>,
        criteria: &QuoteSearch,
    ) -> Result<Vec<QuoteDetail>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM quotes
             WHERE ($1::TEXT IS NULL OR vendor_type = $1)
               AND ($2::TEXT IS NULL OR origin ILIKE '%' || $2 || '%' ESCAPE '\\')
               AND ($3::TEXT IS NULL OR destination ILIKE '%' || $3 || '%' ESCAPE '\\')
               AND ($4::TEXT IS NULL OR container_size = $4)
             ORDER BY id ASC"
        );
        let blank_to_none = |v: &Option<String>| {
            v.as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };
        let quotes = sqlx::query_as::<_, Quote>(&query)
            .bind(vendor_type.map(VendorType::as_str))
            .bind(blank_to_none(&criteria.origin).map(|v| escape_like(&v)))
            .bind(blank_to_none(&criteria.destination).map(|v| escape_like(&v)))
            .bind(blank_to_none(&criteria.container_size))
            .fetch_all(pool)
            .await?;
        Self::with_items(pool, quotes).await
    }

    /// Link quotes without a vendor id to the vendor with the same name and
    /// type. When several vendors match, the oldest wins.
    pub async fn migrate_vendor_ids(pool: &PgPool) -> Result<VendorLinkReport, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let (total,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM quotes WHERE vendor_id IS NULL")
            .fetch_one(&mut *tx)
            .await?;

        let result = sqlx::query(
            "UPDATE quotes q SET vendor_id = (
                 SELECT MIN(v.id) FROM vendors v
                 WHERE v.name = q.vendor_name AND v.vendor_type = q.vendor_type
             )
             WHERE q.vendor_id IS NULL
               AND EXISTS (
                 SELECT 1 FROM vendors v
                 WHERE v.name = q.vendor_name AND v.vendor_type = q.vendor_type
             )",
        )
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        let migrated = result.rows_affected();
        tracing::debug!(migrated, total, "Linked quotes to vendors by name and type");
        Ok(VendorLinkReport { migrated, total })
    }

    /// Attach line items to quotes, preserving the quote order.
    async fn with_items(pool: &PgPool, quotes: Vec<Quote>) -> Result<Vec<QuoteDetail>, sqlx::Error> {
        let ids: Vec<DbId> = quotes.iter().map(|q| q.id).collect();
        let mut grouped: HashMap<DbId, Vec<LineItem>> = HashMap::new();
        for item in LineItemRepo::list_by_quotes(pool, &ids).await? {
            grouped.entry(item.quote_id).or_default().push(item);
        }
        Ok(quotes
            .into_iter()
            .map(|quote| {
                let line_items = grouped.remove(&quote.id).unwrap_or_default();
                QuoteDetail { quote, line_items }
            })
            .collect())
    }
}

/// Escape `LIKE` wildcards so the value matches literally under `ESCAPE '\'`.
fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
