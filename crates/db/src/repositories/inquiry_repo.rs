//! Repository for the `inquiries` and `inquiry_vendors` tables.

use quotedesk_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::inquiry::{
    CreateInquiry, Inquiry, InquiryDetail, InquiryRecipient, NewRecipient, SentStatus,
};

const COLUMNS: &str = "id, subject, content, inquiry_data, created_at";

const RECIPIENT_COLUMNS: &str =
    "id, inquiry_id, vendor_id, vendor_name, email, sent_status, sent_at";

/// Inquiries are append-only records of what was sent to whom.
pub struct InquiryRepo;

impl InquiryRepo {
    /// Store an inquiry and one row per recipient.
    pub async fn create(
        pool: &PgPool,
        input: &CreateInquiry,
        recipients: &[NewRecipient],
    ) -> Result<InquiryDetail, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO inquiries (subject, content, inquiry_data) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        let inquiry = sqlx::query_as::<_, Inquiry>(&query)
            .bind(&input.subject)
            .bind(&input.content)
            .bind(&input.inquiry_data)
            .fetch_one(&mut *tx)
            .await?;

        let recipient_query = format!(
            "INSERT INTO inquiry_vendors \
                (inquiry_id, vendor_id, vendor_name, email, sent_status, sent_at) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {RECIPIENT_COLUMNS}"
        );
        let mut stored = Vec::with_capacity(recipients.len());
        for recipient in recipients {
            let row = sqlx::query_as::<_, InquiryRecipient>(&recipient_query)
                .bind(inquiry.id)
                .bind(recipient.vendor_id)
                .bind(&recipient.vendor_name)
                .bind(&recipient.email)
                .bind(recipient.sent_status.as_str())
                .bind(recipient.sent_at)
                .fetch_one(&mut *tx)
                .await?;
            stored.push(row);
        }

        tx.commit().await?;
        Ok(InquiryDetail {
            inquiry,
            recipients: stored,
        })
    }

    /// Store the delivery outcome of each `(recipient id, status)` pair.
    /// `sent_at` is set on sent rows and cleared on the others.
    ///
    /// Returns the updated rows in the order given.
    pub async fn record_delivery(
        pool: &PgPool,
        outcomes: &[(DbId, SentStatus)],
        sent_at: Timestamp,
    ) -> Result<Vec<InquiryRecipient>, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let query = format!(
            "UPDATE inquiry_vendors \
             SET sent_status = $2, \
                 sent_at = CASE WHEN $2 = 'sent' THEN $3 ELSE NULL END \
             WHERE id = $1 \
             RETURNING {RECIPIENT_COLUMNS}"
        );
        let mut updated = Vec::with_capacity(outcomes.len());
        for (id, status) in outcomes {
            let row = sqlx::query_as::<_, InquiryRecipient>(&query)
                .bind(id)
                .bind(status.as_str())
                .bind(sent_at)
                .fetch_one(&mut *tx)
                .await?;
            updated.push(row);
        }
        tx.commit().await?;
        Ok(updated)
    }

    /// All inquiries, newest first.
    pub async fn list(pool: &PgPool) -> Result<Vec<Inquiry>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM inquiries ORDER BY created_at DESC, id DESC");
        sqlx::query_as::<_, Inquiry>(&query).fetch_all(pool).await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<InquiryDetail>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM inquiries WHERE id = $1");
        let inquiry = sqlx::query_as::<_, Inquiry>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;
        match inquiry {
            Some(inquiry) => {
                let recipients = Self::list_recipients(pool, inquiry.id).await?;
                Ok(Some(InquiryDetail {
                    inquiry,
                    recipients,
                }))
            }
            None => Ok(None),
        }
    }

    pub async fn list_recipients(
        pool: &PgPool,
        inquiry_id: DbId,
    ) -> Result<Vec<InquiryRecipient>, sqlx::Error> {
        let query = format!(
            "SELECT {RECIPIENT_COLUMNS} FROM inquiry_vendors WHERE inquiry_id = $1 ORDER BY id"
        );
        sqlx::query_as::<_, InquiryRecipient>(&query)
            .bind(inquiry_id)
            .fetch_all(pool)
            .await
    }
}
