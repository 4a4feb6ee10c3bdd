//! Integration tests for custom fields, fee types and inquiries.

use assert_matches::assert_matches;
use quotedesk_core::vendor_type::{FeeCategory, FieldType, VendorType};
use quotedesk_db::models::custom_field::{CreateCustomField, UpdateCustomField};
use quotedesk_db::models::fee_type::UpdateFeeType;
use quotedesk_db::models::inquiry::{CreateInquiry, NewRecipient, SentStatus};
use quotedesk_db::models::vendor::CreateVendor;
use quotedesk_db::repositories::{CustomFieldRepo, FeeTypeRepo, InquiryRepo, VendorRepo};
use serde_json::json;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Custom fields
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn custom_field_defaults(pool: PgPool) {
    let field = CustomFieldRepo::create(
        &pool,
        &CreateCustomField {
            name: Some("免費天數".into()),
            field_type: Some(FieldType::Number),
            vendor_type: Some(VendorType::Shipping),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    assert!(field.options.is_empty());
    assert!(!field.is_required);
    assert_eq!(field.display_order, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn custom_fields_filter_by_vendor_type(pool: PgPool) {
    for (name, vendor_type, order) in [
        ("b", VendorType::Shipping, 2),
        ("a", VendorType::Shipping, 1),
        ("c", VendorType::Customs, 1),
    ] {
        CustomFieldRepo::create(
            &pool,
            &CreateCustomField {
                name: Some(name.into()),
                field_type: Some(FieldType::Text),
                vendor_type: Some(vendor_type),
                display_order: Some(order),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    }

    let shipping: Vec<String> = CustomFieldRepo::list_by_vendor_type(&pool, VendorType::Shipping)
        .await
        .unwrap()
        .into_iter()
        .map(|f| f.name)
        .collect();
    assert_eq!(shipping, vec!["a", "b"]);
    assert_eq!(CustomFieldRepo::list(&pool).await.unwrap().len(), 3);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn custom_field_update_and_delete(pool: PgPool) {
    let field = CustomFieldRepo::create(
        &pool,
        &CreateCustomField {
            name: Some("艙位".into()),
            field_type: Some(FieldType::Text),
            vendor_type: Some(VendorType::Shipping),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let updated = CustomFieldRepo::update(
        &pool,
        field.id,
        &UpdateCustomField {
            field_type: Some(FieldType::Select),
            options: Some(vec!["有".into(), "無".into()]),
            is_required: Some(true),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(updated.field_type, FieldType::Select);
    assert_eq!(updated.options, vec!["有", "無"]);
    assert!(updated.is_required);
    assert_eq!(updated.name, "艙位");

    assert!(CustomFieldRepo::delete(&pool, field.id).await.unwrap());
    assert!(CustomFieldRepo::find_by_id(&pool, field.id).await.unwrap().is_none());
}

// ---------------------------------------------------------------------------
// Fee types
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn fee_type_name_is_unique_per_category(pool: PgPool) {
    FeeTypeRepo::create(&pool, "THC", FeeCategory::Shipping, None)
        .await
        .unwrap();
    FeeTypeRepo::create(&pool, "THC", FeeCategory::Trucking, None)
        .await
        .unwrap();

    let dup = FeeTypeRepo::create(&pool, "THC", FeeCategory::Shipping, Some("again")).await;
    assert_matches!(
        dup,
        Err(sqlx::Error::Database(ref e)) if e.constraint() == Some("uq_fee_types_name_category")
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn inactive_fee_types_are_hidden_by_default(pool: PgPool) {
    let thc = FeeTypeRepo::create(&pool, "THC", FeeCategory::Shipping, None)
        .await
        .unwrap();
    FeeTypeRepo::create(&pool, "BAF", FeeCategory::Shipping, None)
        .await
        .unwrap();
    assert!(thc.is_active);

    FeeTypeRepo::update(
        &pool,
        thc.id,
        &UpdateFeeType {
            is_active: Some(false),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .unwrap();

    let active = FeeTypeRepo::list(&pool, false).await.unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].name, "BAF");
    assert_eq!(FeeTypeRepo::list(&pool, true).await.unwrap().len(), 2);

    let stored = FeeTypeRepo::find_by_id(&pool, thc.id).await.unwrap().unwrap();
    assert!(!stored.is_active);
    assert_eq!(stored.category, FeeCategory::Shipping);
}

// ---------------------------------------------------------------------------
// Inquiries
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn inquiry_keeps_recipients_after_vendor_delete(pool: PgPool) {
    let vendor = VendorRepo::create(
        &pool,
        &CreateVendor {
            name: Some("A".into()),
            vendor_type: Some(VendorType::Trucking),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let created = InquiryRepo::create(
        &pool,
        &CreateInquiry {
            subject: "報價詢問".into(),
            content: "body".into(),
            inquiry_data: json!({"vendor_type": "trucking"}),
        },
        &[NewRecipient {
            vendor_id: vendor.vendor.id,
            vendor_name: "A".into(),
            email: "a@a.com".into(),
            sent_status: SentStatus::Sent,
            sent_at: Some(chrono::Utc::now()),
        }],
    )
    .await
    .unwrap();
    assert_eq!(created.recipients.len(), 1);
    assert_eq!(created.recipients[0].sent_status, "sent");

    VendorRepo::delete(&pool, vendor.vendor.id).await.unwrap();

    let found = InquiryRepo::find_by_id(&pool, created.inquiry.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.inquiry.inquiry_data, json!({"vendor_type": "trucking"}));
    assert_eq!(found.recipients[0].vendor_id, None);
    assert_eq!(found.recipients[0].vendor_name, "A");
    assert_eq!(InquiryRepo::list(&pool).await.unwrap().len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn pending_recipients_take_their_delivery_outcome(pool: PgPool) {
    let pending = |name: &str| NewRecipient {
        vendor_id: 0,
        vendor_name: name.into(),
        email: format!("{name}@example.test"),
        sent_status: SentStatus::Pending,
        sent_at: None,
    };
    let mut recipients = Vec::new();
    for name in ["a", "b"] {
        let vendor = VendorRepo::create(
            &pool,
            &CreateVendor {
                name: Some(name.into()),
                vendor_type: Some(VendorType::Shipping),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        recipients.push(NewRecipient {
            vendor_id: vendor.vendor.id,
            ..pending(name)
        });
    }

    let created = InquiryRepo::create(
        &pool,
        &CreateInquiry {
            subject: "報價詢問".into(),
            content: "body".into(),
            inquiry_data: json!({}),
        },
        &recipients,
    )
    .await
    .unwrap();
    assert!(created.recipients.iter().all(|r| r.sent_status == "pending"));

    let outcomes = [
        (created.recipients[0].id, SentStatus::Sent),
        (created.recipients[1].id, SentStatus::Failed),
    ];
    let updated = InquiryRepo::record_delivery(&pool, &outcomes, chrono::Utc::now())
        .await
        .unwrap();
    assert_eq!(updated[0].sent_status, "sent");
    assert!(updated[0].sent_at.is_some());
    assert_eq!(updated[1].sent_status, "failed");
    assert_eq!(updated[1].sent_at, None);

    let stored = InquiryRepo::list_recipients(&pool, created.inquiry.id)
        .await
        .unwrap();
    assert_eq!(stored[1].sent_status, "failed");
}
