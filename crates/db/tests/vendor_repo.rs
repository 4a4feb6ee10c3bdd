//! Integration tests for vendors and their contacts.

use assert_matches::assert_matches;
use quotedesk_core::inquiry::recipient_email;
use quotedesk_core::vendor_type::VendorType;
use quotedesk_db::models::vendor::{CreateVendor, UpdateVendor, DEFAULT_RATING};
use quotedesk_db::models::vendor_contact::ContactInput;
use quotedesk_db::repositories::{VendorContactRepo, VendorRepo};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn contact(name: &str, email: Option<&str>, is_primary: bool) -> ContactInput {
    ContactInput {
        name: name.to_string(),
        email: email.map(str::to_string),
        is_primary,
        ..Default::default()
    }
}

fn new_vendor(name: &str, vendor_type: VendorType, contacts: Vec<ContactInput>) -> CreateVendor {
    CreateVendor {
        name: Some(name.to_string()),
        vendor_type: Some(vendor_type),
        contacts,
        ..Default::default()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_defaults_rating_and_orders_contacts(pool: PgPool) {
    let created = VendorRepo::create(
        &pool,
        &new_vendor(
            "長榮海運",
            VendorType::Shipping,
            vec![
                contact("王小明", Some("ops@evergreen.example"), false),
                contact("李大華", Some("sales@evergreen.example"), true),
            ],
        ),
    )
    .await
    .unwrap();

    assert_eq!(created.vendor.rating, DEFAULT_RATING);
    assert_eq!(created.contacts.len(), 2);
    assert_eq!(created.contacts[0].display_order, 0);
    assert_eq!(created.contacts[1].display_order, 1);
    assert_eq!(recipient_email(&created.contacts), Some("sales@evergreen.example"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn rating_out_of_range_is_rejected_by_schema(pool: PgPool) {
    let mut input = new_vendor("A", VendorType::Customs, vec![]);
    input.rating = Some(7.5);
    let result = VendorRepo::create(&pool, &input).await;
    assert_matches!(result, Err(sqlx::Error::Database(_)));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_is_sorted_by_name(pool: PgPool) {
    for name in ["Charlie", "Alpha", "Bravo"] {
        VendorRepo::create(&pool, &new_vendor(name, VendorType::Trucking, vec![]))
            .await
            .unwrap();
    }
    let names: Vec<String> = VendorRepo::list(&pool)
        .await
        .unwrap()
        .into_iter()
        .map(|v| v.vendor.name)
        .collect();
    assert_eq!(names, vec!["Alpha", "Bravo", "Charlie"]);
    assert_eq!(VendorRepo::list_created_at(&pool).await.unwrap().len(), 3);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_replaces_contacts_only_when_given(pool: PgPool) {
    let created = VendorRepo::create(
        &pool,
        &new_vendor("A", VendorType::Shipping, vec![contact("x", None, false)]),
    )
    .await
    .unwrap();
    let id = created.vendor.id;

    let renamed = VendorRepo::update(
        &pool,
        id,
        &UpdateVendor {
            rating: Some(3.5),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(renamed.vendor.rating, 3.5);
    assert_eq!(renamed.vendor.name, "A");
    assert_eq!(renamed.contacts.len(), 1);

    let replaced = VendorRepo::update(
        &pool,
        id,
        &UpdateVendor {
            contacts: Some(vec![contact("y", Some("y@a.com"), true), contact("z", None, false)]),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .unwrap();
    let names: Vec<&str> = replaced.contacts.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["y", "z"]);

    let cleared = VendorRepo::update(
        &pool,
        id,
        &UpdateVendor {
            contacts: Some(vec![]),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert!(cleared.contacts.is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_missing_vendor_is_none(pool: PgPool) {
    let result = VendorRepo::update(&pool, 77, &UpdateVendor::default())
        .await
        .unwrap();
    assert!(result.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn delete_cascades_to_contacts(pool: PgPool) {
    let created = VendorRepo::create(
        &pool,
        &new_vendor("A", VendorType::Shipping, vec![contact("x", None, true)]),
    )
    .await
    .unwrap();
    let id = created.vendor.id;

    assert!(VendorRepo::delete(&pool, id).await.unwrap());
    assert!(VendorRepo::find_by_id(&pool, id).await.unwrap().is_none());
    assert!(VendorContactRepo::list_by_vendor(&pool, id).await.unwrap().is_empty());
    assert!(!VendorRepo::delete(&pool, id).await.unwrap());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn find_by_ids_skips_unknown(pool: PgPool) {
    let a = VendorRepo::create(&pool, &new_vendor("A", VendorType::Shipping, vec![]))
        .await
        .unwrap();
    let found = VendorRepo::find_by_ids(&pool, &[a.vendor.id, 9999]).await.unwrap();
    assert_eq!(found.len(), 1);
    assert!(VendorRepo::find_by_ids(&pool, &[]).await.unwrap().is_empty());
}
