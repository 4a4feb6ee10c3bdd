//! HTTP-level integration tests for the import previews and the dashboard.

mod common;

use axum::http::{header, StatusCode};
use common::{body_json, body_text, create_vendor, get, post_json, shipping_quote};
use serde_json::json;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Import
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_template_is_csv_with_bom(pool: PgPool) {
    let response = get(common::build_test_app(pool), "/api/v1/import/template").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/csv; charset=utf-8"
    );
    assert!(response.headers()[header::CONTENT_DISPOSITION]
        .to_str()
        .unwrap()
        .contains("quote_import_template.csv"));

    let body = body_text(response).await;
    assert!(body.starts_with("\u{feff}廠商類型,廠商名稱,價格"));
    assert_eq!(body.lines().count(), 4);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_csv_preview_reports_rows(pool: PgPool) {
    let text = "廠商類型,廠商名稱,價格,幣別,有效期限\n\
                shipping,長榮海運,1200,USD,2030-12-31\n\
                air,X,100,USD,2030-12-31\n";
    let response = post_json(
        common::build_test_app(pool),
        "/api/v1/import/csv",
        json!({"text": text}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let data = body_json(response).await["data"].clone();
    assert_eq!(data["quotes"].as_array().unwrap().len(), 1);
    assert_eq!(data["quotes"][0]["vendorName"], "長榮海運");
    assert_eq!(data["quotes"][0]["validUntil"], "2030-12-31");
    assert_eq!(data["errors"], json!(["行 3: 廠商類型無效"]));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_email_preview(pool: PgPool) {
    let text = "廠商：長榮海運\n基隆港 → 寧波港\n40HQ USD $1,200\n";
    let response = post_json(
        common::build_test_app(pool.clone()),
        "/api/v1/import/email",
        json!({"text": text}),
    )
    .await;
    let data = body_json(response).await["data"].clone();
    assert_eq!(data["errors"], json!([]));
    let quote = &data["quotes"][0];
    assert_eq!(quote["vendorName"], "長榮海運");
    assert_eq!(quote["vendorType"], "shipping");
    assert_eq!(quote["price"], 1200.0);
    assert_eq!(quote["currency"], "USD");
    assert_eq!(quote["containerSize"], "40HQ");

    let response = post_json(
        common::build_test_app(pool),
        "/api/v1/import/email",
        json!({"text": "hello"}),
    )
    .await;
    let data = body_json(response).await["data"].clone();
    assert_eq!(data["quotes"], json!([]));
    assert_eq!(data["errors"].as_array().unwrap().len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_preview_output_commits_through_batch(pool: PgPool) {
    let response = post_json(
        common::build_test_app(pool.clone()),
        "/api/v1/import/csv",
        json!({"text": "vendorType,vendorName,price,currency,validUntil\ncustoms,佳鑫,2500,TWD,2030-12-31\n"}),
    )
    .await;
    let quotes = body_json(response).await["data"]["quotes"].clone();

    let response = post_json(
        common::build_test_app(pool),
        "/api/v1/quotes/batch",
        json!({"quotes": quotes}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["created"], 1);
    assert_eq!(json["quotes"][0]["baseCurrency"], "TWD");
}

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_dashboard_on_empty_database(pool: PgPool) {
    let response = get(common::build_test_app(pool), "/api/v1/dashboard").await;
    assert_eq!(response.status(), StatusCode::OK);
    let data = body_json(response).await["data"].clone();
    assert_eq!(data["totalQuotes"], 0);
    assert_eq!(data["averagePrice"], 0.0);
    assert_eq!(data["typeDistribution"].as_array().unwrap().len(), 3);
    assert_eq!(data["expiringSoon"], json!([]));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_dashboard_summarizes_quotes_and_vendors(pool: PgPool) {
    let vendor_id = create_vendor(&pool, json!({"name": "A", "type": "shipping"})).await;
    create_vendor(&pool, json!({"name": "B", "type": "customs"})).await;

    post_json(
        common::build_test_app(pool.clone()),
        "/api/v1/quotes",
        shipping_quote(vendor_id, "A", 100.0, "USD"),
    )
    .await;
    let mut expired = shipping_quote(vendor_id, "A", 900.0, "TWD");
    expired["validUntil"] = json!("2000-01-01");
    post_json(common::build_test_app(pool.clone()), "/api/v1/quotes", expired).await;

    let response = get(common::build_test_app(pool), "/api/v1/dashboard").await;
    let data = body_json(response).await["data"].clone();
    assert_eq!(data["totalQuotes"], 2);
    assert_eq!(data["validQuotes"], 1);
    assert_eq!(data["expiredQuotes"], 1);
    assert_eq!(data["averagePrice"], 2000.0);
    assert_eq!(data["vendorCount"], 2);
    assert_eq!(data["newVendorsThisMonth"], 2);
    assert_eq!(data["topVendors"], json!([{"name": "A", "count": 2}]));
    assert_eq!(data["typeDistribution"][0]["count"], 2);
    assert_eq!(data["typeDistribution"][0]["percent"], 100);
}
