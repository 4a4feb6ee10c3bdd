//! HTTP-level integration tests for custom field and fee type endpoints.

mod common;

use axum::http::StatusCode;
use common::{body_json, delete, get, post_json, put_json};
use serde_json::json;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Custom fields
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_custom_field_lifecycle(pool: PgPool) {
    let response = post_json(
        common::build_test_app(pool.clone()),
        "/api/v1/custom-fields",
        json!({"name": "船公司等級", "fieldType": "select", "vendorType": "shipping",
               "options": ["A", "B"], "order": 2}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let field = body_json(response).await["data"].clone();
    let id = field["id"].as_i64().unwrap();
    assert_eq!(field["options"], json!(["A", "B"]));
    assert_eq!(field["isRequired"], false);
    assert_eq!(field["order"], 2);

    let response = put_json(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/custom-fields/{id}"),
        json!({"isRequired": true}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["isRequired"], true);

    let response = get(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/custom-fields/{id}"),
    )
    .await;
    assert_eq!(body_json(response).await["data"]["name"], "船公司等級");

    let response = delete(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/custom-fields/{id}"),
    )
    .await;
    assert_eq!(body_json(response).await, json!({"success": true}));

    let response = get(
        common::build_test_app(pool),
        &format!("/api/v1/custom-fields/{id}"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_select_field_requires_options(pool: PgPool) {
    let response = post_json(
        common::build_test_app(pool.clone()),
        "/api/v1/custom-fields",
        json!({"name": "等級", "fieldType": "select", "vendorType": "shipping", "options": []}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // A text field turned into a select must bring its options along.
    let response = post_json(
        common::build_test_app(pool.clone()),
        "/api/v1/custom-fields",
        json!({"name": "備註", "fieldType": "text", "vendorType": "customs"}),
    )
    .await;
    let id = body_json(response).await["data"]["id"].as_i64().unwrap();

    let response = put_json(
        common::build_test_app(pool),
        &format!("/api/v1/custom-fields/{id}"),
        json!({"fieldType": "select"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_custom_field_requires_vendor_type(pool: PgPool) {
    let response = post_json(
        common::build_test_app(pool),
        "/api/v1/custom-fields",
        json!({"name": "X", "fieldType": "text"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json["error"]
        .as_str()
        .unwrap()
        .contains("Missing required fields (name, fieldType, vendorType)"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_custom_fields_for_vendor_type(pool: PgPool) {
    for (name, vendor_type) in [("A", "shipping"), ("B", "trucking"), ("C", "shipping")] {
        post_json(
            common::build_test_app(pool.clone()),
            "/api/v1/custom-fields",
            json!({"name": name, "fieldType": "text", "vendorType": vendor_type}),
        )
        .await;
    }

    let response = get(
        common::build_test_app(pool.clone()),
        "/api/v1/custom-fields/vendor/shipping",
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let fields = body_json(response).await["data"].clone();
    let fields = fields.as_array().unwrap();
    assert_eq!(fields.len(), 2);
    assert!(fields.iter().all(|f| f["vendorType"] == "shipping"));

    let response = get(
        common::build_test_app(pool.clone()),
        "/api/v1/custom-fields/vendor/air",
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = get(common::build_test_app(pool), "/api/v1/custom-fields").await;
    assert_eq!(body_json(response).await["data"].as_array().unwrap().len(), 3);
}

// ---------------------------------------------------------------------------
// Fee types
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_fee_type_and_reject_duplicate(pool: PgPool) {
    let body = json!({"name": " 文件費 ", "category": "海運", "description": "  "});
    let response = post_json(
        common::build_test_app(pool.clone()),
        "/api/v1/fee-types",
        body.clone(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let fee_type = body_json(response).await["data"].clone();
    assert_eq!(fee_type["name"], "文件費");
    assert_eq!(fee_type["category"], "海運");
    assert!(fee_type["description"].is_null());
    assert_eq!(fee_type["isActive"], true);

    let response = post_json(common::build_test_app(pool), "/api/v1/fee-types", body).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["code"], "CONFLICT");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_fee_type_requires_category(pool: PgPool) {
    let response = post_json(
        common::build_test_app(pool.clone()),
        "/api/v1/fee-types",
        json!({"name": "文件費"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = post_json(
        common::build_test_app(pool),
        "/api/v1/fee-types",
        json!({"name": "文件費", "category": "空運"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_deactivated_fee_types_are_hidden_by_default(pool: PgPool) {
    let mut ids = Vec::new();
    for name in ["THC", "拖車費"] {
        let response = post_json(
            common::build_test_app(pool.clone()),
            "/api/v1/fee-types",
            json!({"name": name, "category": "拖車"}),
        )
        .await;
        ids.push(body_json(response).await["data"]["id"].as_i64().unwrap());
    }

    let response = put_json(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/fee-types/{}", ids[0]),
        json!({"isActive": false}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["isActive"], false);

    let response = get(common::build_test_app(pool.clone()), "/api/v1/fee-types").await;
    let active = body_json(response).await["data"].clone();
    assert_eq!(active.as_array().unwrap().len(), 1);
    assert_eq!(active[0]["name"], "拖車費");

    let response = get(
        common::build_test_app(pool),
        "/api/v1/fee-types?includeInactive=true",
    )
    .await;
    assert_eq!(body_json(response).await["data"].as_array().unwrap().len(), 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_missing_fee_type_is_404(pool: PgPool) {
    let response = put_json(
        common::build_test_app(pool),
        "/api/v1/fee-types/999999",
        json!({"name": "X"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
