//! Integration tests for the item endpoints.
//!
//! Each test serves the API on its own ephemeral port over a fresh
//! in-memory store, so tests are independent of each other.

use chrono::{Days, NaiveDate, Utc};
use pantry_integration_tests::{TestContext, detail};
use reqwest::StatusCode;
use serde_json::{Value, json};
use uuid::Uuid;

/// A date `days` after today (UTC), as `YYYY-MM-DD`.
fn days_from_today(days: u64) -> String {
    (Utc::now().date_naive() + Days::new(days))
        .format("%Y-%m-%d")
        .to_string()
}

fn item_body(email: &str, quantity: i64, expiry: &str) -> Value {
    json!({
        "name": "Test User",
        "email": email,
        "item_name": "Oat milk",
        "quantity": quantity,
        "expiry_date": expiry,
    })
}

/// Test helper: create an item and return its id.
async fn create_item(ctx: &TestContext, body: &Value) -> String {
    let resp = ctx
        .client
        .post(ctx.url("/items"))
        .json(body)
        .send()
        .await
        .expect("Failed to create item");
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.expect("Invalid JSON");
    assert_eq!(body["message"], "Item created");
    body["item_id"]
        .as_str()
        .expect("item_id missing")
        .to_string()
}

async fn get(ctx: &TestContext, path: &str) -> (StatusCode, Value) {
    let resp = ctx
        .client
        .get(ctx.url(path))
        .send()
        .await
        .expect("Request failed");
    let status = resp.status();
    (status, resp.json().await.expect("Invalid JSON"))
}

async fn put(ctx: &TestContext, path: &str, body: &Value) -> (StatusCode, Value) {
    let resp = ctx
        .client
        .put(ctx.url(path))
        .json(body)
        .send()
        .await
        .expect("Request failed");
    let status = resp.status();
    (status, resp.json().await.expect("Invalid JSON"))
}

// ============================================================================
// Create / Read
// ============================================================================

#[tokio::test]
async fn test_create_then_get_round_trip() {
    let ctx = TestContext::spawn().await;
    let expiry = days_from_today(10);

    let id = create_item(&ctx, &item_body("john@example.com", 5, &expiry)).await;
    assert!(Uuid::try_parse(&id).is_ok());

    let (status, item) = get(&ctx, &format!("/items/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(item["_id"], id.as_str());
    assert_eq!(item["name"], "Test User");
    assert_eq!(item["email"], "john@example.com");
    assert_eq!(item["item_name"], "Oat milk");
    assert_eq!(item["quantity"], 5);
    assert_eq!(item["expiry_date"], expiry.as_str());

    let inserted = item["insert_date"].as_str().expect("insert_date missing");
    assert!(chrono::DateTime::parse_from_rfc3339(inserted).is_ok());
}

#[tokio::test]
async fn test_client_cannot_set_insert_date() {
    let ctx = TestContext::spawn().await;
    let mut body = item_body("a@example.com", 1, &days_from_today(3));
    body["insert_date"] = json!("1999-01-01T00:00:00Z");

    let id = create_item(&ctx, &body).await;
    let (_, item) = get(&ctx, &format!("/items/{id}")).await;
    assert!(!item["insert_date"].as_str().unwrap_or_default().starts_with("1999"));
}

#[tokio::test]
async fn test_expiry_today_or_earlier_is_rejected() {
    let ctx = TestContext::spawn().await;
    let today = Utc::now().date_naive().format("%Y-%m-%d").to_string();

    for expiry in [today.as_str(), "2020-01-01"] {
        let resp = ctx
            .client
            .post(ctx.url("/items"))
            .json(&item_body("a@example.com", 1, expiry))
            .send()
            .await
            .expect("Request failed");
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY, "{expiry}");
    }

    let (_, items) = get(&ctx, "/items/filter").await;
    assert_eq!(items, json!([]));
}

#[tokio::test]
async fn test_invalid_fields_are_rejected() {
    let ctx = TestContext::spawn().await;
    let expiry = days_from_today(5);

    let long_name = "x".repeat(101);
    let cases = [
        item_body("a@example.com", 0, &expiry),
        item_body("a@example.com", -3, &expiry),
        item_body("not-an-email", 1, &expiry),
        item_body("a@example.com", 1, "next tuesday"),
        json!({"name": long_name, "email": "a@example.com", "item_name": "Rice", "quantity": 1, "expiry_date": expiry}),
        json!({"name": "No email", "item_name": "Rice", "quantity": 1, "expiry_date": expiry}),
    ];

    for body in &cases {
        let resp = ctx
            .client
            .post(ctx.url("/items"))
            .json(body)
            .send()
            .await
            .expect("Request failed");
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY, "{body}");
        let error: Value = resp.json().await.expect("Invalid JSON");
        assert!(!detail(&error).is_empty());
    }
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let ctx = TestContext::spawn().await;
    let resp = ctx
        .client
        .post(ctx.url("/items"))
        .header("content-type", "application/json")
        .body("{\"name\": ")
        .send()
        .await
        .expect("Request failed");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_get_invalid_and_absent_ids() {
    let ctx = TestContext::spawn().await;

    let (status, body) = get(&ctx, "/items/not-a-valid-id").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(detail(&body), "Invalid item ID");

    let (status, body) = get(&ctx, &format!("/items/{}", Uuid::new_v4())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(detail(&body), "Item not found");
}

// ============================================================================
// Filter
// ============================================================================

#[tokio::test]
async fn test_filter_without_params_returns_everything() {
    let ctx = TestContext::spawn().await;
    let expiry = days_from_today(7);
    for quantity in [1, 2, 3] {
        create_item(&ctx, &item_body("a@example.com", quantity, &expiry)).await;
    }

    let (status, items) = get(&ctx, "/items/filter").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(items.as_array().map(Vec::len), Some(3));

    // Empty values behave like absent ones
    let (status, items) = get(&ctx, "/items/filter?email=&quantity=&expiry_date=").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(items.as_array().map(Vec::len), Some(3));
}

#[tokio::test]
async fn test_filter_by_quantity_is_at_least() {
    let ctx = TestContext::spawn().await;
    let expiry = days_from_today(7);
    for quantity in [1, 5, 9] {
        create_item(&ctx, &item_body("a@example.com", quantity, &expiry)).await;
    }

    let (_, items) = get(&ctx, "/items/filter?quantity=5").await;
    let mut quantities: Vec<i64> = items
        .as_array()
        .expect("expected a list")
        .iter()
        .filter_map(|item| item["quantity"].as_i64())
        .collect();
    quantities.sort_unstable();
    assert_eq!(quantities, vec![5, 9]);
}

#[tokio::test]
async fn test_filter_by_email_and_expiry() {
    let ctx = TestContext::spawn().await;
    let soon = days_from_today(2);
    let later = days_from_today(40);
    create_item(&ctx, &item_body("a@example.com", 1, &soon)).await;
    let wanted = create_item(&ctx, &item_body("a@example.com", 1, &later)).await;
    create_item(&ctx, &item_body("b@example.com", 1, &later)).await;

    let cutoff = days_from_today(20);
    let (status, items) = get(
        &ctx,
        &format!("/items/filter?email=a@example.com&expiry_date={cutoff}"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let items = items.as_array().expect("expected a list");
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["_id"], wanted.as_str());

    // Strictly greater: the exact expiry date does not match itself
    let (_, items) = get(&ctx, &format!("/items/filter?expiry_date={later}")).await;
    assert_eq!(items, json!([]));
}

#[tokio::test]
async fn test_filter_expiry_sees_updated_items() {
    let ctx = TestContext::spawn().await;
    let id = create_item(&ctx, &item_body("a@example.com", 1, &days_from_today(2))).await;

    let moved = days_from_today(60);
    let (status, _) = put(&ctx, &format!("/items/{id}"), &json!({"expiry_date": moved})).await;
    assert_eq!(status, StatusCode::OK);

    let (_, items) = get(
        &ctx,
        &format!("/items/filter?expiry_date={}", days_from_today(30)),
    )
    .await;
    let items = items.as_array().expect("expected a list");
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["expiry_date"], moved.as_str());
}

#[tokio::test]
async fn test_filter_by_insert_date() {
    let ctx = TestContext::spawn().await;
    create_item(&ctx, &item_body("a@example.com", 1, &days_from_today(2))).await;

    let (_, items) = get(&ctx, "/items/filter?insert_date=2000-01-01").await;
    assert_eq!(items.as_array().map(Vec::len), Some(1));

    let (_, items) = get(&ctx, "/items/filter?insert_date=2999-01-01").await;
    assert_eq!(items, json!([]));
}

#[tokio::test]
async fn test_filter_rejects_unparseable_params() {
    let ctx = TestContext::spawn().await;

    let (status, body) = get(&ctx, "/items/filter?expiry_date=31-12-2030").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        detail(&body),
        "Invalid date format for expiry_date. Use yyyy-mm-dd format."
    );

    let (status, body) = get(&ctx, "/items/filter?insert_date=soon").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        detail(&body),
        "Invalid date format for insert_date. Use yyyy-mm-dd format."
    );

    let (status, _) = get(&ctx, "/items/filter?quantity=many").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ============================================================================
// Aggregate
// ============================================================================

#[tokio::test]
async fn test_aggregate_counts_per_email() {
    let ctx = TestContext::spawn().await;
    let expiry = days_from_today(3);
    for email in [
        "a@example.com",
        "b@example.com",
        "a@example.com",
        "c@example.com",
        "a@example.com",
    ] {
        create_item(&ctx, &item_body(email, 1, &expiry)).await;
    }

    let (status, rows) = get(&ctx, "/items/aggregate").await;
    assert_eq!(status, StatusCode::OK);

    let mut counts: Vec<(String, u64)> = rows
        .as_array()
        .expect("expected a list")
        .iter()
        .map(|row| {
            (
                row["_id"].as_str().unwrap_or_default().to_string(),
                row["total_items"].as_u64().unwrap_or_default(),
            )
        })
        .collect();
    counts.sort();
    assert_eq!(
        counts,
        vec![
            ("a@example.com".to_string(), 3),
            ("b@example.com".to_string(), 1),
            ("c@example.com".to_string(), 1),
        ]
    );
}

#[tokio::test]
async fn test_aggregate_empty_collection() {
    let ctx = TestContext::spawn().await;
    let (status, rows) = get(&ctx, "/items/aggregate").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(rows, json!([]));
}

// ============================================================================
// Update / Delete
// ============================================================================

#[tokio::test]
async fn test_partial_update_touches_only_supplied_fields() {
    let ctx = TestContext::spawn().await;
    let expiry = days_from_today(4);
    let id = create_item(&ctx, &item_body("a@example.com", 2, &expiry)).await;
    let (_, before) = get(&ctx, &format!("/items/{id}")).await;

    let (status, body) = put(&ctx, &format!("/items/{id}"), &json!({"quantity": 10})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Item updated successfully");

    let (_, after) = get(&ctx, &format!("/items/{id}")).await;
    assert_eq!(after["quantity"], 10);
    for field in ["_id", "name", "email", "item_name", "expiry_date", "insert_date"] {
        assert_eq!(after[field], before[field], "{field} changed");
    }
}

#[tokio::test]
async fn test_update_rejections() {
    let ctx = TestContext::spawn().await;
    let id = create_item(&ctx, &item_body("a@example.com", 2, &days_from_today(4))).await;
    let path = format!("/items/{id}");

    let (status, _) = put(&ctx, &path, &json!({"quantity": 0})).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, body) = put(&ctx, &path, &json!({"email": null})).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(detail(&body), "email may not be null");

    let (status, _) = put(&ctx, &path, &json!({})).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, body) = put(&ctx, "/items/xyz", &json!({"quantity": 1})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(detail(&body), "Invalid item ID");

    let (status, body) = put(
        &ctx,
        &format!("/items/{}", Uuid::new_v4()),
        &json!({"quantity": 1}),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(detail(&body), "Item not found");

    // Nothing above modified the stored item
    let (_, item) = get(&ctx, &path).await;
    assert_eq!(item["quantity"], 2);
    assert_eq!(item["email"], "a@example.com");
}

#[tokio::test]
async fn test_update_expiry_is_not_checked_against_today() {
    let ctx = TestContext::spawn().await;
    let id = create_item(&ctx, &item_body("a@example.com", 2, &days_from_today(4))).await;

    let (status, _) = put(
        &ctx,
        &format!("/items/{id}"),
        &json!({"expiry_date": "2020-02-02"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, item) = get(&ctx, &format!("/items/{id}")).await;
    assert_eq!(item["expiry_date"], "2020-02-02");
    assert_eq!(
        NaiveDate::parse_from_str(item["expiry_date"].as_str().unwrap_or_default(), "%Y-%m-%d")
            .ok(),
        NaiveDate::from_ymd_opt(2020, 2, 2)
    );
}

#[tokio::test]
async fn test_delete_then_get_is_not_found() {
    let ctx = TestContext::spawn().await;
    let id = create_item(&ctx, &item_body("a@example.com", 2, &days_from_today(4))).await;

    let resp = ctx
        .client
        .delete(ctx.url(&format!("/items/{id}")))
        .send()
        .await
        .expect("Request failed");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Invalid JSON");
    assert_eq!(body["message"], "Item deleted successfully");

    let (status, _) = get(&ctx, &format!("/items/{id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let resp = ctx
        .client
        .delete(ctx.url(&format!("/items/{id}")))
        .send()
        .await
        .expect("Request failed");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = ctx
        .client
        .delete(ctx.url("/items/bogus"))
        .send()
        .await
        .expect("Request failed");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// ============================================================================
// Health
// ============================================================================

#[tokio::test]
async fn test_health_endpoints() {
    let ctx = TestContext::spawn().await;

    let resp = ctx
        .client
        .get(ctx.url("/health"))
        .send()
        .await
        .expect("Request failed");
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.text().await.expect("No body"), "ok");

    let resp = ctx
        .client
        .get(ctx.url("/health/ready"))
        .send()
        .await
        .expect("Request failed");
    assert_eq!(resp.status(), StatusCode::OK);
}
