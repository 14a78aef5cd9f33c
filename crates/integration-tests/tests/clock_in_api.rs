//! Integration tests for the clock-in endpoints.

use pantry_integration_tests::{TestContext, detail};
use reqwest::StatusCode;
use serde_json::{Value, json};
use uuid::Uuid;

/// Test helper: record a clock-in and return its id.
async fn clock_in(ctx: &TestContext, email: &str, location: &str) -> String {
    let resp = ctx
        .client
        .post(ctx.url("/clock-in"))
        .json(&json!({"email": email, "location": location}))
        .send()
        .await
        .expect("Failed to clock in");
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.expect("Invalid JSON");
    assert_eq!(body["message"], "Clock-in record created");
    body["record_id"]
        .as_str()
        .expect("record_id missing")
        .to_string()
}

async fn get_record(ctx: &TestContext, id: &str) -> (StatusCode, Value) {
    let resp = ctx
        .client
        .get(ctx.url(&format!("/clock-in/{id}")))
        .send()
        .await
        .expect("Request failed");
    let status = resp.status();
    (status, resp.json().await.expect("Invalid JSON"))
}

#[tokio::test]
async fn test_create_get_update_round_trip() {
    let ctx = TestContext::spawn().await;
    let id = clock_in(&ctx, "worker@example.com", "Warehouse A").await;

    let (status, record) = get_record(&ctx, &id).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(record["_id"], id.as_str());
    assert_eq!(record["email"], "worker@example.com");
    assert_eq!(record["location"], "Warehouse A");
    let inserted = record["insert_datetime"]
        .as_str()
        .expect("insert_datetime missing")
        .to_string();
    assert!(chrono::DateTime::parse_from_rfc3339(&inserted).is_ok());

    let resp = ctx
        .client
        .put(ctx.url(&format!("/clock-in/{id}")))
        .json(&json!({"location": "Warehouse B"}))
        .send()
        .await
        .expect("Request failed");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Invalid JSON");
    assert_eq!(body["message"], "Clock-in record updated successfully");

    let (_, record) = get_record(&ctx, &id).await;
    assert_eq!(record["location"], "Warehouse B");
    assert_eq!(record["email"], "worker@example.com");
    assert_eq!(record["insert_datetime"], inserted.as_str());
}

#[tokio::test]
async fn test_create_validation() {
    let ctx = TestContext::spawn().await;
    let long_location = "L".repeat(101);

    for body in [
        json!({"email": "not an email", "location": "Gate"}),
        json!({"email": "w@example.com", "location": long_location}),
        json!({"location": "Gate"}),
    ] {
        let resp = ctx
            .client
            .post(ctx.url("/clock-in"))
            .json(&body)
            .send()
            .await
            .expect("Request failed");
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY, "{body}");
    }
}

#[tokio::test]
async fn test_invalid_and_absent_ids() {
    let ctx = TestContext::spawn().await;

    let (status, body) = get_record(&ctx, "abc").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(detail(&body), "Invalid record ID");

    let (status, body) = get_record(&ctx, &Uuid::new_v4().to_string()).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(detail(&body), "Clock-in record not found");

    let resp = ctx
        .client
        .put(ctx.url(&format!("/clock-in/{}", Uuid::new_v4())))
        .json(&json!({"location": "Gate"}))
        .send()
        .await
        .expect("Request failed");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_rejects_null_and_invalid_values() {
    let ctx = TestContext::spawn().await;
    let id = clock_in(&ctx, "w@example.com", "Gate").await;

    for body in [
        json!({"location": null}),
        json!({"email": "nope"}),
        json!({}),
    ] {
        let resp = ctx
            .client
            .put(ctx.url(&format!("/clock-in/{id}")))
            .json(&body)
            .send()
            .await
            .expect("Request failed");
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY, "{body}");
    }

    let (_, record) = get_record(&ctx, &id).await;
    assert_eq!(record["location"], "Gate");
}

#[tokio::test]
async fn test_clock_in_has_no_delete() {
    let ctx = TestContext::spawn().await;
    let id = clock_in(&ctx, "w@example.com", "Gate").await;

    let resp = ctx
        .client
        .delete(ctx.url(&format!("/clock-in/{id}")))
        .send()
        .await
        .expect("Request failed");
    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);

    let (status, _) = get_record(&ctx, &id).await;
    assert_eq!(status, StatusCode::OK);
}
