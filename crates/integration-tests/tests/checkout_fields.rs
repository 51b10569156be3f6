//! Integration tests for checkout field decisions and session pre-fill.

#![allow(clippy::unwrap_used)]

use axum::http::{Method, StatusCode};
use civic_checkout::services::{CheckoutRules, FieldProfile};
use civic_checkout_integration_tests::{ACCESSORY, BUSINESS, MOBILE, STUDENT, TestContext, cart};
use serde_json::{Value, json};

fn field_keys(body: &Value) -> Vec<String> {
    body["fields"]
        .as_array()
        .unwrap()
        .iter()
        .map(|field| field["key"].as_str().unwrap().to_owned())
        .collect()
}

#[tokio::test]
async fn test_health() {
    let ctx = TestContext::new();
    let resp = ctx.get("/health").await;

    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.text(), "ok");
    assert!(resp.headers.contains_key("x-request-id"));
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let ctx = TestContext::new();
    let request = axum::http::Request::builder()
        .uri("/health")
        .header("x-request-id", "upstream-123")
        .body(axum::body::Body::empty())
        .unwrap();

    let resp = tower::ServiceExt::oneshot(ctx.app.clone(), request)
        .await
        .unwrap();
    assert_eq!(resp.headers()["x-request-id"], "upstream-123");
}

#[tokio::test]
async fn test_subscription_cart_needs_civic_number() {
    let ctx = TestContext::new();
    let resp = ctx.post("/checkout/fields", &cart(&[MOBILE, ACCESSORY])).await;

    assert_eq!(resp.status, StatusCode::OK);
    let body: Value = resp.json();
    assert_eq!(
        body["decision"],
        json!({"needs_civic": true, "needs_org": false, "free_shipping": true})
    );
    assert_eq!(field_keys(&body), vec!["social_civic_number"]);

    let field = &body["fields"][0];
    assert_eq!(field["label"], "Personnummer (ÅÅÅÅMMDDXXXX)");
    assert_eq!(field["placeholder"], "19900101-1234 or 199001011234");
    assert_eq!(field["required"], true);
    assert_eq!(field["priority"], 5);
    assert_eq!(field["default_value"], "");
}

#[tokio::test]
async fn test_business_cart_needs_both_numbers() {
    let ctx = TestContext::new();
    let resp = ctx.post("/checkout/fields", &cart(&[BUSINESS])).await;

    let body: Value = resp.json();
    assert_eq!(body["decision"]["needs_civic"], true);
    assert_eq!(body["decision"]["needs_org"], true);
    assert_eq!(
        field_keys(&body),
        vec!["social_civic_number", "organization_number"]
    );
}

#[tokio::test]
async fn test_accessory_cart_shows_no_fields() {
    let ctx = TestContext::new();

    for products in [vec![ACCESSORY], vec![]] {
        let body: Value = ctx.post("/checkout/fields", &cart(&products)).await.json();
        assert_eq!(
            body["decision"],
            json!({"needs_civic": false, "needs_org": false, "free_shipping": false})
        );
        assert!(field_keys(&body).is_empty());
    }
}

#[tokio::test]
async fn test_unknown_product_has_no_categories() {
    let ctx = TestContext::new();
    let body: Value = ctx
        .post("/checkout/fields", &json!({"items": [{"product_id": 999}]}))
        .await
        .json();
    assert_eq!(body["decision"]["needs_civic"], false);
}

#[tokio::test]
async fn test_always_show_profile() {
    let ctx = TestContext::with_rules(CheckoutRules {
        field_profile: FieldProfile::AlwaysShowCivic,
        ..CheckoutRules::default()
    });

    let body: Value = ctx.post("/checkout/fields", &cart(&[ACCESSORY])).await.json();
    assert_eq!(body["decision"]["needs_civic"], false);
    assert_eq!(field_keys(&body), vec!["social_civic_number"]);

    let body: Value = ctx.post("/checkout/fields", &cart(&[BUSINESS])).await.json();
    assert_eq!(
        field_keys(&body),
        vec!["social_civic_number", "organization_number"]
    );
}

#[tokio::test]
async fn test_order_of_cart_lines_does_not_matter() {
    let ctx = TestContext::new();
    let forward: Value = ctx
        .post("/checkout/fields", &cart(&[ACCESSORY, STUDENT, BUSINESS]))
        .await
        .json();
    let backward: Value = ctx
        .post("/checkout/fields", &cart(&[BUSINESS, STUDENT, ACCESSORY]))
        .await
        .json();
    assert_eq!(forward, backward);
}

#[tokio::test]
async fn test_session_prefills_fields() {
    let ctx = TestContext::new();

    let resp = ctx
        .send(
            Method::PUT,
            "/checkout/session",
            Some(&json!({
                "social_civic_number": "19900101-1234",
                "organization_number": "165567891234"
            })),
            None,
        )
        .await;
    assert_eq!(resp.status, StatusCode::NO_CONTENT);
    let cookie = resp.session_cookie().unwrap();

    let resp = ctx
        .send(
            Method::POST,
            "/checkout/fields",
            Some(&cart(&[BUSINESS])),
            Some(&cookie),
        )
        .await;
    let body: Value = resp.json();
    assert_eq!(body["fields"][0]["default_value"], "19900101-1234");
    assert_eq!(body["fields"][1]["default_value"], "165567891234");

    // Without the cookie nothing is pre-filled
    let body: Value = ctx.post("/checkout/fields", &cart(&[BUSINESS])).await.json();
    assert_eq!(body["fields"][0]["default_value"], "");
}

#[tokio::test]
async fn test_session_save_keeps_earlier_values() {
    let ctx = TestContext::new();

    let resp = ctx
        .send(
            Method::PUT,
            "/checkout/session",
            Some(&json!({"social_civic_number": "199001011234"})),
            None,
        )
        .await;
    let cookie = resp.session_cookie().unwrap();

    ctx.send(
        Method::PUT,
        "/checkout/session",
        Some(&json!({"organization_number": "165567891234"})),
        Some(&cookie),
    )
    .await;

    let body: Value = ctx
        .send(
            Method::POST,
            "/checkout/fields",
            Some(&cart(&[BUSINESS])),
            Some(&cookie),
        )
        .await
        .json();
    assert_eq!(body["fields"][0]["default_value"], "199001011234");
    assert_eq!(body["fields"][1]["default_value"], "165567891234");
}
