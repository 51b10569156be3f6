//! Integration tests for Civic Checkout.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p civic-checkout-integration-tests
//! ```
//!
//! The tests build the full axum application in-process, with the in-memory
//! attribute store and session store, and drive it with
//! `tower::ServiceExt::oneshot`. No server or database is needed.
//!
//! # Test Categories
//!
//! - `checkout_fields` - Field decisions and session pre-fill
//! - `shipping_rates` - Free shipping for subscription carts
//! - `order_attributes` - Submission validation, persistence and reads

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Method, Request, StatusCode, header};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tower::ServiceExt;

use civic_checkout::config::CheckoutConfig;
use civic_checkout::db::MemoryAttributeStore;
use civic_checkout::routes;
use civic_checkout::services::{CheckoutRules, RulesFile, StaticCatalog};
use civic_checkout::state::AppState;
use civic_checkout_core::ProductId;

/// Mobile subscription.
pub const MOBILE: ProductId = ProductId::new(1);
/// Business subscription, needs an organization number.
pub const BUSINESS: ProductId = ProductId::new(2);
/// Phone case, no subscription category.
pub const ACCESSORY: ProductId = ProductId::new(3);
/// Student subscription.
pub const STUDENT: ProductId = ProductId::new(4);

/// Catalog used by the tests.
#[must_use]
pub fn test_catalog() -> StaticCatalog {
    StaticCatalog::default()
        .with_product(MOBILE, ["mobilabonnemang"])
        .with_product(BUSINESS, ["foretagsabonnemang"])
        .with_product(ACCESSORY, ["tillbehor"])
        .with_product(STUDENT, ["studentabonnemang", "kampanj"])
}

/// A response collected from the application.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    /// Deserialize the body as JSON.
    ///
    /// # Panics
    ///
    /// Panics if the body is not valid JSON for `T`.
    #[must_use]
    pub fn json<T: DeserializeOwned>(&self) -> T {
        serde_json::from_slice(&self.body).expect("Response body is not the expected JSON")
    }

    /// The body as UTF-8 text.
    ///
    /// # Panics
    ///
    /// Panics if the body is not UTF-8.
    #[must_use]
    pub fn text(&self) -> String {
        String::from_utf8(self.body.clone()).expect("Response body is not UTF-8")
    }

    /// The `name=value` pair of the session cookie, if one was set.
    #[must_use]
    pub fn session_cookie(&self) -> Option<String> {
        self.headers
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .filter_map(|cookie| cookie.split(';').next())
            .find(|pair| pair.starts_with("cc_session="))
            .map(str::to_owned)
    }
}

/// In-process application with direct access to its attribute store.
pub struct TestContext {
    pub app: Router,
    pub store: Arc<MemoryAttributeStore>,
}

impl TestContext {
    /// Application with the built-in rules and [`test_catalog`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_rules(CheckoutRules::default())
    }

    /// Application with the given rules and [`test_catalog`].
    #[must_use]
    pub fn with_rules(checkout: CheckoutRules) -> Self {
        let store = Arc::new(MemoryAttributeStore::new());
        let rules = RulesFile {
            checkout,
            catalog: test_catalog(),
        };
        let state = AppState::new(CheckoutConfig::default(), rules, store.clone());

        Self {
            app: routes::app(state),
            store,
        }
    }

    /// Send a request, with an optional JSON body and session cookie.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be built or the body cannot be read.
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        body: Option<&Value>,
        cookie: Option<&str>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("Failed to build request");

        let response = self
            .app
            .clone()
            .oneshot(request)
            .await
            .expect("Router is infallible");

        let status = response.status();
        let headers = response.headers().clone();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read response body")
            .to_vec();

        TestResponse {
            status,
            headers,
            body,
        }
    }

    /// GET without a body.
    pub async fn get(&self, uri: &str) -> TestResponse {
        self.send(Method::GET, uri, None, None).await
    }

    /// POST a JSON body.
    pub async fn post(&self, uri: &str, body: &Value) -> TestResponse {
        self.send(Method::POST, uri, Some(body), None).await
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Cart JSON for the given products.
#[must_use]
pub fn cart(products: &[ProductId]) -> Value {
    let items: Vec<Value> = products
        .iter()
        .map(|id| serde_json::json!({ "product_id": id }))
        .collect();
    serde_json::json!({ "items": items })
}
