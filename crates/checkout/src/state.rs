//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::CheckoutConfig;
use crate::db::AttributeStore;
use crate::services::{
    CategoryDecision, CategoryMatcher, CheckoutRules, FieldPolicy, OrderAttributes, RulesFile,
    StaticCatalog, snapshot,
};

use civic_checkout_core::ProductId;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// configuration, rules, catalog and order attribute store.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: CheckoutConfig,
    rules: CheckoutRules,
    catalog: StaticCatalog,
    policy: FieldPolicy,
    orders: OrderAttributes,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `config` - Checkout service configuration
    /// * `rules` - Loaded rules file (rules + catalog)
    /// * `store` - Order attribute store
    #[must_use]
    pub fn new(config: CheckoutConfig, rules: RulesFile, store: Arc<dyn AttributeStore>) -> Self {
        let RulesFile { checkout, catalog } = rules;
        let policy = FieldPolicy::new(checkout.field_profile);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                rules: checkout,
                catalog,
                policy,
                orders: OrderAttributes::new(store),
            }),
        }
    }

    /// Get a reference to the checkout configuration.
    #[must_use]
    pub fn config(&self) -> &CheckoutConfig {
        &self.inner.config
    }

    /// Get a reference to the checkout rules.
    #[must_use]
    pub fn rules(&self) -> &CheckoutRules {
        &self.inner.rules
    }

    /// Get a reference to the product catalog.
    #[must_use]
    pub fn catalog(&self) -> &StaticCatalog {
        &self.inner.catalog
    }

    /// Get the field policy.
    #[must_use]
    pub fn policy(&self) -> &FieldPolicy {
        &self.inner.policy
    }

    /// Get the order attribute service.
    #[must_use]
    pub fn orders(&self) -> &OrderAttributes {
        &self.inner.orders
    }

    /// Resolve a cart against the catalog and evaluate it.
    #[must_use]
    pub fn evaluate_cart(&self, products: &[ProductId]) -> CategoryDecision {
        let items = snapshot(products, self.catalog());
        CategoryMatcher::new(&self.rules().rules).evaluate(&items)
    }
}
