//! Cart evaluation command.
//!
//! Runs a cart through the same pipeline the checkout service uses and prints
//! the result as JSON.
//!
//! # Cart Input
//!
//! Either line items with their category slugs:
//!
//! ```json
//! [{"product_id": 1, "category_slugs": ["mobilabonnemang"]}]
//! ```
//!
//! or bare product ids, resolved through the rules file catalog:
//!
//! ```json
//! [1, 2]
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use civic_checkout::config::{CheckoutConfig, ConfigError};
use civic_checkout::services::{
    CategoryDecision, CategoryMatcher, FieldDescriptor, FieldPolicy, FieldProfile, RulesFile,
    adjust_rates, snapshot,
};
use civic_checkout_core::{CartLineItem, ProductId, ShippingRateSet};

/// Errors that can occur while evaluating a cart.
#[derive(Debug, Error)]
pub enum EvaluateError {
    /// The cart JSON is malformed.
    #[error("Invalid cart JSON: {0}")]
    Cart(#[source] serde_json::Error),

    /// The rates JSON is malformed.
    #[error("Invalid rates JSON: {0}")]
    Rates(#[source] serde_json::Error),

    /// The rules could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Arguments of the `evaluate` command.
#[derive(Debug)]
pub struct EvaluateOptions {
    pub cart: String,
    pub rules: Option<PathBuf>,
    pub profile: Option<FieldProfile>,
    pub rates: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CartInput {
    Items(Vec<CartLineItem>),
    Products(Vec<ProductId>),
}

/// Everything the pipeline decides for one cart.
#[derive(Debug, Serialize)]
pub struct Evaluation {
    pub decision: CategoryDecision,
    pub fields: Vec<FieldDescriptor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rates: Option<ShippingRateSet>,
}

/// Evaluate the cart and print the evaluation.
///
/// # Errors
///
/// Returns an error if the cart, rates, or rules cannot be loaded.
pub fn run(options: &EvaluateOptions) -> Result<(), Box<dyn std::error::Error>> {
    let rules = load_rules(options)?;
    let evaluation = evaluate(&rules, &options.cart, options.rates.as_deref())?;
    super::print_json(&evaluation)
}

fn load_rules(options: &EvaluateOptions) -> Result<RulesFile, ConfigError> {
    let mut config = CheckoutConfig::from_env()?;
    if let Some(path) = &options.rules {
        config.rules_path = Some(path.clone());
    }
    if let Some(profile) = options.profile {
        config.field_profile = Some(profile);
    }
    config.load_rules()
}

/// Run the pipeline for a cart given as JSON.
///
/// # Errors
///
/// Returns `EvaluateError` if the cart or rates JSON is malformed.
pub fn evaluate(
    rules: &RulesFile,
    cart: &str,
    rates: Option<&str>,
) -> Result<Evaluation, EvaluateError> {
    let items = match serde_json::from_str(cart).map_err(EvaluateError::Cart)? {
        CartInput::Items(items) => items,
        CartInput::Products(products) => snapshot(&products, &rules.catalog),
    };

    let decision = CategoryMatcher::new(&rules.checkout.rules).evaluate(&items);
    let fields = FieldPolicy::new(rules.checkout.field_profile).fields(&decision, &());

    let rates = rates
        .map(|json| serde_json::from_str::<ShippingRateSet>(json).map_err(EvaluateError::Rates))
        .transpose()?
        .map(|set| adjust_rates(decision.free_shipping, set));

    tracing::debug!(
        items = items.len(),
        needs_civic = decision.needs_civic,
        needs_org = decision.needs_org,
        free_shipping = decision.free_shipping,
        "Cart evaluated"
    );

    Ok(Evaluation {
        decision,
        fields,
        rates,
    })
}
