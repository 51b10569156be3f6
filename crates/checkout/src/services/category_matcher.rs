//! Cart category inspection.
//!
//! Runs first in the pipeline; its decision drives both the field policy and
//! the shipping adjustment.

use serde::{Deserialize, Serialize};
use tracing::instrument;

use civic_checkout_core::CartLineItem;

use super::rules::CategoryRule;

/// What a cart requires, derived from its product categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CategoryDecision {
    /// A personal identity number must be collected.
    pub needs_civic: bool,
    /// An organization number must be collected.
    pub needs_org: bool,
    /// Shipping is free for this cart.
    pub free_shipping: bool,
}

impl CategoryDecision {
    const fn is_saturated(&self) -> bool {
        self.needs_civic && self.needs_org && self.free_shipping
    }
}

/// Matches cart line items against category rules.
///
/// The result is an OR over all items and rules, so it does not depend on the
/// order of either. An empty cart yields an all-false decision.
#[derive(Debug, Clone, Copy)]
pub struct CategoryMatcher<'a> {
    rules: &'a [CategoryRule],
}

impl<'a> CategoryMatcher<'a> {
    #[must_use]
    pub const fn new(rules: &'a [CategoryRule]) -> Self {
        Self { rules }
    }

    /// Evaluate a cart snapshot.
    #[must_use]
    #[instrument(skip_all, fields(items = items.len()))]
    pub fn evaluate(&self, items: &[CartLineItem]) -> CategoryDecision {
        let mut decision = CategoryDecision::default();

        for item in items {
            for rule in self.rules.iter().filter(|rule| rule.matches(item)) {
                decision.needs_civic |= rule.requires_civic_number;
                decision.needs_org |= rule.requires_org_number;
                decision.free_shipping |= rule.grants_free_shipping;
            }

            // Flags only ever flip to true
            if decision.is_saturated() {
                break;
            }
        }

        tracing::debug!(
            needs_civic = decision.needs_civic,
            needs_org = decision.needs_org,
            free_shipping = decision.free_shipping,
            "Evaluated cart categories"
        );
        decision
    }
}
