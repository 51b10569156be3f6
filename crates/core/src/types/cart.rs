//! Cart line items resolved to their product categories.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::id::ProductId;

/// Machine-readable product category identifier, e.g. `mobilabonnemang`.
pub type CategorySlug = String;

/// One cart line with the category slugs of its product.
///
/// Built once per checkout attempt and never changed afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLineItem {
    pub product_id: ProductId,
    #[serde(default)]
    pub category_slugs: BTreeSet<CategorySlug>,
}

impl CartLineItem {
    /// Create a line item from a product and its category slugs.
    pub fn new<I, S>(product_id: ProductId, slugs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<CategorySlug>,
    {
        Self {
            product_id,
            category_slugs: slugs.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether the product belongs to any of the given categories.
    #[must_use]
    pub fn in_any(&self, categories: &BTreeSet<CategorySlug>) -> bool {
        !self.category_slugs.is_disjoint(categories)
    }
}
