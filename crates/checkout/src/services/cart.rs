//! Cart and product taxonomy collaborators.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use civic_checkout_core::{CartLineItem, CategorySlug, ProductId};

/// Source of the products currently in a cart.
pub trait Cart {
    /// Product IDs of all cart lines.
    fn line_items(&self) -> Vec<ProductId>;
}

impl Cart for [ProductId] {
    fn line_items(&self) -> Vec<ProductId> {
        self.to_vec()
    }
}

impl Cart for Vec<ProductId> {
    fn line_items(&self) -> Vec<ProductId> {
        self.clone()
    }
}

/// Resolves a product to its category slugs.
pub trait CategoryLookup {
    /// Category slugs of `product_id`. Unknown products have no categories.
    fn category_slugs(&self, product_id: ProductId) -> BTreeSet<CategorySlug>;
}

/// Product-to-category mapping loaded from configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StaticCatalog(BTreeMap<ProductId, BTreeSet<CategorySlug>>);

impl StaticCatalog {
    /// Add or replace the categories of a product.
    #[must_use]
    pub fn with_product<I, S>(mut self, product_id: ProductId, slugs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<CategorySlug>,
    {
        self.0
            .insert(product_id, slugs.into_iter().map(Into::into).collect());
        self
    }

    /// Number of products in the catalog.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the catalog has no products.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl CategoryLookup for StaticCatalog {
    fn category_slugs(&self, product_id: ProductId) -> BTreeSet<CategorySlug> {
        self.0.get(&product_id).cloned().unwrap_or_default()
    }
}

/// Resolve every cart line to its category slugs.
///
/// A product the lookup does not know yields an empty category set rather
/// than an error.
pub fn snapshot<C, L>(cart: &C, lookup: &L) -> Vec<CartLineItem>
where
    C: Cart + ?Sized,
    L: CategoryLookup + ?Sized,
{
    cart.line_items()
        .into_iter()
        .map(|product_id| CartLineItem {
            product_id,
            category_slugs: lookup.category_slugs(product_id),
        })
        .collect()
}
