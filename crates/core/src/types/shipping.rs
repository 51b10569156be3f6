//! Shipping rates offered for a cart package.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single shipping rate with its tax breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingRate {
    /// Rate identifier, e.g. `flat_rate:1`.
    pub rate_key: String,
    /// Shipping cost excluding tax.
    pub cost: Decimal,
    /// Tax amount per tax class. Empty when the rate carries no taxes.
    #[serde(default)]
    pub taxes: BTreeMap<String, Decimal>,
}

impl ShippingRate {
    /// Create a rate without taxes.
    pub fn new(rate_key: impl Into<String>, cost: Decimal) -> Self {
        Self {
            rate_key: rate_key.into(),
            cost,
            taxes: BTreeMap::new(),
        }
    }

    /// Add a tax amount for a tax class.
    #[must_use]
    pub fn with_tax(mut self, tax_class: impl Into<String>, amount: Decimal) -> Self {
        self.taxes.insert(tax_class.into(), amount);
        self
    }

    /// Sum of all tax amounts.
    #[must_use]
    pub fn total_tax(&self) -> Decimal {
        self.taxes.values().copied().sum()
    }

    /// Whether cost and every tax amount are zero.
    #[must_use]
    pub fn is_free(&self) -> bool {
        self.cost.is_zero() && self.taxes.values().all(Decimal::is_zero)
    }
}

/// Ordered set of rates for one package.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShippingRateSet(Vec<ShippingRate>);

impl ShippingRateSet {
    /// Create a rate set, preserving order.
    #[must_use]
    pub const fn new(rates: Vec<ShippingRate>) -> Self {
        Self(rates)
    }

    /// The rates, in offer order.
    #[must_use]
    pub fn rates(&self) -> &[ShippingRate] {
        &self.0
    }

    /// Mutable access to the rates.
    pub fn rates_mut(&mut self) -> &mut [ShippingRate] {
        &mut self.0
    }

    /// Number of rates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the set has no rates.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<ShippingRate>> for ShippingRateSet {
    fn from(rates: Vec<ShippingRate>) -> Self {
        Self(rates)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    #[test]
    fn test_total_tax_and_is_free() {
        let rate = ShippingRate::new("flat_rate:1", Decimal::new(4900, 2))
            .with_tax("standard", Decimal::new(1225, 2))
            .with_tax("reduced", Decimal::new(300, 2));
        assert_eq!(rate.total_tax(), Decimal::new(1525, 2));
        assert!(!rate.is_free());
        assert!(ShippingRate::new("free_shipping:2", Decimal::ZERO).is_free());
    }

    #[test]
    fn test_deserialize_without_taxes() {
        let json = r#"[{"rate_key":"flat_rate:1","cost":"49.00"}]"#;
        let set: ShippingRateSet = serde_json::from_str(json).unwrap();
        assert_eq!(set.len(), 1);
        assert!(set.rates()[0].taxes.is_empty());
        assert_eq!(set.rates()[0].cost, Decimal::new(4900, 2));
    }
}
