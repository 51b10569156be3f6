//! Free shipping for subscription carts.

use rust_decimal::Decimal;
use tracing::instrument;

use civic_checkout_core::ShippingRateSet;

/// Zero the cost and every tax amount of each rate when `free_shipping` holds.
///
/// Tax classes are kept; only their amounts change. Without free shipping the
/// rates are returned untouched. Applying the adjustment twice gives the same
/// result as applying it once.
#[must_use]
#[instrument(skip(rates), fields(rate_count = rates.len()))]
pub fn adjust_rates(free_shipping: bool, mut rates: ShippingRateSet) -> ShippingRateSet {
    if !free_shipping {
        return rates;
    }

    for rate in rates.rates_mut() {
        rate.cost = Decimal::ZERO;
        for amount in rate.taxes.values_mut() {
            *amount = Decimal::ZERO;
        }
    }

    tracing::debug!("Zeroed shipping rates");
    rates
}

#[cfg(test)]
mod tests {
    use civic_checkout_core::ShippingRate;

    use super::*;

    fn rates() -> ShippingRateSet {
        ShippingRateSet::new(vec![
            ShippingRate::new("flat_rate:1", Decimal::new(4900, 2))
                .with_tax("standard", Decimal::new(1225, 2)),
            ShippingRate::new("local_pickup:2", Decimal::new(1500, 2)),
            ShippingRate::new("express:3", Decimal::new(9900, 2))
                .with_tax("standard", Decimal::new(2475, 2))
                .with_tax("environment", Decimal::new(100, 2)),
        ])
    }

    #[test]
    fn test_passthrough_without_free_shipping() {
        assert_eq!(adjust_rates(false, rates()), rates());
    }

    #[test]
    fn test_zeroes_cost_and_taxes() {
        let adjusted = adjust_rates(true, rates());
        assert_eq!(adjusted.len(), 3);
        assert!(adjusted.rates().iter().all(ShippingRate::is_free));
    }

    #[test]
    fn test_keeps_order_keys_and_tax_classes() {
        let adjusted = adjust_rates(true, rates());
        let keys: Vec<&str> = adjusted.rates().iter().map(|r| r.rate_key.as_str()).collect();
        assert_eq!(keys, vec!["flat_rate:1", "local_pickup:2", "express:3"]);

        let express = &adjusted.rates()[2];
        assert_eq!(
            express.taxes.keys().map(String::as_str).collect::<Vec<_>>(),
            vec!["environment", "standard"]
        );
        assert!(adjusted.rates()[1].taxes.is_empty());
    }

    #[test]
    fn test_idempotent() {
        let once = adjust_rates(true, rates());
        let twice = adjust_rates(true, once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_empty_set() {
        assert!(adjust_rates(true, ShippingRateSet::default()).is_empty());
    }
}
