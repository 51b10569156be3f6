//! Core types for civic checkout.
//!
//! This module provides type-safe wrappers for the checkout domain.

pub mod attribute;
pub mod cart;
pub mod id;
pub mod identity;
pub mod shipping;

pub use attribute::{AttributeKey, UnknownAttributeKey};
pub use cart::{CartLineItem, CategorySlug};
pub use id::*;
pub use identity::{IdentityNumber, IdentityNumberError, normalize_digits, validate_identity_number};
pub use shipping::{ShippingRate, ShippingRateSet};
