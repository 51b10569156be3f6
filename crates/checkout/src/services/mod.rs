//! Checkout pipeline services.
//!
//! # Pipeline
//!
//! ```text
//! cart ──snapshot──> category_matcher ──┬──> field_policy   (what to show)
//!                                       └──> shipping       (what to charge)
//!
//! submission ──validate──> order_attributes ──> AttributeStore
//! ```
//!
//! # Services
//!
//! - `rules` - Category rules, field profile and YAML loading
//! - `cart` - Cart and category lookup collaborators
//! - `category_matcher` - Which number fields a cart needs, and free shipping
//! - `field_policy` - Field descriptors shown at checkout
//! - `shipping` - Zero shipping cost and taxes for subscription carts
//! - `order_attributes` - Persist and read normalized numbers per order
//! - `submission` - Validation pass run when the checkout form is submitted
//! - `notice` - Swedish customer-facing messages for validation failures
//!
//! Everything here is synchronous and request-scoped; no state is shared
//! between requests except through the attribute store.

pub mod cart;
pub mod category_matcher;
pub mod field_policy;
pub mod notice;
pub mod order_attributes;
pub mod rules;
pub mod shipping;
pub mod submission;

pub use cart::{Cart, CategoryLookup, StaticCatalog, snapshot};
pub use category_matcher::{CategoryDecision, CategoryMatcher};
pub use field_policy::{FieldDescriptor, FieldPolicy, FieldProfile, SessionValues};
pub use order_attributes::{OrderAttributes, PersistedAttributes};
pub use rules::{CategoryRule, CheckoutRules, RulesError, RulesFile};
pub use shipping::adjust_rates;
pub use submission::{
    CheckoutSubmission, FieldError, FieldErrorKind, SubmissionError, process_submission,
    validate_submission,
};
