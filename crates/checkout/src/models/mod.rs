//! Request and session models for the checkout service.

pub mod session;

pub use session::CheckoutDraft;
