//! Civic Checkout Core - Shared types library.
//!
//! This crate provides the types used across all civic checkout components:
//! - `checkout` - Headless checkout service (pipeline + HTTP surface)
//! - `cli` - Command-line tools for validating numbers and evaluating carts
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no
//! sessions, no HTTP. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Identity numbers, attribute keys, cart items, shipping rates and IDs

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
