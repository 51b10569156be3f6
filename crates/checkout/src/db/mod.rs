//! Order attribute persistence.
//!
//! # Storage model
//!
//! A flat key-value store keyed by `(order_id, attribute_key)`. Values are the
//! normalized identity numbers written once at order creation and read by the
//! admin, thank-you page and email renderers.
//!
//! The pipeline talks to storage only through [`AttributeStore`], so a hosting
//! platform can plug in its own order-meta table. [`MemoryAttributeStore`] is
//! the bundled implementation.

pub mod order_attributes;

use thiserror::Error;

use civic_checkout_core::{AttributeKey, OrderId};

pub use order_attributes::{MemoryAttributeStore, StoredAttribute};

/// Errors returned by an attribute store.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The backing store is unusable (e.g. a poisoned lock or lost connection).
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// The order already has attributes; they are written once.
    #[error("attributes already recorded for order {0}")]
    AlreadyRecorded(OrderId),
}

/// Key-value persistence for order attributes.
///
/// Implementations are synchronous; latency and retries are their own concern.
pub trait AttributeStore: Send + Sync {
    /// Store `value` under `(order_id, key)`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::AlreadyRecorded` if the key already holds a
    /// value, or another `RepositoryError` if the store cannot be written.
    fn write(&self, order_id: OrderId, key: AttributeKey, value: &str)
    -> Result<(), RepositoryError>;

    /// Store all attributes of an order, provided it has none yet.
    ///
    /// The default implementation checks and then writes key by key.
    /// Stores that can do better should override it to be atomic.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::AlreadyRecorded` if any attribute of the
    /// order is already stored; nothing is written in that case.
    fn write_order(
        &self,
        order_id: OrderId,
        values: &[(AttributeKey, String)],
    ) -> Result<(), RepositoryError> {
        for key in AttributeKey::ALL {
            if self.read(order_id, key)?.is_some() {
                return Err(RepositoryError::AlreadyRecorded(order_id));
            }
        }
        for (key, value) in values {
            self.write(order_id, *key, value)?;
        }
        Ok(())
    }

    /// Read the value stored under `(order_id, key)`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the store cannot be read.
    fn read(&self, order_id: OrderId, key: AttributeKey) -> Result<Option<String>, RepositoryError>;
}
