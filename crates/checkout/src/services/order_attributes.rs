//! Identity numbers stored against orders.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::instrument;

use civic_checkout_core::{AttributeKey, OrderId, normalize_digits};

use crate::db::{AttributeStore, RepositoryError};

/// The identity numbers recorded for one order.
///
/// A number that was never provided is `None`, never an empty string, so
/// renderers can check presence before displaying anything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedAttributes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub social_civic_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization_number: Option<String>,
}

impl PersistedAttributes {
    /// Value for `key`.
    #[must_use]
    pub fn get(&self, key: AttributeKey) -> Option<&str> {
        match key {
            AttributeKey::SocialCivicNumber => self.social_civic_number.as_deref(),
            AttributeKey::OrganizationNumber => self.organization_number.as_deref(),
        }
    }

    fn set(&mut self, key: AttributeKey, value: String) {
        match key {
            AttributeKey::SocialCivicNumber => self.social_civic_number = Some(value),
            AttributeKey::OrganizationNumber => self.organization_number = Some(value),
        }
    }

    /// Whether neither number is recorded.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.social_civic_number.is_none() && self.organization_number.is_none()
    }
}

/// Writes and reads order attributes through an [`AttributeStore`].
#[derive(Clone)]
pub struct OrderAttributes {
    store: Arc<dyn AttributeStore>,
}

impl std::fmt::Debug for OrderAttributes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderAttributes").finish_non_exhaustive()
    }
}

impl OrderAttributes {
    #[must_use]
    pub fn new(store: Arc<dyn AttributeStore>) -> Self {
        Self { store }
    }

    /// Persist the submitted numbers for an order.
    ///
    /// Each non-empty raw value is reduced to its digits; an absent or empty
    /// value writes nothing. The format is not re-checked here, since
    /// submission validation has already run: a non-empty value with no
    /// digits is stored as an empty string.
    ///
    /// Attributes are written once per order and never changed afterwards.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::AlreadyRecorded` if the order already has
    /// attributes, or another `RepositoryError` if the store fails.
    #[instrument(skip(self, raw_civic, raw_org), fields(civic = raw_civic.is_some(), org = raw_org.is_some()))]
    pub fn persist(
        &self,
        order_id: OrderId,
        raw_civic: Option<&str>,
        raw_org: Option<&str>,
    ) -> Result<PersistedAttributes, RepositoryError> {
        let values: Vec<(AttributeKey, String)> = [
            (AttributeKey::SocialCivicNumber, raw_civic),
            (AttributeKey::OrganizationNumber, raw_org),
        ]
        .into_iter()
        .filter_map(|(key, raw)| {
            raw.filter(|value| !value.is_empty())
                .map(|value| (key, normalize_digits(value)))
        })
        .collect();

        self.store.write_order(order_id, &values)?;

        let mut persisted = PersistedAttributes::default();
        for (key, value) in values {
            tracing::info!(%key, "Stored order attribute");
            persisted.set(key, value);
        }
        Ok(persisted)
    }

    /// Read one attribute of an order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the store fails.
    pub fn read(
        &self,
        order_id: OrderId,
        key: AttributeKey,
    ) -> Result<Option<String>, RepositoryError> {
        self.store.read(order_id, key)
    }

    /// Read every attribute of an order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the store fails.
    pub fn read_all(&self, order_id: OrderId) -> Result<PersistedAttributes, RepositoryError> {
        let mut attributes = PersistedAttributes::default();
        for key in AttributeKey::ALL {
            if let Some(value) = self.store.read(order_id, key)? {
                attributes.set(key, value);
            }
        }
        Ok(attributes)
    }
}
