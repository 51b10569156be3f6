//! In-memory attribute store.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::RwLock;

use chrono::{DateTime, Utc};

use civic_checkout_core::{AttributeKey, OrderId};

use super::{AttributeStore, RepositoryError};

/// A stored attribute value with its write time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredAttribute {
    pub value: String,
    pub recorded_at: DateTime<Utc>,
}

/// Attribute store backed by a `HashMap` behind a `RwLock`.
#[derive(Debug, Default)]
pub struct MemoryAttributeStore {
    entries: RwLock<HashMap<(OrderId, AttributeKey), StoredAttribute>>,
}

impl MemoryAttributeStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the full stored record, including its write time.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Unavailable` if the lock is poisoned.
    pub fn get(
        &self,
        order_id: OrderId,
        key: AttributeKey,
    ) -> Result<Option<StoredAttribute>, RepositoryError> {
        let entries = self
            .entries
            .read()
            .map_err(|e| RepositoryError::Unavailable(e.to_string()))?;
        Ok(entries.get(&(order_id, key)).cloned())
    }

    /// Number of stored attributes across all orders.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Unavailable` if the lock is poisoned.
    pub fn len(&self) -> Result<usize, RepositoryError> {
        let entries = self
            .entries
            .read()
            .map_err(|e| RepositoryError::Unavailable(e.to_string()))?;
        Ok(entries.len())
    }
}

impl AttributeStore for MemoryAttributeStore {
    fn write(
        &self,
        order_id: OrderId,
        key: AttributeKey,
        value: &str,
    ) -> Result<(), RepositoryError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|e| RepositoryError::Unavailable(e.to_string()))?;

        match entries.entry((order_id, key)) {
            Entry::Occupied(_) => Err(RepositoryError::AlreadyRecorded(order_id)),
            Entry::Vacant(slot) => {
                slot.insert(StoredAttribute {
                    value: value.to_owned(),
                    recorded_at: Utc::now(),
                });
                Ok(())
            }
        }
    }

    fn write_order(
        &self,
        order_id: OrderId,
        values: &[(AttributeKey, String)],
    ) -> Result<(), RepositoryError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|e| RepositoryError::Unavailable(e.to_string()))?;

        // Check and insert under one lock so concurrent submissions cannot mix
        if AttributeKey::ALL
            .iter()
            .any(|key| entries.contains_key(&(order_id, *key)))
        {
            tracing::warn!(%order_id, "Rejected second write of order attributes");
            return Err(RepositoryError::AlreadyRecorded(order_id));
        }

        let recorded_at = Utc::now();
        for (key, value) in values {
            entries.insert(
                (order_id, *key),
                StoredAttribute {
                    value: value.clone(),
                    recorded_at,
                },
            );
        }
        Ok(())
    }

    fn read(&self, order_id: OrderId, key: AttributeKey) -> Result<Option<String>, RepositoryError> {
        Ok(self.get(order_id, key)?.map(|stored| stored.value))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_read_missing() {
        let store = MemoryAttributeStore::new();
        assert_eq!(
            store
                .read(OrderId::new(1), AttributeKey::SocialCivicNumber)
                .unwrap(),
            None
        );
    }

    #[test]
    fn test_write_then_read_is_scoped_by_order_and_key() {
        let store = MemoryAttributeStore::new();
        store
            .write(OrderId::new(1), AttributeKey::SocialCivicNumber, "199001011234")
            .unwrap();

        assert_eq!(
            store
                .read(OrderId::new(1), AttributeKey::SocialCivicNumber)
                .unwrap()
                .as_deref(),
            Some("199001011234")
        );
        assert_eq!(
            store
                .read(OrderId::new(1), AttributeKey::OrganizationNumber)
                .unwrap(),
            None
        );
        assert_eq!(
            store
                .read(OrderId::new(2), AttributeKey::SocialCivicNumber)
                .unwrap(),
            None
        );
        assert_eq!(store.len().unwrap(), 1);
    }

    #[test]
    fn test_get_includes_recorded_at() {
        let store = MemoryAttributeStore::new();
        let before = Utc::now();
        store
            .write(OrderId::new(7), AttributeKey::OrganizationNumber, "165567891234")
            .unwrap();

        let stored = store
            .get(OrderId::new(7), AttributeKey::OrganizationNumber)
            .unwrap()
            .unwrap();
        assert_eq!(stored.value, "165567891234");
        assert!(stored.recorded_at >= before);
    }

    #[test]
    fn test_write_is_once_per_key() {
        let store = MemoryAttributeStore::new();
        let order_id = OrderId::new(3);
        store
            .write(order_id, AttributeKey::SocialCivicNumber, "199001011234")
            .unwrap();

        let result = store.write(order_id, AttributeKey::SocialCivicNumber, "200002025678");
        assert!(matches!(result, Err(RepositoryError::AlreadyRecorded(id)) if id == order_id));
        assert_eq!(
            store
                .read(order_id, AttributeKey::SocialCivicNumber)
                .unwrap()
                .as_deref(),
            Some("199001011234")
        );
    }

    #[test]
    fn test_write_order_rejects_order_with_attributes() {
        let store = MemoryAttributeStore::new();
        let order_id = OrderId::new(9);
        store
            .write_order(
                order_id,
                &[
                    (AttributeKey::SocialCivicNumber, "199001011234".to_string()),
                    (AttributeKey::OrganizationNumber, "165567891234".to_string()),
                ],
            )
            .unwrap();

        // A later write of only the civic number must not touch anything
        let result = store.write_order(
            order_id,
            &[(AttributeKey::SocialCivicNumber, "200002025678".to_string())],
        );
        assert!(matches!(result, Err(RepositoryError::AlreadyRecorded(_))));
        assert_eq!(
            store
                .read(order_id, AttributeKey::SocialCivicNumber)
                .unwrap()
                .as_deref(),
            Some("199001011234")
        );
        assert_eq!(store.len().unwrap(), 2);
    }

    #[test]
    fn test_write_order_with_no_values_writes_nothing() {
        let store = MemoryAttributeStore::new();
        store.write_order(OrderId::new(4), &[]).unwrap();
        assert_eq!(store.len().unwrap(), 0);

        // Nothing was recorded, so the order can still be written
        store
            .write_order(
                OrderId::new(4),
                &[(AttributeKey::SocialCivicNumber, "199001011234".to_string())],
            )
            .unwrap();
    }
}
