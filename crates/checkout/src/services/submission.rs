//! Checkout form submission.
//!
//! Validation gates persistence: nothing is written unless every submitted
//! number passes.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::instrument;

use civic_checkout_core::{AttributeKey, OrderId, validate_identity_number};

use super::category_matcher::CategoryDecision;
use super::field_policy::FieldPolicy;
use super::order_attributes::{OrderAttributes, PersistedAttributes};
use crate::db::RepositoryError;

/// Raw identity numbers as posted by the checkout form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutSubmission {
    #[serde(default)]
    pub social_civic_number: Option<String>,
    #[serde(default)]
    pub organization_number: Option<String>,
}

impl CheckoutSubmission {
    /// Raw value for `key`.
    #[must_use]
    pub fn get(&self, key: AttributeKey) -> Option<&str> {
        match key {
            AttributeKey::SocialCivicNumber => self.social_civic_number.as_deref(),
            AttributeKey::OrganizationNumber => self.organization_number.as_deref(),
        }
    }
}

/// Why a field was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldErrorKind {
    /// Not `YYYYMMDD-XXXX` or `YYYYMMDDXXXX`.
    Format,
    /// A required field was left empty (only with `enforce_required`).
    MissingRequired,
}

/// A rejected checkout field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
#[error("{field}: {kind:?}")]
pub struct FieldError {
    pub field: AttributeKey,
    pub kind: FieldErrorKind,
}

/// Errors from processing a submission.
#[derive(Debug, Error)]
pub enum SubmissionError {
    /// One or more fields failed validation; the order must not be created.
    #[error("invalid checkout fields: {}", format_fields(.0))]
    Invalid(Vec<FieldError>),

    /// The order already has identity numbers; they are never changed.
    #[error("identity numbers already recorded for order {0}")]
    AlreadyRecorded(OrderId),

    /// The attribute store failed.
    #[error("storage error: {0}")]
    Storage(#[source] RepositoryError),
}

fn format_fields(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Validate every submitted number.
///
/// Present values must match an accepted format. A missing value is only an
/// error when `enforce_required` is set and the policy shows the field for
/// this cart.
///
/// # Errors
///
/// Returns every failing field, civic number first.
pub fn validate_submission(
    submission: &CheckoutSubmission,
    decision: &CategoryDecision,
    policy: &FieldPolicy,
    enforce_required: bool,
) -> Result<(), Vec<FieldError>> {
    let required = policy.required_keys(decision);
    let mut errors = Vec::new();

    for field in AttributeKey::ALL {
        match validate_identity_number(submission.get(field)) {
            Err(_) => errors.push(FieldError {
                field,
                kind: FieldErrorKind::Format,
            }),
            Ok(None) if enforce_required && required.contains(&field) => errors.push(FieldError {
                field,
                kind: FieldErrorKind::MissingRequired,
            }),
            Ok(_) => {}
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validate a submission and, if it passes, store its numbers on the order.
///
/// # Errors
///
/// Returns `SubmissionError::Invalid` without writing anything if validation
/// fails, `SubmissionError::AlreadyRecorded` if the order already has
/// numbers, or `SubmissionError::Storage` if the store fails.
#[instrument(skip(orders, submission, decision, policy))]
pub fn process_submission(
    orders: &OrderAttributes,
    order_id: OrderId,
    submission: &CheckoutSubmission,
    decision: &CategoryDecision,
    policy: &FieldPolicy,
    enforce_required: bool,
) -> Result<PersistedAttributes, SubmissionError> {
    if let Err(errors) = validate_submission(submission, decision, policy, enforce_required) {
        tracing::info!(failed = errors.len(), "Rejected checkout submission");
        return Err(SubmissionError::Invalid(errors));
    }

    orders
        .persist(
            order_id,
            submission.social_civic_number.as_deref(),
            submission.organization_number.as_deref(),
        )
        .map_err(|err| match err {
            RepositoryError::AlreadyRecorded(id) => SubmissionError::AlreadyRecorded(id),
            other => SubmissionError::Storage(other),
        })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::db::MemoryAttributeStore;
    use crate::services::field_policy::FieldProfile;

    const BUSINESS: CategoryDecision = CategoryDecision {
        needs_civic: true,
        needs_org: true,
        free_shipping: true,
    };

    fn submission(civic: Option<&str>, org: Option<&str>) -> CheckoutSubmission {
        CheckoutSubmission {
            social_civic_number: civic.map(String::from),
            organization_number: org.map(String::from),
        }
    }

    fn conditional() -> FieldPolicy {
        FieldPolicy::new(FieldProfile::Conditional)
    }

    #[test]
    fn test_valid_submission() {
        let result = validate_submission(
            &submission(Some("19900101-1234"), Some("165567891234")),
            &BUSINESS,
            &conditional(),
            false,
        );
        assert!(result.is_ok());
    }

    #[test]
    fn test_format_errors_are_reported_per_field() {
        let errors = validate_submission(
            &submission(Some("1990-01-01"), Some("abc")),
            &BUSINESS,
            &conditional(),
            false,
        )
        .unwrap_err();
        assert_eq!(
            errors,
            vec![
                FieldError {
                    field: AttributeKey::SocialCivicNumber,
                    kind: FieldErrorKind::Format,
                },
                FieldError {
                    field: AttributeKey::OrganizationNumber,
                    kind: FieldErrorKind::Format,
                },
            ]
        );
    }

    #[test]
    fn test_missing_required_passes_by_default() {
        let result = validate_submission(&submission(None, Some("")), &BUSINESS, &conditional(), false);
        assert!(result.is_ok());
    }

    #[test]
    fn test_missing_required_rejected_when_enforced() {
        let errors = validate_submission(
            &submission(Some("199001011234"), None),
            &BUSINESS,
            &conditional(),
            true,
        )
        .unwrap_err();
        assert_eq!(
            errors,
            vec![FieldError {
                field: AttributeKey::OrganizationNumber,
                kind: FieldErrorKind::MissingRequired,
            }]
        );
    }

    #[test]
    fn test_enforced_ignores_fields_not_shown() {
        let result = validate_submission(
            &submission(None, None),
            &CategoryDecision::default(),
            &conditional(),
            true,
        );
        assert!(result.is_ok());
    }

    #[test]
    fn test_process_rejects_without_writing() {
        let store = Arc::new(MemoryAttributeStore::new());
        let orders = OrderAttributes::new(store.clone());

        let result = process_submission(
            &orders,
            OrderId::new(5),
            &submission(Some("199001011234"), Some("123")),
            &BUSINESS,
            &conditional(),
            false,
        );

        assert!(matches!(result, Err(SubmissionError::Invalid(ref e)) if e.len() == 1));
        assert_eq!(store.len().unwrap(), 0);
    }

    #[test]
    fn test_process_persists_valid_numbers() {
        let orders = OrderAttributes::new(Arc::new(MemoryAttributeStore::new()));
        let persisted = process_submission(
            &orders,
            OrderId::new(6),
            &submission(Some("19900101-1234"), None),
            &BUSINESS,
            &conditional(),
            false,
        )
        .unwrap();

        assert_eq!(persisted.social_civic_number.as_deref(), Some("199001011234"));
        assert_eq!(persisted.organization_number, None);
    }

    #[test]
    fn test_process_rejects_second_submission() {
        let store = Arc::new(MemoryAttributeStore::new());
        let orders = OrderAttributes::new(store.clone());
        let order_id = OrderId::new(9);

        process_submission(
            &orders,
            order_id,
            &submission(Some("19900101-1234"), Some("165567891234")),
            &BUSINESS,
            &conditional(),
            false,
        )
        .unwrap();

        let result = process_submission(
            &orders,
            order_id,
            &submission(Some("20000202-5678"), None),
            &BUSINESS,
            &conditional(),
            false,
        );
        assert!(matches!(result, Err(SubmissionError::AlreadyRecorded(id)) if id == order_id));

        let all = orders.read_all(order_id).unwrap();
        assert_eq!(all.get(AttributeKey::SocialCivicNumber), Some("199001011234"));
        assert_eq!(all.get(AttributeKey::OrganizationNumber), Some("165567891234"));
        assert_eq!(store.len().unwrap(), 2);
    }

    #[test]
    fn test_invalid_error_display_lists_fields() {
        let err = SubmissionError::Invalid(vec![FieldError {
            field: AttributeKey::SocialCivicNumber,
            kind: FieldErrorKind::Format,
        }]);
        assert_eq!(
            err.to_string(),
            "invalid checkout fields: social_civic_number: Format"
        );
    }
}
