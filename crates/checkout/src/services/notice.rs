//! Customer-facing messages.
//!
//! The pipeline reports typed failures; the wording shown to shoppers lives
//! here, in Swedish.

use civic_checkout_core::AttributeKey;

use super::submission::{FieldError, FieldErrorKind};

/// Short label used by admin, thank-you page and email renderers.
#[must_use]
pub const fn display_label(key: AttributeKey) -> &'static str {
    match key {
        AttributeKey::SocialCivicNumber => "Personnummer",
        AttributeKey::OrganizationNumber => "Organisationsnummer",
    }
}

/// Message shown to the shopper for a rejected field.
#[must_use]
pub const fn notice(error: &FieldError) -> &'static str {
    match (error.field, error.kind) {
        (AttributeKey::SocialCivicNumber, FieldErrorKind::Format) => {
            "Fyll i ett tolvsiffrigt personnummer enligt formatet ÅÅÅÅMMDDXXXX."
        }
        (AttributeKey::OrganizationNumber, FieldErrorKind::Format) => {
            "Fyll i ett tolvsiffrigt organisationsnummer enligt formatet ÅÅÅÅMMDDXXXX."
        }
        (AttributeKey::SocialCivicNumber, FieldErrorKind::MissingRequired) => {
            "Personnummer är ett obligatoriskt fält."
        }
        (AttributeKey::OrganizationNumber, FieldErrorKind::MissingRequired) => {
            "Organisationsnummer är ett obligatoriskt fält."
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_notice_mentions_pattern() {
        let error = FieldError {
            field: AttributeKey::SocialCivicNumber,
            kind: FieldErrorKind::Format,
        };
        assert!(notice(&error).contains("ÅÅÅÅMMDDXXXX"));
    }

    #[test]
    fn test_labels() {
        assert_eq!(display_label(AttributeKey::SocialCivicNumber), "Personnummer");
        assert_eq!(
            display_label(AttributeKey::OrganizationNumber),
            "Organisationsnummer"
        );
    }
}
