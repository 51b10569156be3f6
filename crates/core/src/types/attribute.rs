//! Order attribute keys shared with rendering and email collaborators.

use core::fmt;

use serde::{Deserialize, Serialize};

/// An order attribute written by the checkout pipeline.
///
/// The wire names are a stable contract with admin, thank-you page and email
/// renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeKey {
    /// Personal identity number (personnummer).
    SocialCivicNumber,
    /// Organization number (organisationsnummer).
    OrganizationNumber,
}

/// Unrecognized attribute key.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown order attribute key: {0}")]
pub struct UnknownAttributeKey(pub String);

impl AttributeKey {
    /// All keys, in display order.
    pub const ALL: [Self; 2] = [Self::SocialCivicNumber, Self::OrganizationNumber];

    /// Stable wire name of the key.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::SocialCivicNumber => "social_civic_number",
            Self::OrganizationNumber => "organization_number",
        }
    }
}

impl fmt::Display for AttributeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AttributeKey {
    type Err = UnknownAttributeKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "social_civic_number" => Ok(Self::SocialCivicNumber),
            "organization_number" => Ok(Self::OrganizationNumber),
            _ => Err(UnknownAttributeKey(s.to_owned())),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_names() {
        assert_eq!(AttributeKey::SocialCivicNumber.as_str(), "social_civic_number");
        assert_eq!(AttributeKey::OrganizationNumber.as_str(), "organization_number");
        assert_eq!(
            serde_json::to_string(&AttributeKey::OrganizationNumber).unwrap(),
            "\"organization_number\""
        );
    }

    #[test]
    fn test_from_str() {
        for key in AttributeKey::ALL {
            assert_eq!(key.as_str().parse::<AttributeKey>().unwrap(), key);
        }
        assert!("_social_civic_number".parse::<AttributeKey>().is_err());
    }
}
