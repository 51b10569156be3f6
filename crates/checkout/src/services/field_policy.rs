//! Identity number fields presented at checkout.

use serde::{Deserialize, Serialize};

use civic_checkout_core::AttributeKey;

use super::category_matcher::CategoryDecision;

/// Display priority of the civic number field; lowest number is shown first.
pub const CIVIC_FIELD_PRIORITY: u32 = 5;

/// Display priority of the organization number field.
pub const ORG_FIELD_PRIORITY: u32 = 6;

/// Read-only access to values the customer entered earlier in the session.
pub trait SessionValues {
    /// The saved value for `key`, or an empty string if there is none.
    fn saved_value(&self, key: AttributeKey) -> String;
}

/// No saved values.
impl SessionValues for () {
    fn saved_value(&self, _key: AttributeKey) -> String {
        String::new()
    }
}

/// How identity number fields are presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldProfile {
    /// Always ask for the civic number, whatever the cart contains.
    AlwaysShowCivic,
    /// Ask only for the numbers the cart categories require.
    #[default]
    Conditional,
}

impl std::fmt::Display for FieldProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AlwaysShowCivic => write!(f, "always_show_civic"),
            Self::Conditional => write!(f, "conditional"),
        }
    }
}

impl std::str::FromStr for FieldProfile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "always_show_civic" => Ok(Self::AlwaysShowCivic),
            "conditional" => Ok(Self::Conditional),
            _ => Err(format!("invalid field profile: {s}")),
        }
    }
}

/// A checkout form field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldDescriptor {
    pub key: AttributeKey,
    pub label: &'static str,
    pub placeholder: &'static str,
    pub required: bool,
    pub priority: u32,
    /// Pre-filled value from the session; empty if none.
    pub default_value: String,
}

/// Decides which identity number fields to present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FieldPolicy {
    profile: FieldProfile,
}

impl FieldPolicy {
    #[must_use]
    pub const fn new(profile: FieldProfile) -> Self {
        Self { profile }
    }

    /// Whether the field for `key` is presented for this decision.
    #[must_use]
    pub const fn shows(&self, key: AttributeKey, decision: &CategoryDecision) -> bool {
        match key {
            AttributeKey::SocialCivicNumber => {
                matches!(self.profile, FieldProfile::AlwaysShowCivic) || decision.needs_civic
            }
            AttributeKey::OrganizationNumber => decision.needs_org,
        }
    }

    /// Keys of the fields that are presented as required.
    #[must_use]
    pub fn required_keys(&self, decision: &CategoryDecision) -> Vec<AttributeKey> {
        AttributeKey::ALL
            .into_iter()
            .filter(|key| self.shows(*key, decision))
            .collect()
    }

    /// Field descriptors ordered by display priority.
    #[must_use]
    pub fn fields<S>(&self, decision: &CategoryDecision, session: &S) -> Vec<FieldDescriptor>
    where
        S: SessionValues + ?Sized,
    {
        let mut fields: Vec<FieldDescriptor> = AttributeKey::ALL
            .into_iter()
            .filter(|key| self.shows(*key, decision))
            .map(|key| describe(key, session.saved_value(key)))
            .collect();
        fields.sort_by_key(|field| field.priority);
        fields
    }
}

fn describe(key: AttributeKey, default_value: String) -> FieldDescriptor {
    match key {
        AttributeKey::SocialCivicNumber => FieldDescriptor {
            key,
            label: "Personnummer (ÅÅÅÅMMDDXXXX)",
            placeholder: "19900101-1234 or 199001011234",
            required: true,
            priority: CIVIC_FIELD_PRIORITY,
            default_value,
        },
        AttributeKey::OrganizationNumber => FieldDescriptor {
            key,
            label: "Organisationsnummer (ÅÅÅÅMMDDXXXX)",
            placeholder: "16556789-1234 or 165567891234",
            required: true,
            priority: ORG_FIELD_PRIORITY,
            default_value,
        },
    }
}
