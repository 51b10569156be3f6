//! Category rules deciding which identity numbers a cart needs.
//!
//! Rules are static configuration. The built-in set covers the subscription
//! categories of the shop:
//!
//! | Categories | Civic number | Org number | Free shipping |
//! |---|---|---|---|
//! | `mobilabonnemang`, `studentabonnemang`, `familjeabonnemang`, `foretagsabonnemang` | yes | no | yes |
//! | `foretagsabonnemang` | yes | yes | yes |
//!
//! A YAML rules file can replace them:
//!
//! ```yaml
//! field_profile: conditional
//! enforce_required: false
//! rules:
//!   - categories: [mobilabonnemang, foretagsabonnemang]
//!     requires_civic_number: true
//!     grants_free_shipping: true
//!   - categories: [foretagsabonnemang]
//!     requires_civic_number: true
//!     requires_org_number: true
//!     grants_free_shipping: true
//! catalog:
//!   101: [mobilabonnemang]
//!   102: [foretagsabonnemang]
//! ```

use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use civic_checkout_core::{CartLineItem, CategorySlug};

use super::cart::StaticCatalog;
use super::field_policy::FieldProfile;

/// Subscription categories that need a personal identity number.
pub const CIVIC_CATEGORIES: [&str; 4] = [
    "mobilabonnemang",
    "studentabonnemang",
    "familjeabonnemang",
    "foretagsabonnemang",
];

/// Business subscription categories that also need an organization number.
pub const ORG_CATEGORIES: [&str; 1] = ["foretagsabonnemang"];

/// Errors loading or checking a rules file.
#[derive(Debug, Error)]
pub enum RulesError {
    /// The rules file could not be read.
    #[error("failed to read rules file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The rules file is not valid YAML for this schema.
    #[error("invalid rules file: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// A rule lists no categories and can never match.
    #[error("rule {index} has no categories")]
    EmptyCategories { index: usize },

    /// A category slug is not a lowercase machine identifier.
    #[error("rule {index} has invalid category slug {slug:?}")]
    InvalidSlug { index: usize, slug: String },

    /// An organization number rule that does not also ask for a civic number.
    #[error("rule {index} requires an organization number without a civic number")]
    OrgWithoutCivic { index: usize },
}

/// A set of categories and what a cart containing one of them triggers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRule {
    pub categories: BTreeSet<CategorySlug>,
    #[serde(default)]
    pub requires_civic_number: bool,
    #[serde(default)]
    pub requires_org_number: bool,
    #[serde(default)]
    pub grants_free_shipping: bool,
}

impl CategoryRule {
    /// Whether a line item belongs to one of this rule's categories.
    #[must_use]
    pub fn matches(&self, item: &CartLineItem) -> bool {
        item.in_any(&self.categories)
    }
}

/// Complete checkout configuration for the category-driven fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutRules {
    /// How number fields are presented.
    #[serde(default)]
    pub field_profile: FieldProfile,
    /// Reject submissions that omit a required number.
    ///
    /// Off by default: a missing value passes validation even when the field
    /// was shown as required.
    #[serde(default)]
    pub enforce_required: bool,
    #[serde(default = "default_rules")]
    pub rules: Vec<CategoryRule>,
}

impl Default for CheckoutRules {
    fn default() -> Self {
        Self {
            field_profile: FieldProfile::default(),
            enforce_required: false,
            rules: default_rules(),
        }
    }
}

impl CheckoutRules {
    /// Check that every rule can match and is consistent.
    ///
    /// # Errors
    ///
    /// Returns the first problem found.
    pub fn validate(&self) -> Result<(), RulesError> {
        for (index, rule) in self.rules.iter().enumerate() {
            if rule.categories.is_empty() {
                return Err(RulesError::EmptyCategories { index });
            }
            if let Some(slug) = rule.categories.iter().find(|slug| !is_valid_slug(slug)) {
                return Err(RulesError::InvalidSlug {
                    index,
                    slug: slug.clone(),
                });
            }
            if rule.requires_org_number && !rule.requires_civic_number {
                return Err(RulesError::OrgWithoutCivic { index });
            }
        }
        Ok(())
    }
}

/// On-disk rules file: checkout rules plus the product catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RulesFile {
    #[serde(flatten)]
    pub checkout: CheckoutRules,
    #[serde(default)]
    pub catalog: StaticCatalog,
}

impl RulesFile {
    /// Parse a rules file from YAML and validate it.
    ///
    /// # Errors
    ///
    /// Returns `RulesError::Parse` for malformed YAML, or a validation error.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, RulesError> {
        let file: Self = serde_yaml::from_str(yaml)?;
        file.checkout.validate()?;
        Ok(file)
    }

    /// Read, parse and validate a rules file.
    ///
    /// # Errors
    ///
    /// Returns `RulesError::Io` if the file cannot be read, otherwise as
    /// [`RulesFile::from_yaml_str`].
    pub fn from_path(path: &Path) -> Result<Self, RulesError> {
        let yaml = std::fs::read_to_string(path).map_err(|source| RulesError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml_str(&yaml)
    }
}

/// The built-in subscription rules.
#[must_use]
pub fn default_rules() -> Vec<CategoryRule> {
    vec![
        CategoryRule {
            categories: CIVIC_CATEGORIES.iter().map(|s| (*s).to_owned()).collect(),
            requires_civic_number: true,
            requires_org_number: false,
            grants_free_shipping: true,
        },
        CategoryRule {
            categories: ORG_CATEGORIES.iter().map(|s| (*s).to_owned()).collect(),
            requires_civic_number: true,
            requires_org_number: true,
            grants_free_shipping: true,
        },
    ]
}

fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_')
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use civic_checkout_core::ProductId;

    use super::*;
    use crate::services::cart::CategoryLookup;

    #[test]
    fn test_default_rules_are_valid() {
        let rules = CheckoutRules::default();
        assert!(rules.validate().is_ok());
        assert_eq!(rules.field_profile, FieldProfile::Conditional);
        assert!(!rules.enforce_required);
    }

    #[test]
    fn test_org_categories_are_subset_of_civic() {
        for slug in ORG_CATEGORIES {
            assert!(CIVIC_CATEGORIES.contains(&slug));
        }
    }

    #[test]
    fn test_parse_full_file() {
        let yaml = r"
field_profile: always_show_civic
enforce_required: true
rules:
  - categories: [mobilabonnemang]
    requires_civic_number: true
    grants_free_shipping: true
catalog:
  101: [mobilabonnemang]
  102: [tillbehor]
";
        let file = RulesFile::from_yaml_str(yaml).unwrap();
        assert_eq!(file.checkout.field_profile, FieldProfile::AlwaysShowCivic);
        assert!(file.checkout.enforce_required);
        assert_eq!(file.checkout.rules.len(), 1);
        assert!(!file.checkout.rules[0].requires_org_number);
        assert_eq!(file.catalog.len(), 2);
        assert!(
            file.catalog
                .category_slugs(ProductId::new(101))
                .contains("mobilabonnemang")
        );
    }

    #[test]
    fn test_missing_rules_fall_back_to_defaults() {
        let file = RulesFile::from_yaml_str("catalog: {}\n").unwrap();
        assert_eq!(file.checkout.rules, default_rules());
        assert!(file.catalog.is_empty());
    }

    #[test]
    fn test_rejects_empty_categories() {
        let yaml = "rules:\n  - categories: []\n    requires_civic_number: true\n";
        assert!(matches!(
            RulesFile::from_yaml_str(yaml),
            Err(RulesError::EmptyCategories { index: 0 })
        ));
    }

    #[test]
    fn test_rejects_invalid_slug() {
        let yaml = "rules:\n  - categories: [Mobil Abonnemang]\n";
        assert!(matches!(
            RulesFile::from_yaml_str(yaml),
            Err(RulesError::InvalidSlug { index: 0, .. })
        ));
    }

    #[test]
    fn test_rejects_org_without_civic() {
        let yaml = "rules:\n  - categories: [foretagsabonnemang]\n    requires_org_number: true\n";
        assert!(matches!(
            RulesFile::from_yaml_str(yaml),
            Err(RulesError::OrgWithoutCivic { index: 0 })
        ));
    }

    #[test]
    fn test_rejects_malformed_yaml() {
        assert!(matches!(
            RulesFile::from_yaml_str("rules: [[["),
            Err(RulesError::Parse(_))
        ));
    }
}
