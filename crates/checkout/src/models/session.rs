//! Session-related types.
//!
//! Values the shopper typed into the checkout form are kept in the session so
//! the form can be pre-filled on the next visit.

use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use civic_checkout_core::AttributeKey;

use crate::services::SessionValues;

/// Session keys for checkout data.
pub mod keys {
    /// Key for the draft personal identity number.
    pub const SOCIAL_CIVIC_NUMBER: &str = "social_civic_number";

    /// Key for the draft organization number.
    pub const ORGANIZATION_NUMBER: &str = "organization_number";
}

const fn session_key(key: AttributeKey) -> &'static str {
    match key {
        AttributeKey::SocialCivicNumber => keys::SOCIAL_CIVIC_NUMBER,
        AttributeKey::OrganizationNumber => keys::ORGANIZATION_NUMBER,
    }
}

/// Draft identity numbers as last entered in this session.
///
/// A snapshot is read from the session once per request so the field policy
/// can stay synchronous.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub social_civic_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization_number: Option<String>,
}

impl CheckoutDraft {
    /// Load the draft values from the session.
    ///
    /// # Errors
    ///
    /// Returns `tower_sessions::session::Error` if the session store fails.
    pub async fn load(session: &Session) -> Result<Self, tower_sessions::session::Error> {
        Ok(Self {
            social_civic_number: session.get::<String>(keys::SOCIAL_CIVIC_NUMBER).await?,
            organization_number: session.get::<String>(keys::ORGANIZATION_NUMBER).await?,
        })
    }

    /// Store the provided values in the session, leaving the others untouched.
    ///
    /// # Errors
    ///
    /// Returns `tower_sessions::session::Error` if the session store fails.
    pub async fn save(&self, session: &Session) -> Result<(), tower_sessions::session::Error> {
        for key in AttributeKey::ALL {
            if let Some(value) = self.get(key) {
                session.insert(session_key(key), value).await?;
            }
        }
        Ok(())
    }

    fn get(&self, key: AttributeKey) -> Option<&str> {
        match key {
            AttributeKey::SocialCivicNumber => self.social_civic_number.as_deref(),
            AttributeKey::OrganizationNumber => self.organization_number.as_deref(),
        }
    }
}

impl SessionValues for CheckoutDraft {
    fn saved_value(&self, key: AttributeKey) -> String {
        self.get(key).unwrap_or_default().to_owned()
    }
}
