//! Swedish personal and organization identity numbers.

use core::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Accepted literal forms: `YYYYMMDD-XXXX` or `YYYYMMDDXXXX`.
///
/// ASCII digits only; `\d` would also admit other Unicode digits.
static ACCEPTED_FORMAT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9]{8}-[0-9]{4}$|^[0-9]{12}$").expect("identity number pattern is valid")
});

/// Errors that can occur when validating an [`IdentityNumber`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum IdentityNumberError {
    /// The input is neither `YYYYMMDD-XXXX` nor `YYYYMMDDXXXX`.
    #[error("identity number must be twelve digits, formatted YYYYMMDDXXXX or YYYYMMDD-XXXX")]
    Format,
}

/// A normalized identity number (personnummer or organisationsnummer).
///
/// The wrapped value is always exactly twelve ASCII digits. Only the syntax is
/// checked: the date part and the Luhn check digit are not verified.
///
/// ## Examples
///
/// ```
/// use civic_checkout_core::IdentityNumber;
///
/// let hyphenated = IdentityNumber::parse("19900101-1234").unwrap();
/// let bare = IdentityNumber::parse("199001011234").unwrap();
/// assert_eq!(hyphenated, bare);
/// assert_eq!(bare.as_str(), "199001011234");
///
/// assert!(IdentityNumber::parse("1990-01-01").is_err());
/// assert!(IdentityNumber::parse("abc").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct IdentityNumber(String);

impl IdentityNumber {
    /// Number of digits in the normalized form.
    pub const DIGITS: usize = 12;

    /// Parse and normalize an identity number.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityNumberError::Format`] if the input does not match one
    /// of the accepted literal forms.
    pub fn parse(raw: &str) -> Result<Self, IdentityNumberError> {
        if !ACCEPTED_FORMAT.is_match(raw) {
            return Err(IdentityNumberError::Format);
        }

        Ok(Self(normalize_digits(raw)))
    }

    /// Returns the normalized digits.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The `YYYYMMDD` part of the number.
    #[must_use]
    pub fn date_part(&self) -> &str {
        self.0.get(..8).unwrap_or_default()
    }

    /// Masked form for logs and receipts, e.g. `19900101-****`.
    #[must_use]
    pub fn masked(&self) -> String {
        format!("{}-****", self.date_part())
    }
}

impl fmt::Display for IdentityNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for IdentityNumber {
    type Err = IdentityNumberError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for IdentityNumber {
    type Error = IdentityNumberError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<IdentityNumber> for String {
    fn from(number: IdentityNumber) -> Self {
        number.0
    }
}

impl AsRef<str> for IdentityNumber {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Strip every character that is not an ASCII digit.
///
/// This is the normalization applied before persistence. It does not check
/// the format: `"12ab34"` becomes `"1234"`.
#[must_use]
pub fn normalize_digits(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

/// Validate a possibly absent identity number field.
///
/// Absent and empty input is accepted and produces no value, whether or not
/// the field was presented as required. Callers that want to reject a missing
/// required value have to check that themselves.
///
/// # Errors
///
/// Returns [`IdentityNumberError::Format`] if a non-empty input does not match
/// one of the accepted forms.
pub fn validate_identity_number(
    raw: Option<&str>,
) -> Result<Option<IdentityNumber>, IdentityNumberError> {
    match raw {
        None | Some("") => Ok(None),
        Some(value) => IdentityNumber::parse(value).map(Some),
    }
}
