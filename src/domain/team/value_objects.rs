use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::DomainError;

/// Globally unique, human-chosen team identifier
///
/// # Invariants
/// - Starts with an ASCII letter
/// - Contains only ASCII letters and digits
/// - At most 64 characters
///
/// Uniqueness across all teams is enforced by the team service and the
/// store's unique index, not by this type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ShortName(String);

impl ShortName {
    pub const MAX_LENGTH: usize = 64;

    /// Creates a validated short name
    ///
    /// # Example
    /// ```
    /// use courseteams_api::domain::team::ShortName;
    ///
    /// assert!(ShortName::new("alpha1").is_ok());
    /// assert!(ShortName::new("1alpha").is_err());
    /// ```
    pub fn new(short_name: impl Into<String>) -> Result<Self, DomainError> {
        let short_name = short_name.into();
        let mut chars = short_name.chars();

        let starts_with_letter = chars.next().is_some_and(|c| c.is_ascii_alphabetic());
        if !starts_with_letter {
            return Err(DomainError::validation(
                "Team short name must start with a letter",
            ));
        }
        if !chars.all(|c| c.is_ascii_alphanumeric()) {
            return Err(DomainError::validation(
                "Team short name may only contain letters and digits",
            ));
        }
        if short_name.len() > Self::MAX_LENGTH {
            return Err(DomainError::validation(format!(
                "Team short name must be at most {} characters",
                Self::MAX_LENGTH
            )));
        }

        Ok(Self(short_name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ShortName {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ShortName> for String {
    fn from(short_name: ShortName) -> Self {
        short_name.0
    }
}

impl fmt::Display for ShortName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
