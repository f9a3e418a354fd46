use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::DomainError;

/// Global authority granted to a user account
///
/// Authorities form the coarse role tiers checked before any
/// course-specific predicate runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Authority {
    #[serde(rename = "ROLE_USER")]
    User,
    #[serde(rename = "ROLE_TA")]
    TeachingAssistant,
    #[serde(rename = "ROLE_INSTRUCTOR")]
    Instructor,
    #[serde(rename = "ROLE_ADMIN")]
    Admin,
}

impl Authority {
    /// Every authority allowed to manage teams
    pub const STAFF: [Authority; 3] = [
        Authority::TeachingAssistant,
        Authority::Instructor,
        Authority::Admin,
    ];

    /// Every authority, including plain users
    pub const ANY: [Authority; 4] = [
        Authority::User,
        Authority::TeachingAssistant,
        Authority::Instructor,
        Authority::Admin,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Authority::User => "ROLE_USER",
            Authority::TeachingAssistant => "ROLE_TA",
            Authority::Instructor => "ROLE_INSTRUCTOR",
            Authority::Admin => "ROLE_ADMIN",
        }
    }
}

impl fmt::Display for Authority {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Authority {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ROLE_USER" => Ok(Authority::User),
            "ROLE_TA" => Ok(Authority::TeachingAssistant),
            "ROLE_INSTRUCTOR" => Ok(Authority::Instructor),
            "ROLE_ADMIN" => Ok(Authority::Admin),
            other => Err(DomainError::validation(format!("Unknown authority: {}", other))),
        }
    }
}

/// Free-text search term matched against user logins and names
///
/// # Invariants
/// - At least three characters long, which keeps searches from
///   enumerating every user of a course
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginOrName(String);

impl LoginOrName {
    pub const MIN_LENGTH: usize = 3;

    /// Creates a search term, rejecting queries that are too short
    ///
    /// # Example
    /// ```
    /// use courseteams_api::domain::user::LoginOrName;
    ///
    /// assert!(LoginOrName::new("ab").is_err());
    /// assert_eq!(LoginOrName::new("abc").unwrap().as_str(), "abc");
    /// ```
    pub fn new(query: impl Into<String>) -> Result<Self, DomainError> {
        let query = query.into();
        if query.chars().count() < Self::MIN_LENGTH {
            return Err(DomainError::validation(
                "Query param 'loginOrName' must be three characters or longer.",
            ));
        }
        Ok(Self(query))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Case-insensitive substring match
    pub fn matches(&self, candidate: &str) -> bool {
        candidate
            .to_lowercase()
            .contains(&self.0.to_lowercase())
    }
}

impl fmt::Display for LoginOrName {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
