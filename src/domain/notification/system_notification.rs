use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::domain::DomainError;

/// Severity of a system notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum NotificationType {
    Info,
    Warning,
}

impl fmt::Display for NotificationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotificationType::Info => write!(f, "INFO"),
            NotificationType::Warning => write!(f, "WARNING"),
        }
    }
}

impl FromStr for NotificationType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "INFO" => Ok(NotificationType::Info),
            "WARNING" => Ok(NotificationType::Warning),
            other => Err(DomainError::validation(format!(
                "Unknown notification type: {}",
                other
            ))),
        }
    }
}

/// A platform-wide message shown to every user while it is active
///
/// # Active window
/// Active at `now` iff `notification_date <= now` and either no expiry is
/// set or `now <= expire_date`. Both bounds are inclusive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemNotification {
    pub id: Uuid,
    pub title: String,
    pub text: Option<String>,
    #[serde(rename = "type")]
    pub notification_type: NotificationType,
    pub notification_date: DateTime<Utc>,
    pub expire_date: Option<DateTime<Utc>>,
}

impl SystemNotification {
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        self.notification_date <= now && self.expire_date.map_or(true, |expiry| now <= expiry)
    }
}
