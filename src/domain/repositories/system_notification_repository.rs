use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::notification::SystemNotification;
use crate::domain::DomainResult;

/// Lookups for system notifications
#[async_trait]
pub trait SystemNotificationRepository: Send + Sync {
    /// Notifications active at `now`, ascending by notification date
    async fn find_all_active(&self, now: DateTime<Utc>) -> DomainResult<Vec<SystemNotification>>;
}
