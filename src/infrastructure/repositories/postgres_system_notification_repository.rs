use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::notification::{NotificationType, SystemNotification};
use crate::domain::repositories::SystemNotificationRepository;
use crate::domain::{DomainError, DomainResult};

#[derive(Debug, sqlx::FromRow)]
struct SystemNotificationRow {
    id: Uuid,
    title: String,
    text: Option<String>,
    notification_type: String,
    notification_date: DateTime<Utc>,
    expire_date: Option<DateTime<Utc>>,
}

impl TryFrom<SystemNotificationRow> for SystemNotification {
    type Error = DomainError;

    fn try_from(r: SystemNotificationRow) -> Result<Self, Self::Error> {
        let notification_type = r.notification_type.parse::<NotificationType>().map_err(|e| {
            DomainError::storage(format!("Invalid notification type from database: {}", e))
        })?;

        Ok(SystemNotification {
            id: r.id,
            title: r.title,
            text: r.text,
            notification_type,
            notification_date: r.notification_date,
            expire_date: r.expire_date,
        })
    }
}

/// PostgreSQL implementation of SystemNotificationRepository
pub struct PostgresSystemNotificationRepository {
    pool: PgPool,
}

impl PostgresSystemNotificationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SystemNotificationRepository for PostgresSystemNotificationRepository {
    async fn find_all_active(&self, now: DateTime<Utc>) -> DomainResult<Vec<SystemNotification>> {
        let rows = sqlx::query_as::<_, SystemNotificationRow>(
            r#"
            SELECT id, title, text, notification_type, notification_date, expire_date
            FROM system_notifications
            WHERE notification_date <= $1
              AND (expire_date IS NULL OR $1 <= expire_date)
            ORDER BY notification_date ASC
            "#,
        )
        .bind(now)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            DomainError::storage(format!("Failed to find active system notifications: {}", e))
        })?;

        rows.into_iter().map(SystemNotification::try_from).collect()
    }
}
