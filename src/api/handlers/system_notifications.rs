use axum::{extract::State, Json};
use chrono::Utc;

use crate::api::errors::ApiError;
use crate::api::middleware::CurrentUser;
use crate::api::state::AppState;
use crate::domain::notification::SystemNotification;

/// Get all currently active system notifications, oldest first
///
/// GET /api/system-notifications/active
pub async fn get_active_system_notifications(
    State(state): State<AppState>,
    CurrentUser(_caller): CurrentUser,
) -> Result<Json<Vec<SystemNotification>>, ApiError> {
    let notifications = state
        .repositories
        .system_notifications
        .find_all_active(Utc::now())
        .await?;

    Ok(Json(notifications))
}
