// Alert headers
// Tell the client which entity a mutation touched, e.g.
//   X-courseteams-alert: courseteams.team.created
//   X-courseteams-params: <team id>

use axum::http::{HeaderMap, HeaderName, HeaderValue};

use crate::domain::team::TeamEvent;

pub const TEAM_ENTITY: &str = "team";

/// Builds the alert headers for an entity action
///
/// Header values that cannot be encoded are skipped rather than failing
/// the request.
pub fn entity_alert(application_name: &str, entity: &str, action: &str, param: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    let alert = format!("{}.{}.{}", application_name, entity, action);

    let pairs = [
        (format!("x-{}-alert", application_name), alert.as_str()),
        (format!("x-{}-params", application_name), param),
    ];
    for (name, value) in pairs {
        match (
            HeaderName::try_from(name.to_ascii_lowercase()),
            HeaderValue::from_str(value),
        ) {
            (Ok(name), Ok(value)) => {
                headers.insert(name, value);
            }
            _ => tracing::warn!(header = %name, "Skipping unencodable alert header"),
        }
    }

    headers
}

/// Alert headers for a team event
pub fn team_alert(application_name: &str, event: &TeamEvent) -> HeaderMap {
    entity_alert(
        application_name,
        TEAM_ENTITY,
        event.action(),
        &event.team_id().to_string(),
    )
}
