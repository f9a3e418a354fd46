use axum::{
    extract::{Path, State},
    http::{header::LOCATION, HeaderMap, HeaderValue, StatusCode},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::alerts::team_alert;
use crate::api::errors::ApiError;
use crate::api::extract::{Json, Query};
use crate::api::middleware::CurrentUser;
use crate::api::state::AppState;
use crate::domain::team::{TeamDraft, TeamWithStudents};
use crate::domain::user::{TeamSearchUser, User};
use crate::services::{TeamSubmission, TeamWorkflow};

/// Reference to another entity by id, e.g. `{"id": "..."}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityRef {
    pub id: Uuid,
}

/// Request body for creating or updating a team
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamRequest {
    pub id: Option<Uuid>,
    pub name: String,
    pub short_name: String,
    pub image: Option<String>,
    pub exercise: Option<EntityRef>,
    #[serde(default)]
    pub students: Vec<EntityRef>,
}

impl From<TeamRequest> for TeamSubmission {
    fn from(req: TeamRequest) -> Self {
        TeamSubmission {
            id: req.id,
            exercise_id: req.exercise.map(|exercise| exercise.id),
            draft: TeamDraft {
                name: req.name,
                short_name: req.short_name,
                image: req.image,
                student_ids: req.students.into_iter().map(|s| s.id).collect(),
            },
        }
    }
}

/// A team member as shown to clients
#[derive(Debug, Serialize)]
pub struct StudentResponse {
    pub id: Uuid,
    pub login: String,
    pub name: String,
    pub email: Option<String>,
}

impl From<&User> for StudentResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            login: user.login.clone(),
            name: user.name(),
            email: user.email.clone(),
        }
    }
}

/// A team with its members
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamResponse {
    pub id: Uuid,
    pub name: String,
    pub short_name: String,
    pub image: Option<String>,
    pub exercise: EntityRef,
    pub students: Vec<StudentResponse>,
    pub created_at: DateTime<Utc>,
}

impl From<&TeamWithStudents> for TeamResponse {
    fn from(t: &TeamWithStudents) -> Self {
        Self {
            id: t.team.id(),
            name: t.team.name().to_string(),
            short_name: t.team.short_name().to_string(),
            image: t.team.image().map(str::to_string),
            exercise: EntityRef {
                id: t.team.exercise_id(),
            },
            students: t.students.iter().map(StudentResponse::from).collect(),
            created_at: t.team.created_at(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ShortNameParams {
    #[serde(rename = "shortName")]
    pub short_name: String,
}

#[derive(Debug, Deserialize)]
pub struct SearchUsersParams {
    #[serde(rename = "loginOrName")]
    pub login_or_name: String,
}

/// Create a new team for an exercise
///
/// POST /api/exercises/:exercise_id/teams
pub async fn create_team(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Path(exercise_id): Path<Uuid>,
    Json(req): Json<TeamRequest>,
) -> Result<(StatusCode, HeaderMap, Json<TeamResponse>), ApiError> {
    tracing::debug!(exercise_id = %exercise_id, short_name = %req.short_name, "REST request to create team");

    let (team, event) = TeamWorkflow::new(&state.repositories)
        .create(&caller, exercise_id, req.into())
        .await?;

    let mut headers = team_alert(&state.settings.application_name, &event);
    if let Ok(location) = HeaderValue::from_str(&format!("/api/teams/{}", team.team.id())) {
        headers.insert(LOCATION, location);
    }

    Ok((StatusCode::CREATED, headers, Json(TeamResponse::from(&team))))
}

/// Update an existing team
///
/// PUT /api/exercises/:exercise_id/teams
pub async fn update_team(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Path(exercise_id): Path<Uuid>,
    Json(req): Json<TeamRequest>,
) -> Result<(HeaderMap, Json<TeamResponse>), ApiError> {
    tracing::debug!(exercise_id = %exercise_id, team_id = ?req.id, "REST request to update team");

    let (team, event) = TeamWorkflow::new(&state.repositories)
        .update(&caller, exercise_id, req.into())
        .await?;

    let headers = team_alert(&state.settings.application_name, &event);
    Ok((headers, Json(TeamResponse::from(&team))))
}

/// Get a team with its students
///
/// GET /api/exercises/:exercise_id/teams/:id
pub async fn get_team(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Path((exercise_id, id)): Path<(Uuid, Uuid)>,
) -> Result<Json<TeamResponse>, ApiError> {
    tracing::debug!(exercise_id = %exercise_id, team_id = %id, "REST request to get team");

    let team = TeamWorkflow::new(&state.repositories)
        .get(&caller, exercise_id, id)
        .await?;

    Ok(Json(TeamResponse::from(&team)))
}

/// Get all teams of an exercise
///
/// GET /api/exercises/:exercise_id/teams
pub async fn get_teams_for_exercise(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Path(exercise_id): Path<Uuid>,
) -> Result<Json<Vec<TeamResponse>>, ApiError> {
    tracing::debug!(exercise_id = %exercise_id, "REST request to get all teams");

    let teams = TeamWorkflow::new(&state.repositories)
        .list_for_exercise(&caller, exercise_id)
        .await?;

    Ok(Json(teams.iter().map(TeamResponse::from).collect()))
}

/// Delete a team
///
/// DELETE /api/exercises/:exercise_id/teams/:id
pub async fn delete_team(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Path((exercise_id, id)): Path<(Uuid, Uuid)>,
) -> Result<(StatusCode, HeaderMap), ApiError> {
    tracing::debug!(exercise_id = %exercise_id, team_id = %id, "REST request to delete team");

    let event = TeamWorkflow::new(&state.repositories)
        .delete(&caller, exercise_id, id)
        .await?;

    Ok((
        StatusCode::OK,
        team_alert(&state.settings.application_name, &event),
    ))
}

/// Whether a team with the short name exists in any exercise
///
/// GET /api/teams?shortName=
pub async fn exists_team_by_short_name(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Query(params): Query<ShortNameParams>,
) -> Result<Json<bool>, ApiError> {
    tracing::debug!(short_name = %params.short_name, "REST request to check team existence");

    let exists = TeamWorkflow::new(&state.repositories)
        .exists_by_short_name(&caller, &params.short_name)
        .await?;

    Ok(Json(exists))
}

/// Search the students of a course to form a team for an exercise
///
/// GET /api/courses/:course_id/exercises/:exercise_id/team-search-users?loginOrName=
pub async fn search_users_in_course(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Path((course_id, exercise_id)): Path<(Uuid, Uuid)>,
    Query(params): Query<SearchUsersParams>,
) -> Result<Json<Vec<TeamSearchUser>>, ApiError> {
    tracing::debug!(course_id = %course_id, query = %params.login_or_name, "REST request to search users");

    let users = TeamWorkflow::new(&state.repositories)
        .search_users_in_course(&caller, course_id, exercise_id, &params.login_or_name)
        .await?;

    Ok(Json(users))
}
