use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::api::errors::ApiError;
use crate::api::middleware::CurrentUser;
use crate::api::state::AppState;
use crate::domain::authorization::{self, role_gate};
use crate::domain::grading::GradingCriterion;
use crate::domain::user::Authority;

/// Get the grading criteria of an exercise with their instructions
///
/// GET /api/exercises/:exercise_id/grading-criteria
pub async fn get_grading_criteria(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Path(exercise_id): Path<Uuid>,
) -> Result<Json<Vec<GradingCriterion>>, ApiError> {
    role_gate(&caller, &Authority::STAFF).into_result()?;

    let repos = &state.repositories;
    let exercise = repos
        .courses
        .find_exercise_by_id(exercise_id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Exercise not found: {}", exercise_id)))?;
    let course = repos
        .courses
        .find_course_by_id(exercise.course_id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Course not found: {}", exercise.course_id)))?;
    authorization::teaching_assistant_for_exercise(&course, &caller).into_result()?;

    let criteria = repos
        .grading_criteria
        .find_all_by_exercise_id_with_instructions(exercise_id)
        .await?;

    Ok(Json(criteria))
}
