// Team request workflow
// One method per team endpoint. The caller is always an explicit argument.
// Every operation runs: input validation, role gate, lookups,
// fine-grained authorization, mutation.

use std::sync::Arc;
use uuid::Uuid;

use super::team_service::TeamService;
use crate::domain::authorization::{self, role_gate};
use crate::domain::course::{Course, Exercise};
use crate::domain::repositories::{CourseRepository, Repositories, TeamRepository};
use crate::domain::team::{TeamDraft, TeamEvent, TeamWithStudents};
use crate::domain::user::{Authority, LoginOrName, TeamSearchUser, User};
use crate::domain::{DomainError, DomainResult};

const WRONG_EXERCISE: &str = "The team does not belong to the specified exercise id.";

/// A team as submitted by a client for create or update
#[derive(Debug, Clone)]
pub struct TeamSubmission {
    /// Must be absent on create and present on update
    pub id: Option<Uuid>,
    /// Exercise the client believes the team belongs to
    pub exercise_id: Option<Uuid>,
    pub draft: TeamDraft,
}

impl TeamSubmission {
    fn ensure_exercise(&self, exercise_id: Uuid) -> DomainResult<()> {
        if self.exercise_id != Some(exercise_id) {
            return Err(DomainError::validation(WRONG_EXERCISE));
        }
        Ok(())
    }
}

/// Stateless per-request handler for team management
#[derive(Clone)]
pub struct TeamWorkflow {
    teams: Arc<dyn TeamRepository>,
    courses: Arc<dyn CourseRepository>,
    team_service: TeamService,
}

impl TeamWorkflow {
    pub fn new(repositories: &Repositories) -> Self {
        Self {
            teams: repositories.teams.clone(),
            courses: repositories.courses.clone(),
            team_service: TeamService::new(repositories),
        }
    }

    /// Create a team for an exercise
    pub async fn create(
        &self,
        caller: &User,
        exercise_id: Uuid,
        submission: TeamSubmission,
    ) -> DomainResult<(TeamWithStudents, TeamEvent)> {
        if submission.id.is_some() {
            return Err(DomainError::validation("A new team cannot already have an ID"));
        }
        submission.ensure_exercise(exercise_id)?;
        role_gate(caller, &Authority::STAFF).into_result()?;

        let (exercise, course) = self.exercise_with_course(exercise_id).await?;
        authorization::teaching_assistant_for_exercise(&course, caller).into_result()?;

        self.team_service
            .save(&course, &exercise, None, submission.draft)
            .await
    }

    /// Update an existing team of an exercise
    pub async fn update(
        &self,
        caller: &User,
        exercise_id: Uuid,
        submission: TeamSubmission,
    ) -> DomainResult<(TeamWithStudents, TeamEvent)> {
        let Some(id) = submission.id else {
            return Err(DomainError::validation("Invalid id"));
        };
        submission.ensure_exercise(exercise_id)?;
        role_gate(caller, &Authority::STAFF).into_result()?;

        let existing = self
            .teams
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("Team not found: {}", id)))?;
        // The exercise is fixed at creation; a body cannot move a team.
        if !existing.belongs_to(exercise_id) {
            return Err(DomainError::validation(WRONG_EXERCISE));
        }

        let (exercise, course) = self.exercise_with_course(exercise_id).await?;
        authorization::teaching_assistant_for_exercise(&course, caller).into_result()?;

        self.team_service
            .save(&course, &exercise, Some(existing), submission.draft)
            .await
    }

    /// Get one team with its students
    pub async fn get(&self, caller: &User, exercise_id: Uuid, id: Uuid) -> DomainResult<TeamWithStudents> {
        role_gate(caller, &Authority::ANY).into_result()?;

        let team = self
            .teams
            .find_by_id_with_students(id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("Team not found: {}", id)))?;
        if !team.team.belongs_to(exercise_id) {
            return Err(DomainError::validation(WRONG_EXERCISE));
        }

        let (_, course) = self.exercise_with_course(exercise_id).await?;
        authorization::team_view(&course, &team.team, caller).into_result()?;

        Ok(team)
    }

    /// All teams of an exercise with their students, in no defined order
    pub async fn list_for_exercise(
        &self,
        caller: &User,
        exercise_id: Uuid,
    ) -> DomainResult<Vec<TeamWithStudents>> {
        role_gate(caller, &Authority::STAFF).into_result()?;

        let (_, course) = self.exercise_with_course(exercise_id).await?;
        authorization::teaching_assistant_for_exercise(&course, caller).into_result()?;

        self.teams.find_all_by_exercise_id_with_students(exercise_id).await
    }

    /// Delete a team of an exercise
    pub async fn delete(&self, caller: &User, exercise_id: Uuid, id: Uuid) -> DomainResult<TeamEvent> {
        role_gate(caller, &Authority::STAFF).into_result()?;

        let team = self
            .teams
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("Team not found: {}", id)))?;
        if !team.belongs_to(exercise_id) {
            return Err(DomainError::validation(WRONG_EXERCISE));
        }

        let (_, course) = self.exercise_with_course(team.exercise_id()).await?;
        authorization::teaching_assistant_for_exercise(&course, caller).into_result()?;

        if !self.teams.delete(id).await? {
            // Removed concurrently between lookup and delete
            return Err(DomainError::not_found(format!("Team not found: {}", id)));
        }

        let event = team.deleted_by(caller.id);
        tracing::info!(
            team_id = %id,
            exercise_id = %exercise_id,
            short_name = %team.short_name(),
            deleted_by = %caller.login,
            "Team deleted"
        );
        Ok(event)
    }

    /// Whether any team in any exercise uses `short_name`
    pub async fn exists_by_short_name(&self, caller: &User, short_name: &str) -> DomainResult<bool> {
        role_gate(caller, &Authority::STAFF).into_result()?;

        Ok(self.teams.find_by_short_name(short_name).await?.is_some())
    }

    /// Students of a course a team of `exercise_id` could be formed from
    pub async fn search_users_in_course(
        &self,
        caller: &User,
        course_id: Uuid,
        exercise_id: Uuid,
        login_or_name: &str,
    ) -> DomainResult<Vec<TeamSearchUser>> {
        let query = LoginOrName::new(login_or_name)?;
        role_gate(caller, &Authority::STAFF).into_result()?;

        let course = self.course(course_id).await?;
        authorization::teaching_assistant_in_course(&course, caller).into_result()?;

        let exercise = self.exercise(exercise_id).await?;
        if !exercise.belongs_to(course.id) {
            return Err(DomainError::validation(
                "The exercise does not belong to the specified course id.",
            ));
        }

        self.team_service
            .search_by_login_or_name_in_course_for_exercise_team(&course, &exercise, &query)
            .await
    }

    async fn course(&self, id: Uuid) -> DomainResult<Course> {
        self.courses
            .find_course_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("Course not found: {}", id)))
    }

    async fn exercise(&self, id: Uuid) -> DomainResult<Exercise> {
        self.courses
            .find_exercise_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("Exercise not found: {}", id)))
    }

    async fn exercise_with_course(&self, exercise_id: Uuid) -> DomainResult<(Exercise, Course)> {
        let exercise = self.exercise(exercise_id).await?;
        let course = self.course(exercise.course_id).await?;
        Ok((exercise, course))
    }
}
