use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::course::{Course, Exercise};
use crate::domain::repositories::{Repositories, TeamRepository, UserRepository};
use crate::domain::team::{Team, TeamDraft, TeamEvent, TeamWithStudents};
use crate::domain::user::{LoginOrName, TeamSearchUser};
use crate::domain::{DomainError, DomainResult};

/// Persists teams and runs the team formation search
///
/// Enforces the cross-team rules a single aggregate cannot see: short
/// names are unique platform-wide, and a student is in at most one team
/// per exercise.
#[derive(Clone)]
pub struct TeamService {
    teams: Arc<dyn TeamRepository>,
    users: Arc<dyn UserRepository>,
}

impl TeamService {
    pub fn new(repositories: &Repositories) -> Self {
        Self {
            teams: repositories.teams.clone(),
            users: repositories.users.clone(),
        }
    }

    /// Creates a team for `exercise`, or applies `draft` to `existing`
    ///
    /// # Errors
    /// * `Validation` - invalid draft, unknown students, or students outside the course
    /// * `Conflict` - short name taken, or a student already has a team in this exercise
    pub async fn save(
        &self,
        course: &Course,
        exercise: &Exercise,
        existing: Option<Team>,
        draft: TeamDraft,
    ) -> DomainResult<(TeamWithStudents, TeamEvent)> {
        let (team, event) = match existing {
            Some(mut team) => {
                let event = team.apply(draft)?;
                (team, event)
            }
            None => Team::new(exercise.id, draft)?,
        };

        if let Some(other) = self.teams.find_by_short_name(team.short_name().as_str()).await? {
            if other.id() != team.id() {
                return Err(DomainError::conflict(format!(
                    "A team with the short name '{}' already exists",
                    team.short_name()
                )));
            }
        }

        let student_ids: Vec<Uuid> = team.student_ids().iter().copied().collect();
        let students = self.users.find_all_by_ids(&student_ids).await?;
        if students.len() != student_ids.len() {
            let missing: Vec<String> = student_ids
                .iter()
                .filter(|id| !students.iter().any(|s| s.id == **id))
                .map(Uuid::to_string)
                .collect();
            return Err(DomainError::validation(format!(
                "Unknown students: {}",
                missing.join(", ")
            )));
        }
        if let Some(outsider) = students.iter().find(|s| !course.is_student(s)) {
            return Err(DomainError::validation(format!(
                "User {} is not a student of course {}",
                outsider.login, course.short_name
            )));
        }

        for other in self.teams.find_all_by_exercise_id(exercise.id).await? {
            if other.id() == team.id() {
                continue;
            }
            if let Some(taken) = students.iter().find(|s| other.has_student(s.id)) {
                return Err(DomainError::conflict(format!(
                    "Student {} is already assigned to team {}",
                    taken.login,
                    other.short_name()
                )));
            }
        }

        self.teams.save(&team).await?;
        tracing::debug!(team_id = %team.id(), exercise_id = %exercise.id, "Team saved");

        Ok((TeamWithStudents { team, students }, event))
    }

    /// Students of `course` matching `query`, each with the team of
    /// `exercise` they already belong to
    pub async fn search_by_login_or_name_in_course_for_exercise_team(
        &self,
        course: &Course,
        exercise: &Exercise,
        query: &LoginOrName,
    ) -> DomainResult<Vec<TeamSearchUser>> {
        let users = self
            .users
            .search_by_login_or_name_in_group(&course.student_group_name, query)
            .await?;

        let mut assignments: HashMap<Uuid, Uuid> = HashMap::new();
        for team in self.teams.find_all_by_exercise_id(exercise.id).await? {
            for student_id in team.student_ids() {
                assignments.insert(*student_id, team.id());
            }
        }

        Ok(users
            .iter()
            .map(|user| TeamSearchUser::new(user, assignments.get(&user.id).copied()))
            .collect())
    }
}
