use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::team::{Team, TeamWithStudents};
use crate::domain::DomainResult;

/// Repository trait for the Team aggregate
///
/// Shallow lookups return the team with member ids only; the
/// `_with_students` variants also load the member user records.
#[async_trait]
pub trait TeamRepository: Send + Sync {
    /// Save a team and its membership (insert or update)
    async fn save(&self, team: &Team) -> DomainResult<()>;

    /// Find a team by its ID
    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<Team>>;

    /// Find a team by its ID, loading its students
    async fn find_by_id_with_students(&self, id: Uuid) -> DomainResult<Option<TeamWithStudents>>;

    /// Find all teams of an exercise
    async fn find_all_by_exercise_id(&self, exercise_id: Uuid) -> DomainResult<Vec<Team>>;

    /// Find all teams of an exercise, loading their students
    async fn find_all_by_exercise_id_with_students(
        &self,
        exercise_id: Uuid,
    ) -> DomainResult<Vec<TeamWithStudents>>;

    /// Find the team with the given short name, in any exercise
    async fn find_by_short_name(&self, short_name: &str) -> DomainResult<Option<Team>>;

    /// Delete a team by ID, returning whether a team was removed
    async fn delete(&self, id: Uuid) -> DomainResult<bool>;
}
