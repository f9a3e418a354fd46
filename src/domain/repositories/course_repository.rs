use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::course::{Course, Exercise};
use crate::domain::DomainResult;

/// Lookups for courses and their exercises
#[async_trait]
pub trait CourseRepository: Send + Sync {
    async fn find_course_by_id(&self, id: Uuid) -> DomainResult<Option<Course>>;

    async fn find_exercise_by_id(&self, id: Uuid) -> DomainResult<Option<Exercise>>;
}
