use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::grading::GradingCriterion;
use crate::domain::DomainResult;

/// Lookups for the grading criteria of an exercise
#[async_trait]
pub trait GradingCriterionRepository: Send + Sync {
    /// Criteria without their instructions
    async fn find_all_by_exercise_id(&self, exercise_id: Uuid) -> DomainResult<Vec<GradingCriterion>>;

    /// Criteria with their structured grading instructions, each criterion once
    async fn find_all_by_exercise_id_with_instructions(
        &self,
        exercise_id: Uuid,
    ) -> DomainResult<Vec<GradingCriterion>>;
}
