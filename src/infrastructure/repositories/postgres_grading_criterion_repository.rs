use async_trait::async_trait;
use sqlx::PgPool;
use std::collections::HashMap;
use uuid::Uuid;

use crate::domain::grading::{GradingCriterion, StructuredGradingInstruction};
use crate::domain::repositories::GradingCriterionRepository;
use crate::domain::{DomainError, DomainResult};

#[derive(Debug, sqlx::FromRow)]
struct CriterionRow {
    id: Uuid,
    exercise_id: Uuid,
    title: Option<String>,
}

#[derive(Debug, sqlx::FromRow)]
struct InstructionRow {
    id: Uuid,
    criterion_id: Uuid,
    credits: f64,
    grading_scale: String,
    instruction_description: String,
    feedback: String,
    usage_count: i32,
}

impl From<InstructionRow> for StructuredGradingInstruction {
    fn from(r: InstructionRow) -> Self {
        StructuredGradingInstruction {
            id: r.id,
            criterion_id: r.criterion_id,
            credits: r.credits,
            grading_scale: r.grading_scale,
            instruction_description: r.instruction_description,
            feedback: r.feedback,
            usage_count: r.usage_count,
        }
    }
}

/// PostgreSQL implementation of GradingCriterionRepository
///
/// The deep lookup issues a second query for all instructions instead of
/// joining, so each criterion appears exactly once.
pub struct PostgresGradingCriterionRepository {
    pool: PgPool,
}

impl PostgresGradingCriterionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl GradingCriterionRepository for PostgresGradingCriterionRepository {
    async fn find_all_by_exercise_id(&self, exercise_id: Uuid) -> DomainResult<Vec<GradingCriterion>> {
        let rows = sqlx::query_as::<_, CriterionRow>(
            r#"
            SELECT id, exercise_id, title
            FROM grading_criteria
            WHERE exercise_id = $1
            ORDER BY title NULLS LAST, id
            "#,
        )
        .bind(exercise_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to find grading criteria: {}", e)))?;

        Ok(rows
            .into_iter()
            .map(|r| GradingCriterion {
                id: r.id,
                exercise_id: r.exercise_id,
                title: r.title,
                structured_grading_instructions: Vec::new(),
            })
            .collect())
    }

    async fn find_all_by_exercise_id_with_instructions(
        &self,
        exercise_id: Uuid,
    ) -> DomainResult<Vec<GradingCriterion>> {
        let mut criteria = self.find_all_by_exercise_id(exercise_id).await?;
        if criteria.is_empty() {
            return Ok(criteria);
        }

        let ids: Vec<Uuid> = criteria.iter().map(|c| c.id).collect();
        let rows = sqlx::query_as::<_, InstructionRow>(
            r#"
            SELECT id, criterion_id, credits, grading_scale,
                   instruction_description, feedback, usage_count
            FROM structured_grading_instructions
            WHERE criterion_id = ANY($1)
            ORDER BY position, id
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            DomainError::storage(format!("Failed to load structured grading instructions: {}", e))
        })?;

        let mut by_criterion: HashMap<Uuid, Vec<StructuredGradingInstruction>> = HashMap::new();
        for row in rows {
            by_criterion
                .entry(row.criterion_id)
                .or_default()
                .push(row.into());
        }
        for criterion in &mut criteria {
            criterion.structured_grading_instructions =
                by_criterion.remove(&criterion.id).unwrap_or_default();
        }

        Ok(criteria)
    }
}
