use serde::Serialize;
use uuid::Uuid;

/// A named grading dimension of an exercise
///
/// `structured_grading_instructions` is only populated by the deep
/// repository lookup; the shallow lookup leaves it empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GradingCriterion {
    pub id: Uuid,
    pub exercise_id: Uuid,
    pub title: Option<String>,
    pub structured_grading_instructions: Vec<StructuredGradingInstruction>,
}

/// One graded step of a criterion, worth a number of credits
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuredGradingInstruction {
    pub id: Uuid,
    pub criterion_id: Uuid,
    pub credits: f64,
    pub grading_scale: String,
    pub instruction_description: String,
    pub feedback: String,
    /// How often this instruction may be applied; zero means unlimited
    pub usage_count: i32,
}

impl GradingCriterion {
    /// Sum of the credits of every loaded instruction
    pub fn total_credits(&self) -> f64 {
        self.structured_grading_instructions
            .iter()
            .map(|instruction| instruction.credits)
            .sum()
    }
}
