use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::course::{Course, Exercise};
use crate::domain::repositories::CourseRepository;
use crate::domain::{DomainError, DomainResult};

#[derive(Debug, sqlx::FromRow)]
struct CourseRow {
    id: Uuid,
    title: String,
    short_name: String,
    student_group_name: String,
    teaching_assistant_group_name: String,
    instructor_group_name: String,
}

impl From<CourseRow> for Course {
    fn from(r: CourseRow) -> Self {
        Course {
            id: r.id,
            title: r.title,
            short_name: r.short_name,
            student_group_name: r.student_group_name,
            teaching_assistant_group_name: r.teaching_assistant_group_name,
            instructor_group_name: r.instructor_group_name,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ExerciseRow {
    id: Uuid,
    course_id: Uuid,
    title: String,
}

/// PostgreSQL implementation of CourseRepository
pub struct PostgresCourseRepository {
    pool: PgPool,
}

impl PostgresCourseRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CourseRepository for PostgresCourseRepository {
    async fn find_course_by_id(&self, id: Uuid) -> DomainResult<Option<Course>> {
        let row = sqlx::query_as::<_, CourseRow>(
            r#"
            SELECT id, title, short_name, student_group_name,
                   teaching_assistant_group_name, instructor_group_name
            FROM courses
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to find course by id: {}", e)))?;

        Ok(row.map(Course::from))
    }

    async fn find_exercise_by_id(&self, id: Uuid) -> DomainResult<Option<Exercise>> {
        let row = sqlx::query_as::<_, ExerciseRow>(
            "SELECT id, course_id, title FROM exercises WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to find exercise by id: {}", e)))?;

        Ok(row.map(|r| Exercise {
            id: r.id,
            course_id: r.course_id,
            title: r.title,
        }))
    }
}
