use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::collections::HashMap;
use uuid::Uuid;

use super::postgres_user_repository::{UserRow, USER_COLUMNS};
use crate::domain::repositories::TeamRepository;
use crate::domain::team::{ShortName, Team, TeamWithStudents};
use crate::domain::user::User;
use crate::domain::{DomainError, DomainResult};

#[derive(Debug, sqlx::FromRow)]
struct TeamRow {
    id: Uuid,
    exercise_id: Uuid,
    name: String,
    short_name: String,
    image: Option<String>,
    created_at: DateTime<Utc>,
    student_ids: Vec<Uuid>,
}

impl TryFrom<TeamRow> for Team {
    type Error = DomainError;

    fn try_from(r: TeamRow) -> Result<Self, Self::Error> {
        let short_name = ShortName::new(r.short_name)
            .map_err(|e| DomainError::storage(format!("Invalid short name from database: {}", e)))?;

        Ok(Team::from_persistence(
            r.id,
            r.exercise_id,
            r.name,
            short_name,
            r.image,
            r.student_ids.into_iter().collect(),
            r.created_at,
        ))
    }
}

#[derive(Debug, sqlx::FromRow)]
struct TeamStudentRow {
    team_id: Uuid,
    #[sqlx(flatten)]
    user: UserRow,
}

/// Teams with their member ids aggregated into one array column
const SELECT_TEAMS: &str = r#"
    SELECT
        t.id, t.exercise_id, t.name, t.short_name, t.image, t.created_at,
        COALESCE(
            ARRAY_AGG(ts.student_id) FILTER (WHERE ts.student_id IS NOT NULL),
            '{}'
        ) AS student_ids
    FROM teams t
    LEFT JOIN team_students ts ON ts.team_id = t.id
"#;

const UNIQUE_VIOLATION: &str = "23505";
const SHORT_NAME_CONSTRAINT: &str = "teams_short_name_key";

/// Whether a database error is the short name unique index rejecting a row
fn is_short_name_violation(code: Option<&str>, constraint: Option<&str>) -> bool {
    code == Some(UNIQUE_VIOLATION) && constraint == Some(SHORT_NAME_CONSTRAINT)
}

/// Maps a failed team insert, turning a lost short name race into a conflict
fn save_error(err: sqlx::Error, short_name: &ShortName) -> DomainError {
    let short_name_taken = err
        .as_database_error()
        .is_some_and(|db| is_short_name_violation(db.code().as_deref(), db.constraint()));

    if short_name_taken {
        DomainError::conflict(format!(
            "A team with the short name '{}' already exists",
            short_name
        ))
    } else {
        DomainError::storage(format!("Failed to save team: {}", err))
    }
}

/// PostgreSQL implementation of TeamRepository
///
/// Membership lives in `team_students`; `save` rewrites it inside the
/// same transaction as the team row.
pub struct PostgresTeamRepository {
    pool: PgPool,
}

impl PostgresTeamRepository {
    /// Creates a new PostgresTeamRepository
    ///
    /// # Arguments
    /// * `pool` - SQLx connection pool for PostgreSQL
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_students(&self, team_ids: &[Uuid]) -> DomainResult<HashMap<Uuid, Vec<User>>> {
        let sql = format!(
            r#"
            SELECT ts.team_id, {}
            FROM team_students ts
            JOIN users u ON u.id = ts.student_id
            WHERE ts.team_id = ANY($1)
            ORDER BY u.login
            "#,
            USER_COLUMNS
        );
        let rows = sqlx::query_as::<_, TeamStudentRow>(&sql)
            .bind(team_ids)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to load team students: {}", e)))?;

        let mut students: HashMap<Uuid, Vec<User>> = HashMap::new();
        for row in rows {
            students
                .entry(row.team_id)
                .or_default()
                .push(User::try_from(row.user)?);
        }
        Ok(students)
    }

    async fn with_students(&self, teams: Vec<Team>) -> DomainResult<Vec<TeamWithStudents>> {
        let ids: Vec<Uuid> = teams.iter().map(Team::id).collect();
        let mut students = self.fetch_students(&ids).await?;

        Ok(teams
            .into_iter()
            .map(|team| TeamWithStudents {
                students: students.remove(&team.id()).unwrap_or_default(),
                team,
            })
            .collect())
    }
}

#[async_trait]
impl TeamRepository for PostgresTeamRepository {
    async fn save(&self, team: &Team) -> DomainResult<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to begin transaction: {}", e)))?;

        sqlx::query(
            r#"
            INSERT INTO teams (id, exercise_id, name, short_name, image, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (id) DO UPDATE SET
                name = EXCLUDED.name,
                short_name = EXCLUDED.short_name,
                image = EXCLUDED.image
            "#,
        )
        .bind(team.id())
        .bind(team.exercise_id())
        .bind(team.name())
        .bind(team.short_name().as_str())
        .bind(team.image())
        .bind(team.created_at())
        .execute(&mut *tx)
        .await
        .map_err(|e| save_error(e, team.short_name()))?;

        sqlx::query("DELETE FROM team_students WHERE team_id = $1")
            .bind(team.id())
            .execute(&mut *tx)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to clear team students: {}", e)))?;

        let student_ids: Vec<Uuid> = team.student_ids().iter().copied().collect();
        sqlx::query(
            r#"
            INSERT INTO team_students (team_id, student_id)
            SELECT $1, student_id FROM UNNEST($2::uuid[]) AS student_id
            "#,
        )
        .bind(team.id())
        .bind(&student_ids)
        .execute(&mut *tx)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to save team students: {}", e)))?;

        tx.commit()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to commit team: {}", e)))?;

        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<Team>> {
        let sql = format!("{} WHERE t.id = $1 GROUP BY t.id", SELECT_TEAMS);
        let row = sqlx::query_as::<_, TeamRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to find team by id: {}", e)))?;

        row.map(Team::try_from).transpose()
    }

    async fn find_by_id_with_students(&self, id: Uuid) -> DomainResult<Option<TeamWithStudents>> {
        let Some(team) = self.find_by_id(id).await? else {
            return Ok(None);
        };

        Ok(self.with_students(vec![team]).await?.pop())
    }

    async fn find_all_by_exercise_id(&self, exercise_id: Uuid) -> DomainResult<Vec<Team>> {
        let sql = format!(
            "{} WHERE t.exercise_id = $1 GROUP BY t.id ORDER BY t.created_at",
            SELECT_TEAMS
        );
        let rows = sqlx::query_as::<_, TeamRow>(&sql)
            .bind(exercise_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to find teams by exercise: {}", e)))?;

        rows.into_iter().map(Team::try_from).collect()
    }

    async fn find_all_by_exercise_id_with_students(
        &self,
        exercise_id: Uuid,
    ) -> DomainResult<Vec<TeamWithStudents>> {
        let teams = self.find_all_by_exercise_id(exercise_id).await?;
        self.with_students(teams).await
    }

    async fn find_by_short_name(&self, short_name: &str) -> DomainResult<Option<Team>> {
        let sql = format!("{} WHERE t.short_name = $1 GROUP BY t.id", SELECT_TEAMS);
        let row = sqlx::query_as::<_, TeamRow>(&sql)
            .bind(short_name)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to find team by short name: {}", e)))?;

        row.map(Team::try_from).transpose()
    }

    async fn delete(&self, id: Uuid) -> DomainResult<bool> {
        let result = sqlx::query("DELETE FROM teams WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to delete team: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }
}
