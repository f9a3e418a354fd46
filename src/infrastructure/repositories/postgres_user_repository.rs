use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::repositories::UserRepository;
use crate::domain::user::{Authority, LoginOrName, User};
use crate::domain::{DomainError, DomainResult};

/// Row shape shared by every query that loads users
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub login: String,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub groups: Vec<String>,
    pub authorities: Vec<String>,
}

impl TryFrom<UserRow> for User {
    type Error = DomainError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let authorities = row
            .authorities
            .iter()
            .map(|a| a.parse::<Authority>())
            .collect::<Result<_, _>>()
            .map_err(|e| DomainError::storage(format!("Invalid authority from database: {}", e)))?;

        Ok(User {
            id: row.id,
            login: row.login,
            first_name: row.first_name,
            last_name: row.last_name,
            email: row.email,
            groups: row.groups.into_iter().collect(),
            authorities,
        })
    }
}

pub(crate) const USER_COLUMNS: &str =
    "u.id, u.login, u.first_name, u.last_name, u.email, u.groups, u.authorities";

/// Escapes LIKE wildcards so the query is matched literally
fn like_pattern(query: &str) -> String {
    let escaped = query
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

/// PostgreSQL implementation of UserRepository
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    /// Creates a new PostgresUserRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<User>> {
        let sql = format!("SELECT {} FROM users u WHERE u.id = $1", USER_COLUMNS);
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to find user by id: {}", e)))?;

        row.map(User::try_from).transpose()
    }

    async fn find_all_by_ids(&self, ids: &[Uuid]) -> DomainResult<Vec<User>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let sql = format!(
            "SELECT {} FROM users u WHERE u.id = ANY($1) ORDER BY u.login",
            USER_COLUMNS
        );
        let rows = sqlx::query_as::<_, UserRow>(&sql)
            .bind(ids)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to find users by ids: {}", e)))?;

        rows.into_iter().map(User::try_from).collect()
    }

    async fn search_by_login_or_name_in_group(
        &self,
        group: &str,
        query: &LoginOrName,
    ) -> DomainResult<Vec<User>> {
        let sql = format!(
            r#"
            SELECT {}
            FROM users u
            WHERE $1 = ANY(u.groups)
              AND (
                u.login ILIKE $2
                OR (u.first_name || ' ' || u.last_name) ILIKE $2
              )
            ORDER BY u.login
            "#,
            USER_COLUMNS
        );
        let rows = sqlx::query_as::<_, UserRow>(&sql)
            .bind(group)
            .bind(like_pattern(query.as_str()))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to search users: {}", e)))?;

        tracing::debug!(group, query = %query, hits = rows.len(), "User search");

        rows.into_iter().map(User::try_from).collect()
    }
}
