// Infrastructure layer module
// PostgreSQL and in-memory adapters for the domain repository ports
// Follows Hexagonal Architecture

pub mod repositories;

use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::repositories::Repositories;
use repositories::{
    InMemoryStore, PostgresCourseRepository, PostgresGradingCriterionRepository,
    PostgresSystemNotificationRepository, PostgresTeamRepository, PostgresUserRepository,
};

/// Repositories backed by one PostgreSQL pool
pub fn postgres_repositories(pool: PgPool) -> Repositories {
    Repositories {
        teams: Arc::new(PostgresTeamRepository::new(pool.clone())),
        users: Arc::new(PostgresUserRepository::new(pool.clone())),
        courses: Arc::new(PostgresCourseRepository::new(pool.clone())),
        grading_criteria: Arc::new(PostgresGradingCriterionRepository::new(pool.clone())),
        system_notifications: Arc::new(PostgresSystemNotificationRepository::new(pool)),
    }
}

/// Repositories that all share one in-memory store
pub fn in_memory_repositories(store: Arc<InMemoryStore>) -> Repositories {
    Repositories {
        teams: store.clone(),
        users: store.clone(),
        courses: store.clone(),
        grading_criteria: store.clone(),
        system_notifications: store,
    }
}
