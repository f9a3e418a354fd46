// Repository implementations (data access layer)
// Adapters that implement the domain repository ports

pub mod in_memory;
pub mod postgres_course_repository;
pub mod postgres_grading_criterion_repository;
pub mod postgres_system_notification_repository;
pub mod postgres_team_repository;
pub mod postgres_user_repository;

pub use in_memory::InMemoryStore;
pub use postgres_course_repository::PostgresCourseRepository;
pub use postgres_grading_criterion_repository::PostgresGradingCriterionRepository;
pub use postgres_system_notification_repository::PostgresSystemNotificationRepository;
pub use postgres_team_repository::PostgresTeamRepository;
pub use postgres_user_repository::PostgresUserRepository;
