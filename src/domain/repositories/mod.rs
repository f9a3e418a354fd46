// Repository ports
// Read-only lookups plus save/delete; no business rules live here.
// Absence is an empty result, never an error.

pub mod course_repository;
pub mod grading_criterion_repository;
pub mod system_notification_repository;
pub mod team_repository;
pub mod user_repository;

pub use course_repository::CourseRepository;
pub use grading_criterion_repository::GradingCriterionRepository;
pub use system_notification_repository::SystemNotificationRepository;
pub use team_repository::TeamRepository;
pub use user_repository::UserRepository;

use std::sync::Arc;

/// Every repository port, shared across requests
#[derive(Clone)]
pub struct Repositories {
    pub teams: Arc<dyn TeamRepository>,
    pub users: Arc<dyn UserRepository>,
    pub courses: Arc<dyn CourseRepository>,
    pub grading_criteria: Arc<dyn GradingCriterionRepository>,
    pub system_notifications: Arc<dyn SystemNotificationRepository>,
}
