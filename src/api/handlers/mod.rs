pub mod grading_criteria;
pub mod health;
pub mod system_notifications;
pub mod teams;
