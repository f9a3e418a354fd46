// Domain layer module exports
// Entities, value objects, the authorization policy and repository ports.
// Nothing in here knows about HTTP or SQL.

pub mod authorization;
pub mod course;
pub mod errors;
pub mod grading;
pub mod notification;
pub mod repositories;
pub mod team;
pub mod user;

pub use errors::{DomainError, DomainResult};
