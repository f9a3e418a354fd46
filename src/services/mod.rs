// Application services
// Coordinate repositories and the authorization policy per request

pub mod team_service;
pub mod team_workflow;

pub use team_service::TeamService;
pub use team_workflow::{TeamSubmission, TeamWorkflow};
