use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::api::handlers::{grading_criteria, health, system_notifications, teams};
use crate::api::state::AppState;

/// Builds the application router with all routes and middleware
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .expose_headers(Any);

    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Team routes
        .route(
            "/api/exercises/:exercise_id/teams",
            post(teams::create_team)
                .put(teams::update_team)
                .get(teams::get_teams_for_exercise),
        )
        .route(
            "/api/exercises/:exercise_id/teams/:id",
            get(teams::get_team).delete(teams::delete_team),
        )
        .route("/api/teams", get(teams::exists_team_by_short_name))
        .route(
            "/api/courses/:course_id/exercises/:exercise_id/team-search-users",
            get(teams::search_users_in_course),
        )
        // Grading criteria
        .route(
            "/api/exercises/:exercise_id/grading-criteria",
            get(grading_criteria::get_grading_criteria),
        )
        // System notifications
        .route(
            "/api/system-notifications/active",
            get(system_notifications::get_active_system_notifications),
        )
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        // Shared state
        .with_state(state)
}
