use sqlx::postgres::PgPoolOptions;

use courseteams_api::api::{self, ApiSettings, AppState};
use courseteams_api::config::AppConfig;
use courseteams_api::infrastructure::postgres_repositories;
use courseteams_api::logging::init_logging;

#[tokio::main]
async fn main() {
    // Load environment variables
    dotenv::dotenv().ok();

    let config = AppConfig::from_env().expect("Invalid configuration");

    // Initialize tracing
    init_logging(&config.log_filter);
    if config.uses_development_secret() {
        tracing::warn!("JWT_SECRET not set, using insecure development secret");
    }

    // Connect to database
    tracing::info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(&config.database_url)
        .await
        .expect("Failed to connect to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run database migrations");

    tracing::info!("Database connected successfully");

    let state = AppState::new(
        postgres_repositories(pool),
        ApiSettings {
            jwt_secret: config.jwt_secret.clone(),
            application_name: config.application_name.clone(),
        },
    );
    let app = api::router(state);

    // Start server
    tracing::info!("Server listening on {}", config.bind_addr);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .expect("Failed to bind address");

    axum::serve(listener, app)
        .await
        .expect("Server failed");
}
