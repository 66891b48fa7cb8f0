mod auth;
mod db;
mod error;
mod middleware;
mod notification;
mod routes;
mod state;
mod task;
mod user;
mod websocket;

use db::{create_pool, run_migrations};
use notification::{NotificationRepository, NotificationService};
use routes::create_router;
use state::{AppState, Config};
use std::sync::Arc;
use task::{TaskRepository, TaskService};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use user::UserRepository;
use websocket::RoomRegistry;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,taskboard=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Arc::new(Config::from_env());

    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    tracing::info!("Connecting to database...");
    let db = create_pool(&database_url).await?;

    tracing::info!("Running migrations...");
    run_migrations(&db).await?;

    // Live-connection room registry, shared between the socket handler and
    // the notification fan-out
    let rooms = RoomRegistry::new();

    // Create repositories
    let user_repository = UserRepository::new(db.clone());
    let task_repository = TaskRepository::new(db.clone());
    let notification_repository = NotificationRepository::new(db.clone());

    // Create services
    let task_service = TaskService::new(task_repository);
    let notification_service =
        NotificationService::new(notification_repository.clone(), rooms.clone());

    let state = AppState {
        config: config.clone(),
        user_repository,
        notification_repository,
        task_service,
        notification_service,
        rooms,
    };

    let app = create_router(state);

    let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let addr = format!("{}:{}", host, port);

    tracing::info!("Server starting on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
