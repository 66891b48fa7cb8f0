use crate::notification::{NotificationRepository, NotificationService};
use crate::task::TaskService;
use crate::user::UserRepository;
use crate::websocket::RoomRegistry;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub user_repository: UserRepository,
    pub notification_repository: NotificationRepository,
    pub task_service: TaskService,
    pub notification_service: NotificationService,
    pub rooms: RoomRegistry,
}

#[derive(Clone)]
pub struct Config {
    pub jwt_secret: String,
    pub client_origin: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            jwt_secret: std::env::var("JWT_SECRET").expect("JWT_SECRET must be set"),
            client_origin: std::env::var("CLIENT_ORIGIN")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
        }
    }
}
