use crate::{
    auth::{auth_dto::*, auth_handlers},
    middleware::auth_middleware,
    notification::{notification_handlers, Notification},
    state::AppState,
    task::{
        task_dto::{CreateTaskRequest, TaskListResponse, UpdateTaskRequest},
        task_handlers, Task, TaskCategory, TaskStatus,
    },
    user::UserResponse,
    websocket::ws_handler,
};
use axum::{
    http::{header::CONTENT_TYPE, HeaderValue, Method},
    middleware,
    routing::{delete, get, patch, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        auth_handlers::signup,
        auth_handlers::login,
        auth_handlers::logout,
        auth_handlers::get_current_user,
        auth_handlers::get_user_by_id,
        task_handlers::create_task,
        task_handlers::get_tasks,
        task_handlers::update_task,
        task_handlers::delete_task,
        notification_handlers::get_notifications,
        notification_handlers::mark_notification_read,
        notification_handlers::delete_notification,
    ),
    components(
        schemas(
            SignupRequest,
            LoginRequest,
            AuthResponse,
            UserResponse,
            CreateTaskRequest,
            UpdateTaskRequest,
            TaskListResponse,
            Task,
            TaskStatus,
            TaskCategory,
            Notification,
        )
    ),
    tags(
        (name = "auth", description = "Authentication endpoints"),
        (name = "tasks", description = "Task management endpoints"),
        (name = "notifications", description = "Notification endpoints")
    ),
    modifiers(&SecurityAddon)
)]
struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "session_cookie",
                utoipa::openapi::security::SecurityScheme::ApiKey(
                    utoipa::openapi::security::ApiKey::Cookie(
                        utoipa::openapi::security::ApiKeyValue::new(crate::auth::SESSION_COOKIE),
                    ),
                ),
            )
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    // The session cookie rides on every request, so the browser client needs
    // a concrete allowed origin with credentials
    let origin = state
        .config
        .client_origin
        .parse::<HeaderValue>()
        .expect("CLIENT_ORIGIN must be a valid origin");

    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([CONTENT_TYPE])
        .allow_credentials(true);

    // Public routes (no auth required)
    let auth_public = Router::new()
        .route("/signup", post(auth_handlers::signup))
        .route("/login", post(auth_handlers::login))
        .route("/logout", post(auth_handlers::logout));

    // Protected routes (auth required)
    let auth_protected = Router::new()
        .route("/user", get(auth_handlers::get_current_user))
        .route("/users/:id", get(auth_handlers::get_user_by_id))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let task_routes = Router::new()
        .route(
            "/",
            get(task_handlers::get_tasks).post(task_handlers::create_task),
        )
        .route(
            "/:id",
            put(task_handlers::update_task).delete(task_handlers::delete_task),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let notification_routes = Router::new()
        .route("/", get(notification_handlers::get_notifications))
        .route(
            "/:id/read",
            patch(notification_handlers::mark_notification_read),
        )
        .route("/:id", delete(notification_handlers::delete_notification))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let api_routes = Router::new()
        .nest("/auth", auth_public.merge(auth_protected))
        .nest("/tasks", task_routes)
        .nest("/notifications", notification_routes);

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .nest("/api", api_routes)
        .route("/ws", get(ws_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
