use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use super::{
    task_dto::{CreateTaskRequest, TaskListResponse, UpdateTaskRequest},
    task_models::Task,
    task_service::{page_count, parse_page_param, DEFAULT_PAGE, DEFAULT_PAGE_SIZE},
};
use crate::{
    error::{AppError, Result},
    middleware::AuthUser,
    state::AppState,
};

// Raw strings so a non-numeric page/limit falls back to the default instead
// of rejecting the request
#[derive(Deserialize)]
pub struct PaginationQuery {
    page: Option<String>,
    limit: Option<String>,
}

/// Create a task
#[utoipa::path(
    post,
    path = "/api/tasks",
    request_body = CreateTaskRequest,
    responses(
        (status = 201, description = "Task created", body = Task),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthenticated")
    ),
    tag = "tasks",
    security(("session_cookie" = []))
)]
pub async fn create_task(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<CreateTaskRequest>,
) -> Result<impl IntoResponse> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let task = state.task_service.create_task(user_id, payload).await?;

    // The task is durable at this point; a failed notification must not
    // fail the create
    let message = format!("New task \"{}\" created", task.title);
    if let Err(e) = state.notification_service.publish(user_id, &message).await {
        tracing::warn!("Failed to publish task notification: {e}");
    }

    Ok((StatusCode::CREATED, Json(task)))
}

/// List the authenticated user's tasks, newest first
#[utoipa::path(
    get,
    path = "/api/tasks",
    params(
        ("page" = Option<String>, Query, description = "Page number, defaults to 1"),
        ("limit" = Option<String>, Query, description = "Page size, defaults to 5")
    ),
    responses(
        (status = 200, description = "Page of tasks", body = TaskListResponse),
        (status = 401, description = "Unauthenticated")
    ),
    tag = "tasks",
    security(("session_cookie" = []))
)]
pub async fn get_tasks(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(query): Query<PaginationQuery>,
) -> Result<Json<TaskListResponse>> {
    let page = parse_page_param(query.page.as_deref(), DEFAULT_PAGE);
    let limit = parse_page_param(query.limit.as_deref(), DEFAULT_PAGE_SIZE);

    let (tasks, total) = state.task_service.list_tasks(user_id, page, limit).await?;

    Ok(Json(TaskListResponse {
        tasks,
        total_tasks: total,
        current_page: page,
        total_pages: page_count(total, limit),
    }))
}

/// Update a task
#[utoipa::path(
    put,
    path = "/api/tasks/{id}",
    params(
        ("id" = Uuid, Path, description = "Task ID")
    ),
    request_body = UpdateTaskRequest,
    responses(
        (status = 200, description = "Task updated", body = Task),
        (status = 400, description = "Invalid status or category"),
        (status = 401, description = "Unauthenticated"),
        (status = 404, description = "Task not found")
    ),
    tag = "tasks",
    security(("session_cookie" = []))
)]
pub async fn update_task(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(task_id): Path<Uuid>,
    Json(payload): Json<UpdateTaskRequest>,
) -> Result<Json<Task>> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let task = state
        .task_service
        .update_task(user_id, task_id, payload)
        .await?;

    Ok(Json(task))
}

/// Delete a task
#[utoipa::path(
    delete,
    path = "/api/tasks/{id}",
    params(
        ("id" = Uuid, Path, description = "Task ID")
    ),
    responses(
        (status = 200, description = "Task deleted"),
        (status = 401, description = "Unauthenticated"),
        (status = 404, description = "Task not found")
    ),
    tag = "tasks",
    security(("session_cookie" = []))
)]
pub async fn delete_task(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(task_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    state.task_service.delete_task(user_id, task_id).await?;

    Ok(Json(json!({ "message": "Task deleted successfully" })))
}
