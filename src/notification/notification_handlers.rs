use super::notification_models::Notification;
use crate::{
    error::{AppError, Result},
    middleware::AuthUser,
    state::AppState,
};
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use serde_json::json;
use uuid::Uuid;

/// Get all notifications for the authenticated user, newest first
#[utoipa::path(
    get,
    path = "/api/notifications",
    responses(
        (status = 200, description = "List of notifications", body = Vec<Notification>),
        (status = 401, description = "Unauthenticated")
    ),
    tag = "notifications",
    security(("session_cookie" = []))
)]
pub async fn get_notifications(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<Notification>>> {
    let notifications = state
        .notification_repository
        .find_all_by_user(user_id)
        .await?;

    Ok(Json(notifications))
}

/// Mark a notification as read
#[utoipa::path(
    patch,
    path = "/api/notifications/{id}/read",
    params(
        ("id" = Uuid, Path, description = "Notification ID")
    ),
    responses(
        (status = 200, description = "Notification marked as read", body = Notification),
        (status = 401, description = "Unauthenticated"),
        (status = 404, description = "Notification not found")
    ),
    tag = "notifications",
    security(("session_cookie" = []))
)]
pub async fn mark_notification_read(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(notification_id): Path<Uuid>,
) -> Result<Json<Notification>> {
    let notification = state
        .notification_repository
        .mark_as_read(notification_id, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Notification not found".to_string()))?;

    Ok(Json(notification))
}

/// Delete a notification
#[utoipa::path(
    delete,
    path = "/api/notifications/{id}",
    params(
        ("id" = Uuid, Path, description = "Notification ID")
    ),
    responses(
        (status = 200, description = "Notification deleted"),
        (status = 401, description = "Unauthenticated"),
        (status = 404, description = "Notification not found")
    ),
    tag = "notifications",
    security(("session_cookie" = []))
)]
pub async fn delete_notification(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(notification_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let rows_affected = state
        .notification_repository
        .delete(notification_id, user_id)
        .await?;

    if rows_affected == 0 {
        return Err(AppError::NotFound("Notification not found".to_string()));
    }

    Ok(Json(json!({ "message": "Notification deleted" })))
}
