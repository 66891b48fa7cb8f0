use super::{
    task_dto::{CreateTaskRequest, UpdateTaskRequest},
    task_models::{Task, TaskCategory, TaskStatus},
    task_repository::TaskRepository,
};
use crate::error::{AppError, Result};
use chrono::{DateTime, Local, NaiveDate, Utc};
use uuid::Uuid;

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_PAGE_SIZE: i64 = 5;

/// Business rules for the task lifecycle: field validation, the
/// completed/status reconciliation and pagination. All checks run before
/// any row is written.
#[derive(Clone)]
pub struct TaskService {
    repo: TaskRepository,
}

impl TaskService {
    pub fn new(repo: TaskRepository) -> Self {
        Self { repo }
    }

    pub async fn create_task(&self, user_id: Uuid, payload: CreateTaskRequest) -> Result<Task> {
        // Reject unknown categories instead of silently defaulting
        let category = match payload.category.as_deref() {
            Some(raw) => TaskCategory::parse(raw)?,
            None => TaskCategory::Medium,
        };

        if let Some(due) = payload.due_date {
            check_due_date(due)?;
        }

        // New tasks always start pending / not completed (store defaults)
        self.repo
            .create(
                user_id,
                &payload.title,
                payload.description.as_deref(),
                category.as_str(),
                payload.due_date,
            )
            .await
    }

    /// Partial update restricted to the owner's own tasks. A task owned by
    /// someone else surfaces as `NotFound`, indistinguishable from an absent
    /// one.
    pub async fn update_task(
        &self,
        user_id: Uuid,
        task_id: Uuid,
        payload: UpdateTaskRequest,
    ) -> Result<Task> {
        let status = payload
            .status
            .as_deref()
            .map(TaskStatus::parse)
            .transpose()?;
        let category = payload
            .category
            .as_deref()
            .map(TaskCategory::parse)
            .transpose()?;

        if let Some(due) = payload.due_date {
            check_due_date(due)?;
        }

        let completed = resolve_completed(payload.completed, status);

        self.repo
            .update(
                task_id,
                user_id,
                payload.title.as_deref(),
                payload.description.as_deref(),
                status.map(|s| s.as_str()),
                category.map(|c| c.as_str()),
                completed,
                payload.due_date,
            )
            .await?
            .ok_or_else(|| AppError::NotFound("Task not found".to_string()))
    }

    pub async fn delete_task(&self, user_id: Uuid, task_id: Uuid) -> Result<()> {
        let rows_affected = self.repo.delete(task_id, user_id).await?;

        if rows_affected == 0 {
            return Err(AppError::NotFound("Task not found".to_string()));
        }

        Ok(())
    }

    /// Newest-first page of the owner's tasks plus the total count.
    pub async fn list_tasks(&self, user_id: Uuid, page: i64, limit: i64) -> Result<(Vec<Task>, i64)> {
        let offset = (page - 1) * limit;
        let tasks = self.repo.find_page(user_id, limit, offset).await?;
        let total = self.repo.count_by_user(user_id).await?;

        Ok((tasks, total))
    }
}

/// Reconciliation between the `completed` flag and the `status` enum: an
/// explicit `completed` value always wins; otherwise a supplied status
/// derives it; otherwise the stored value is left untouched.
pub(crate) fn resolve_completed(
    explicit: Option<bool>,
    status: Option<TaskStatus>,
) -> Option<bool> {
    match (explicit, status) {
        (Some(flag), _) => Some(flag),
        (None, Some(status)) => Some(status == TaskStatus::Completed),
        (None, None) => None,
    }
}

/// A due date must land on or after the server-local current day. Checked
/// only when the value is written; stored due dates are allowed to drift
/// into the past.
fn check_due_date(due: DateTime<Utc>) -> Result<()> {
    if due_date_is_valid(due, Local::now().date_naive()) {
        Ok(())
    } else {
        Err(AppError::Validation(
            "Due date must be today or in the future".to_string(),
        ))
    }
}

pub(crate) fn due_date_is_valid(due: DateTime<Utc>, today: NaiveDate) -> bool {
    due.with_timezone(&Local).date_naive() >= today
}

/// Lenient query-parameter parse: absent, non-numeric or non-positive values
/// fall back to the default, mirroring the permissive behavior dashboards
/// rely on (e.g. `limit=1000` to fetch everything).
pub(crate) fn parse_page_param(raw: Option<&str>, default: i64) -> i64 {
    raw.and_then(|s| s.trim().parse::<i64>().ok())
        .filter(|&n| n > 0)
        .unwrap_or(default)
}

pub(crate) fn page_count(total: i64, limit: i64) -> i64 {
    (total as f64 / limit as f64).ceil() as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn explicit_completed_overrides_status() {
        assert_eq!(
            resolve_completed(Some(false), Some(TaskStatus::Completed)),
            Some(false)
        );
        assert_eq!(
            resolve_completed(Some(true), Some(TaskStatus::Pending)),
            Some(true)
        );
    }

    #[test]
    fn completed_derived_from_status_when_not_explicit() {
        assert_eq!(
            resolve_completed(None, Some(TaskStatus::Completed)),
            Some(true)
        );
        assert_eq!(
            resolve_completed(None, Some(TaskStatus::Inprogress)),
            Some(false)
        );
        assert_eq!(resolve_completed(None, Some(TaskStatus::Pending)), Some(false));
    }

    #[test]
    fn completed_untouched_when_neither_supplied() {
        assert_eq!(resolve_completed(None, None), None);
    }

    #[test]
    fn due_date_yesterday_is_rejected() {
        let today = Local::now().date_naive();
        assert!(!due_date_is_valid(Utc::now() - Duration::days(1), today));
    }

    #[test]
    fn due_date_today_or_later_is_accepted() {
        let today = Local::now().date_naive();
        assert!(due_date_is_valid(Utc::now(), today));
        assert!(due_date_is_valid(Utc::now() + Duration::days(7), today));
    }

    #[test]
    fn page_params_fall_back_to_defaults() {
        assert_eq!(parse_page_param(None, DEFAULT_PAGE), 1);
        assert_eq!(parse_page_param(Some("abc"), DEFAULT_PAGE_SIZE), 5);
        assert_eq!(parse_page_param(Some(""), DEFAULT_PAGE_SIZE), 5);
        assert_eq!(parse_page_param(Some("0"), DEFAULT_PAGE_SIZE), 5);
        assert_eq!(parse_page_param(Some("-3"), DEFAULT_PAGE), 1);
        assert_eq!(parse_page_param(Some("2"), DEFAULT_PAGE), 2);
        assert_eq!(parse_page_param(Some("1000"), DEFAULT_PAGE_SIZE), 1000);
    }

    #[test]
    fn page_count_rounds_up() {
        assert_eq!(page_count(12, 5), 3);
        assert_eq!(page_count(10, 5), 2);
        assert_eq!(page_count(0, 5), 0);
        assert_eq!(page_count(1, 5), 1);
    }
}
