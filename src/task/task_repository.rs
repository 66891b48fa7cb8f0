use super::task_models::Task;
use crate::error::Result;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Clone)]
pub struct TaskRepository {
    pool: PgPool,
}

impl TaskRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        user_id: Uuid,
        title: &str,
        description: Option<&str>,
        category: &str,
        due_date: Option<DateTime<Utc>>,
    ) -> Result<Task> {
        let task = sqlx::query_as::<_, Task>(
            "INSERT INTO tasks (user_id, title, description, category, due_date)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING *",
        )
        .bind(user_id)
        .bind(title)
        .bind(description)
        .bind(category)
        .bind(due_date)
        .fetch_one(&self.pool)
        .await?;

        Ok(task)
    }

    pub async fn find_page(&self, user_id: Uuid, limit: i64, offset: i64) -> Result<Vec<Task>> {
        let tasks = sqlx::query_as::<_, Task>(
            "SELECT * FROM tasks WHERE user_id = $1
             ORDER BY created_at DESC
             LIMIT $2 OFFSET $3",
        )
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(tasks)
    }

    pub async fn count_by_user(&self, user_id: Uuid) -> Result<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM tasks WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Partial update scoped to the owner. Omitted fields keep their stored
    /// value; `updated_at` is refreshed on every matched row. Returns `None`
    /// when no row matches the (id, owner) pair.
    pub async fn update(
        &self,
        id: Uuid,
        user_id: Uuid,
        title: Option<&str>,
        description: Option<&str>,
        status: Option<&str>,
        category: Option<&str>,
        completed: Option<bool>,
        due_date: Option<DateTime<Utc>>,
    ) -> Result<Option<Task>> {
        let task = sqlx::query_as::<_, Task>(
            "UPDATE tasks SET
                title = COALESCE($1, title),
                description = COALESCE($2, description),
                status = COALESCE($3, status),
                category = COALESCE($4, category),
                completed = COALESCE($5, completed),
                due_date = COALESCE($6, due_date),
                updated_at = NOW()
             WHERE id = $7 AND user_id = $8
             RETURNING *",
        )
        .bind(title)
        .bind(description)
        .bind(status)
        .bind(category)
        .bind(completed)
        .bind(due_date)
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(task)
    }

    pub async fn delete(&self, id: Uuid, user_id: Uuid) -> Result<u64> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
