use crate::error::{AppError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Workflow tag, distinct from the derived `completed` flag. A flat
/// enumeration: any status may move to any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Pending,
    Inprogress,
    Completed,
}

impl TaskStatus {
    /// Case-insensitive parse; inbound values are lower-cased before the
    /// enumeration check.
    pub fn parse(value: &str) -> Result<Self> {
        match value.to_lowercase().as_str() {
            "pending" => Ok(TaskStatus::Pending),
            "inprogress" => Ok(TaskStatus::Inprogress),
            "completed" => Ok(TaskStatus::Completed),
            _ => Err(AppError::Validation(
                "Invalid status. Must be 'pending', 'inprogress', or 'completed'".to_string(),
            )),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::Inprogress => "inprogress",
            TaskStatus::Completed => "completed",
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Priority tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TaskCategory {
    High,
    Medium,
    Low,
}

impl TaskCategory {
    pub fn parse(value: &str) -> Result<Self> {
        match value.to_lowercase().as_str() {
            "high" => Ok(TaskCategory::High),
            "medium" => Ok(TaskCategory::Medium),
            "low" => Ok(TaskCategory::Low),
            _ => Err(AppError::Validation(
                "Invalid category. Must be 'high', 'medium', or 'low'".to_string(),
            )),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskCategory::High => "high",
            TaskCategory::Medium => "medium",
            TaskCategory::Low => "low",
        }
    }
}

impl std::fmt::Display for TaskCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub category: String,
    pub status: String,
    pub completed: bool,
    pub due_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parse_is_case_insensitive() {
        assert_eq!(TaskStatus::parse("Completed").unwrap(), TaskStatus::Completed);
        assert_eq!(TaskStatus::parse("INPROGRESS").unwrap(), TaskStatus::Inprogress);
        assert_eq!(TaskStatus::parse("pending").unwrap(), TaskStatus::Pending);
    }

    #[test]
    fn test_status_parse_rejects_unknown_values() {
        assert!(TaskStatus::parse("archived").is_err());
        assert!(TaskStatus::parse("in progress").is_err());
        assert!(TaskStatus::parse("").is_err());
    }

    #[test]
    fn test_category_parse_is_case_insensitive() {
        assert_eq!(TaskCategory::parse("High").unwrap(), TaskCategory::High);
        assert_eq!(TaskCategory::parse("MEDIUM").unwrap(), TaskCategory::Medium);
        assert_eq!(TaskCategory::parse("low").unwrap(), TaskCategory::Low);
    }

    #[test]
    fn test_category_parse_rejects_unknown_values() {
        assert!(TaskCategory::parse("urgent").is_err());
        assert!(TaskCategory::parse("").is_err());
    }

    #[test]
    fn test_display_matches_stored_form() {
        assert_eq!(TaskStatus::Inprogress.to_string(), "inprogress");
        assert_eq!(TaskCategory::Medium.to_string(), "medium");
    }
}
