/// Task model and database operations
///
/// Tasks are the single persisted entity of the system. Every operation is
/// scoped to the owning organization: reads, updates, and deletes filter by
/// both `id` and `org_id`, so a task in another organization is
/// indistinguishable from one that does not exist.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE task_status AS ENUM ('pending', 'started', 'completed');
///
/// CREATE TABLE tasks (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     title VARCHAR(255) NOT NULL,
///     description TEXT,
///     status task_status NOT NULL DEFAULT 'pending',
///     org_id TEXT NOT NULL,
///     created_by TEXT NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use taskboard_shared::models::task::{CreateTask, Task, TaskStatus};
/// use taskboard_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let task = Task::create(&pool, CreateTask {
///     title: "Draft onboarding doc".to_string(),
///     description: Some("First draft".to_string()),
///     status: TaskStatus::Pending,
///     org_id: "org_1".to_string(),
///     created_by: "user_1".to_string(),
/// }).await?;
///
/// let found = Task::find_by_id_and_org(&pool, task.id, "org_1").await?;
/// assert!(found.is_some());
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Task status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    /// Not yet started (To Do)
    Pending,

    /// In progress
    Started,

    /// Finished (Done)
    Completed,
}

impl Default for TaskStatus {
    fn default() -> Self {
        TaskStatus::Pending
    }
}

impl TaskStatus {
    /// Converts status to its wire/database string
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::Started => "started",
            TaskStatus::Completed => "completed",
        }
    }
}

/// Task model representing a single board item
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    /// Unique task id, generated at insert
    pub id: Uuid,

    /// Title (required, at most 255 characters)
    pub title: String,

    /// Optional free-form description
    pub description: Option<String>,

    /// Current status
    pub status: TaskStatus,

    /// Owning organization; immutable after creation
    pub org_id: String,

    /// User who created the task; immutable
    pub created_by: String,

    /// When the task was created
    pub created_at: DateTime<Utc>,

    /// When the task was last modified
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new task
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTask {
    /// Task title
    pub title: String,

    /// Optional description
    pub description: Option<String>,

    /// Initial status (defaults to pending)
    #[serde(default)]
    pub status: TaskStatus,

    /// Owning organization
    pub org_id: String,

    /// Creating user
    pub created_by: String,
}

/// Partial update for a task
///
/// Fields left as `None` are not touched; `updated_at` is always refreshed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTask {
    /// New title
    pub title: Option<String>,

    /// New description
    pub description: Option<String>,

    /// New status
    pub status: Option<TaskStatus>,
}

impl UpdateTask {
    /// Whether the patch carries any field at all
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.status.is_none()
    }
}

impl Task {
    /// Creates a new task
    ///
    /// The insert is a single statement, so the row is either fully visible
    /// to subsequent reads or absent. `created_at` and `updated_at` are both
    /// set from the same statement clock and are equal on a fresh row.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn create(pool: &PgPool, data: CreateTask) -> Result<Self, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (title, description, status, org_id, created_by)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, title, description, status, org_id, created_by,
                      created_at, updated_at
            "#,
        )
        .bind(data.title)
        .bind(data.description)
        .bind(data.status)
        .bind(data.org_id)
        .bind(data.created_by)
        .fetch_one(pool)
        .await?;

        Ok(task)
    }

    /// Finds a task by id within an organization
    ///
    /// Returns `None` both when the task does not exist and when it belongs
    /// to a different organization; callers cannot tell the two apart.
    pub async fn find_by_id_and_org(
        pool: &PgPool,
        id: Uuid,
        org_id: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, title, description, status, org_id, created_by,
                   created_at, updated_at
            FROM tasks
            WHERE id = $1 AND org_id = $2
            "#,
        )
        .bind(id)
        .bind(org_id)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Lists all tasks for an organization
    ///
    /// Ordered by creation time (id as tiebreak) so a single call always
    /// returns a deterministic sequence.
    pub async fn list_by_org(pool: &PgPool, org_id: &str) -> Result<Vec<Self>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, title, description, status, org_id, created_by,
                   created_at, updated_at
            FROM tasks
            WHERE org_id = $1
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(org_id)
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }

    /// Applies a partial update to a task within an organization
    ///
    /// Only the fields present in `data` are written; `updated_at` is always
    /// refreshed. The whole change is a single UPDATE ... RETURNING, so the
    /// patch applies atomically or not at all.
    ///
    /// Returns `None` when no task matches `id` + `org_id`.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        org_id: &str,
        data: UpdateTask,
    ) -> Result<Option<Self>, sqlx::Error> {
        if data.is_empty() {
            // Empty patch: no write, just return the current row.
            return Self::find_by_id_and_org(pool, id, org_id).await;
        }

        let mut query = String::from("UPDATE tasks SET updated_at = NOW()");
        let mut bind_count = 2;

        if data.title.is_some() {
            bind_count += 1;
            query.push_str(&format!(", title = ${}", bind_count));
        }
        if data.description.is_some() {
            bind_count += 1;
            query.push_str(&format!(", description = ${}", bind_count));
        }
        if data.status.is_some() {
            bind_count += 1;
            query.push_str(&format!(", status = ${}", bind_count));
        }

        query.push_str(
            " WHERE id = $1 AND org_id = $2 \
             RETURNING id, title, description, status, org_id, created_by, \
             created_at, updated_at",
        );

        let mut q = sqlx::query_as::<_, Task>(&query).bind(id).bind(org_id);

        if let Some(title) = data.title {
            q = q.bind(title);
        }
        if let Some(description) = data.description {
            q = q.bind(description);
        }
        if let Some(status) = data.status {
            q = q.bind(status);
        }

        let task = q.fetch_optional(pool).await?;

        Ok(task)
    }

    /// Deletes a task within an organization
    ///
    /// Returns whether a row was removed. A second delete of the same id
    /// finds nothing and returns `false`, which the API surfaces as 404.
    pub async fn delete(pool: &PgPool, id: Uuid, org_id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1 AND org_id = $2")
            .bind(id)
            .bind(org_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_status_as_str() {
        assert_eq!(TaskStatus::Pending.as_str(), "pending");
        assert_eq!(TaskStatus::Started.as_str(), "started");
        assert_eq!(TaskStatus::Completed.as_str(), "completed");
    }

    #[test]
    fn test_task_status_default() {
        assert_eq!(TaskStatus::default(), TaskStatus::Pending);
    }

    #[test]
    fn test_task_status_serde_lowercase() {
        assert_eq!(
            serde_json::to_string(&TaskStatus::Started).unwrap(),
            "\"started\""
        );
        let status: TaskStatus = serde_json::from_str("\"completed\"").unwrap();
        assert_eq!(status, TaskStatus::Completed);
    }

    #[test]
    fn test_create_task_status_defaults_to_pending() {
        let data: CreateTask = serde_json::from_str(
            r#"{"title": "t", "description": null, "org_id": "org_1", "created_by": "user_1"}"#,
        )
        .unwrap();
        assert_eq!(data.status, TaskStatus::Pending);
    }

    #[test]
    fn test_update_task_is_empty() {
        assert!(UpdateTask::default().is_empty());
        assert!(!UpdateTask {
            status: Some(TaskStatus::Started),
            ..Default::default()
        }
        .is_empty());
    }
}
