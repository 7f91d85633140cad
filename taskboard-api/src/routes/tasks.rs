/// Task CRUD endpoints
///
/// All operations are organization-scoped and permission-gated: each handler
/// applies exactly one capability check against the caller resolved by the
/// session auth layer, then queries with the caller's `org_id`. A task
/// belonging to another organization produces the same 404 as one that does
/// not exist.
///
/// # Endpoints
///
/// ```text
/// GET    /api/tasks          List all tasks for the caller's organization
/// POST   /api/tasks          Create a new task
/// GET    /api/tasks/:id      Get a specific task
/// PUT    /api/tasks/:id      Update a task (partial)
/// DELETE /api/tasks/:id      Delete a task
/// ```

use crate::app::AppState;
use crate::error::{ApiError, ApiResult};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use taskboard_shared::auth::guard::AuthContext;
use taskboard_shared::models::task::{CreateTask, Task, TaskStatus, UpdateTask};
use uuid::Uuid;
use validator::Validate;

/// Create task request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTaskRequest {
    /// Task title
    #[validate(length(min = 1, max = 255, message = "title must be 1-255 characters"))]
    pub title: String,

    /// Optional description
    pub description: Option<String>,

    /// Initial status (defaults to pending)
    #[serde(default)]
    pub status: TaskStatus,
}

/// Update task request (all fields optional; absent fields are untouched)
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateTaskRequest {
    /// New title
    #[validate(length(min = 1, max = 255, message = "title must be 1-255 characters"))]
    pub title: Option<String>,

    /// New description
    pub description: Option<String>,

    /// New status
    pub status: Option<TaskStatus>,
}

/// List tasks handler
///
/// Requires `org:tasks:view`. Returns every task in the caller's
/// organization, ordered by creation time.
pub async fn list_tasks(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<Vec<Task>>> {
    let caller = auth.require_view()?;

    let tasks = Task::list_by_org(&state.db, &caller.org_id).await?;

    Ok(Json(tasks))
}

/// Create task handler
///
/// Requires `org:tasks:create`. The task is created in the caller's
/// organization with the caller as `created_by`.
pub async fn create_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(request): Json<CreateTaskRequest>,
) -> ApiResult<Json<Task>> {
    let caller = auth.require_create()?;

    request.validate()?;

    tracing::info!(
        org_id = %caller.org_id,
        user_id = %caller.user_id,
        "Creating task"
    );

    let task = Task::create(
        &state.db,
        CreateTask {
            title: request.title,
            description: request.description,
            status: request.status,
            org_id: caller.org_id.clone(),
            created_by: caller.user_id.clone(),
        },
    )
    .await?;

    Ok(Json(task))
}

/// Get task handler
///
/// Requires `org:tasks:view`. 404 when the task does not exist in the
/// caller's organization.
pub async fn get_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Task>> {
    let caller = auth.require_view()?;

    let task = Task::find_by_id_and_org(&state.db, id, &caller.org_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    Ok(Json(task))
}

/// Update task handler
///
/// Requires `org:tasks:edit`. Only the fields present in the request body
/// are applied; `updated_at` is refreshed. 404 when the task does not exist
/// in the caller's organization.
pub async fn update_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateTaskRequest>,
) -> ApiResult<Json<Task>> {
    let caller = auth.require_edit()?;

    request.validate()?;

    let task = Task::update(
        &state.db,
        id,
        &caller.org_id,
        UpdateTask {
            title: request.title,
            description: request.description,
            status: request.status,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    Ok(Json(task))
}

/// Delete task handler
///
/// Requires `org:tasks:delete`. Deletion is permanent; a repeat delete of
/// the same id yields 404.
pub async fn delete_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let caller = auth.require_delete()?;

    let deleted = Task::delete(&state.db, id, &caller.org_id).await?;
    if !deleted {
        return Err(ApiError::NotFound("Task not found".to_string()));
    }

    tracing::info!(org_id = %caller.org_id, task_id = %id, "Task deleted");

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_validation_bounds() {
        let valid = CreateTaskRequest {
            title: "Draft onboarding doc".to_string(),
            description: None,
            status: TaskStatus::Pending,
        };
        assert!(valid.validate().is_ok());

        let empty = CreateTaskRequest {
            title: String::new(),
            description: None,
            status: TaskStatus::Pending,
        };
        assert!(empty.validate().is_err());

        let too_long = CreateTaskRequest {
            title: "x".repeat(256),
            description: None,
            status: TaskStatus::Pending,
        };
        assert!(too_long.validate().is_err());
    }

    #[test]
    fn test_update_request_absent_fields_pass_validation() {
        assert!(UpdateTaskRequest::default().validate().is_ok());

        let bad_title = UpdateTaskRequest {
            title: Some(String::new()),
            ..Default::default()
        };
        assert!(bad_title.validate().is_err());
    }

    #[test]
    fn test_create_request_status_defaults_to_pending() {
        let request: CreateTaskRequest =
            serde_json::from_str(r#"{"title": "Draft onboarding doc"}"#).unwrap();
        assert_eq!(request.status, TaskStatus::Pending);
        assert!(request.description.is_none());
    }
}
