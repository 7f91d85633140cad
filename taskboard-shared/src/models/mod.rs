/// Database models
///
/// # Models
///
/// - `task`: Organization-scoped tasks and their CRUD operations
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
///     description: None,
///     status: TaskStatus::Pending,
///     org_id: "org_1".to_string(),
///     created_by: "user_1".to_string(),
/// }).await?;
/// # Ok(())
/// # }
/// ```

pub mod task;
