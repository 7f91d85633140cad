/// API route handlers
///
/// # Modules
///
/// - `health`: Liveness check
/// - `tasks`: Organization-scoped task CRUD
/// - `webhooks`: Clerk subscription webhooks

pub mod health;
pub mod tasks;
pub mod webhooks;
