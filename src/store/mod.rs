//! Data access for the `projects` and `todos` tables.
//!
//! Every method is blocking. Callers on the async side go through
//! `tokio::task::spawn_blocking` (see `handlers::blocking`).

use crate::models::{NewTodo, Project, Todo, TodoFields};
use chrono::{DateTime, Utc};
use diesel::r2d2::PoolError;
use thiserror::Error;

mod postgres;

#[cfg(test)]
pub mod memory;

pub use self::postgres::PgStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("connection pool: {0}")]
    Pool(#[from] PoolError),
    #[error("query failed: {0}")]
    Query(#[from] diesel::result::Error),
}

/// Statements the handlers issue. Lookups return row counts so the
/// caller decides what "exists" means; todos are always addressed by
/// `(project_id, todo_id)`.
pub trait Store: Send + Sync {
    fn list_projects(&self) -> Result<Vec<Project>, StoreError>;
    fn create_project(&self, name: &str) -> Result<Project, StoreError>;
    fn count_projects(&self, id: i32) -> Result<i64, StoreError>;
    fn rename_project(&self, id: i32, name: &str) -> Result<(), StoreError>;
    /// Deletes the project's todos, then the project.
    fn delete_project(&self, id: i32) -> Result<(), StoreError>;

    fn list_todos(&self, project_id: i32) -> Result<Vec<Todo>, StoreError>;
    fn create_todo(&self, todo: NewTodo) -> Result<Todo, StoreError>;
    fn count_todos(&self, project_id: i32, todo_id: i32) -> Result<i64, StoreError>;
    fn update_todo(
        &self,
        project_id: i32,
        todo_id: i32,
        fields: TodoFields,
        updated: DateTime<Utc>,
    ) -> Result<(), StoreError>;
    fn set_complete(&self, project_id: i32, todo_id: i32, complete: bool) -> Result<(), StoreError>;
    fn delete_todo(&self, project_id: i32, todo_id: i32) -> Result<(), StoreError>;
}
