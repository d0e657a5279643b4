//! In-process stand-ins for the Postgres store, used by handler tests.

use super::{Store, StoreError};
use crate::models::{NewTodo, Project, Todo, TodoFields};
use chrono::{DateTime, Utc};
use std::sync::Mutex;

#[derive(Default)]
struct Tables {
    projects: Vec<Project>,
    todos: Vec<Todo>,
    next_id: i32,
    mutations: usize,
}

impl Tables {
    fn next_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }

    fn todo_mut(&mut self, project_id: i32, todo_id: i32) -> Option<&mut Todo> {
        self.todos
            .iter_mut()
            .find(|t| t.projectid == project_id && t.id == todo_id)
    }
}

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    /// Number of insert/update/delete statements executed so far.
    pub fn mutations(&self) -> usize {
        self.tables.lock().unwrap().mutations
    }

    pub fn todos_of(&self, project_id: i32) -> Vec<Todo> {
        self.list_todos(project_id).unwrap()
    }

    /// Inserts a second project row with an existing id, which the schema
    /// would never allow.
    pub fn duplicate_project(&self, id: i32) {
        let mut tables = self.tables.lock().unwrap();
        let copy = tables.projects.iter().find(|p| p.id == id).cloned().unwrap();
        tables.projects.push(copy);
    }
}

impl Store for MemoryStore {
    fn list_projects(&self) -> Result<Vec<Project>, StoreError> {
        Ok(self.tables.lock().unwrap().projects.clone())
    }

    fn create_project(&self, name: &str) -> Result<Project, StoreError> {
        let mut tables = self.tables.lock().unwrap();
        let project = Project {
            id: tables.next_id(),
            name: name.to_string(),
        };
        tables.projects.push(project.clone());
        tables.mutations += 1;
        Ok(project)
    }

    fn count_projects(&self, id: i32) -> Result<i64, StoreError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.projects.iter().filter(|p| p.id == id).count() as i64)
    }

    fn rename_project(&self, id: i32, name: &str) -> Result<(), StoreError> {
        let mut tables = self.tables.lock().unwrap();
        for project in tables.projects.iter_mut().filter(|p| p.id == id) {
            project.name = name.to_string();
        }
        tables.mutations += 1;
        Ok(())
    }

    fn delete_project(&self, id: i32) -> Result<(), StoreError> {
        let mut tables = self.tables.lock().unwrap();
        tables.todos.retain(|t| t.projectid != id);
        tables.projects.retain(|p| p.id != id);
        tables.mutations += 2;
        Ok(())
    }

    fn list_todos(&self, project_id: i32) -> Result<Vec<Todo>, StoreError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .todos
            .iter()
            .filter(|t| t.projectid == project_id)
            .cloned()
            .collect())
    }

    fn create_todo(&self, todo: NewTodo) -> Result<Todo, StoreError> {
        let mut tables = self.tables.lock().unwrap();
        let row = Todo {
            id: tables.next_id(),
            projectid: todo.projectid,
            title: todo.title,
            description: todo.description,
            createddate: todo.createddate,
            updateddate: todo.updateddate,
            duedate: todo.duedate,
            complete: false,
        };
        tables.todos.push(row.clone());
        tables.mutations += 1;
        Ok(row)
    }

    fn count_todos(&self, project_id: i32, todo_id: i32) -> Result<i64, StoreError> {
        let tables = self.tables.lock().unwrap();
        let count = tables
            .todos
            .iter()
            .filter(|t| t.projectid == project_id && t.id == todo_id)
            .count();
        Ok(count as i64)
    }

    fn update_todo(
        &self,
        project_id: i32,
        todo_id: i32,
        fields: TodoFields,
        updated: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let mut tables = self.tables.lock().unwrap();
        if let Some(todo) = tables.todo_mut(project_id, todo_id) {
            todo.title = fields.title;
            todo.description = fields.description;
            todo.duedate = fields.duedate;
            todo.updateddate = updated;
        }
        tables.mutations += 1;
        Ok(())
    }

    fn set_complete(
        &self,
        project_id: i32,
        todo_id: i32,
        complete: bool,
    ) -> Result<(), StoreError> {
        let mut tables = self.tables.lock().unwrap();
        if let Some(todo) = tables.todo_mut(project_id, todo_id) {
            todo.complete = complete;
        }
        tables.mutations += 1;
        Ok(())
    }

    fn delete_todo(&self, project_id: i32, todo_id: i32) -> Result<(), StoreError> {
        let mut tables = self.tables.lock().unwrap();
        tables
            .todos
            .retain(|t| !(t.projectid == project_id && t.id == todo_id));
        tables.mutations += 1;
        Ok(())
    }
}

/// Fails every statement, as a dropped database connection would.
pub struct FailingStore;

fn broken<T>() -> Result<T, StoreError> {
    Err(StoreError::Query(diesel::result::Error::RollbackTransaction))
}

impl Store for FailingStore {
    fn list_projects(&self) -> Result<Vec<Project>, StoreError> {
        broken()
    }
    fn create_project(&self, _: &str) -> Result<Project, StoreError> {
        broken()
    }
    fn count_projects(&self, _: i32) -> Result<i64, StoreError> {
        broken()
    }
    fn rename_project(&self, _: i32, _: &str) -> Result<(), StoreError> {
        broken()
    }
    fn delete_project(&self, _: i32) -> Result<(), StoreError> {
        broken()
    }
    fn list_todos(&self, _: i32) -> Result<Vec<Todo>, StoreError> {
        broken()
    }
    fn create_todo(&self, _: NewTodo) -> Result<Todo, StoreError> {
        broken()
    }
    fn count_todos(&self, _: i32, _: i32) -> Result<i64, StoreError> {
        broken()
    }
    fn update_todo(
        &self,
        _: i32,
        _: i32,
        _: TodoFields,
        _: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        broken()
    }
    fn set_complete(&self, _: i32, _: i32, _: bool) -> Result<(), StoreError> {
        broken()
    }
    fn delete_todo(&self, _: i32, _: i32) -> Result<(), StoreError> {
        broken()
    }
}
