use super::schema::{projects, todos};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Queryable, Serialize, Clone, PartialEq, Debug)]
pub struct Project {
    pub id: i32,
    pub name: String,
}

#[derive(Insertable)]
#[table_name = "projects"]
pub struct NewProject<'a> {
    pub name: &'a str,
}

/// A todo row. Field names follow the column names, which is also what
/// goes out on the wire.
#[derive(Queryable, Serialize, Clone, PartialEq, Debug)]
pub struct Todo {
    pub id: i32,
    pub projectid: i32,
    pub title: Option<String>,
    pub description: Option<String>,
    pub createddate: DateTime<Utc>,
    pub updateddate: DateTime<Utc>,
    pub duedate: Option<String>,
    pub complete: bool,
}

#[derive(Insertable, Clone, Debug)]
#[table_name = "todos"]
pub struct NewTodo {
    pub projectid: i32,
    pub title: Option<String>,
    pub description: Option<String>,
    pub createddate: DateTime<Utc>,
    pub updateddate: DateTime<Utc>,
    pub duedate: Option<String>,
}

impl NewTodo {
    /// Stamps both timestamps with the same instant.
    pub fn new(projectid: i32, fields: TodoFields, now: DateTime<Utc>) -> Self {
        NewTodo {
            projectid,
            title: fields.title,
            description: fields.description,
            createddate: now,
            updateddate: now,
            duedate: fields.duedate,
        }
    }
}

/// Body of `POST /project` and `PATCH /project/:id`.
#[derive(Deserialize, Debug)]
pub struct ProjectName {
    pub name: String,
}

/// Body of todo create and edit. Absent fields are stored as NULL.
#[derive(Deserialize, Clone, Default, Debug)]
pub struct TodoFields {
    pub title: Option<String>,
    pub description: Option<String>,
    pub duedate: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct Completion {
    pub complete: bool,
}
