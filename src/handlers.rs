//! One handler per endpoint. Handlers that address an existing row check
//! it first and answer 404 unless the lookup matched exactly one row.

use crate::error::ApiError;
use crate::models::{Completion, NewTodo, ProjectName, TodoFields};
use crate::store::{Store, StoreError};
use bytes::buf::BufExt;
use bytes::BytesMut;
use chrono::Utc;
use hyper::body::HttpBody;
use hyper::{header, Body, Request, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::task;

#[derive(Clone)]
pub struct AppState {
    store: Arc<dyn Store>,
    max_body_size: usize,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, max_body_size: usize) -> AppState {
        AppState {
            store,
            max_body_size,
        }
    }
}

/// Runs a store call on the blocking pool.
async fn blocking<T, F>(state: &AppState, f: F) -> Result<T, ApiError>
where
    F: FnOnce(&dyn Store) -> Result<T, StoreError> + Send + 'static,
    T: Send + 'static,
{
    let store = Arc::clone(&state.store);
    let result = task::spawn_blocking(move || f(store.as_ref())).await?;
    Ok(result?)
}

fn exactly_one(count: i64) -> Result<(), ApiError> {
    if count == 1 {
        Ok(())
    } else {
        Err(ApiError::NotFound)
    }
}

async fn require_project(state: &AppState, id: i32) -> Result<(), ApiError> {
    exactly_one(blocking(state, move |store| store.count_projects(id)).await?)
}

async fn require_todo(state: &AppState, project_id: i32, todo_id: i32) -> Result<(), ApiError> {
    let count = blocking(state, move |store| store.count_todos(project_id, todo_id)).await?;
    exactly_one(count)
}

async fn read_json(state: &AppState, req: Request<Body>) -> Result<Value, ApiError> {
    let limit = state.max_body_size;
    let declared = req
        .headers()
        .get(header::CONTENT_LENGTH)
        .and_then(|len| len.to_str().ok())
        .and_then(|len| len.parse::<usize>().ok());
    if declared.map_or(false, |len| len > limit) {
        return Err(ApiError::BodyTooLarge(limit));
    }

    // Aggregate the body, capped even when no length was declared...
    let mut body = req.into_body();
    let mut whole_body = BytesMut::new();
    while let Some(chunk) = body.data().await {
        let chunk = chunk?;
        if whole_body.len() + chunk.len() > limit {
            return Err(ApiError::BodyTooLarge(limit));
        }
        whole_body.extend_from_slice(&chunk);
    }
    // Decode as JSON...
    serde_json::from_reader(whole_body.freeze().reader()).map_err(ApiError::InvalidBody)
}

fn decode<T: DeserializeOwned>(value: &Value) -> Result<T, ApiError> {
    T::deserialize(value).map_err(ApiError::InvalidBody)
}

pub fn json_response(status: StatusCode, body: String) -> Response<Body> {
    let mut response = Response::new(Body::from(body));
    *response.status_mut() = status;
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        header::HeaderValue::from_static("application/json"),
    );
    response
}

fn json<T: Serialize + ?Sized>(
    status: StatusCode,
    value: &T,
) -> Result<Response<Body>, ApiError> {
    let body = serde_json::to_string(value).map_err(ApiError::Encode)?;
    Ok(json_response(status, body))
}

fn message(text: &str) -> Result<Response<Body>, ApiError> {
    json(StatusCode::OK, &json!({ "message": text }))
}

/// `GET /projects`
pub async fn list_projects(state: &AppState) -> Result<Response<Body>, ApiError> {
    let projects = blocking(state, |store| store.list_projects()).await?;
    json(StatusCode::OK, &projects)
}

/// `GET /project/:id/todos`. An unknown project simply has no todos.
pub async fn list_todos(state: &AppState, project_id: i32) -> Result<Response<Body>, ApiError> {
    let todos = blocking(state, move |store| store.list_todos(project_id)).await?;
    json(StatusCode::OK, &todos)
}

/// `POST /project`, echoing the submitted body.
pub async fn create_project(
    state: &AppState,
    req: Request<Body>,
) -> Result<Response<Body>, ApiError> {
    let body = read_json(state, req).await?;
    let ProjectName { name } = decode(&body)?;
    let project = blocking(state, move |store| store.create_project(&name)).await?;
    info!("created project {}", project.id);
    json(StatusCode::CREATED, &body)
}

/// `DELETE /project/:id`, removing the project's todos first.
pub async fn delete_project(state: &AppState, id: i32) -> Result<Response<Body>, ApiError> {
    require_project(state, id).await?;
    blocking(state, move |store| store.delete_project(id)).await?;
    info!("deleted project {}", id);
    json(StatusCode::OK, &id)
}

#[derive(Serialize, Debug)]
struct Renamed {
    id: i32,
    name: String,
}

/// `PATCH /project/:id`
pub async fn rename_project(
    state: &AppState,
    id: i32,
    req: Request<Body>,
) -> Result<Response<Body>, ApiError> {
    require_project(state, id).await?;
    let ProjectName { name } = decode(&read_json(state, req).await?)?;
    let renamed = Renamed { id, name };
    let new_name = renamed.name.clone();
    blocking(state, move |store| store.rename_project(id, &new_name)).await?;
    json(StatusCode::OK, &renamed)
}

/// `POST /project/:id/todos`. The project is not looked up first; a todo
/// can be filed under an id no project has (yet).
pub async fn create_todo(
    state: &AppState,
    project_id: i32,
    req: Request<Body>,
) -> Result<Response<Body>, ApiError> {
    let body = read_json(state, req).await?;
    let fields: TodoFields = decode(&body)?;
    let todo = NewTodo::new(project_id, fields, Utc::now());
    let row = blocking(state, move |store| store.create_todo(todo)).await?;
    info!("created todo {} in project {}", row.id, project_id);
    json(StatusCode::CREATED, &body)
}

/// `DELETE /project/:projectId/todo/:todoId`
pub async fn delete_todo(
    state: &AppState,
    project_id: i32,
    todo_id: i32,
) -> Result<Response<Body>, ApiError> {
    require_todo(state, project_id, todo_id).await?;
    blocking(state, move |store| store.delete_todo(project_id, todo_id)).await?;
    message("Deleted todo")
}

/// `PATCH /project/:projectId/todo/:todoId`. Refreshes `updateddate`.
pub async fn update_todo(
    state: &AppState,
    project_id: i32,
    todo_id: i32,
    req: Request<Body>,
) -> Result<Response<Body>, ApiError> {
    require_todo(state, project_id, todo_id).await?;
    let fields: TodoFields = decode(&read_json(state, req).await?)?;
    let now = Utc::now();
    blocking(state, move |store| {
        store.update_todo(project_id, todo_id, fields, now)
    })
    .await?;
    message("Updated todo")
}

/// `PATCH /project/:projectId/todo/:todoId/completion`. Leaves
/// `updateddate` alone.
pub async fn set_completion(
    state: &AppState,
    project_id: i32,
    todo_id: i32,
    req: Request<Body>,
) -> Result<Response<Body>, ApiError> {
    require_todo(state, project_id, todo_id).await?;
    let Completion { complete } = decode(&read_json(state, req).await?)?;
    blocking(state, move |store| {
        store.set_complete(project_id, todo_id, complete)
    })
    .await?;
    message("Updated todo completion status")
}
