use crate::error::{ApiError, GenericError};
use crate::handlers::{self, AppState};
use hyper::header::{self, HeaderValue};
use hyper::{Body, Method, Request, Response, StatusCode};

fn parse_id(raw: &str) -> Result<i32, ApiError> {
    raw.parse().map_err(|_| ApiError::InvalidId(raw.to_string()))
}

fn preflight() -> Response<Body> {
    let mut response = Response::new(Body::empty());
    *response.status_mut() = StatusCode::NO_CONTENT;
    let headers = response.headers_mut();
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET, POST, PATCH, DELETE, OPTIONS"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Content-Type"),
    );
    response
}

async fn dispatch(
    req: Request<Body>,
    state: &AppState,
    method: &Method,
    path: &str,
) -> Result<Response<Body>, ApiError> {
    let segments: Vec<&str> = path.trim_matches('/').split('/').collect();
    match (method, segments.as_slice()) {
        (&Method::OPTIONS, _) => Ok(preflight()),
        (&Method::GET, ["projects"]) => handlers::list_projects(state).await,
        (&Method::POST, ["project"]) => handlers::create_project(state, req).await,
        (&Method::DELETE, ["project", id]) => handlers::delete_project(state, parse_id(id)?).await,
        (&Method::PATCH, ["project", id]) => {
            handlers::rename_project(state, parse_id(id)?, req).await
        }
        (&Method::GET, ["project", id, "todos"]) => {
            handlers::list_todos(state, parse_id(id)?).await
        }
        (&Method::POST, ["project", id, "todos"]) => {
            handlers::create_todo(state, parse_id(id)?, req).await
        }
        (&Method::DELETE, ["project", project, "todo", todo]) => {
            handlers::delete_todo(state, parse_id(project)?, parse_id(todo)?).await
        }
        (&Method::PATCH, ["project", project, "todo", todo]) => {
            handlers::update_todo(state, parse_id(project)?, parse_id(todo)?, req).await
        }
        (&Method::PATCH, ["project", project, "todo", todo, "completion"]) => {
            handlers::set_completion(state, parse_id(project)?, parse_id(todo)?, req).await
        }
        _ => Err(ApiError::NotFound),
    }
}

pub async fn route(req: Request<Body>, state: AppState) -> Result<Response<Body>, GenericError> {
    let method = req.method().clone();
    let path = req.uri().path().to_owned();

    let mut response = match dispatch(req, &state, &method, &path).await {
        Ok(response) => response,
        Err(err) => err.into_response(),
    };
    response
        .headers_mut()
        .insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));

    debug!("{} {} {}", method, path, response.status());
    Ok(response)
}
