use crate::handlers::json_response;
use crate::store::StoreError;
use hyper::{Body, Response, StatusCode};
use serde_json::json;
use thiserror::Error;

pub type GenericError = Box<dyn std::error::Error + Send + Sync>;

static INTERNAL_SERVER_ERROR: &str = "Internal Server Error";

/// Everything a handler can fail with. `into_response` is the one place
/// errors become HTTP statuses.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found")]
    NotFound,
    #[error("invalid identifier {0:?}")]
    InvalidId(String),
    #[error("invalid request body: {0}")]
    InvalidBody(serde_json::Error),
    #[error("request body exceeds {0} bytes")]
    BodyTooLarge(usize),
    #[error("failed to encode response: {0}")]
    Encode(serde_json::Error),
    #[error("failed to read request body: {0}")]
    Body(#[from] hyper::Error),
    #[error("store task did not complete: {0}")]
    Task(#[from] tokio::task::JoinError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::InvalidId(_) | ApiError::InvalidBody(_) | ApiError::BodyTooLarge(_) => {
                StatusCode::BAD_REQUEST
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Client errors echo their message; internal ones are logged and
    /// answered with a generic body.
    pub fn into_response(self) -> Response<Body> {
        let status = self.status();
        let message = if status.is_server_error() {
            error!("{}", self);
            INTERNAL_SERVER_ERROR.to_string()
        } else {
            self.to_string()
        };
        json_response(status, json!({ "message": message }).to_string())
    }
}
