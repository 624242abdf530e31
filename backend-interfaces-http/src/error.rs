use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use backend_application::AppError;

#[derive(Debug)]
pub enum HttpError {
    BadRequest(String),
    NotFound,
    PayloadTooLarge,
    Internal(String),
}

impl From<AppError> for HttpError {
    fn from(value: AppError) -> Self {
        match value {
            AppError::BadRequest(msg) => HttpError::BadRequest(msg),
            AppError::NotFound => HttpError::NotFound,
            err @ AppError::Processing(_) => HttpError::Internal(err.to_string()),
            AppError::Internal(err) => HttpError::Internal(format!("{:#}", err)),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            HttpError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            HttpError::NotFound => (StatusCode::NOT_FOUND, "File not found".to_string()),
            HttpError::PayloadTooLarge => {
                (StatusCode::PAYLOAD_TOO_LARGE, "File too large".to_string())
            }
            HttpError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };
        (status, Json(ErrorBody { error: message })).into_response()
    }
}
