use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, HeaderValue};
use axum::response::{IntoResponse, Response};

use backend_application::queries::download_queries;
use backend_application::AppState;

use crate::error::HttpError;

pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

pub async fn download_file(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Response, HttpError> {
    let file = download_queries::fetch_processed_file(&state, &filename).await?;

    let disposition = format!("attachment; filename=\"{}\"", file.file_name);
    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(XLSX_CONTENT_TYPE),
    );
    headers.insert(
        header::CONTENT_DISPOSITION,
        HeaderValue::from_str(&disposition).map_err(|err| HttpError::Internal(err.to_string()))?,
    );
    Ok((headers, file.bytes).into_response())
}
