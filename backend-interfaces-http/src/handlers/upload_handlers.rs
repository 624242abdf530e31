use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::Json;
use tracing::{info, warn};

use backend_application::commands::upload_commands;
use backend_application::AppState;
use backend_domain::UploadReceipt;

use crate::error::HttpError;
use crate::middleware::read_file_field;

pub async fn upload_file(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadReceipt>, HttpError> {
    let mut multipart = multipart.map_err(|err| {
        warn!("upload without multipart body: {}", err);
        HttpError::BadRequest("No file part".to_string())
    })?;
    let upload = read_file_field(&mut multipart)
        .await
        .map_err(multipart_error)?
        .ok_or_else(|| HttpError::BadRequest("No file part".to_string()))?;
    info!(
        "upload received: '{}' ({} bytes)",
        upload.file_name,
        upload.bytes.len()
    );

    let receipt = upload_commands::process_upload(&state, upload).await?;
    Ok(Json(receipt))
}

fn multipart_error(err: MultipartError) -> HttpError {
    warn!("failed to read upload: {}", err);
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        HttpError::PayloadTooLarge
    } else {
        HttpError::BadRequest("Malformed multipart body".to_string())
    }
}
