use tracing::{error, info, warn};

use crate::AppError;
use crate::AppState;
use backend_domain::{ProcessedFile, SafeFileName};

pub async fn fetch_processed_file(state: &AppState, requested: &str) -> Result<ProcessedFile, AppError> {
    info!("download requested for: {}", requested);
    let Some(name) = SafeFileName::parse_exact(requested) else {
        warn!("rejected download name: {}", requested);
        return Err(AppError::NotFound);
    };

    let bytes = state
        .file_repo
        .read_output(&name)
        .await
        .map_err(|err| {
            error!("failed to read {}: {}", name, err);
            AppError::Internal(err)
        })?;
    match bytes {
        Some(bytes) => {
            info!("file {} found, sending {} bytes", name, bytes.len());
            state.metrics.record_download();
            Ok(ProcessedFile {
                file_name: name.to_string(),
                bytes,
            })
        }
        None => {
            error!("file {} not found", name);
            Err(AppError::NotFound)
        }
    }
}
