use axum::extract::multipart::MultipartError;
use axum::extract::Multipart;

use backend_domain::UploadedFile;

pub const FILE_FIELD: &str = "file";

/// Pulls the `file` upload out of a multipart body. Returns `None` when the
/// form carries no file part under that name; plain form fields named `file`
/// do not count. A file part sent with an empty filename yields an empty name.
pub async fn read_file_field(
    multipart: &mut Multipart,
) -> Result<Option<UploadedFile>, MultipartError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let Some(file_name) = field.file_name().map(str::to_string) else {
            continue;
        };
        let bytes = field.bytes().await?;
        return Ok(Some(UploadedFile {
            file_name,
            bytes: bytes.to_vec(),
        }));
    }
    Ok(None)
}
